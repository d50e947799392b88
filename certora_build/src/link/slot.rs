//!
//! The storage slot resolver.
//!

use std::collections::BTreeSet;
use std::path::Path;

use alloy_primitives::U256;

use crate::error::Error;
use crate::options::Options;
use crate::sdc::Sdc;
use crate::solc::Compiler;

///
/// Resolves the storage slot of the state variable `slot_name` of the SDC primary contract.
///
/// The storage layout of the compiler output is preferred. Without one, the contract is
/// recompiled with `--asm` and the listing is scanned.
///
pub fn resolve<C>(sdc: &Sdc, slot_name: &str, options: &Options, compiler: &C) -> anyhow::Result<String>
where
    C: Compiler,
{
    if let Some(layout) = sdc
        .primary()
        .and_then(|contract| contract.storage_layout.as_ref())
    {
        if let Some(slot) = from_storage_layout(layout, slot_name, sdc.primary_contract.as_str())? {
            log::debug!("Slot of `{slot_name}` found in the storage layout: {slot}");
            return Ok(slot);
        }
    }

    let output_folder = options.output_folder_path();
    let file = options.platform.compiler_path(
        crate::utils::path_to_string_normalized(
            crate::utils::absolute_path(
                options.working_directory.as_path(),
                Path::new(sdc.sdc_origin_file.as_str()),
            )
            .as_path(),
        )
        .as_str(),
    );
    let extra_args: Vec<String> = options
        .solc_args
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    compiler.assembly(
        options
            .solc_executable(sdc.primary_contract.as_str())
            .as_str(),
        extra_args.as_slice(),
        output_folder.as_path(),
        options.path.as_str(),
        options.package_arguments().as_slice(),
        file.as_str(),
    )?;

    let listing_path = output_folder.join(format!("{}.evm", sdc.primary_contract));
    let listing = std::fs::read_to_string(listing_path.as_path()).map_err(|error| {
        Error::link(format!(
            "Assembly listing `{}` reading error: {error}",
            listing_path.display()
        ))
    })?;
    from_assembly(listing.as_str(), slot_name, sdc.primary_contract.as_str())
}

///
/// Looks the variable up in a `storageLayout` object, returning the slot as hexadecimal.
///
pub fn from_storage_layout(
    layout: &serde_json::Value,
    slot_name: &str,
    contract: &str,
) -> anyhow::Result<Option<String>> {
    let mut slots = BTreeSet::new();
    for entry in layout
        .get("storage")
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry.get("label").and_then(serde_json::Value::as_str) == Some(slot_name))
    {
        let slot = entry
            .get("slot")
            .and_then(serde_json::Value::as_str)
            .and_then(|slot| U256::from_str_radix(slot, 10).ok())
            .ok_or_else(|| {
                Error::internal(format!(
                    "Storage layout entry `{slot_name}` of `{contract}` has an invalid slot: {entry}"
                ))
            })?;
        slots.insert(slot);
    }

    match slots.len() {
        0 => Ok(None),
        1 => Ok(slots.into_iter().next().map(|slot| format!("{slot:x}"))),
        _ => Err(Error::link(format!(
            "Failed to resolve slot for `{slot_name}` in `{contract}`, the storage layout has several: {}",
            slots
                .iter()
                .map(|slot| format!("{slot:x}"))
                .collect::<Vec<String>>()
                .join(", ")
        ))),
    }
}

///
/// Scans an `--asm` listing for the instruction following the comments that name the variable.
///
/// Exactly one distinct `0x`-prefixed candidate is required.
///
pub fn from_assembly(listing: &str, slot_name: &str, contract: &str) -> anyhow::Result<String> {
    let pattern = regex::Regex::new(
        format!(
            r#"/\* "[^"]+":[0-9]+:[0-9]+\s* {} \*/"#,
            regex::escape(slot_name)
        )
        .as_str(),
    )
    .expect("Always valid");

    let mut candidates = BTreeSet::new();
    let mut lines = listing.lines();
    while let Some(line) = lines.next() {
        if !pattern.is_match(line) {
            continue;
        }
        if let Some(next) = lines.next() {
            let candidate = next.trim();
            if candidate.starts_with("0x") {
                candidates.insert(candidate.to_owned());
            }
        }
    }

    if candidates.len() != 1 {
        return Err(Error::link(format!(
            "Failed to resolve slot for `{slot_name}` in `{contract}`, valid candidates: [{}]",
            candidates.into_iter().collect::<Vec<String>>().join(", ")
        )));
    }
    let candidate = candidates.into_iter().next().expect("Always exists");
    crate::utils::normalize_hex_number(candidate.as_str())
}
