//!
//! The library placeholder linker.
//!

use std::collections::BTreeMap;

use crate::address::chosen::ChosenAddresses;
use crate::error::Error;
use crate::solc::standard_json::output::contract::evm::bytecode::Placement;

/// The library placeholder marker left by the compiler.
pub const PLACEHOLDER_MARKER: &str = "__$";

///
/// The linked deployed bytecode.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linked {
    /// The bytecode, lowercase and unprefixed.
    pub bytecode: String,
    /// The library addresses in the order of their placements, with repetitions.
    pub library_addresses: Vec<String>,
}

///
/// Substitutes the library placeholders of `bytecode` with the chosen library addresses.
///
/// Placements are applied from the highest offset down, so earlier offsets stay valid.
///
pub fn link(
    contract_name: &str,
    bytecode: &str,
    link_references: &BTreeMap<String, BTreeMap<String, Vec<Placement>>>,
    chosen_addresses: &ChosenAddresses,
) -> anyhow::Result<Linked> {
    let mut replacements = BTreeMap::new();
    for (file, libraries) in link_references.iter() {
        for (library, placements) in libraries.iter() {
            let address = chosen_addresses.get(file.as_str(), library.as_str())?;
            for placement in placements.iter() {
                replacements.insert(placement.start, (placement.length, address));
            }
        }
    }

    let mut linked = bytecode.to_owned();
    let mut library_addresses = Vec::with_capacity(replacements.len());
    for (start, (length, address)) in replacements.into_iter().rev() {
        let offset = start * 2;
        let end = offset + length * 2;
        if end > linked.len() || !linked.is_char_boundary(offset) || !linked.is_char_boundary(end)
        {
            return Err(Error::internal(format!(
                "The link reference at byte {start} of length {length} is out of the bytecode of `{contract_name}`"
            )));
        }
        log::debug!("Linking `{contract_name}` at {offset} of length {length} to {address}");
        linked.replace_range(offset..end, address);
        library_addresses.push(address.to_owned());
    }

    let bytecode = linked.to_ascii_lowercase();
    if bytecode.contains(PLACEHOLDER_MARKER) {
        return Err(Error::link(format!(
            "The bytecode of `{contract_name}` has unresolved library placeholders"
        )));
    }

    Ok(Linked {
        bytecode,
        library_addresses,
    })
}
