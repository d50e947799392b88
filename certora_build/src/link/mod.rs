//!
//! The link resolver.
//!

pub mod directive;
pub mod slot;

use std::collections::BTreeMap;

use crate::error::Error;
use crate::options::Options;
use crate::sdc::Sdc;
use crate::solc::Compiler;

use self::directive::LinkDirective;

///
/// The link resolver.
///
/// Runs after every SDC is built, since the destinations are the addresses of other SDCs.
///
pub struct LinkResolver<'a, C>
where
    C: Compiler,
{
    /// The build options.
    options: &'a Options,
    /// The compiler used by the slot resolver.
    compiler: &'a C,
}

impl<'a, C> LinkResolver<'a, C>
where
    C: Compiler,
{
    ///
    /// A shortcut constructor.
    ///
    pub fn new(options: &'a Options, compiler: &'a C) -> Self {
        Self { options, compiler }
    }

    ///
    /// Applies the `--link` directives.
    ///
    /// The reference is tried as an immutable of the source contract, then as a state variable
    /// name, then as a literal slot.
    ///
    pub fn resolve_links(&self, sdcs: &mut BTreeMap<String, Sdc>) -> anyhow::Result<()> {
        for directive in self.options.link.iter() {
            let key = Self::source_key(sdcs, directive)?;
            let destination = Self::destination_address(sdcs, directive)?;
            let sdc = sdcs.get_mut(key.as_str()).expect("Always exists");

            let matching_contracts = sdc
                .contracts
                .iter()
                .filter(|contract| {
                    contract.name == directive.source_contract
                        && contract
                            .immutables
                            .iter()
                            .any(|immutable| immutable.varname() == directive.reference)
                })
                .count();
            if matching_contracts > 1 {
                return Err(Error::link(format!(
                    "Not expecting to find multiple immutables with the name `{}` for `{directive}`",
                    directive.reference
                )));
            }
            if matching_contracts == 1 {
                for contract in sdc
                    .contracts
                    .iter_mut()
                    .filter(|contract| contract.name == directive.source_contract)
                {
                    contract.immutables = std::mem::take(&mut contract.immutables)
                        .into_iter()
                        .map(|immutable| {
                            if immutable.varname() == directive.reference {
                                immutable.preset(destination.clone())
                            } else {
                                immutable
                            }
                        })
                        .collect();
                }
                log::debug!("Linked the immutable `{}` to {destination}", directive.reference);
                continue;
            }

            let slot = if is_literal_slot(directive.reference.as_str()) {
                crate::utils::normalize_hex_number(directive.reference.as_str())?
            } else {
                slot::resolve(sdc, directive.reference.as_str(), self.options, self.compiler)?
            };
            log::debug!(
                "Linking slot {slot} of `{}` ({key}) to {destination}",
                directive.source_contract
            );
            sdc.state.insert(slot, destination);
        }
        Ok(())
    }

    ///
    /// Applies the `--struct_link` directives. The reference must be a hexadecimal slot.
    ///
    pub fn resolve_struct_links(&self, sdcs: &mut BTreeMap<String, Sdc>) -> anyhow::Result<()> {
        for directive in self.options.struct_link.iter() {
            let key = Self::source_key(sdcs, directive)?;
            let destination = Self::destination_address(sdcs, directive)?;
            if !crate::utils::is_hex(directive.reference.as_str()) {
                return Err(Error::user_input(format!(
                    "Struct link slot `{}` is not a hexadecimal number",
                    directive.reference
                )));
            }
            let slot = crate::utils::normalize_hex_number(directive.reference.as_str())?;

            log::debug!(
                "Struct linking slot {slot} of `{}` ({key}) to {destination}",
                directive.source_contract
            );
            sdcs.get_mut(key.as_str())
                .expect("Always exists")
                .struct_linking_info
                .insert(slot, destination);
        }
        Ok(())
    }

    ///
    /// Returns the key of the only SDC with the source contract as its primary.
    ///
    fn source_key(sdcs: &BTreeMap<String, Sdc>, directive: &LinkDirective) -> anyhow::Result<String> {
        let keys: Vec<&String> = sdcs
            .iter()
            .filter(|(_, sdc)| sdc.primary_contract == directive.source_contract)
            .map(|(key, _)| key)
            .collect();
        match keys.as_slice() {
            [key] => Ok(key.to_string()),
            [] => Err(Error::user_input(format!(
                "No contract to link to with the name `{}` in `{directive}`",
                directive.source_contract
            ))),
            keys => Err(Error::link(format!(
                "Not expecting to find multiple SDC matches [{}] for `{directive}`",
                keys.iter()
                    .map(|key| key.as_str())
                    .collect::<Vec<&str>>()
                    .join(", ")
            ))),
        }
    }

    ///
    /// Returns the address of the destination SDC, or the destination as a literal address.
    ///
    fn destination_address(
        sdcs: &BTreeMap<String, Sdc>,
        directive: &LinkDirective,
    ) -> anyhow::Result<String> {
        match sdcs
            .values()
            .find(|sdc| sdc.primary_contract == directive.destination)
        {
            Some(sdc) => Ok(sdc.primary_contract_address.clone()),
            None => crate::utils::normalize_address(directive.destination.as_str()).map_err(|_| {
                Error::user_input(format!(
                    "Link target `{}` of `{directive}` is neither a contract nor an address",
                    directive.destination
                ))
            }),
        }
    }
}

///
/// Whether the `--link` reference is a slot number rather than a variable name.
///
pub fn is_literal_slot(reference: &str) -> bool {
    (!reference.is_empty() && reference.chars().all(|character| character.is_ascii_digit()))
        || reference.starts_with("0x")
        || reference.starts_with("0X")
}
