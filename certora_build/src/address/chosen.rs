//!
//! The addresses chosen for the contracts of one compilation.
//!

use std::collections::BTreeMap;

use crate::address::AddressIterator;
use crate::error::Error;

///
/// The address chosen for a contract.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenAddress {
    /// The compiler source path.
    pub file: String,
    /// The contract name.
    pub contract: String,
    /// The address as 40 hexadecimal digits.
    pub address: String,
}

///
/// The addresses chosen for the contracts of one compilation.
///
#[derive(Debug, Default, Clone)]
pub struct ChosenAddresses {
    /// The addresses in the order of assignment.
    entries: Vec<ChosenAddress>,
}

impl ChosenAddresses {
    ///
    /// Assigns one address per `(file, contract)` pair, replacing the generated value with the
    /// manual one if the contract name has an override.
    ///
    pub fn assign<I>(
        pairs: I,
        iterator: &mut impl AddressIterator,
        overrides: &BTreeMap<String, String>,
    ) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(file, contract)| {
                let generated = iterator.next();
                let address = match overrides.get(contract.as_str()) {
                    Some(address) => {
                        log::debug!("Using the manual address {address} for `{contract}`");
                        address.to_owned()
                    }
                    None => generated,
                };
                ChosenAddress {
                    file,
                    contract,
                    address,
                }
            })
            .collect();
        Self { entries }
    }

    ///
    /// Returns the address of the contract, naming every known contract on failure.
    ///
    pub fn get(&self, file: &str, contract: &str) -> anyhow::Result<&str> {
        self.entries
            .iter()
            .find(|entry| entry.file == file && entry.contract == contract)
            .map(|entry| entry.address.as_str())
            .ok_or_else(|| {
                Error::link(format!(
                    "Failed to find a contract named `{contract}` in file `{file}`. \
                     Please make sure there is a file named like the contract, or a file \
                     containing a contract with this name. Available contracts: {}",
                    self.entries
                        .iter()
                        .map(|entry| format!("{}:{}", entry.file, entry.contract))
                        .collect::<Vec<String>>()
                        .join(", ")
                ))
            })
    }

    ///
    /// Returns the entries in the order of assignment.
    ///
    pub fn entries(&self) -> &[ChosenAddress] {
        self.entries.as_slice()
    }
}
