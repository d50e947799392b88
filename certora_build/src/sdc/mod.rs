//!
//! The single deployed contract.
//!

pub mod contract;
pub mod function;
pub mod immutable;
pub mod solidity_type;

use std::collections::BTreeMap;

use serde::Serialize;

use self::contract::ContractInSdc;

///
/// The single deployed contract.
///
/// One is produced per input file, and one more per library the primary contract links against.
///
#[derive(Debug, Serialize, Clone)]
pub struct Sdc {
    /// The contract the unit is built around.
    pub primary_contract: String,
    /// The address of the primary contract.
    pub primary_contract_address: String,
    /// The input file.
    pub sdc_origin_file: String,
    /// The compiler source IDs mapped to the original paths.
    pub original_srclist: BTreeMap<usize, String>,
    /// The compiler source IDs mapped to the staged copies.
    pub srclist: BTreeMap<usize, String>,
    /// The staging subdirectory name.
    pub sdc_name: String,
    /// The contract records.
    pub contracts: Vec<ContractInSdc>,
    /// The library addresses linked into the bytecode, in the order of first use.
    pub library_addresses: Vec<String>,
    /// The command line the manifest was produced with.
    pub generated_with: String,
    /// The storage slots mapped to linked addresses.
    pub state: BTreeMap<String, String>,
    /// The struct slots mapped to linked addresses.
    #[serde(rename = "structLinkingInfo")]
    pub struct_linking_info: BTreeMap<String, String>,
}

impl Sdc {
    ///
    /// Returns the manifest key `<primary>_<address>`.
    ///
    pub fn key(&self) -> String {
        Self::compute_key(
            self.primary_contract.as_str(),
            self.primary_contract_address.as_str(),
        )
    }

    ///
    /// Returns the manifest key from its parts.
    ///
    pub fn compute_key(contract: &str, address: &str) -> String {
        format!("{contract}_{address}")
    }

    ///
    /// Returns the contract record of the primary contract.
    ///
    pub fn primary(&self) -> Option<&ContractInSdc> {
        self.contracts
            .iter()
            .find(|contract| contract.name == self.primary_contract)
    }

    ///
    /// Drops every contract record except the primary one.
    ///
    pub fn retain_primary(&mut self) {
        let primary = self.primary_contract.clone();
        self.contracts.retain(|contract| contract.name == primary);
    }
}
