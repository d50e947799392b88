//!
//! The contract record of a single deployed contract.
//!

use serde::Serialize;

use super::function::Function;
use super::immutable::Immutable;

///
/// The contract record of a single deployed contract.
///
#[derive(Debug, Serialize, Clone)]
pub struct ContractInSdc {
    /// The contract name.
    pub name: String,
    /// The input file the contract was compiled from.
    pub original_file: String,
    /// The source path reported by the compiler.
    pub file: String,
    /// The chosen address as 40 hexadecimal digits.
    pub address: String,
    /// The functions.
    pub methods: Vec<Function>,
    /// The linked deployed bytecode, lowercase and unprefixed.
    pub bytecode: String,
    /// The runtime source map.
    pub srcmap: String,
    /// The variable mappings, requested with `--varmap`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub varmap: Option<serde_json::Value>,
    /// The user-provided link candidates.
    #[serde(rename = "linkCandidates")]
    pub link_candidates: serde_json::Value,
    /// The compiler storage layout.
    #[serde(rename = "storageLayout")]
    pub storage_layout: Option<serde_json::Value>,
    /// The immutable references.
    pub immutables: Vec<Immutable>,
}
