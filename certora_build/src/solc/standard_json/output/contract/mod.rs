//!
//! The `solc --standard-json` output contract.
//!

pub mod abi;
pub mod evm;

use serde::Deserialize;

use self::abi::Entry as AbiEntry;
use self::evm::EVM;

///
/// The `solc --standard-json` output contract.
///
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// The contract ABI.
    #[serde(default)]
    pub abi: Vec<AbiEntry>,
    /// The contract storage layout.
    #[serde(default)]
    pub storage_layout: Option<serde_json::Value>,
    /// The variable mappings, emitted by instrumented compiler builds only.
    #[serde(default, rename = "local-mappings")]
    pub local_mappings: Option<serde_json::Value>,
    /// The contract EVM data.
    #[serde(default)]
    pub evm: EVM,
}
