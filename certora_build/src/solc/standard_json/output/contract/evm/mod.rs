//!
//! The `solc --standard-json` output contract EVM data.
//!

pub mod bytecode;

use std::collections::BTreeMap;

use serde::Deserialize;

use self::bytecode::Bytecode;

///
/// The `solc --standard-json` output contract EVM data.
///
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EVM {
    /// Contract runtime bytecode.
    #[serde(default)]
    pub deployed_bytecode: Bytecode,
    /// Contract function signatures.
    #[serde(default)]
    pub method_identifiers: BTreeMap<String, String>,
}
