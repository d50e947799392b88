//!
//! The `solc --standard-json` expected output selection flag.
//!

use serde::Serialize;

///
/// The `solc --standard-json` expected output selection flag.
///
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Flag {
    /// The source unit ID.
    #[serde(rename = "id")]
    Id,
    /// The AST JSON.
    #[serde(rename = "ast")]
    AST,
    /// The contract ABI.
    #[serde(rename = "abi")]
    ABI,
    /// The storage layout.
    #[serde(rename = "storageLayout")]
    StorageLayout,
    /// The runtime bytecode with its source map, link and immutable references.
    #[serde(rename = "evm.deployedBytecode")]
    DeployedBytecode,
    /// The function signature hashes JSON.
    #[serde(rename = "evm.methodIdentifiers")]
    MethodIdentifiers,
}
