//!
//! The `solc --standard-json` output contract EVM deployed bytecode.
//!

use std::collections::BTreeMap;

use serde::Deserialize;

///
/// The `solc --standard-json` output contract EVM deployed bytecode.
///
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bytecode {
    /// The bytecode object, with library placeholders left in.
    #[serde(default)]
    pub object: String,
    /// The runtime source map.
    #[serde(default)]
    pub source_map: Option<String>,
    /// The library placeholders: `file -> library -> placements`.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<Placement>>>,
    /// The immutable placements keyed by the AST node ID of the variable.
    #[serde(default)]
    pub immutable_references: BTreeMap<String, Vec<Placement>>,
}

///
/// A span of the bytecode, in bytes.
///
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The start offset.
    pub start: usize,
    /// The length.
    pub length: usize,
}
