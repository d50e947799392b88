//!
//! The `solc --standard-json` output file selection.
//!

pub mod flag;

use serde::Serialize;

use self::flag::Flag as SelectionFlag;

///
/// The `solc --standard-json` output file selection.
///
#[derive(Debug, Clone, Default, Serialize)]
pub struct File {
    /// The per-file output selections.
    #[serde(rename = "", skip_serializing_if = "Option::is_none")]
    pub per_file: Option<Vec<SelectionFlag>>,
    /// The per-contract output selections.
    #[serde(rename = "*", skip_serializing_if = "Option::is_none")]
    pub per_contract: Option<Vec<SelectionFlag>>,
}

impl File {
    ///
    /// Creates the selection required by the verification environment.
    ///
    pub fn new_required() -> Self {
        Self {
            per_file: Some(vec![SelectionFlag::Id, SelectionFlag::AST]),
            per_contract: Some(vec![
                SelectionFlag::StorageLayout,
                SelectionFlag::ABI,
                SelectionFlag::DeployedBytecode,
                SelectionFlag::MethodIdentifiers,
            ]),
        }
    }
}
