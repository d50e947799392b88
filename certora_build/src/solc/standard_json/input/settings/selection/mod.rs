//!
//! The `solc --standard-json` output selection.
//!

pub mod file;

use std::collections::BTreeMap;

use serde::Serialize;

use self::file::File as FileSelection;

///
/// The `solc --standard-json` output selection, keyed by the source file.
///
#[derive(Debug, Clone, Default, Serialize)]
pub struct Selection(BTreeMap<String, FileSelection>);

impl Selection {
    /// The key matching every source file.
    pub const ANY_FILE: &'static str = "*";

    ///
    /// Selects the contract data and the AST of every source file.
    ///
    pub fn new_required() -> Self {
        Self(BTreeMap::from([(
            Self::ANY_FILE.to_owned(),
            FileSelection::new_required(),
        )]))
    }
}
