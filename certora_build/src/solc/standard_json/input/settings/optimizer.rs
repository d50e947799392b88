//!
//! The `solc --standard-json` input settings optimizer.
//!

use serde::Serialize;

///
/// The `solc --standard-json` input settings optimizer.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimizer {
    /// Whether the optimizer is enabled.
    pub enabled: bool,
    /// The expected number of contract runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<usize>,
}

impl Optimizer {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(enabled: bool, runs: Option<usize>) -> Self {
        Self { enabled, runs }
    }
}
