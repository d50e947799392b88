//!
//! The `solc --standard-json` input source.
//!

use serde::Serialize;

///
/// The `solc --standard-json` input source.
///
/// The compiler reads the file itself, so only its location is passed.
///
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    /// The source code file locations.
    pub urls: Vec<String>,
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Self { urls: vec![path] }
    }
}
