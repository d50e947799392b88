//!
//! The `solc --standard-json` output error.
//!

use serde::Deserialize;

///
/// The `solc --standard-json` output error.
///
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// The error severity: `error`, `warning` or `info`.
    pub severity: String,
    /// The error type, e.g. `DeclarationError`.
    #[serde(default, rename = "type")]
    pub r#type: String,
    /// The error message.
    #[serde(default)]
    pub message: String,
    /// The message formatted with its source location.
    #[serde(default)]
    pub formatted_message: Option<String>,
}

impl Error {
    /// The severity of errors which stop the build.
    pub const SEVERITY_ERROR: &'static str = "error";

    ///
    /// Whether the entry is an error rather than a warning.
    ///
    pub fn is_error(&self) -> bool {
        self.severity == Self::SEVERITY_ERROR
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.formatted_message.as_ref() {
            Some(formatted_message) => write!(f, "{formatted_message}"),
            None => write!(f, "{}: {}", self.r#type, self.message),
        }
    }
}
