//!
//! The `solc --standard-json` output.
//!

pub mod contract;
pub mod error;
pub mod source;

use std::collections::BTreeMap;

use serde::Deserialize;

use self::contract::Contract;
use self::error::Error as SolcError;
use self::source::Source;

///
/// The `solc --standard-json` output.
///
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Output {
    /// The file-contract hashmap.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, Contract>>,
    /// The source code mapping data.
    #[serde(default)]
    pub sources: BTreeMap<String, Source>,
    /// The compilation errors and warnings.
    #[serde(default)]
    pub errors: Vec<SolcError>,
}

impl Output {
    ///
    /// Parses the compiler stdout, reporting the raw text on failure.
    ///
    pub fn try_from_slice(executable: &str, stdout: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(stdout).map_err(|error| {
            crate::error::Error::compilation(format!(
                "{executable} subprocess output parsing error: {error}\n{}",
                String::from_utf8_lossy(stdout),
            ))
        })
    }

    ///
    /// Returns the errors which stop the build.
    ///
    pub fn fatal_errors(&self) -> impl Iterator<Item = &SolcError> {
        self.errors.iter().filter(|error| error.is_error())
    }

    ///
    /// Returns the warnings and informational messages.
    ///
    pub fn warnings(&self) -> impl Iterator<Item = &SolcError> {
        self.errors.iter().filter(|error| !error.is_error())
    }

    ///
    /// Returns the contracts compiled from `file`.
    ///
    pub fn file_contracts(&self, file: &str) -> anyhow::Result<&BTreeMap<String, Contract>> {
        self.contracts.get(file).ok_or_else(|| {
            crate::error::Error::internal(format!(
                "The compiler output has no contracts for `{file}`; available files: {}",
                self.contracts.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })
    }
}
