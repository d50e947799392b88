//!
//! The verification query.
//!

use std::path::Path;

use crate::error::Error;

///
/// The verification query `Contract:file.spec`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyQuery {
    /// The primary contract to verify.
    pub contract: String,
    /// The absolute spec file path.
    pub spec: String,
}

impl VerifyQuery {
    ///
    /// Parses the query, resolving the spec path against `working_directory`.
    ///
    pub fn try_parse(query: &str, working_directory: &Path) -> anyhow::Result<Self> {
        let (contract, spec) = query
            .split_once(':')
            .filter(|(contract, spec)| !contract.is_empty() && !spec.is_empty())
            .ok_or_else(|| {
                Error::user_input(format!(
                    "Verification query `{query}` must have the form `Contract:file.spec`"
                ))
            })?;
        let spec = crate::utils::absolute_path(working_directory, Path::new(spec));

        Ok(Self {
            contract: contract.to_owned(),
            spec: crate::utils::path_to_string_normalized(spec.as_path()),
        })
    }
}
