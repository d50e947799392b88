//!
//! The verify manifest generator.
//!

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Error;
use crate::options::Options;
use crate::sdc::Sdc;

///
/// The verify manifest entry.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VerifyEntry {
    /// A contract checked against a spec file.
    Spec {
        /// The primary contract.
        primary_contract: String,
        /// The staged spec file.
        specfile: String,
    },
    /// A contract whose assertions are checked.
    Assertion {
        /// The primary contract.
        primary_contract: String,
    },
}

impl VerifyEntry {
    ///
    /// Returns the primary contract of the entry.
    ///
    pub fn primary_contract(&self) -> &str {
        match self {
            Self::Spec {
                primary_contract, ..
            } => primary_contract.as_str(),
            Self::Assertion { primary_contract } => primary_contract.as_str(),
        }
    }
}

///
/// The verify manifest generator.
///
#[derive(Debug, Clone, Default)]
pub struct VerifyGenerator {
    /// The staging directory name, as given by the user.
    output_folder: String,
    /// The staging directory path.
    output_folder_path: std::path::PathBuf,
    /// The spec files by contract, in the order of appearance.
    specs: BTreeMap<String, Vec<String>>,
    /// The manifest entries.
    entries: Vec<VerifyEntry>,
}

impl VerifyGenerator {
    ///
    /// Builds the manifest entries from the `--verify` and `--assert` options.
    ///
    pub fn new(options: &Options) -> Self {
        let mut generator = Self {
            output_folder: options.output_folder.clone(),
            output_folder_path: options.output_folder_path(),
            ..Self::default()
        };

        for query in options.verify.iter() {
            generator
                .specs
                .entry(query.contract.clone())
                .or_default()
                .push(query.spec.clone());
            let specfile = generator.specfile(query.contract.as_str(), query.spec.as_str());
            generator.entries.push(VerifyEntry::Spec {
                primary_contract: query.contract.clone(),
                specfile,
            });
        }
        for contract in options.assert.iter() {
            generator.entries.push(VerifyEntry::Assertion {
                primary_contract: contract.to_owned(),
            });
        }

        generator
    }

    ///
    /// Checks that every referenced contract is the primary contract of some SDC.
    ///
    pub fn check(&self, sdcs: &BTreeMap<String, Sdc>) -> anyhow::Result<()> {
        for entry in self.entries.iter() {
            let contract = entry.primary_contract();
            if !sdcs.values().any(|sdc| sdc.primary_contract == contract) {
                return Err(Error::user_input(format!(
                    "Could not find contract `{contract}` in contracts [{}]",
                    sdcs.values()
                        .map(|sdc| sdc.primary_contract.as_str())
                        .collect::<Vec<&str>>()
                        .join(", ")
                )));
            }
        }
        Ok(())
    }

    ///
    /// Copies the spec files into the staging directory.
    ///
    pub fn copy_specs(&self) -> anyhow::Result<()> {
        for (contract, specs) in self.specs.iter() {
            for spec in specs.iter() {
                let destination = self
                    .output_folder_path
                    .join(self.spec_file_name(contract.as_str(), spec.as_str()));
                log::debug!("Copying `{spec}` to `{}`", destination.display());
                std::fs::copy(spec, destination.as_path()).map_err(|error| {
                    Error::user_input(format!(
                        "Spec file `{spec}` copying to `{}` error: {error}",
                        destination.display()
                    ))
                })?;
            }
        }
        Ok(())
    }

    ///
    /// Writes the manifest, or removes a stale one if there is nothing to verify.
    ///
    pub fn dump(&self, path: &Path) -> anyhow::Result<()> {
        if self.entries.is_empty() {
            if path.is_file() {
                log::debug!("Removing the stale verify manifest `{}`", path.display());
                std::fs::remove_file(path).map_err(|error| {
                    anyhow::anyhow!("File `{}` removal error: {error}", path.display())
                })?;
            }
            return Ok(());
        }
        crate::utils::write_json_sorted(path, &self.entries)
    }

    ///
    /// Returns the manifest entries.
    ///
    pub fn entries(&self) -> &[VerifyEntry] {
        self.entries.as_slice()
    }

    ///
    /// Returns the staged spec path as recorded in the manifest.
    ///
    fn specfile(&self, contract: &str, spec: &str) -> String {
        format!(
            "{}/{}",
            self.output_folder,
            self.spec_file_name(contract, spec)
        )
    }

    ///
    /// Returns `<index>_<stem>.spec`, where the index is the first position of the spec among
    /// the specs of the contract.
    ///
    fn spec_file_name(&self, contract: &str, spec: &str) -> String {
        let index = self
            .specs
            .get(contract)
            .and_then(|specs| specs.iter().position(|candidate| candidate == spec))
            .unwrap_or_default();
        format!("{index}_{}.spec", crate::utils::file_stem(spec))
    }
}
