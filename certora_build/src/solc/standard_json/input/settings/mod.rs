//!
//! The `solc --standard-json` input settings.
//!

pub mod optimizer;
pub mod selection;

use serde::Serialize;

use crate::error::Error;

use self::optimizer::Optimizer;
use self::selection::Selection;

///
/// The `solc --standard-json` input settings.
///
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// The list of remappings, sorted case-insensitively.
    pub remappings: Vec<String>,
    /// The output selection filters.
    pub output_selection: Selection,
    /// The target EVM version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
    /// The optimizer settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<Optimizer>,
}

impl Settings {
    /// The EVM version command line flag.
    const ARGUMENT_EVM_VERSION: &'static str = "--evm-version";

    /// The optimizer command line flag.
    const ARGUMENT_OPTIMIZE: &'static str = "--optimize";

    /// The optimizer runs command line flag.
    const ARGUMENT_OPTIMIZE_RUNS: &'static str = "--optimize-runs";

    ///
    /// Translates the command line `solc` arguments into the standard JSON settings.
    ///
    /// Arguments without a standard JSON counterpart are ignored.
    ///
    pub fn new(mut remappings: Vec<String>, solc_args: Option<&str>) -> anyhow::Result<Self> {
        remappings.sort_by_key(|remapping| remapping.to_lowercase());

        let arguments: Vec<&str> = solc_args
            .map(|arguments| arguments.split_whitespace().collect())
            .unwrap_or_default();

        let evm_version =
            Self::argument_value(arguments.as_slice(), Self::ARGUMENT_EVM_VERSION)?
                .map(str::to_owned);

        let enabled = arguments.contains(&Self::ARGUMENT_OPTIMIZE);
        let runs = Self::argument_value(arguments.as_slice(), Self::ARGUMENT_OPTIMIZE_RUNS)?
            .map(|runs| {
                runs.parse::<usize>().map_err(|error| {
                    Error::user_input(format!(
                        "Invalid `{}` value `{runs}`: {error}",
                        Self::ARGUMENT_OPTIMIZE_RUNS
                    ))
                })
            })
            .transpose()?;
        let optimizer = if enabled || runs.is_some() {
            Some(Optimizer::new(enabled, runs))
        } else {
            None
        };

        Ok(Self {
            remappings,
            output_selection: Selection::new_required(),
            evm_version,
            optimizer,
        })
    }

    ///
    /// Returns the value following `name` in the argument list.
    ///
    fn argument_value<'a>(arguments: &[&'a str], name: &str) -> anyhow::Result<Option<&'a str>> {
        match arguments.iter().position(|argument| *argument == name) {
            Some(index) => match arguments.get(index + 1) {
                Some(value) => Ok(Some(*value)),
                None => Err(Error::user_input(format!(
                    "The `solc` argument `{name}` requires a value"
                ))),
            },
            None => Ok(None),
        }
    }
}
