//!
//! The normalized build options.
//!

pub mod input_file;
pub mod verify_query;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::arguments::Arguments;
use crate::error::Error;
use crate::link::directive::LinkDirective;
use crate::platform::Platform;

use self::input_file::InputFile;
use self::verify_query::VerifyQuery;

///
/// The normalized build options.
///
/// Built once from the arguments and read-only afterwards.
///
#[derive(Debug, Clone)]
pub struct Options {
    /// The directory relative paths are resolved against.
    pub working_directory: PathBuf,
    /// The command line the run was started with.
    pub generated_with: String,
    /// The input files in the order of processing.
    pub files: Vec<InputFile>,
    /// The global `solc` executable.
    pub solc: String,
    /// The per-contract `solc` executables.
    pub solc_map: BTreeMap<String, String>,
    /// The extra `solc` arguments.
    pub solc_args: Option<String>,
    /// The comma-separated absolute paths the compiler may read from.
    pub path: String,
    /// The remapping root.
    pub packages_path: String,
    /// The space-separated remappings.
    pub packages: Option<String>,
    /// The build manifest name.
    pub output: String,
    /// The staging directory.
    pub output_folder: String,
    /// The verify manifest name.
    pub output_verify: String,
    /// The opaque cache name.
    pub cache: Option<String>,
    /// The manual addresses by contract name.
    pub address: BTreeMap<String, String>,
    /// The link directives.
    pub link: Vec<LinkDirective>,
    /// The struct link directives.
    pub struct_link: Vec<LinkDirective>,
    /// The link candidates by contract name.
    pub link_candidates: BTreeMap<String, BTreeMap<String, String>>,
    /// The verification queries.
    pub verify: Vec<VerifyQuery>,
    /// The contracts to check assertions for.
    pub assert: Vec<String>,
    /// Whether the sources are copied into the staging directory.
    pub fetch_sources: bool,
    /// Whether the variable mappings are collected.
    pub varmap: bool,
    /// Whether the debug logging is enabled.
    pub debug: bool,
    /// The host platform.
    pub platform: Platform,
}

impl Options {
    /// The conf file read when no positional argument is given.
    pub const DEFAULT_CONF: &'static str = "default.conf";

    /// The default build manifest name.
    pub const DEFAULT_OUTPUT: &'static str = ".certora_build";

    /// The default staging directory.
    pub const DEFAULT_OUTPUT_FOLDER: &'static str = ".certora_config";

    /// The default verify manifest name.
    pub const DEFAULT_OUTPUT_VERIFY: &'static str = ".certora_verify";

    /// The default `solc` executable.
    pub const DEFAULT_SOLC: &'static str = "solc";

    /// The effective conf file name, written into the staging directory.
    pub const LAST_RUN_CONF: &'static str = "last_run.conf";

    ///
    /// Normalizes the arguments, reading the conf file if one is named or none is given.
    ///
    pub fn try_from_arguments(
        arguments: Arguments,
        working_directory: &Path,
        generated_with: String,
    ) -> anyhow::Result<Self> {
        let arguments = if arguments.inputs.is_empty() {
            let conf = working_directory.join(Self::DEFAULT_CONF);
            log::debug!("Reading the default conf `{}`", conf.display());
            arguments.merge(Arguments::try_from_conf(conf.as_path())?)
        } else if arguments.is_conf() {
            if arguments.inputs.len() > 1 {
                return Err(Error::user_input(format!(
                    "When passing a conf file, can only pass options, not additional files: {}",
                    arguments.inputs[1..].join(" ")
                )));
            }
            let conf = crate::utils::absolute_path(working_directory, Path::new(&arguments.inputs[0]));
            log::debug!("Reading the conf `{}`", conf.display());
            arguments.merge(Arguments::try_from_conf(conf.as_path())?)
        } else {
            arguments
        };

        let files: Vec<InputFile> = arguments
            .inputs
            .iter()
            .map(|input| InputFile::parse(input))
            .collect();
        if files.is_empty() {
            return Err(Error::user_input("No input files given"));
        }
        for file in files.iter() {
            let path = crate::utils::absolute_path(working_directory, Path::new(&file.path));
            if !path.is_file() {
                return Err(Error::user_input(format!(
                    "Input file `{}` does not exist",
                    file.path
                )));
            }
        }

        let path = Self::single("path", arguments.path)?.unwrap_or_else(|| {
            format!(
                "{0}/contracts/,{0}",
                crate::utils::path_to_string_normalized(working_directory)
            )
        });
        let path = path
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                crate::utils::path_to_string_normalized(
                    crate::utils::absolute_path(working_directory, Path::new(entry)).as_path(),
                )
            })
            .collect::<Vec<String>>()
            .join(",");

        let packages_path = match Self::single("packages_path", arguments.packages_path)? {
            Some(packages_path) => packages_path,
            None => std::env::var("NODE_PATH").unwrap_or_else(|_| {
                format!(
                    "{}/node_modules",
                    crate::utils::path_to_string_normalized(working_directory)
                )
            }),
        };
        let packages = match arguments.packages {
            Some(packages) => Some(packages.join(" ")),
            None => Self::packages_from_package_json(working_directory, packages_path.as_str()),
        };

        let mut address = BTreeMap::new();
        for entry in arguments.address.unwrap_or_default().into_iter() {
            let (contract, value) = entry.split_once(':').ok_or_else(|| {
                Error::user_input(format!(
                    "Address `{entry}` must have the form `Contract:address`"
                ))
            })?;
            address.insert(contract.to_owned(), crate::utils::normalize_address(value)?);
        }

        let mut solc_map = BTreeMap::new();
        if let Some(map) = Self::single("solc_map", arguments.solc_map)? {
            for entry in map.split(',').filter(|entry| !entry.is_empty()) {
                let (contract, solc) = entry.split_once('=').ok_or_else(|| {
                    Error::user_input(format!(
                        "Solc mapping `{entry}` must have the form `Contract=solc`"
                    ))
                })?;
                solc_map.insert(contract.to_owned(), solc.to_owned());
            }
        }

        let solc_args = arguments.solc_args.map(|values| {
            values
                .iter()
                .map(|value| value.replace('\'', ""))
                .collect::<Vec<String>>()
                .join(" ")
        });

        let link = Self::directives("link", arguments.link)?;
        let struct_link = Self::directives("struct_link", arguments.struct_link)?;

        let mut link_candidates: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for entry in arguments.link_candidates.unwrap_or_default().into_iter() {
            let (contract, candidate) = entry
                .split_once(':')
                .and_then(|(contract, candidate)| {
                    candidate
                        .split_once('=')
                        .map(|(field, target)| (contract, (field, target)))
                })
                .ok_or_else(|| {
                    Error::user_input(format!(
                        "Link candidate `{entry}` must have the form `Contract:field=target`"
                    ))
                })?;
            link_candidates
                .entry(contract.to_owned())
                .or_default()
                .insert(candidate.0.to_owned(), candidate.1.to_owned());
        }

        let verify = match arguments.verify {
            Some(queries) if queries.is_empty() => {
                return Err(Error::user_input(
                    "Must specify which contracts to verify with which spec files",
                ))
            }
            Some(queries) => queries
                .iter()
                .map(|query| VerifyQuery::try_parse(query, working_directory))
                .collect::<anyhow::Result<Vec<VerifyQuery>>>()?,
            None => vec![],
        };
        let assert = match arguments.assert {
            Some(contracts) if contracts.is_empty() => {
                return Err(Error::user_input(
                    "Must specify which contract to check assertions for",
                ))
            }
            Some(contracts) => contracts,
            None => vec![],
        };

        Ok(Self {
            working_directory: working_directory.to_path_buf(),
            generated_with,
            files,
            solc: Self::single("solc", arguments.solc)?
                .unwrap_or_else(|| Self::DEFAULT_SOLC.to_owned()),
            solc_map,
            solc_args,
            path,
            packages_path,
            packages,
            output: Self::single("output", arguments.output)?
                .unwrap_or_else(|| Self::DEFAULT_OUTPUT.to_owned()),
            output_folder: Self::single("output_folder", arguments.output_folder)?
                .unwrap_or_else(|| Self::DEFAULT_OUTPUT_FOLDER.to_owned()),
            output_verify: Self::single("output_verify", arguments.output_verify)?
                .unwrap_or_else(|| Self::DEFAULT_OUTPUT_VERIFY.to_owned()),
            cache: Self::single("cache", arguments.cache)?,
            address,
            link,
            struct_link,
            link_candidates,
            verify,
            assert,
            fetch_sources: !arguments.dont_fetch_sources,
            varmap: arguments.varmap,
            debug: arguments.debug,
            platform: Platform::host(arguments.iscygwin),
        })
    }

    ///
    /// Returns the staging directory path.
    ///
    pub fn output_folder_path(&self) -> PathBuf {
        self.working_directory.join(self.output_folder.as_str())
    }

    ///
    /// Returns the build manifest path.
    ///
    pub fn output_path(&self) -> PathBuf {
        self.working_directory.join(format!("{}.json", self.output))
    }

    ///
    /// Returns the verify manifest path.
    ///
    pub fn output_verify_path(&self) -> PathBuf {
        self.working_directory
            .join(format!("{}.json", self.output_verify))
    }

    ///
    /// Returns the absolute, separator-normalized path of the input file.
    ///
    pub fn absolute_file(&self, file: &InputFile) -> String {
        crate::utils::path_to_string_normalized(
            crate::utils::absolute_path(self.working_directory.as_path(), Path::new(&file.path))
                .as_path(),
        )
    }

    ///
    /// Returns the `solc` executable for the primary contract.
    ///
    pub fn solc_executable(&self, contract: &str) -> String {
        let solc = self
            .solc_map
            .get(contract)
            .unwrap_or(&self.solc)
            .as_str();
        self.platform.executable(solc)
    }

    ///
    /// Returns the remappings `name=path`, sorted case-insensitively.
    ///
    pub fn remappings(&self) -> Vec<String> {
        let mut remappings: Vec<String> = self
            .packages
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .filter(|package| package.contains('='))
            .map(str::to_owned)
            .collect();
        remappings.sort_by_key(|remapping| remapping.to_lowercase());
        remappings
    }

    ///
    /// Returns the package arguments for the `--asm` invocation.
    ///
    pub fn package_arguments(&self) -> Vec<String> {
        self.packages
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_owned)
            .collect()
    }

    ///
    /// Returns the `--allow-paths` value for the standard JSON invocation.
    ///
    pub fn allow_paths(&self) -> String {
        let mut paths = vec![self.path.clone()];
        paths.extend(self.remappings().iter().filter_map(|remapping| {
            remapping
                .split_once('=')
                .map(|(_, target)| target.to_owned())
        }));
        paths.push(".".to_owned());
        paths.join(",")
    }

    ///
    /// Returns the effective configuration in the conf file format.
    ///
    pub fn to_conf(&self) -> serde_json::Value {
        let mut conf = serde_json::Map::new();
        conf.insert(
            Arguments::CONF_FILES.to_owned(),
            serde_json::json!(self
                .files
                .iter()
                .map(InputFile::to_string)
                .collect::<Vec<String>>()),
        );
        conf.insert("solc".to_owned(), serde_json::json!(self.solc));
        conf.insert("path".to_owned(), serde_json::json!(self.path));
        conf.insert("packages_path".to_owned(), serde_json::json!(self.packages_path));
        conf.insert("output".to_owned(), serde_json::json!(self.output));
        conf.insert("output_folder".to_owned(), serde_json::json!(self.output_folder));
        conf.insert("output_verify".to_owned(), serde_json::json!(self.output_verify));
        conf.insert("address".to_owned(), serde_json::json!(self.address));
        if !self.solc_map.is_empty() {
            conf.insert(
                "solc_map".to_owned(),
                serde_json::json!(self
                    .solc_map
                    .iter()
                    .map(|(contract, solc)| format!("{contract}={solc}"))
                    .collect::<Vec<String>>()
                    .join(",")),
            );
        }
        if let Some(solc_args) = self.solc_args.as_ref() {
            conf.insert("solc_args".to_owned(), serde_json::json!(solc_args));
        }
        if let Some(packages) = self.packages.as_ref() {
            conf.insert(
                "packages".to_owned(),
                serde_json::json!(packages.split_whitespace().collect::<Vec<&str>>()),
            );
        }
        if let Some(cache) = self.cache.as_ref() {
            conf.insert("cache".to_owned(), serde_json::json!(cache));
        }
        for (key, directives) in [("link", &self.link), ("struct_link", &self.struct_link)] {
            if !directives.is_empty() {
                conf.insert(
                    key.to_owned(),
                    serde_json::json!(directives
                        .iter()
                        .map(LinkDirective::to_string)
                        .collect::<Vec<String>>()),
                );
            }
        }
        if !self.link_candidates.is_empty() {
            conf.insert(
                "link_candidates".to_owned(),
                serde_json::json!(self.link_candidates),
            );
        }
        if !self.verify.is_empty() {
            conf.insert(
                "verify".to_owned(),
                serde_json::json!(self
                    .verify
                    .iter()
                    .map(|query| format!("{}:{}", query.contract, query.spec))
                    .collect::<Vec<String>>()),
            );
        }
        if !self.assert.is_empty() {
            conf.insert("assert".to_owned(), serde_json::json!(self.assert));
        }
        for (key, flag) in [
            ("dont_fetch_sources", !self.fetch_sources),
            ("iscygwin", self.platform.cygwin),
            ("varmap", self.varmap),
            ("debug", self.debug),
        ] {
            if flag {
                conf.insert(key.to_owned(), serde_json::Value::Bool(true));
            }
        }
        serde_json::Value::Object(conf)
    }

    ///
    /// Collapses a single-valued option.
    ///
    fn single(name: &str, values: Option<Vec<String>>) -> anyhow::Result<Option<String>> {
        match values {
            None => Ok(None),
            Some(values) if values.len() == 1 => Ok(values.into_iter().next()),
            Some(values) => Err(Error::user_input(format!(
                "Option `--{name}` takes exactly one value, got [{}]",
                values.join(", ")
            ))),
        }
    }

    ///
    /// Parses the link directives of an option.
    ///
    fn directives(name: &str, values: Option<Vec<String>>) -> anyhow::Result<Vec<LinkDirective>> {
        match values {
            None => Ok(vec![]),
            Some(values) if values.is_empty() => Err(Error::user_input(format!(
                "Option `--{name}` expects at least one directive"
            ))),
            Some(values) => values.iter().map(|value| value.parse()).collect(),
        }
    }

    ///
    /// Synthesizes the remappings from the `package.json` dependencies, if the file exists.
    ///
    fn packages_from_package_json(working_directory: &Path, packages_path: &str) -> Option<String> {
        let path = working_directory.join("package.json");
        let text = std::fs::read_to_string(path.as_path()).ok()?;
        let package_json: serde_json::Value = match serde_json::from_str(text.as_str()) {
            Ok(package_json) => package_json,
            Err(error) => {
                log::warn!("Failed in processing `{}`: {error}", path.display());
                return None;
            }
        };

        let dependencies = package_json
            .get("dependencies")
            .or_else(|| package_json.get("devDependencies"))
            .and_then(serde_json::Value::as_object)?;
        let packages: BTreeSet<&String> = dependencies.keys().collect();
        let packages = packages
            .into_iter()
            .map(|package| format!("{package}={packages_path}/{package}"))
            .collect::<Vec<String>>()
            .join(" ");
        log::debug!("Packages from `{}`: {packages}", path.display());
        Some(packages)
    }
}
