//!
//! The build driver arguments.
//!

use std::path::Path;

use clap::Parser;

use crate::error::Error;

///
/// The build driver arguments.
///
/// Every option but the flags collects the tokens up to the next option. Repeating a list
/// option appends to it.
///
#[derive(Debug, Default, Clone, Parser)]
#[command(name = "certora-build", about, long_about = None)]
pub struct Arguments {
    /// The input files as `file.sol[:ContractName]`, or a single `.conf` file.
    /// Reads `default.conf` if nothing is given.
    #[arg(value_name = "FILE[:CONTRACT]")]
    pub inputs: Vec<String>,

    /// The opaque cache name.
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub cache: Option<Vec<String>>,

    /// The build manifest name, `.certora_build` by default.
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub output: Option<Vec<String>>,

    /// The staging directory, `.certora_config` by default.
    #[arg(long = "output_folder", num_args = 1.., value_name = "DIR")]
    pub output_folder: Option<Vec<String>>,

    /// The verify manifest name, `.certora_verify` by default.
    #[arg(long = "output_verify", num_args = 1.., value_name = "NAME")]
    pub output_verify: Option<Vec<String>>,

    /// The link directives `Contract:slotOrField=ContractOrAddress`.
    #[arg(long, num_args = 0.., value_name = "LINK")]
    pub link: Option<Vec<String>>,

    /// The struct link directives `Contract:slot=ContractOrAddress`.
    #[arg(long = "struct_link", num_args = 0.., value_name = "LINK")]
    pub struct_link: Option<Vec<String>>,

    /// The manual addresses `Contract:address`.
    #[arg(long, num_args = 0.., value_name = "CONTRACT:ADDRESS")]
    pub address: Option<Vec<String>>,

    /// The comma-separated paths the compiler may read from, `$PWD/contracts/,$PWD` by default.
    #[arg(long, num_args = 1.., value_name = "PATHS")]
    pub path: Option<Vec<String>>,

    /// The remapping root, `$NODE_PATH` or `$PWD/node_modules` by default.
    #[arg(long = "packages_path", num_args = 1.., value_name = "PATH")]
    pub packages_path: Option<Vec<String>>,

    /// The remappings `name=path`.
    #[arg(long, num_args = 0.., value_name = "NAME=PATH")]
    pub packages: Option<Vec<String>>,

    /// The `solc` executable, `solc` by default.
    #[arg(long, num_args = 1.., value_name = "SOLC")]
    pub solc: Option<Vec<String>>,

    /// The per-contract `solc` executables `Contract=solc,...`.
    #[arg(long = "solc_map", num_args = 1.., value_name = "MAP")]
    pub solc_map: Option<Vec<String>>,

    /// The extra `solc` arguments. Wrap them in quotes.
    #[arg(long = "solc_args", num_args = 1.., allow_hyphen_values = true, value_name = "ARGS")]
    pub solc_args: Option<Vec<String>>,

    /// The verification queries `Contract:file.spec`.
    #[arg(long, num_args = 0.., value_name = "CONTRACT:SPEC")]
    pub verify: Option<Vec<String>>,

    /// The contracts to check assertions for.
    #[arg(long, num_args = 0.., value_name = "CONTRACT")]
    pub assert: Option<Vec<String>>,

    /// The link candidates `Contract:field=Target`.
    #[arg(long = "link_candidates", num_args = 0.., value_name = "CANDIDATE")]
    pub link_candidates: Option<Vec<String>>,

    /// Skips copying the sources into the staging directory.
    #[arg(long = "dont_fetch_sources")]
    pub dont_fetch_sources: bool,

    /// Passes drive-letter paths to a Cygwin build of `solc`.
    #[arg(long)]
    pub iscygwin: bool,

    /// Includes the variable mappings in the contract records.
    #[arg(long)]
    pub varmap: bool,

    /// Enables the debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Arguments {
    /// The conf file extension.
    pub const CONF_EXTENSION: &'static str = ".conf";

    /// The conf key holding the input files.
    pub const CONF_FILES: &'static str = "files";

    ///
    /// Reads the arguments from a JSON conf file.
    ///
    /// Every key but `files` is an option name with the value it takes on the command line.
    /// Unknown keys are skipped with a warning.
    ///
    pub fn try_from_conf(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            Error::user_input(format!("Conf file `{}` reading error: {error}", path.display()))
        })?;
        let conf: serde_json::Value = serde_json::from_str(text.as_str()).map_err(|error| {
            Error::user_input(format!("Conf file `{}` parsing error: {error}", path.display()))
        })?;
        let serde_json::Value::Object(conf) = conf else {
            return Err(Error::user_input(format!(
                "Conf file `{}` must hold a JSON object",
                path.display()
            )));
        };

        let mut arguments = Self::default();
        for (key, value) in conf.into_iter() {
            match key.as_str() {
                Self::CONF_FILES => arguments.inputs = Self::conf_values(&key, value)?,
                "cache" => arguments.cache = Some(Self::conf_values(&key, value)?),
                "output" => arguments.output = Some(Self::conf_values(&key, value)?),
                "output_folder" => arguments.output_folder = Some(Self::conf_values(&key, value)?),
                "output_verify" => arguments.output_verify = Some(Self::conf_values(&key, value)?),
                "link" => arguments.link = Some(Self::conf_values(&key, value)?),
                "struct_link" => arguments.struct_link = Some(Self::conf_values(&key, value)?),
                "address" => arguments.address = Some(Self::conf_values(&key, value)?),
                "path" => arguments.path = Some(Self::conf_values(&key, value)?),
                "packages_path" => arguments.packages_path = Some(Self::conf_values(&key, value)?),
                "packages" => arguments.packages = Some(Self::conf_values(&key, value)?),
                "solc" => arguments.solc = Some(Self::conf_values(&key, value)?),
                "solc_map" => arguments.solc_map = Some(Self::conf_values(&key, value)?),
                "solc_args" => arguments.solc_args = Some(Self::conf_values(&key, value)?),
                "verify" => arguments.verify = Some(Self::conf_values(&key, value)?),
                "assert" => arguments.assert = Some(Self::conf_values(&key, value)?),
                "link_candidates" => {
                    arguments.link_candidates = Some(Self::conf_values(&key, value)?)
                }
                "dont_fetch_sources" => arguments.dont_fetch_sources = Self::conf_flag(&key, value)?,
                "iscygwin" => arguments.iscygwin = Self::conf_flag(&key, value)?,
                "varmap" => arguments.varmap = Self::conf_flag(&key, value)?,
                "debug" => arguments.debug = Self::conf_flag(&key, value)?,
                _ => log::warn!("Unknown key `{key}` in conf file `{}` ignored", path.display()),
            }
        }
        Ok(arguments)
    }

    ///
    /// Fills the options missing from the command line with the values of the conf file.
    ///
    pub fn merge(self, conf: Self) -> Self {
        Self {
            inputs: conf.inputs,
            cache: self.cache.or(conf.cache),
            output: self.output.or(conf.output),
            output_folder: self.output_folder.or(conf.output_folder),
            output_verify: self.output_verify.or(conf.output_verify),
            link: self.link.or(conf.link),
            struct_link: self.struct_link.or(conf.struct_link),
            address: self.address.or(conf.address),
            path: self.path.or(conf.path),
            packages_path: self.packages_path.or(conf.packages_path),
            packages: self.packages.or(conf.packages),
            solc: self.solc.or(conf.solc),
            solc_map: self.solc_map.or(conf.solc_map),
            solc_args: self.solc_args.or(conf.solc_args),
            verify: self.verify.or(conf.verify),
            assert: self.assert.or(conf.assert),
            link_candidates: self.link_candidates.or(conf.link_candidates),
            dont_fetch_sources: self.dont_fetch_sources || conf.dont_fetch_sources,
            iscygwin: self.iscygwin || conf.iscygwin,
            varmap: self.varmap || conf.varmap,
            debug: self.debug || conf.debug,
        }
    }

    ///
    /// Whether the only positional argument is a conf file.
    ///
    pub fn is_conf(&self) -> bool {
        self.inputs
            .first()
            .map(|input| input.ends_with(Self::CONF_EXTENSION))
            .unwrap_or_default()
    }

    ///
    /// Converts a conf value to the command line tokens.
    ///
    /// Objects are accepted for `address` as `{name: address}`, and for `link_candidates` as
    /// `{contract: {field: target}}`.
    ///
    fn conf_values(key: &str, value: serde_json::Value) -> anyhow::Result<Vec<String>> {
        let scalar = |value: serde_json::Value| match value {
            serde_json::Value::String(string) => Ok(string),
            serde_json::Value::Number(number) => Ok(number.to_string()),
            value => Err(Error::user_input(format!(
                "Conf key `{key}` has an unexpected value `{value}`"
            ))),
        };

        match value {
            serde_json::Value::Bool(true) => Ok(vec![]),
            serde_json::Value::Array(values) => values.into_iter().map(scalar).collect(),
            serde_json::Value::Object(entries) if key == "address" => entries
                .into_iter()
                .map(|(name, address)| -> anyhow::Result<String> {
                    Ok(format!("{name}:{}", scalar(address)?))
                })
                .collect(),
            serde_json::Value::Object(entries) if key == "link_candidates" => {
                let mut values = Vec::new();
                for (contract, candidates) in entries.into_iter() {
                    let serde_json::Value::Object(candidates) = candidates else {
                        return Err(Error::user_input(format!(
                            "Conf key `{key}` expects an object of candidates for `{contract}`"
                        )));
                    };
                    for (field, target) in candidates.into_iter() {
                        values.push(format!("{contract}:{field}={}", scalar(target)?));
                    }
                }
                Ok(values)
            }
            value => scalar(value).map(|value| vec![value]),
        }
    }

    ///
    /// Converts a conf value to a flag.
    ///
    fn conf_flag(key: &str, value: serde_json::Value) -> anyhow::Result<bool> {
        match value {
            serde_json::Value::Bool(flag) => Ok(flag),
            serde_json::Value::Array(values) if values.is_empty() => Ok(true),
            value => Err(Error::user_input(format!(
                "Conf key `{key}` expects a boolean, got `{value}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Arguments;

    #[test]
    fn greedy_option_values() {
        let arguments = Arguments::try_parse_from([
            "certora-build",
            "A.sol",
            "B.sol:Token",
            "--verify",
            "A:a.spec",
            "B:b.spec",
            "--assert",
            "A",
            "--verify",
            "A:c.spec",
            "--solc_args",
            "--optimize --optimize-runs 200",
            "--varmap",
        ])
        .expect("Always valid");

        assert_eq!(arguments.inputs, vec!["A.sol", "B.sol:Token"]);
        assert_eq!(
            arguments.verify,
            Some(vec![
                "A:a.spec".to_owned(),
                "B:b.spec".to_owned(),
                "A:c.spec".to_owned()
            ])
        );
        assert_eq!(arguments.assert, Some(vec!["A".to_owned()]));
        assert_eq!(
            arguments.solc_args,
            Some(vec!["--optimize --optimize-runs 200".to_owned()])
        );
        assert!(arguments.varmap);
        assert!(!arguments.debug);
    }

    #[test]
    fn bare_list_option() {
        let arguments =
            Arguments::try_parse_from(["certora-build", "A.sol", "--assert", "--debug"])
                .expect("Always valid");
        assert_eq!(arguments.assert, Some(vec![]));
        assert!(arguments.debug);
    }

    #[test]
    fn unknown_option_rejected() {
        assert!(Arguments::try_parse_from(["certora-build", "A.sol", "--unknown"]).is_err());
        assert!(Arguments::try_parse_from(["certora-build", "A.sol", "--solc"]).is_err());
    }

    #[test]
    fn conf_file() {
        let directory = tempfile::tempdir().expect("Always valid");
        let path = directory.path().join("run.conf");
        std::fs::write(
            &path,
            r#"{
                "files": ["A.sol", "B.sol:Token"],
                "solc": "solc8",
                "address": { "A": "0x12" },
                "link_candidates": { "A": { "token": "B" } },
                "verify": ["A:a.spec"],
                "varmap": true,
                "unknown": 1
            }"#,
        )
        .expect("Always valid");

        let conf = Arguments::try_from_conf(path.as_path()).expect("Always valid");
        assert_eq!(conf.inputs, vec!["A.sol", "B.sol:Token"]);
        assert_eq!(conf.address, Some(vec!["A:0x12".to_owned()]));
        assert_eq!(conf.link_candidates, Some(vec!["A:token=B".to_owned()]));
        assert!(conf.varmap);

        let cli = Arguments::try_parse_from(["certora-build", "run.conf", "--solc", "solc7"])
            .expect("Always valid");
        assert!(cli.is_conf());
        let merged = cli.merge(conf);
        assert_eq!(merged.solc, Some(vec!["solc7".to_owned()]));
        assert_eq!(merged.verify, Some(vec!["A:a.spec".to_owned()]));
        assert_eq!(merged.inputs, vec!["A.sol", "B.sol:Token"]);
    }

    #[test]
    fn conf_must_be_object() {
        let directory = tempfile::tempdir().expect("Always valid");
        let path = directory.path().join("bad.conf");
        std::fs::write(&path, "[1, 2]").expect("Always valid");
        assert!(Arguments::try_from_conf(path.as_path()).is_err());
    }
}
