//!
//! The `solc --standard-json` input.
//!

pub mod language;
pub mod settings;
pub mod source;

use std::collections::BTreeMap;

use serde::Serialize;

use self::language::Language;
use self::settings::Settings;
use self::source::Source;

///
/// The `solc --standard-json` input.
///
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// The input language.
    pub language: Language,
    /// The input source code files hashmap.
    pub sources: BTreeMap<String, Source>,
    /// The compiler settings.
    pub settings: Settings,
}

impl Input {
    ///
    /// A shortcut constructor for a single source file read by the compiler itself.
    ///
    pub fn try_from_path(
        path: String,
        remappings: Vec<String>,
        solc_args: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut sources = BTreeMap::new();
        sources.insert(path.clone(), Source::from(path));

        Ok(Self {
            language: Language::Solidity,
            sources,
            settings: Settings::new(remappings, solc_args)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Input;

    #[test]
    fn serialized_shape() {
        let input = Input::try_from_path(
            "/work/A.sol".to_owned(),
            vec!["lib=/work/node_modules/lib".to_owned()],
            Some("--optimize"),
        )
        .expect("Always valid");

        let json = serde_json::to_value(&input).expect("Always valid");
        assert_eq!(
            json,
            serde_json::json!({
                "language": "Solidity",
                "sources": { "/work/A.sol": { "urls": ["/work/A.sol"] } },
                "settings": {
                    "remappings": ["lib=/work/node_modules/lib"],
                    "outputSelection": {
                        "*": {
                            "*": [
                                "storageLayout",
                                "abi",
                                "evm.deployedBytecode",
                                "evm.methodIdentifiers"
                            ],
                            "": ["id", "ast"]
                        }
                    },
                    "optimizer": { "enabled": true }
                }
            })
        );
    }
}
