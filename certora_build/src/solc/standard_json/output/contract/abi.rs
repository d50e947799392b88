//!
//! The `solc --standard-json` output contract ABI entry.
//!

use serde::Deserialize;

///
/// The `solc --standard-json` output contract ABI entry.
///
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The entry kind: `function`, `event`, `constructor`, etc.
    #[serde(rename = "type")]
    pub r#type: String,
    /// The entry name. Absent for constructors and fallbacks.
    #[serde(default)]
    pub name: Option<String>,
    /// The input parameters.
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    /// The output parameters.
    #[serde(default)]
    pub outputs: Option<Vec<Parameter>>,
    /// The legacy payability flag.
    #[serde(default)]
    pub payable: Option<bool>,
    /// The state mutability: `pure`, `view`, `nonpayable` or `payable`.
    #[serde(default)]
    pub state_mutability: Option<String>,
}

impl Entry {
    /// The function entry kind.
    pub const TYPE_FUNCTION: &'static str = "function";

    ///
    /// Whether the entry describes a function.
    ///
    pub fn is_function(&self) -> bool {
        self.r#type == Self::TYPE_FUNCTION
    }
}

///
/// The ABI entry parameter.
///
#[derive(Debug, Deserialize, Clone)]
pub struct Parameter {
    /// The parameter name.
    #[serde(default)]
    pub name: String,
    /// The parameter type, e.g. `uint256` or `tuple[2]`.
    #[serde(rename = "type")]
    pub r#type: String,
    /// The tuple components.
    #[serde(default)]
    pub components: Option<Vec<Parameter>>,
}
