//!
//! The contract function record.
//!

use serde::Serialize;

use super::solidity_type::SolidityType;

///
/// The contract function record.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// The function name.
    pub name: String,
    /// The parameter type signatures.
    pub args: Vec<String>,
    /// The parameter types.
    pub full_args: Vec<SolidityType>,
    /// The return type descriptions.
    pub returns: Vec<String>,
    /// The selector as 8 lowercase hexadecimal digits.
    pub sighash: String,
    /// Whether the function definitely rejects value transfers.
    pub notpayable: bool,
    /// Whether the function comes from the contract ABI.
    #[serde(rename = "isABI")]
    pub is_abi: bool,
    /// The declared state mutability.
    pub state_mutability: StateMutability,
}

impl Function {
    ///
    /// Renders `name(type1,type2,...)`.
    ///
    pub fn signature(&self) -> String {
        Self::compute_signature(self.name.as_str(), self.full_args.as_slice())
    }

    ///
    /// Renders `name(type1,type2,...)` from the parts.
    ///
    pub fn compute_signature(name: &str, arguments: &[SolidityType]) -> String {
        format!(
            "{name}({})",
            arguments
                .iter()
                .map(SolidityType::signature)
                .collect::<Vec<String>>()
                .join(",")
        )
    }
}

///
/// The state mutability tag.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StateMutability {
    /// `pure`, `view`, `nonpayable` or `payable`.
    pub keyword: String,
}

impl StateMutability {
    /// The keyword assumed when the compiler does not report one.
    pub const DEFAULT_KEYWORD: &'static str = "nonpayable";

    ///
    /// A shortcut constructor.
    ///
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }

    ///
    /// Whether the keyword rules value transfers out.
    ///
    pub fn is_non_payable(&self) -> bool {
        matches!(self.keyword.as_str(), "pure" | "view" | Self::DEFAULT_KEYWORD)
    }
}

impl Default for StateMutability {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEYWORD)
    }
}
