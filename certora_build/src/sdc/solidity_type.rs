//!
//! The Solidity parameter type.
//!

use serde::Serialize;

use crate::error::Error;
use crate::solc::standard_json::output::contract::abi::Parameter as AbiParameter;

lazy_static::lazy_static! {
    ///
    /// The outermost array dimension at the end of a type string, e.g. `[]` or `[4]`.
    ///
    static ref OUTER_ARRAY_DIMENSION: regex::Regex =
        regex::Regex::new(r"\[(\d*)\]$").expect("Always valid");
}

///
/// The Solidity parameter type.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SolidityType {
    /// The type string, e.g. `uint256[]` or `tuple[2]`.
    #[serde(rename = "type")]
    pub r#type: String,
    /// The tuple or struct members.
    pub components: Vec<SolidityType>,
    /// The array dimensions, outermost first. `-1` is a dynamic dimension.
    pub array_dims: Vec<i64>,
    /// Whether the parameter is a storage pointer of a library function.
    pub is_storage: bool,
    /// Whether the type is a tuple or a struct.
    pub is_tuple: bool,
}

impl SolidityType {
    /// The dynamic array dimension marker.
    pub const DYNAMIC_DIMENSION: i64 = -1;

    /// The ABI tuple type prefix.
    pub const ABI_TUPLE_PREFIX: &'static str = "tuple";

    ///
    /// A shortcut constructor.
    ///
    pub fn new(
        r#type: String,
        components: Vec<SolidityType>,
        is_storage: bool,
        is_tuple: bool,
    ) -> anyhow::Result<Self> {
        if is_tuple && components.is_empty() {
            return Err(Error::internal(format!(
                "Expected a non-empty tuple, but found `{type}`"
            )));
        }
        let array_dims = Self::collect_array_dims(r#type.as_str())?;

        Ok(Self {
            r#type,
            components,
            array_dims,
            is_storage,
            is_tuple,
        })
    }

    ///
    /// Converts an ABI parameter, expanding tuple components recursively.
    ///
    pub fn try_from_abi(parameter: &AbiParameter) -> anyhow::Result<Self> {
        let components = parameter
            .components
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Self::try_from_abi)
            .collect::<anyhow::Result<Vec<Self>>>()?;
        let is_tuple = parameter.r#type.starts_with(Self::ABI_TUPLE_PREFIX);

        Self::new(parameter.r#type.clone(), components, false, is_tuple)
    }

    ///
    /// Parses the array dimensions from the end of the type string, outermost first.
    ///
    pub fn collect_array_dims(type_string: &str) -> anyhow::Result<Vec<i64>> {
        let mut dimensions = Vec::new();
        let mut rest = type_string;
        while let Some(captures) = OUTER_ARRAY_DIMENSION.captures(rest) {
            let whole = captures.get(0).expect("Always exists");
            let size = captures.get(1).expect("Always exists").as_str();
            if size.is_empty() {
                dimensions.push(Self::DYNAMIC_DIMENSION);
            } else {
                let size = size.parse::<i64>().map_err(|error| {
                    Error::internal(format!(
                        "Invalid array dimension in `{type_string}`: {error}"
                    ))
                })?;
                dimensions.push(size);
            }
            rest = &rest[..whole.start()];
        }
        Ok(dimensions)
    }

    ///
    /// Renders the array suffix, innermost dimension first as in Solidity source.
    ///
    pub fn array_dims_signature(&self) -> String {
        self.array_dims
            .iter()
            .rev()
            .map(|dimension| {
                if *dimension == Self::DYNAMIC_DIMENSION {
                    "[]".to_owned()
                } else {
                    format!("[{dimension}]")
                }
            })
            .collect()
    }

    ///
    /// Renders the canonical type signature used in function selectors.
    ///
    pub fn signature(&self) -> String {
        let mut signature = if self.is_tuple {
            format!(
                "({}){}",
                self.components
                    .iter()
                    .map(Self::signature)
                    .collect::<Vec<String>>()
                    .join(","),
                self.array_dims_signature()
            )
        } else {
            self.r#type.clone()
        };
        if self.is_storage {
            signature.push_str(" storage");
        }
        signature
    }
}
