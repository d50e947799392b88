//!
//! The immutable variable references.
//!

use serde::Serialize;

///
/// A span of the deployed bytecode holding an immutable variable.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ImmutableReference {
    /// The byte offset.
    pub offset: usize,
    /// The byte length.
    pub length: usize,
    /// The variable name.
    pub varname: String,
}

impl ImmutableReference {
    ///
    /// A shortcut constructor.
    ///
    pub fn new(offset: usize, length: usize, varname: String) -> Self {
        Self {
            offset,
            length,
            varname,
        }
    }
}

///
/// An immutable reference with its value fixed by a link directive.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PresetImmutableReference {
    /// The reference.
    #[serde(flatten)]
    pub reference: ImmutableReference,
    /// The linked address as 40 hexadecimal digits.
    pub value: String,
}

///
/// An immutable entry of a contract record.
///
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Immutable {
    /// Patched by the verifier.
    Reference(ImmutableReference),
    /// Fixed to a linked address.
    Preset(PresetImmutableReference),
}

impl Immutable {
    ///
    /// Returns the variable name.
    ///
    pub fn varname(&self) -> &str {
        match self {
            Self::Reference(reference) => reference.varname.as_str(),
            Self::Preset(preset) => preset.reference.varname.as_str(),
        }
    }

    ///
    /// Fixes the value of the reference, replacing a previous one if any.
    ///
    pub fn preset(self, value: String) -> Self {
        let reference = match self {
            Self::Reference(reference) => reference,
            Self::Preset(preset) => preset.reference,
        };
        Self::Preset(PresetImmutableReference { reference, value })
    }
}

impl From<ImmutableReference> for Immutable {
    fn from(reference: ImmutableReference) -> Self {
        Self::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::Immutable;
    use super::ImmutableReference;

    #[test]
    fn preset_serialization() {
        let immutable = Immutable::from(ImmutableReference::new(10, 32, "OWNER".to_owned()));
        assert_eq!(
            serde_json::to_value(&immutable).expect("Always valid"),
            serde_json::json!({ "offset": 10, "length": 32, "varname": "OWNER" })
        );

        let preset = immutable.preset("00".repeat(20));
        assert_eq!(preset.varname(), "OWNER");
        assert_eq!(
            serde_json::to_value(&preset).expect("Always valid"),
            serde_json::json!({ "offset": 10, "length": 32, "varname": "OWNER", "value": "00".repeat(20) })
        );
    }
}
