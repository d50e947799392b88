//!
//! The link directive.
//!

use std::str::FromStr;

use crate::error::Error;

///
/// The link directive `Source:Reference=Destination`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDirective {
    /// The primary contract of the SDC to update.
    pub source_contract: String,
    /// The immutable, the storage variable or the slot.
    pub reference: String,
    /// The primary contract whose address is linked, or a literal address.
    pub destination: String,
}

impl FromStr for LinkDirective {
    type Err = anyhow::Error;

    fn from_str(directive: &str) -> Result<Self, Self::Err> {
        let malformed = || {
            Error::user_input(format!(
                "Link directive `{directive}` must have the form `Contract:reference=target`"
            ))
        };

        let (source, destination) = directive.split_once('=').ok_or_else(malformed)?;
        let (source_contract, reference) = source.split_once(':').ok_or_else(malformed)?;
        if source_contract.is_empty() || reference.is_empty() || destination.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            source_contract: source_contract.to_owned(),
            reference: reference.to_owned(),
            destination: destination.to_owned(),
        })
    }
}

impl std::fmt::Display for LinkDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}={}",
            self.source_contract, self.reference, self.destination
        )
    }
}
