//!
//! The input file specifier.
//!

///
/// The input file specifier `file.sol[:ContractName]`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// The file path as given by the user.
    pub path: String,
    /// The primary contract, the file stem by default.
    pub contract: String,
}

impl InputFile {
    ///
    /// Parses the specifier. A suffix after the last colon is a contract name unless it looks
    /// like a path.
    ///
    pub fn parse(specifier: &str) -> Self {
        match specifier.rsplit_once(':') {
            Some((path, contract))
                if !path.is_empty()
                    && !contract.is_empty()
                    && !contract.contains(['/', '\\']) =>
            {
                Self {
                    path: path.to_owned(),
                    contract: contract.to_owned(),
                }
            }
            _ => Self {
                path: specifier.to_owned(),
                contract: crate::utils::file_stem(crate::utils::file_name(specifier)),
            },
        }
    }
}

impl std::fmt::Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.contract)
    }
}
