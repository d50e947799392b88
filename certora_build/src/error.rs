//!
//! The build driver error kinds.
//!

///
/// The build driver error kinds.
///
/// Every kind is fatal. The value is wrapped into `anyhow::Error` at the raise site, so callers
/// may recover the kind with `downcast_ref`.
///
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed options, unknown positionals, missing files, unknown contracts.
    #[error("{0}")]
    UserInput(String),
    /// `solc` reported an error or exited abnormally.
    #[error("{0}")]
    Compilation(String),
    /// A link directive or a library reference cannot be resolved.
    #[error("{0}")]
    Link(String),
    /// The compiler output contradicts itself.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    ///
    /// A shortcut constructor.
    ///
    pub fn user_input(message: impl Into<String>) -> anyhow::Error {
        Self::UserInput(message.into()).into()
    }

    ///
    /// A shortcut constructor.
    ///
    pub fn compilation(message: impl Into<String>) -> anyhow::Error {
        Self::Compilation(message.into()).into()
    }

    ///
    /// A shortcut constructor.
    ///
    pub fn link(message: impl Into<String>) -> anyhow::Error {
        Self::Link(message.into()).into()
    }

    ///
    /// A shortcut constructor.
    ///
    pub fn internal(message: impl Into<String>) -> anyhow::Error {
        Self::Internal(message.into()).into()
    }
}
