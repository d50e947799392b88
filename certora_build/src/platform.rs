//!
//! The host operating system specifics.
//!

///
/// The host operating system specifics.
///
/// Every OS-dependent decision of the driver goes through this type.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Whether the host is Windows.
    pub windows: bool,
    /// Whether the paths are passed to a Cygwin build of `solc`.
    pub cygwin: bool,
}

impl Platform {
    /// The Windows executable suffix.
    const EXECUTABLE_SUFFIX: &'static str = ".exe";

    /// The Cygwin drive mount prefix.
    const CYGDRIVE_PREFIX: &'static str = "/cygdrive/";

    ///
    /// Detects the host platform.
    ///
    pub fn host(cygwin: bool) -> Self {
        Self {
            windows: cfg!(windows),
            cygwin,
        }
    }

    ///
    /// Returns the executable name, adding the `.exe` suffix on Windows.
    ///
    pub fn executable(&self, name: &str) -> String {
        if self.windows && !name.ends_with(Self::EXECUTABLE_SUFFIX) {
            format!("{name}{}", Self::EXECUTABLE_SUFFIX)
        } else {
            name.to_owned()
        }
    }

    ///
    /// Converts a slash-normalized path to the form expected by the compiler.
    ///
    /// With Cygwin, `C:/dir/file.sol` becomes `/cygdrive/c/dir/file.sol`.
    ///
    pub fn compiler_path(&self, path: &str) -> String {
        if !self.cygwin {
            return path.to_owned();
        }

        let mut characters = path.chars();
        match (characters.next(), characters.next(), characters.next()) {
            (Some(drive), Some(':'), Some('/')) if drive.is_ascii_alphabetic() => format!(
                "{}{}/{}",
                Self::CYGDRIVE_PREFIX,
                drive.to_ascii_lowercase(),
                &path[3..]
            ),
            _ => path.to_owned(),
        }
    }
}
