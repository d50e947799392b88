//!
//! The Solidity compiler.
//!

pub mod standard_json;

use std::io::Write;
use std::path::Path;

use crate::error::Error;

use self::standard_json::input::Input as StandardJsonInput;

///
/// The compiler trait.
///
/// The driver reads nothing from the compiler except the standard JSON stdout and the
/// assembly listings written into the output directory.
///
pub trait Compiler {
    ///
    /// Runs the `--standard-json` compilation and returns the raw stdout.
    ///
    fn standard_json(
        &self,
        executable: &str,
        input: &StandardJsonInput,
        output_directory: &Path,
        allow_paths: &str,
    ) -> anyhow::Result<Vec<u8>>;

    ///
    /// Runs the `--asm` compilation, which writes `<Contract>.evm` listings into
    /// `output_directory`.
    ///
    fn assembly(
        &self,
        executable: &str,
        extra_args: &[String],
        output_directory: &Path,
        allow_paths: &str,
        packages: &[String],
        file: &str,
    ) -> anyhow::Result<()>;
}

///
/// The `solc` subprocess.
///
#[derive(Debug, Default, Clone, Copy)]
pub struct SolcCompiler;

impl SolcCompiler {
    ///
    /// Checks that the executable can be found.
    ///
    fn check_executable(executable: &str) -> anyhow::Result<()> {
        if let Err(error) = which::which(executable) {
            return Err(Error::compilation(format!(
                "The `{executable}` executable not found in ${{PATH}}: {error}"
            )));
        }
        Ok(())
    }

    ///
    /// Returns the output directory argument, which `solc` requires to end with a slash.
    ///
    fn output_directory_argument(output_directory: &Path) -> String {
        format!(
            "{}/",
            crate::utils::path_to_string_normalized(output_directory)
        )
    }
}

impl Compiler for SolcCompiler {
    fn standard_json(
        &self,
        executable: &str,
        input: &StandardJsonInput,
        output_directory: &Path,
        allow_paths: &str,
    ) -> anyhow::Result<Vec<u8>> {
        Self::check_executable(executable)?;

        let mut command = std::process::Command::new(executable);
        command.stdin(std::process::Stdio::piped());
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.arg("-o");
        command.arg(Self::output_directory_argument(output_directory));
        command.arg("--overwrite");
        command.arg("--allow-paths");
        command.arg(allow_paths);
        command.arg("--standard-json");
        log::debug!("Running {command:?}");

        let input_json = serde_json::to_vec(input).expect("Always valid");

        let process = command.spawn().map_err(|error| {
            Error::compilation(format!("{executable} subprocess spawning error: {error:?}"))
        })?;
        process
            .stdin
            .as_ref()
            .ok_or_else(|| Error::compilation(format!("{executable} stdin getting error")))?
            .write_all(input_json.as_slice())
            .map_err(|error| {
                Error::compilation(format!("{executable} stdin writing error: {error:?}"))
            })?;

        let output = process.wait_with_output().map_err(|error| {
            Error::compilation(format!("{executable} subprocess output error: {error:?}"))
        })?;
        if !output.status.success() {
            return Err(Error::compilation(format!(
                "{executable} error: {}",
                String::from_utf8_lossy(output.stderr.as_slice())
            )));
        }

        Ok(output.stdout)
    }

    fn assembly(
        &self,
        executable: &str,
        extra_args: &[String],
        output_directory: &Path,
        allow_paths: &str,
        packages: &[String],
        file: &str,
    ) -> anyhow::Result<()> {
        Self::check_executable(executable)?;

        let mut command = std::process::Command::new(executable);
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());
        command.args(extra_args);
        command.arg("-o");
        command.arg(Self::output_directory_argument(output_directory));
        command.arg("--overwrite");
        command.arg("--asm");
        command.arg("--allow-paths");
        command.arg(allow_paths);
        command.args(packages);
        command.arg(file);
        log::debug!("Running {command:?}");

        let output = command.output().map_err(|error| {
            Error::compilation(format!("{executable} subprocess spawning error: {error:?}"))
        })?;
        if !output.status.success() {
            return Err(Error::compilation(format!(
                "{executable} --asm error for `{file}`: {}",
                String::from_utf8_lossy(output.stderr.as_slice())
            )));
        }

        Ok(())
    }
}
