//!
//! The Solidity build driver library.
//!

pub mod address;
pub mod arguments;
pub mod ast;
pub mod build;
pub mod collector;
pub mod error;
pub mod link;
pub mod linker;
pub mod options;
pub mod platform;
pub mod sdc;
pub mod solc;
pub mod utils;
pub mod verify;

pub use self::arguments::Arguments;
pub use self::build::BuildGenerator;
pub use self::error::Error;
pub use self::options::Options;
pub use self::sdc::Sdc;
pub use self::solc::Compiler;
pub use self::solc::SolcCompiler;
pub use self::verify::VerifyEntry;
pub use self::verify::VerifyGenerator;

use std::collections::BTreeMap;
use std::path::Path;

use clap::Parser;

///
/// The build driver result.
///
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// The SDCs by key, as written to the build manifest.
    pub sdcs: BTreeMap<String, Sdc>,
    /// The verify manifest entries.
    pub verify: Vec<VerifyEntry>,
}

///
/// Runs the build driver with normalized options.
///
/// Writes the effective conf, the build manifest, the verify manifest and the staging directory.
///
pub fn run<C>(options: &Options, compiler: &C) -> anyhow::Result<BuildOutput>
where
    C: Compiler,
{
    let output_folder = options.output_folder_path();
    crate::utils::remove_and_recreate_dir(output_folder.as_path())?;
    crate::utils::write_json_sorted(
        output_folder.join(Options::LAST_RUN_CONF).as_path(),
        &options.to_conf(),
    )?;

    let sdcs = BuildGenerator::new(options, compiler).build()?;

    let verify = VerifyGenerator::new(options);
    verify.check(&sdcs)?;
    verify.copy_specs()?;
    verify.dump(options.output_verify_path().as_path())?;

    crate::utils::write_json_sorted(options.output_path().as_path(), &sdcs)?;
    log::debug!("Wrote {} SDCs to `{}`", sdcs.len(), options.output_path().display());

    Ok(BuildOutput {
        sdcs,
        verify: verify.entries().to_vec(),
    })
}

///
/// Runs the build driver with the command line `argv`, the program name included.
///
pub fn run_with_compiler<I, T, C>(
    argv: I,
    working_directory: &Path,
    compiler: &C,
) -> anyhow::Result<BuildOutput>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
    C: Compiler,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let arguments = Arguments::try_parse_from(argv.iter())
        .map_err(|error| Error::user_input(error.to_string()))?;
    let options = Options::try_from_arguments(arguments, working_directory, argv.join(" "))?;
    run(&options, compiler)
}

///
/// Runs the build driver with the command line `argv` and the `solc` subprocess.
///
pub fn run_with_args<I, T>(argv: I, working_directory: &Path) -> anyhow::Result<BuildOutput>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    run_with_compiler(argv, working_directory, &SolcCompiler)
}
