//!
//! The Solidity build driver executable.
//!

use clap::CommandFactory;
use clap::Parser;
use colored::Colorize;

use certora_build::Arguments;
use certora_build::Options;

///
/// The application entry point.
///
fn main() {
    let arguments = match Arguments::try_parse() {
        Ok(arguments) => arguments,
        Err(error) => error.exit(),
    };

    let exit_code = match main_inner(arguments) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("Encountered an error configuring the verification environment:");
            eprintln!("{error:?}");
            eprintln!("{}", Arguments::command().render_usage());
            1
        }
    };
    std::process::exit(exit_code);
}

///
/// The entry point wrapper used for proper error handling.
///
fn main_inner(arguments: Arguments) -> anyhow::Result<()> {
    let debug = arguments.debug;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if debug { "debug" } else { "warn" }),
    )
    .init();

    println!(
        "    {} {} v{}",
        "Building".bright_green().bold(),
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    let working_directory = std::env::current_dir()?;
    let generated_with = std::env::args().collect::<Vec<String>>().join(" ");
    let options = Options::try_from_arguments(arguments, working_directory.as_path(), generated_with)?;
    let output = certora_build::run(&options, &certora_build::SolcCompiler)?;

    println!(
        "    {} {} SDCs written to {}",
        "Finished".bright_green().bold(),
        output.sdcs.len(),
        options.output_path().display(),
    );

    Ok(())
}
