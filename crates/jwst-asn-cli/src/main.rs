use std::io;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;

use jwst_asn::{console, install, RuleRegistry};
use jwst_asn_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    console::init_with_verbosity(cli.verbose);

    let registry = match install(RuleRegistry::with_builtin()) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    match run(cli.command, registry, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {}", "error:".bright_red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
