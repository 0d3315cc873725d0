//! Entry point for the `intercept` command-line tool.
#![forbid(unsafe_code)]

use intercept_cli::CliError;

fn main() -> eyre::Result<()> {
    match intercept_cli::run() {
        // Help, version and usage errors carry their own formatting and exit code.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        outcome => outcome.map_err(eyre::Report::from),
    }
}
