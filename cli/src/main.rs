mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, calc, sweep};
use sweepr_common::error::{ScanError, SubnetError};
use terminal::{logging, print};
use tracing::error;

/// Exit status for input that was rejected before any probe was sent.
const EXIT_INVALID_INPUT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    let result = match commands.command {
        Commands::Sweep(args) => sweep::sweep(args, commands.quiet).await,
        Commands::Calc { subnet } => calc::calc(subnet, commands.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if is_invalid_input(&err) {
                ExitCode::from(EXIT_INVALID_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn is_invalid_input(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.is::<SubnetError>() || cause.is::<ScanError>())
}
