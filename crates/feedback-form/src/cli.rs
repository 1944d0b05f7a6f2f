use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::cmd::{self, check::CheckArgs, payload::PayloadArgs, validate::ValidateArgs};
use crate::logging::{LogConfig, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "feedback-form",
    about = "Check feedback submission forms and answer files offline",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a form definition and check its configuration
    Check(CheckArgs),
    /// Validate an answer file against a form, as the submit button would
    Validate(ValidateArgs),
    /// Print the submission payload for a valid answer file
    Payload(PayloadArgs),
    /// Print the JSON schema of form definitions
    Schema,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose))?;
    match cli.command {
        Commands::Check(args) => cmd::check::run(&args),
        Commands::Validate(args) => cmd::validate::run(&args),
        Commands::Payload(args) => cmd::payload::run(&args),
        Commands::Schema => cmd::schema::run(),
    }
}
