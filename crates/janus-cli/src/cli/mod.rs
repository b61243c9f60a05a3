mod commands;

use clap::Parser;
use janus_core::domain::JanusError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let janus_error = error.as_janus_error();
            eprintln!("{}", janus_error.diagnostic_line());
            eprintln!("{}", janus_error.fatal_exit_line());
            janus_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("janus".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "janus",
    version,
    about = "Beam-spot and analysis tools for GOSIA2 Coulomb-excitation fits"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Sample the beam-spot database over the offset grid
    Beamspot(commands::BeamspotArgs),
    /// Compute GOSIA2 phi ranges for an offset beam
    PhiPattern(commands::PhiPatternArgs),
    /// Plot a chi-square surface and report the one-sigma bounds
    Chisq(commands::ChisqArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Beamspot(args) => commands::run_beamspot_command(args),
        CliCommand::PhiPattern(args) => commands::run_phi_pattern_command(args),
        CliCommand::Chisq(args) => commands::run_chisq_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(JanusError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_janus_error(&self) -> JanusError {
        match self {
            Self::Usage(message) => {
                JanusError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => JanusError::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
