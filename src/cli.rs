use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use crate::commands::{AuthCommand, CompletionsCommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "stsmfa", version, about = "Cache MFA-authenticated AWS STS sessions", long_about = None, arg_required_else_help = false)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "AWS region for STS calls (defaults to the profile's region, then us-east-1)"
    )]
    pub region: Option<String>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Reuse or create an MFA session for the profile in AWS_PROFILE")]
    Auth(AuthCommand),
    #[command(about = "Generate shell completion scripts for stsmfa")]
    Completions(CompletionsCommand),
}

impl Cli {
    /// Log level selected by `-v` (warnings only by default)
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub async fn execute(self) -> Result<()> {
        let command = self
            .command
            .unwrap_or_else(|| Commands::Auth(AuthCommand::default()));

        match command {
            Commands::Auth(cmd) => cmd.execute(self.region).await,
            Commands::Completions(cmd) => {
                cmd.execute();
                Ok(())
            }
        }
    }
}
