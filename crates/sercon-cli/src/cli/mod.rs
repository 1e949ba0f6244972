//! CLI for sercon.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sercon_core::config;

pub use args::{PortArgs, ProbeArgs, RetryArgs};
use commands::{run_check, run_completions, run_ports, run_validate};

/// Top-level CLI for sercon.
#[derive(Debug, Parser)]
#[command(name = "sercon")]
#[command(
    about = "sercon: resilient serial connections with retry and health checks",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List serial ports present on this system.
    Ports,

    /// Check connection parameters without opening the port.
    Validate {
        #[command(flatten)]
        port: PortArgs,
    },

    /// Open a port with retry, optionally run a health probe, then close it.
    Check {
        #[command(flatten)]
        port: PortArgs,
        #[command(flatten)]
        retry: RetryArgs,
        #[command(flatten)]
        probe: ProbeArgs,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Ports => run_ports()?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Validate { port } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_validate(&cfg, &port)?;
            }
            CliCommand::Check { port, retry, probe } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_check(&cfg, &port, &retry, &probe)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
