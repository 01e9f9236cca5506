//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::application::ports::ConfigStore;
use crate::commands;
use crate::infra::YamlConfigStore;
use crate::output::OutputContext;

/// Resolve fulfilled spot requests and propagate fleet group tags
#[derive(Parser)]
#[command(
    name = "fleetspot",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.fleetspot/config.yaml)
    #[arg(long, global = true, env = "FLEETSPOT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Wait for spot requests, then tag their instances with the group's tags
    Track(commands::track::TrackArgs),

    /// Set one tag on a spot request
    Tag(commands::tag::TagArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
            ..
        } = self;
        let out = OutputContext::new(no_color, quiet);
        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(())
            }
            Command::Track(args) => {
                let config = YamlConfigStore::new(config).load()?;
                commands::track::run(&out, &config, args, json).await
            }
            Command::Tag(args) => {
                let config = YamlConfigStore::new(config).load()?;
                commands::tag::run(&out, &config, args, json).await
            }
        }
    }
}
