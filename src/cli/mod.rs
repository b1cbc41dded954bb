//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pacebench_core::RunConfig;

mod commands;

pub use commands::execute;

#[derive(Parser, Debug)]
#[command(name = "pacebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load an HTTP endpoint
    Run(RunArgs),

    /// Validate a configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Target URL; ":8080/path" and "/path" address 127.0.0.1
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Extra header as 'Name: value'; repeatable
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long)]
    pub data: Option<String>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Number of requests; negative runs until interrupted
    #[arg(short, long, allow_negative_numbers = true)]
    pub number: Option<i64>,

    /// Requests per second across all workers
    #[arg(short, long)]
    pub rate: Option<u32>,

    /// Run for this long, e.g. "30s" or "2m"; overrides --number
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// JSON config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Run config from the config file, if any, with flags applied on top
    ///
    /// Without a file or any bound flag a single request is sent.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RunConfig::new(1).with_number(1),
        };

        if let Some(concurrent) = self.concurrent {
            config.concurrent = concurrent;
        }
        if let Some(number) = self.number {
            config.number = number;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }

        config.validate()?;
        Ok(config)
    }
}
