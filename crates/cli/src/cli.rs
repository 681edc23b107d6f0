use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run simulated tasks concurrently and report how long each one took.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about)]
pub struct CliArgs {
    /// Path to a runner config file (TOML). Falls back to defaults plus TALLY_* env vars.
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a batch of tasks; results are keyed by position (0-based)
    Run {
        /// Simulated duration of each task in milliseconds
        #[arg(long, value_delimiter = ',', default_value = "800,1000,600")]
        durations: Vec<u64>,

        /// Index of a task that should fail (repeatable)
        #[arg(long = "fail")]
        fail: Vec<u64>,
    },

    /// Register tasks with IDs starting at 1, run them all, print per-task results
    Schedule {
        /// Simulated duration of each task in milliseconds
        #[arg(long, value_delimiter = ',', default_value = "100,200,150")]
        durations: Vec<u64>,

        /// ID of a task that should fail (repeatable)
        #[arg(long = "fail")]
        fail: Vec<u64>,
    },
}
