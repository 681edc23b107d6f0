mod cli;
mod demo;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use tally_core::config::load_dotenv;
use tally_runner::{RunReport, Runner, RunnerConfig, TaskScheduler};

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    let report = match args.command {
        Command::Run { durations, fail } => {
            let runner = Runner::new(config);
            let report = runner
                .run(demo::batch(&durations, &fail)?)
                .context("task run failed")?;
            if !args.json {
                print!("{report}");
                println!();
            }
            report
        }
        Command::Schedule { durations, fail } => {
            let mut scheduler = TaskScheduler::with_config(config);
            demo::register(&mut scheduler, &durations, &fail)?;
            let report = scheduler.run_all().context("task run failed")?.clone();
            if !args.json {
                scheduler.print_results(&mut io::stdout().lock())?;
            }
            report
        }
    };

    if args.json {
        println!("{}", report.to_json()?);
    }

    Ok(exit_code(&report))
}

fn load_config(args: &CliArgs) -> Result<RunnerConfig> {
    match &args.config {
        Some(path) => {
            let config = RunnerConfig::from_file(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?;
            info!(path = %path.display(), "loaded runner config");
            Ok(config)
        }
        None => RunnerConfig::from_env().context("invalid TALLY_* environment"),
    }
}

fn exit_code(report: &RunReport) -> ExitCode {
    let failed = report.failures().count();
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        warn!(failed, "some tasks failed");
        ExitCode::FAILURE
    }
}
