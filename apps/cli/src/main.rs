// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LOD-Lite CLI - classify BIM schedule exports by Level of Development.
//!
//! ## Usage
//!
//! ```bash
//! # Directory of per-category exports (AllBasicWalls.csv, Roofs.csv, ...)
//! lod-lite exports/ lod.csv
//!
//! # One combined table with a category column
//! lod-lite export.csv lod.csv --category-column Category
//!
//! # Machine-readable run report and JSON logs
//! lod-lite exports/ lod.csv --summary report.json --log-format json
//! ```
//!
//! ## Exit Codes
//!
//! - 0: output written
//! - 1: any failure (missing input, missing category column, malformed CSV)
//!
//! Logs go to stderr; the per-category summary table goes to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lod_lite_core::Tier;
use lod_lite_processing::{run, BatchConfig, RunReport, RunRequest};
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, LogFormat, DEFAULT_LOG_FILTER};

/// Classify building elements from schedule exports into LOD 100/200/300
#[derive(Parser)]
#[command(name = "lod-lite")]
#[command(version)]
#[command(about = "Classify BIM schedule exports by Level of Development", long_about = None)]
struct Cli {
    /// Export directory or combined CSV file
    input: PathBuf,

    /// Output CSV path
    output: PathBuf,

    /// Category discriminator column for combined input [env: LOD_CATEGORY_COLUMN]
    #[arg(long)]
    category_column: Option<String>,

    /// Column matched between roofs and gutters [env: LOD_JOIN_KEY]
    #[arg(long)]
    join_key: Option<String>,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Log output format [env: LOD_LOG_FORMAT]
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// Flags take precedence over the environment.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(column) = &self.category_column {
            config.category_column = column.clone();
        }
        if let Some(key) = &self.join_key {
            config.join_key = key.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = cli.apply(Config::from_env());
    init_tracing(&config);

    match execute(&cli, &config) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn execute(cli: &Cli, config: &Config) -> Result<RunReport> {
    let request = RunRequest {
        input: cli.input.clone(),
        output: cli.output.clone(),
        config: BatchConfig::new(&config.category_column, &config.join_key),
    };

    let report = run(&request)
        .with_context(|| format!("Failed to classify {}", cli.input.display()))?;

    if let Some(path) = &cli.summary {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
    }

    Ok(report)
}

fn print_summary(report: &RunReport) {
    print!("{:<18} {:>8}", "Category", "Records");
    for tier in Tier::ALL {
        print!(" {:>8}", format!("LOD {tier}"));
    }
    println!("  Status");

    for summary in &report.categories {
        print!("{:<18} {:>8}", summary.source, summary.records);
        for tier in Tier::ALL {
            print!(" {:>8}", summary.count(tier));
        }
        println!("  {}", summary.status);
    }

    println!();
    println!("Passthrough rows: {}", report.passthrough_rows);
    println!("Total rows:       {}", report.total_rows);
    println!("Output:           {}", report.output.display());
}
