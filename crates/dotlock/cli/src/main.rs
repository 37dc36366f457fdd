// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! DotLock CLI Tool
//!
//! Command-line interface for the Banker's safety engine and the wait-for
//! graph deadlock detector.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotlock_cli::{DetectArgs, DotlockConfig, ExampleArgs, OutputFormat, RequestArgs, SafetyArgs, run_detect, run_example, run_request, run_safety};
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "dotlock")]
#[command(about = "DotLock - Deadlock avoidance and detection")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $DOTLOCK_CONFIG, then the user config directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Omit the step trace from text output
    #[arg(long, global = true)]
    no_trace: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an allocation state is safe
    Safety(SafetyArgs),
    /// Arbitrate a resource request with the Banker's algorithm
    Request(RequestArgs),
    /// Detect a deadlock in a resource-allocation graph
    Detect(DetectArgs),
    /// Print an example input file
    Example(ExampleArgs),
    /// Print the resolved configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match run(cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let mut config = DotlockConfig::resolve_config(cli.config)?;
    if cli.json {
        config.output.format = OutputFormat::Json;
    }
    if cli.no_trace {
        config.output.show_trace = false;
    }
    debug!(?config, "Resolved configuration");

    let mut output = match cli.command {
        Commands::Safety(args) => run_safety(&args, &config)?,
        Commands::Request(args) => run_request(&args, &config)?,
        Commands::Detect(args) => run_detect(&args, &config)?,
        Commands::Example(args) => run_example(&args)?,
        Commands::Config => match config.output.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config)?,
            OutputFormat::Text => toml::to_string_pretty(&config)?,
        },
    };
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}
