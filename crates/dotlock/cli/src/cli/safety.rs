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

//! `dotlock safety`: run the Banker's safety algorithm on a state file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dotlock_core::{SafetyEngine, SafetyReport};
use tracing::info;

use crate::cli::{load_state, process_list, render_steps};
use crate::config::{DotlockConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct SafetyArgs {
    /// State file (JSON with allocation, max and available)
    pub state: PathBuf,
}

pub fn run_safety(args: &SafetyArgs, config: &DotlockConfig) -> Result<String> {
    let state = load_state(&args.state)?;
    info!(processes = state.processes(), resource_types = state.resource_types(), "Checking state {}", args.state.display());

    let report = SafetyEngine::new(config.engine.clone()).check_state(&state)?;
    match config.output.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => Ok(render_safety(&report, config.output.show_trace)),
    }
}

pub fn render_safety(report: &SafetyReport, show_trace: bool) -> String {
    let mut out = if show_trace { render_steps(&report.steps) } else { String::new() };
    if report.safe {
        let order: Vec<String> = report.sequence.iter().map(|p| format!("P{p}")).collect();
        out.push_str(&format!("SAFE: {}\n", order.join(" -> ")));
    } else {
        out.push_str(&format!("UNSAFE: {} cannot finish\n", process_list(&report.unfinished)));
    }
    out
}
