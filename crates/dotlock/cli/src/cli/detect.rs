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

//! `dotlock detect`: look for a deadlock in a resource-allocation graph file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dotlock_core::{DeadlockReport, WaitForGraphAnalyzer};
use tracing::info;

use crate::cli::{load_graph, render_steps};
use crate::config::{DotlockConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Graph file (JSON with nodes and edges)
    pub graph: PathBuf,
}

pub fn run_detect(args: &DetectArgs, config: &DotlockConfig) -> Result<String> {
    let graph = load_graph(&args.graph)?;
    info!(nodes = graph.nodes().len(), edges = graph.edges().len(), "Analyzing graph {}", args.graph.display());

    let report = WaitForGraphAnalyzer::new(config.engine.clone()).analyze(&graph)?;
    match config.output.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => Ok(render_detect(&report, config.output.show_trace)),
    }
}

pub fn render_detect(report: &DeadlockReport, show_trace: bool) -> String {
    let mut out = if show_trace { render_steps(&report.steps) } else { String::new() };
    if report.has_deadlock {
        out.push_str(&format!("DEADLOCK: {}\n", report.cycle.join(" -> ")));
    } else {
        out.push_str("NO DEADLOCK\n");
    }
    out
}
