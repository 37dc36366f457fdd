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

//! `dotlock request`: arbitrate one resource request against a state file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use dotlock_core::{BankerSession, RequestOutcome, SafetyEngine, trace::format_vector};
use tracing::info;

use crate::cli::{load_state, render_steps, save_state};
use crate::config::{DotlockConfig, OutputFormat};

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// State file (JSON with allocation, max and available)
    pub state: PathBuf,

    /// Requesting process index
    #[arg(short, long)]
    pub pid: usize,

    /// Requested instances per resource type, e.g. 1,0,2
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub request: Vec<u32>,

    /// Write the new state back to the state file when the request is granted
    #[arg(long)]
    pub commit: bool,
}

pub fn run_request(args: &RequestArgs, config: &DotlockConfig) -> Result<String> {
    let state = load_state(&args.state)?;
    let mut session = BankerSession::new(SafetyEngine::new(config.engine.clone()), state)?;
    let outcome = session.request(args.pid, &args.request)?;

    if outcome.granted && args.commit {
        save_state(&args.state, session.state())?;
        info!("Committed new state to {}", args.state.display());
    }

    match config.output.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => Ok(render_request(args.pid, &outcome, config.output.show_trace)),
    }
}

pub fn render_request(process: usize, outcome: &RequestOutcome, show_trace: bool) -> String {
    let mut out = if show_trace { render_steps(&outcome.steps) } else { String::new() };
    match outcome.denial {
        None => {
            out.push_str(&format!("GRANTED: P{process}\n"));
            out.push_str(&format!("available: {}\n", format_vector(outcome.state.available())));
        }
        Some(reason) => out.push_str(&format!("DENIED: P{process}, {reason}\n")),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotlock_core::presets;
    use tempfile::TempDir;

    fn args(dir: &TempDir, pid: usize, request: Vec<u32>, commit: bool) -> RequestArgs {
        let path = dir.path().join("state.json");
        if !path.exists() {
            save_state(&path, &presets::textbook_state()).unwrap();
        }
        RequestArgs { state: path, pid, request, commit }
    }

    fn quiet_config() -> DotlockConfig {
        let mut config = DotlockConfig::default();
        config.output.show_trace = false;
        config
    }

    #[test]
    fn test_granted_request_without_commit_leaves_file() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, 1, vec![1, 0, 2], false);

        let text = run_request(&args, &quiet_config()).unwrap();
        assert_eq!(text, "GRANTED: P1\navailable: [2, 3, 0]\n");
        assert_eq!(load_state(&args.state).unwrap(), presets::textbook_state());
    }

    #[test]
    fn test_commit_writes_granted_state() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, 1, vec![1, 0, 2], true);

        run_request(&args, &quiet_config()).unwrap();
        assert_eq!(load_state(&args.state).unwrap().available(), &[2, 3, 0]);
    }

    #[test]
    fn test_denied_request_is_never_committed() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, 3, vec![1, 0, 0], true);

        let text = run_request(&args, &quiet_config()).unwrap();
        assert_eq!(text, "DENIED: P3, request exceeds maximum claim\n");
        assert_eq!(load_state(&args.state).unwrap(), presets::textbook_state());
    }

    #[test]
    fn test_bad_process_is_an_error() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, 9, vec![0, 0, 0], false);
        assert!(run_request(&args, &quiet_config()).is_err());
    }

    #[test]
    fn test_json_output() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, 0, vec![0, 2, 0], false);
        let mut config = quiet_config();
        config.output.format = OutputFormat::Json;

        let json: serde_json::Value = serde_json::from_str(&run_request(&args, &config).unwrap()).unwrap();
        assert_eq!(json["granted"], true);
        assert_eq!(json["state"]["available"], serde_json::json!([3, 1, 2]));
    }
}
