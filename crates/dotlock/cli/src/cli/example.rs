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

//! `dotlock example`: print a ready-made input file

use anyhow::Result;
use clap::Args;
use dotlock_core::presets::{self, Preset};

use crate::cli::GraphFile;

#[derive(Args, Debug)]
pub struct ExampleArgs {
    /// Which example: banker, deadlock or safe
    pub preset: Preset,
}

/// JSON accepted by `safety`/`request` (banker) or `detect` (graphs)
pub fn run_example(args: &ExampleArgs) -> Result<String> {
    let content = match args.preset {
        Preset::Banker => serde_json::to_string_pretty(&presets::textbook_snapshot())?,
        Preset::Deadlock => serde_json::to_string_pretty(&GraphFile::from_graph(&presets::deadlock_graph()))?,
        Preset::Safe => serde_json::to_string_pretty(&GraphFile::from_graph(&presets::safe_graph()))?,
    };
    Ok(content)
}
