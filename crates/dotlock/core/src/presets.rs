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

//! Ready-made example inputs

use std::fmt;
use std::str::FromStr;

use crate::banker::{AllocationState, StateSnapshot};
use crate::rag::ResourceAllocationGraph;

/// Named example inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Five processes, three resource types, safe
    Banker,
    /// Two processes each holding what the other requests
    Deadlock,
    /// One holder and one waiter, no cycle
    Safe,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Banker, Preset::Deadlock, Preset::Safe];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Banker => "banker",
            Preset::Deadlock => "deadlock",
            Preset::Safe => "safe",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL.into_iter().find(|p| p.name() == s).ok_or_else(|| format!("unknown preset '{s}' (expected banker, deadlock or safe)"))
    }
}

/// The classic 5x3 Banker's example
pub fn textbook_snapshot() -> StateSnapshot {
    StateSnapshot {
        allocation: vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
        max: vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
        available: vec![3, 3, 2],
    }
}

/// [`textbook_snapshot`] as a validated state
pub fn textbook_state() -> AllocationState {
    let StateSnapshot { allocation, max, available } = textbook_snapshot();
    match AllocationState::new(allocation, max, available) {
        Ok(state) => state,
        Err(err) => unreachable!("textbook example is well formed: {err}"),
    }
}

/// `R0 -> P0 -> R1 -> P1 -> R0`
pub fn deadlock_graph() -> ResourceAllocationGraph {
    let mut graph = ResourceAllocationGraph::new();
    let p0 = graph.add_process();
    let p1 = graph.add_process();
    let r0 = graph.add_resource();
    let r1 = graph.add_resource();
    for (from, to) in [(&r0, &p0), (&p0, &r1), (&r1, &p1), (&p1, &r0)] {
        let _ = graph.add_edge(from, to);
    }
    graph
}

/// `R0 -> P0`, `P1 -> R0`: P1 waits on P0, nothing waits on P1
pub fn safe_graph() -> ResourceAllocationGraph {
    let mut graph = ResourceAllocationGraph::new();
    let p0 = graph.add_process();
    let p1 = graph.add_process();
    let r0 = graph.add_resource();
    for (from, to) in [(&r0, &p0), (&p1, &r0)] {
        let _ = graph.add_edge(from, to);
    }
    graph
}
