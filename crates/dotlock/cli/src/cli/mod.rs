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

//! Subcommand implementations and the file formats they read

pub mod detect;
pub mod example;
pub mod request;
pub mod safety;

use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use dotlock_core::{AllocationState, Node, NodeId, ResourceAllocationGraph, StateSnapshot};
use serde::{Deserialize, Serialize};

/// Edge as written in a graph file; the kind follows from the endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: NodeId,
    pub to: NodeId,
}

/// On-disk resource-allocation graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeSpec>,
}

impl GraphFile {
    pub fn from_graph(graph: &ResourceAllocationGraph) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            edges: graph
                .edges()
                .iter()
                .map(|e| EdgeSpec {
                    from: e.from.clone(),
                    to: e.to.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild the graph, rejecting duplicate nodes and ill-typed edges
    pub fn into_graph(self) -> Result<ResourceAllocationGraph> {
        let mut graph = ResourceAllocationGraph::new();
        for node in self.nodes {
            graph.add_node(node)?;
        }
        for edge in &self.edges {
            graph
                .add_edge(&edge.from, &edge.to)
                .with_context(|| format!("invalid edge {} -> {}", edge.from, edge.to))?;
        }
        Ok(graph)
    }
}

pub fn load_state(path: &Path) -> Result<AllocationState> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read state file {}", path.display()))?;
    let snapshot: StateSnapshot = serde_json::from_str(&content).with_context(|| format!("failed to parse state file {}", path.display()))?;
    Ok(AllocationState::from_snapshot(snapshot)?)
}

pub fn save_state(path: &Path, state: &AllocationState) -> Result<()> {
    let content = serde_json::to_string_pretty(&state.to_snapshot())?;
    std::fs::write(path, content).with_context(|| format!("failed to write state file {}", path.display()))?;
    Ok(())
}

pub fn load_graph(path: &Path) -> Result<ResourceAllocationGraph> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read graph file {}", path.display()))?;
    let file: GraphFile = serde_json::from_str(&content).with_context(|| format!("failed to parse graph file {}", path.display()))?;
    file.into_graph()
}

/// Numbered trace lines followed by a blank line
pub(crate) fn render_steps<T: Display>(steps: &[T]) -> String {
    if steps.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("{:>3}. {step}\n", i + 1));
    }
    out.push('\n');
    out
}

pub(crate) fn process_list(processes: &[usize]) -> String {
    processes.iter().map(|p| format!("P{p}")).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotlock_core::presets;
    use tempfile::TempDir;

    #[test]
    fn test_graph_file_roundtrip() {
        let graph = presets::deadlock_graph();
        let file = GraphFile::from_graph(&graph);
        assert_eq!(file.edges.len(), 4);

        let rebuilt = file.into_graph().unwrap();
        assert_eq!(rebuilt.snapshot(), graph.snapshot());
    }

    #[test]
    fn test_graph_file_rejects_bad_edge() {
        let file = GraphFile {
            nodes: vec![Node::process("P0"), Node::process("P1")],
            edges: vec![EdgeSpec {
                from: "P0".into(),
                to: "P1".into(),
            }],
        };
        assert!(file.into_graph().is_err());
    }

    #[test]
    fn test_state_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let state = presets::textbook_state();

        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);
    }

    #[test]
    fn test_malformed_state_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"allocation": [[1]], "max": [[0]], "available": [0]}"#).unwrap();
        assert!(load_state(&path).is_err());
    }
}
