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

//! Wait-for graph derivation
//!
//! Collapses the bipartite request/assignment graph into a process-only graph
//! where `A -> B` means A requests a resource that B currently holds.

use std::collections::HashMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::rag::graph::{Edge, EdgeKind, Node, NodeId, NodeKind};
use crate::trace::{GraphStep, Trace};

/// Process-to-process wait relation derived from one graph snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitForGraph {
    /// Waiter -> holders, in edge order; every process has an entry
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    /// Process ids in node order
    processes: Vec<NodeId>,
    /// Steps recorded while building
    steps: Vec<GraphStep>,
}

impl WaitForGraph {
    pub fn adjacency(&self) -> &HashMap<NodeId, Vec<NodeId>> {
        &self.adjacency
    }

    pub fn processes(&self) -> &[NodeId] {
        &self.processes
    }

    pub fn steps(&self) -> &[GraphStep] {
        &self.steps
    }

    /// Holders `process` waits on
    pub fn waits_on(&self, process: &str) -> &[NodeId] {
        self.adjacency.get(process).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of wait-for edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).sum()
    }
}

/// Build the wait-for graph of `nodes` and `edges`.
///
/// Every edge must reference known nodes and agree with their kinds. A
/// requested resource with no holder adds nothing.
pub(crate) fn build(nodes: &[Node], edges: &[Edge], record_trace: bool) -> AnalysisResult<WaitForGraph> {
    let mut kinds: HashMap<&str, NodeKind> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if kinds.insert(node.id.as_str(), node.kind).is_some() {
            return Err(AnalysisError::DuplicateNode(node.id.clone()));
        }
    }

    // Resource -> holders, in edge order
    let mut holders: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        let from = *kinds.get(edge.from.as_str()).ok_or_else(|| AnalysisError::UnknownNode(edge.from.clone()))?;
        let to = *kinds.get(edge.to.as_str()).ok_or_else(|| AnalysisError::UnknownNode(edge.to.clone()))?;
        if EdgeKind::between(from, to) != Some(edge.kind) {
            return Err(AnalysisError::InvalidEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
                reason: "edge kind does not match its endpoints".to_string(),
            });
        }
        if edge.kind == EdgeKind::Assignment {
            holders.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
        }
    }

    let processes: Vec<NodeId> = nodes.iter().filter(|n| n.kind == NodeKind::Process).map(|n| n.id.clone()).collect();
    let mut adjacency: HashMap<NodeId, Vec<NodeId>> = processes.iter().map(|p| (p.clone(), Vec::new())).collect();

    let mut trace = Trace::new(record_trace);
    trace.record(|| GraphStep::BuildStarted);

    for edge in edges.iter().filter(|e| e.kind == EdgeKind::Request) {
        let Some(resource_holders) = holders.get(edge.to.as_str()) else {
            continue;
        };
        for &holder in resource_holders {
            if holder == edge.from {
                continue;
            }
            if let Some(waits) = adjacency.get_mut(&edge.from) {
                waits.push(holder.to_string());
            }
            trace.record(|| GraphStep::Waits {
                waiter: edge.from.clone(),
                holder: holder.to_string(),
                resource: edge.to.clone(),
            });
        }
    }

    Ok(WaitForGraph {
        adjacency,
        processes,
        steps: trace.into_steps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<NodeId> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_request_on_held_resource_creates_wait() {
        let nodes = vec![Node::process("P0"), Node::process("P1"), Node::resource("R0")];
        let edges = vec![Edge::assignment("R0", "P1"), Edge::request("P0", "R0")];

        let graph = build(&nodes, &edges, true).unwrap();
        assert_eq!(graph.waits_on("P0"), ids(&["P1"]).as_slice());
        assert!(graph.waits_on("P1").is_empty());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.processes(), ids(&["P0", "P1"]).as_slice());
        assert!(graph.steps().contains(&GraphStep::Waits {
            waiter: "P0".to_string(),
            holder: "P1".to_string(),
            resource: "R0".to_string(),
        }));
    }

    #[test]
    fn test_unheld_resource_adds_nothing() {
        let nodes = vec![Node::process("P0"), Node::resource("R0")];
        let edges = vec![Edge::request("P0", "R0")];

        let graph = build(&nodes, &edges, true).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.adjacency().contains_key("P0"));
    }

    #[test]
    fn test_each_holder_gets_an_edge_and_self_is_skipped() {
        let nodes = vec![Node::process("P0"), Node::process("P1"), Node::process("P2"), Node::resource("R0")];
        let edges = vec![
            Edge::assignment("R0", "P0"),
            Edge::assignment("R0", "P1"),
            Edge::assignment("R0", "P2"),
            Edge::request("P0", "R0"),
        ];

        let graph = build(&nodes, &edges, false).unwrap();
        assert_eq!(graph.waits_on("P0"), ids(&["P1", "P2"]).as_slice());
        assert!(graph.steps().is_empty());
    }

    #[test]
    fn test_unknown_node_fails_fast() {
        let nodes = vec![Node::process("P0")];
        let edges = vec![Edge::request("P0", "R7")];
        assert_eq!(build(&nodes, &edges, true).unwrap_err(), AnalysisError::UnknownNode("R7".to_string()));
    }

    #[test]
    fn test_mismatched_kind_fails_fast() {
        let nodes = vec![Node::process("P0"), Node::resource("R0")];
        let edges = vec![Edge {
            from: "P0".to_string(),
            to: "R0".to_string(),
            kind: EdgeKind::Assignment,
        }];
        assert!(matches!(build(&nodes, &edges, true), Err(AnalysisError::InvalidEdge { .. })));
    }

    #[test]
    fn test_duplicate_node_fails_fast() {
        let nodes = vec![Node::process("P0"), Node::resource("P0")];
        assert_eq!(build(&nodes, &[], true).unwrap_err(), AnalysisError::DuplicateNode("P0".to_string()));
    }
}
