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

//! Resource-allocation graph representation

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

/// Identifier of a graph node, e.g. `P0` or `R2`
pub type NodeId = String;

/// Kind of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Process,
    Resource,
}

/// Kind of a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Process -> Resource: the process wants the resource
    Request,
    /// Resource -> Process: the process holds the resource
    Assignment,
}

impl EdgeKind {
    /// Edge kind implied by the kinds of its endpoints, if any
    pub fn between(from: NodeKind, to: NodeKind) -> Option<Self> {
        match (from, to) {
            (NodeKind::Process, NodeKind::Resource) => Some(EdgeKind::Request),
            (NodeKind::Resource, NodeKind::Process) => Some(EdgeKind::Assignment),
            _ => None,
        }
    }
}

/// Node in a resource-allocation graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn process(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), kind: NodeKind::Process }
    }

    pub fn resource(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), kind: NodeKind::Resource }
    }
}

/// Directed, unweighted edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn request(process: impl Into<NodeId>, resource: impl Into<NodeId>) -> Self {
        Self {
            from: process.into(),
            to: resource.into(),
            kind: EdgeKind::Request,
        }
    }

    pub fn assignment(resource: impl Into<NodeId>, process: impl Into<NodeId>) -> Self {
        Self {
            from: resource.into(),
            to: process.into(),
            kind: EdgeKind::Assignment,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            EdgeKind::Request => "request",
            EdgeKind::Assignment => "assignment",
        };
        write!(f, "{} -> {} ({label})", self.from, self.to)
    }
}

/// Nodes and edges handed to the analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Editable resource-allocation graph.
///
/// Keeps the invariants the analyzer relies on: node ids are unique, every
/// edge joins a process and a resource in the direction its kind says, and
/// no `(from, to)` pair appears twice.
#[derive(Debug, Clone, Default)]
pub struct ResourceAllocationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    process_count: usize,
    resource_count: usize,
}

impl ResourceAllocationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next process, named `P<n>`
    pub fn add_process(&mut self) -> NodeId {
        let id = self.next_id('P', NodeKind::Process);
        self.nodes.push(Node::process(id.clone()));
        id
    }

    /// Add the next resource, named `R<n>`
    pub fn add_resource(&mut self) -> NodeId {
        let id = self.next_id('R', NodeKind::Resource);
        self.nodes.push(Node::resource(id.clone()));
        id
    }

    fn next_id(&mut self, prefix: char, kind: NodeKind) -> NodeId {
        loop {
            let counter = match kind {
                NodeKind::Process => &mut self.process_count,
                NodeKind::Resource => &mut self.resource_count,
            };
            let id = format!("{prefix}{counter}");
            *counter += 1;
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    /// Add a node with an explicit id
    pub fn add_node(&mut self, node: Node) -> AnalysisResult<()> {
        if self.node(&node.id).is_some() {
            return Err(AnalysisError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge, inferring its kind from the endpoint kinds.
    ///
    /// Returns `Ok(false)` when the `(from, to)` pair already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> AnalysisResult<bool> {
        let from_kind = self.node(from).ok_or_else(|| AnalysisError::UnknownNode(from.to_string()))?.kind;
        let to_kind = self.node(to).ok_or_else(|| AnalysisError::UnknownNode(to.to_string()))?.kind;

        let kind = EdgeKind::between(from_kind, to_kind).ok_or_else(|| AnalysisError::InvalidEdge {
            from: from.to_string(),
            to: to.to_string(),
            reason: "edges must join a process and a resource".to_string(),
        })?;

        if self.edges.iter().any(|e| e.from == from && e.to == to) {
            debug!(from, to, "Duplicate edge ignored");
            return Ok(false);
        }

        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        });
        Ok(true)
    }

    /// Remove a node and every edge touching it; returns whether it existed
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.from != id && e.to != id);
        self.nodes.len() != before
    }

    /// Remove one edge; returns whether it existed
    pub fn remove_edge(&mut self, from: &str, to: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| !(e.from == from && e.to == to));
        self.edges.len() != before
    }

    /// Remove everything and restart numbering
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Process ids in insertion order
    pub fn process_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Process).map(|n| n.id.clone()).collect()
    }

    /// Copy of the current nodes and edges
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuild a graph from a snapshot, validating every node and edge
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> AnalysisResult<Self> {
        let mut graph = Self::new();
        for node in &snapshot.nodes {
            graph.add_node(node.clone())?;
        }
        for edge in &snapshot.edges {
            graph.add_edge(&edge.from, &edge.to)?;
            let stored = graph.edges.iter().find(|e| e.from == edge.from && e.to == edge.to).map(|e| e.kind);
            if stored != Some(edge.kind) {
                return Err(AnalysisError::InvalidEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    reason: "edge kind does not match its endpoints".to_string(),
                });
            }
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids() {
        let mut graph = ResourceAllocationGraph::new();
        assert_eq!(graph.add_process(), "P0");
        assert_eq!(graph.add_process(), "P1");
        assert_eq!(graph.add_resource(), "R0");
        assert_eq!(graph.process_ids(), vec!["P0".to_string(), "P1".to_string()]);
    }

    #[test]
    fn test_generated_ids_skip_taken_names() {
        let mut graph = ResourceAllocationGraph::new();
        graph.add_node(Node::process("P0")).unwrap();
        assert_eq!(graph.add_process(), "P1");
    }

    #[test]
    fn test_edge_kind_is_inferred() {
        let mut graph = ResourceAllocationGraph::new();
        let p = graph.add_process();
        let r = graph.add_resource();

        assert!(graph.add_edge(&p, &r).unwrap());
        assert!(graph.add_edge(&r, &p).unwrap());
        assert_eq!(graph.edges()[0].kind, EdgeKind::Request);
        assert_eq!(graph.edges()[1].kind, EdgeKind::Assignment);
    }

    #[test]
    fn test_duplicate_edge_is_rejected_idempotently() {
        let mut graph = ResourceAllocationGraph::new();
        let p = graph.add_process();
        let r = graph.add_resource();

        assert!(graph.add_edge(&p, &r).unwrap());
        assert!(!graph.add_edge(&p, &r).unwrap());
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_invalid_edges() {
        let mut graph = ResourceAllocationGraph::new();
        let p0 = graph.add_process();
        let p1 = graph.add_process();

        assert!(matches!(graph.add_edge(&p0, &p1), Err(AnalysisError::InvalidEdge { .. })));
        assert_eq!(graph.add_edge(&p0, "R9").unwrap_err(), AnalysisError::UnknownNode("R9".to_string()));
        assert_eq!(graph.add_node(Node::process("P0")).unwrap_err(), AnalysisError::DuplicateNode("P0".to_string()));
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = ResourceAllocationGraph::new();
        let p = graph.add_process();
        let r = graph.add_resource();
        graph.add_edge(&p, &r).unwrap();

        assert!(graph.remove_node(&r));
        assert!(graph.edges().is_empty());
        assert!(!graph.remove_node(&r));
    }

    #[test]
    fn test_remove_edge_and_clear() {
        let mut graph = ResourceAllocationGraph::new();
        let p = graph.add_process();
        let r = graph.add_resource();
        graph.add_edge(&r, &p).unwrap();

        assert!(graph.remove_edge(&r, &p));
        assert!(!graph.remove_edge(&r, &p));

        graph.clear();
        assert!(graph.nodes().is_empty());
        assert_eq!(graph.add_process(), "P0");
    }

    #[test]
    fn test_snapshot_validation() {
        let mut snapshot = GraphSnapshot {
            nodes: vec![Node::process("P0"), Node::resource("R0")],
            edges: vec![Edge::request("P0", "R0")],
        };
        let graph = ResourceAllocationGraph::from_snapshot(&snapshot).unwrap();
        assert_eq!(graph.snapshot(), snapshot);

        snapshot.edges = vec![Edge {
            from: "P0".to_string(),
            to: "R0".to_string(),
            kind: EdgeKind::Assignment,
        }];
        assert!(matches!(ResourceAllocationGraph::from_snapshot(&snapshot), Err(AnalysisError::InvalidEdge { .. })));
    }
}
