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

//! Deadlock detection on resource-allocation graphs
//!
//! A resource-allocation graph has process and resource nodes joined by
//! request edges (process -> resource) and assignment edges
//! (resource -> process). The analyzer collapses it into a wait-for graph
//! and looks for a cycle. With single-instance resources a cycle is both
//! necessary and sufficient for deadlock.

pub mod cycle;
pub mod graph;
pub mod wait_for;

use std::collections::HashMap;

use tracing::info;

use crate::config::EngineConfig;
use crate::error::AnalysisResult;

pub use cycle::DeadlockReport;
pub use graph::{Edge, EdgeKind, GraphSnapshot, Node, NodeId, NodeKind, ResourceAllocationGraph};
pub use wait_for::WaitForGraph;

/// Wait-for graph construction and cycle detection
#[derive(Debug, Clone, Default)]
pub struct WaitForGraphAnalyzer {
    config: EngineConfig,
}

impl WaitForGraphAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derive the process-only wait-for graph from request/assignment edges
    pub fn build_wait_for_graph(&self, nodes: &[Node], edges: &[Edge]) -> AnalysisResult<WaitForGraph> {
        let processes = nodes.iter().filter(|n| n.kind == NodeKind::Process).count();
        self.config.check_limits(processes, nodes.len() - processes)?;
        wait_for::build(nodes, edges, self.config.record_trace)
    }

    /// Search `adjacency` for a cycle, visiting roots in `process_ids` order
    pub fn detect_cycle(&self, adjacency: &HashMap<NodeId, Vec<NodeId>>, process_ids: &[NodeId]) -> AnalysisResult<DeadlockReport> {
        self.config.check_limits(process_ids.len(), 0)?;
        let report = cycle::find_cycle(adjacency, process_ids, self.config.record_trace)?;
        info!(processes = process_ids.len(), deadlock = report.has_deadlock, "Cycle detection completed");
        Ok(report)
    }

    /// Build the wait-for graph of `graph` and check it for deadlock.
    ///
    /// The report's steps cover both phases.
    pub fn analyze(&self, graph: &ResourceAllocationGraph) -> AnalysisResult<DeadlockReport> {
        self.analyze_parts(graph.nodes(), graph.edges())
    }

    /// Same as [`WaitForGraphAnalyzer::analyze`] for a raw snapshot
    pub fn analyze_snapshot(&self, snapshot: &GraphSnapshot) -> AnalysisResult<DeadlockReport> {
        self.analyze_parts(&snapshot.nodes, &snapshot.edges)
    }

    fn analyze_parts(&self, nodes: &[Node], edges: &[Edge]) -> AnalysisResult<DeadlockReport> {
        let wait_for = self.build_wait_for_graph(nodes, edges)?;
        let mut report = self.detect_cycle(wait_for.adjacency(), wait_for.processes())?;

        let mut steps = wait_for.steps().to_vec();
        steps.append(&mut report.steps);
        report.steps = steps;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::trace::GraphStep;

    #[test]
    fn test_analyze_combines_both_phases() {
        let mut graph = ResourceAllocationGraph::new();
        let p0 = graph.add_process();
        let p1 = graph.add_process();
        let r0 = graph.add_resource();
        let r1 = graph.add_resource();
        graph.add_edge(&r0, &p0).unwrap();
        graph.add_edge(&p0, &r1).unwrap();
        graph.add_edge(&r1, &p1).unwrap();
        graph.add_edge(&p1, &r0).unwrap();

        let report = WaitForGraphAnalyzer::default().analyze(&graph).unwrap();
        assert!(report.has_deadlock);
        assert_eq!(report.steps.first(), Some(&GraphStep::BuildStarted));
        assert!(report.steps.contains(&GraphStep::SearchStarted));
        assert!(matches!(report.steps.last(), Some(GraphStep::DeadlockFound { .. })));
    }

    #[test]
    fn test_limits_apply_to_graphs() {
        let analyzer = WaitForGraphAnalyzer::new(EngineConfig::new().with_max_processes(1));
        let nodes = vec![Node::process("P0"), Node::process("P1")];
        assert!(matches!(analyzer.build_wait_for_graph(&nodes, &[]), Err(AnalysisError::LimitExceeded { .. })));
    }

    #[test]
    fn test_empty_graph_has_no_deadlock() {
        let report = WaitForGraphAnalyzer::default().analyze(&ResourceAllocationGraph::new()).unwrap();
        assert!(!report.has_deadlock);
        assert!(report.cycle.is_empty());
    }
}
