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

//! Cycle detection over the wait-for graph

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, AnalysisResult};
use crate::rag::graph::NodeId;
use crate::trace::{GraphStep, Trace};

/// Outcome of a deadlock check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlockReport {
    pub has_deadlock: bool,
    /// Closed walk `[A, B, ..., A]` in wait order, empty without deadlock
    pub cycle: Vec<NodeId>,
    pub steps: Vec<GraphStep>,
}

impl DeadlockReport {
    /// Distinct processes on the cycle
    pub fn deadlocked_processes(&self) -> &[NodeId] {
        match self.cycle.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Check if a process is part of the reported cycle
    pub fn contains_process(&self, process: &str) -> bool {
        self.cycle.iter().any(|p| p == process)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search for the first cycle, in `processes` order.
///
/// Uses an explicit stack whose depth never exceeds the process count.
pub(crate) fn find_cycle(adjacency: &HashMap<NodeId, Vec<NodeId>>, processes: &[NodeId], record_trace: bool) -> AnalysisResult<DeadlockReport> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(processes.len());
    for (i, process) in processes.iter().enumerate() {
        if index.insert(process.as_str(), i).is_some() {
            return Err(AnalysisError::DuplicateNode(process.clone()));
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); processes.len()];
    for (waiter, holders) in adjacency {
        let &u = index.get(waiter.as_str()).ok_or_else(|| AnalysisError::UnknownNode(waiter.clone()))?;
        for holder in holders {
            let &v = index.get(holder.as_str()).ok_or_else(|| AnalysisError::UnknownNode(holder.clone()))?;
            successors[u].push(v);
        }
    }

    let mut trace = Trace::new(record_trace);
    trace.record(|| GraphStep::SearchStarted);

    let mut color = vec![Color::Unvisited; processes.len()];
    let mut parent: Vec<Option<usize>> = vec![None; processes.len()];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(processes.len());

    for root in 0..processes.len() {
        if color[root] != Color::Unvisited {
            continue;
        }
        color[root] = Color::InProgress;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let u = frame.0;
            let Some(&v) = successors[u].get(frame.1) else {
                color[u] = Color::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match color[v] {
                Color::InProgress => {
                    trace.record(|| GraphStep::BackEdge {
                        from: processes[u].clone(),
                        to: processes[v].clone(),
                    });
                    let cycle: Vec<NodeId> = walk_back(&parent, u, v).into_iter().map(|i| processes[i].clone()).collect();
                    warn!(cycle = ?cycle, "Deadlock detected");
                    trace.record(|| GraphStep::DeadlockFound { cycle: cycle.clone() });
                    return Ok(DeadlockReport {
                        has_deadlock: true,
                        cycle,
                        steps: trace.into_steps(),
                    });
                }
                Color::Unvisited => {
                    parent[v] = Some(u);
                    color[v] = Color::InProgress;
                    stack.push((v, 0));
                }
                Color::Done => {}
            }
        }
    }

    debug!(processes = processes.len(), "No cycle in wait-for graph");
    trace.record(|| GraphStep::NoDeadlock);
    Ok(DeadlockReport {
        has_deadlock: false,
        cycle: Vec::new(),
        steps: trace.into_steps(),
    })
}

/// Rebuild the cycle closed by back edge `u -> v` as `[v, ..., u, v]`
fn walk_back(parent: &[Option<usize>], u: usize, v: usize) -> Vec<usize> {
    let mut cycle = vec![v];
    let mut current = u;
    while current != v {
        cycle.push(current);
        match parent[current] {
            Some(p) => current = p,
            None => break,
        }
    }
    cycle.push(v);
    cycle.reverse();
    cycle
}
