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

//! Structured step traces
//!
//! Engines record what they did as typed step records rather than text. The
//! `Display` implementations here are the presentation layer: front ends that
//! want human-readable lines format the records, tests match on the variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the Banker's safety algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SafetyStep {
    /// Work and finish vectors before the first sweep
    Initialize { work: Vec<u32>, finish: Vec<bool> },
    /// `need[process] <= work` was evaluated
    Compare { process: usize, need: Vec<u32>, work: Vec<u32>, satisfied: bool },
    /// Process finished and released its allocation; `work` is the new value
    Release { process: usize, work: Vec<u32> },
    /// A full sweep made no progress
    Stuck { unfinished: Vec<usize> },
    /// Every process finished
    Safe { sequence: Vec<usize> },
    /// Verdict for a state with no safe sequence
    Unsafe,
}

/// One step of request arbitration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestStep {
    Received { process: usize, request: Vec<u32> },
    ExceedsClaim { process: usize, resource: usize, requested: u32, need: u32 },
    WithinClaim,
    MustWait { process: usize, resource: usize, requested: u32, available: u32 },
    WithinAvailable,
    /// State after the tentative grant
    Tentative { process: usize, available: Vec<u32>, allocation: Vec<u32>, need: Vec<u32> },
    SafetyChecked { safe: bool },
    Granted { process: usize },
    RolledBack { process: usize },
}

/// One step of wait-for construction or cycle search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphStep {
    BuildStarted,
    /// `waiter` requests `resource`, which `holder` currently holds
    Waits { waiter: String, holder: String, resource: String },
    SearchStarted,
    BackEdge { from: String, to: String },
    DeadlockFound { cycle: Vec<String> },
    NoDeadlock,
}

/// Format a resource vector as `[a, b, c]`
pub fn format_vector(values: &[u32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn format_processes(processes: &[usize]) -> String {
    processes.iter().map(|p| format!("P{p}")).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for SafetyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SafetyStep::Initialize { work, finish } => {
                let flags: Vec<&str> = finish.iter().map(|done| if *done { "T" } else { "F" }).collect();
                write!(f, "Initialize: Work = {}, Finish = [{}]", format_vector(work), flags.join(", "))
            }
            SafetyStep::Compare { process, need, work, satisfied } => {
                if *satisfied {
                    write!(f, "P{process}: Need {} <= Work {} -> can execute", format_vector(need), format_vector(work))
                } else {
                    write!(f, "P{process}: Need {} > Work {} -> must wait", format_vector(need), format_vector(work))
                }
            }
            SafetyStep::Release { process, work } => write!(f, "  P{process} releases its resources. Work = {}, Finish P{process} = T", format_vector(work)),
            SafetyStep::Stuck { unfinished } => write!(f, "No process can proceed. Stuck: {}", format_processes(unfinished)),
            SafetyStep::Safe { sequence } => {
                let order = sequence.iter().map(|p| format!("P{p}")).collect::<Vec<_>>().join(" -> ");
                write!(f, "System is in a SAFE state. Safe sequence: < {order} >")
            }
            SafetyStep::Unsafe => write!(f, "System is in an UNSAFE state (potential deadlock)"),
        }
    }
}

impl fmt::Display for RequestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStep::Received { process, request } => write!(f, "P{process} requests {}", format_vector(request)),
            RequestStep::ExceedsClaim { process, resource, requested, need } => {
                write!(f, "Request[{resource}] = {requested} > Need[{resource}] = {need}. P{process} exceeded its maximum claim")
            }
            RequestStep::WithinClaim => write!(f, "Step 1: Request <= Need"),
            RequestStep::MustWait { process, resource, requested, available } => {
                write!(f, "Request[{resource}] = {requested} > Available[{resource}] = {available}. P{process} must wait")
            }
            RequestStep::WithinAvailable => write!(f, "Step 2: Request <= Available"),
            RequestStep::Tentative { process, available, allocation, need } => write!(
                f,
                "Step 3: Pretend to allocate. Available = {}, Allocation[P{process}] = {}, Need[P{process}] = {}",
                format_vector(available),
                format_vector(allocation),
                format_vector(need)
            ),
            RequestStep::SafetyChecked { safe } => write!(f, "Step 4: Safety check -> {}", if *safe { "safe" } else { "unsafe" }),
            RequestStep::Granted { process } => write!(f, "Request of P{process} GRANTED. System remains safe"),
            RequestStep::RolledBack { process } => write!(f, "Request of P{process} DENIED. Would cause an unsafe state, rolled back"),
        }
    }
}

impl fmt::Display for GraphStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphStep::BuildStarted => write!(f, "Building wait-for graph"),
            GraphStep::Waits { waiter, holder, resource } => write!(f, "  {waiter} waits for {holder} (holder of {resource})"),
            GraphStep::SearchStarted => write!(f, "Running DFS cycle detection"),
            GraphStep::BackEdge { from, to } => write!(f, "  Back edge found: {from} -> {to}"),
            GraphStep::DeadlockFound { cycle } => write!(f, "DEADLOCK DETECTED! Cycle: {}", cycle.join(" -> ")),
            GraphStep::NoDeadlock => write!(f, "No deadlock detected"),
        }
    }
}

/// Collects steps when tracing is enabled, drops them otherwise
#[derive(Debug)]
pub(crate) struct Trace<T> {
    enabled: bool,
    steps: Vec<T>,
}

impl<T> Trace<T> {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, steps: Vec::new() }
    }

    /// Record a step; the closure only runs when tracing is on
    pub(crate) fn record(&mut self, step: impl FnOnce() -> T) {
        if self.enabled {
            self.steps.push(step());
        }
    }

    pub(crate) fn into_steps(self) -> Vec<T> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vector() {
        assert_eq!(format_vector(&[3, 3, 2]), "[3, 3, 2]");
        assert_eq!(format_vector(&[]), "[]");
    }

    #[test]
    fn test_safety_step_display() {
        let step = SafetyStep::Compare {
            process: 1,
            need: vec![1, 2, 2],
            work: vec![3, 3, 2],
            satisfied: true,
        };
        assert_eq!(step.to_string(), "P1: Need [1, 2, 2] <= Work [3, 3, 2] -> can execute");

        let safe = SafetyStep::Safe { sequence: vec![1, 3, 0] };
        assert!(safe.to_string().ends_with("< P1 -> P3 -> P0 >"));

        let stuck = SafetyStep::Stuck { unfinished: vec![0, 2] };
        assert!(stuck.to_string().contains("P0, P2"));
    }

    #[test]
    fn test_graph_step_display() {
        let step = GraphStep::DeadlockFound {
            cycle: vec!["P0".to_string(), "P1".to_string(), "P0".to_string()],
        };
        assert_eq!(step.to_string(), "DEADLOCK DETECTED! Cycle: P0 -> P1 -> P0");
    }

    #[test]
    fn test_steps_serialize_with_kind_tag() {
        let step = RequestStep::Granted { process: 2 };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["kind"], "granted");
        assert_eq!(json["process"], 2);
    }

    #[test]
    fn test_disabled_trace_drops_steps() {
        let mut trace: Trace<GraphStep> = Trace::new(false);
        trace.record(|| GraphStep::BuildStarted);
        assert!(trace.into_steps().is_empty());

        let mut trace: Trace<GraphStep> = Trace::new(true);
        trace.record(|| GraphStep::BuildStarted);
        assert_eq!(trace.into_steps(), vec![GraphStep::BuildStarted]);
    }
}
