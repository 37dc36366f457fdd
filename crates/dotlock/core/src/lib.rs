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

//! DotLock deadlock analysis engines
//!
//! Two independent engines over the classic deadlock model:
//!
//! - [`SafetyEngine`] runs the Banker's safety algorithm and arbitrates
//!   resource requests against allocation, max and available matrices.
//! - [`WaitForGraphAnalyzer`] derives a wait-for graph from a
//!   resource-allocation graph and detects cycles.
//!
//! Both are pure functions of their input. Results carry structured step
//! traces (see [`trace`]) that front ends format for display.

pub mod banker;
pub mod config;
pub mod error;
pub mod presets;
pub mod rag;
pub mod trace;

pub use banker::{AllocationState, BankerSession, DenialReason, RequestOutcome, SafetyEngine, SafetyReport, StateSnapshot};
pub use config::EngineConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use rag::{DeadlockReport, Edge, EdgeKind, GraphSnapshot, Node, NodeId, NodeKind, ResourceAllocationGraph, WaitForGraph, WaitForGraphAnalyzer};
pub use trace::{GraphStep, RequestStep, SafetyStep};
