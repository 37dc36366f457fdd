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

//! Deadlock avoidance with the Banker's algorithm
//!
//! ## Components
//!
//! ### Allocation State (`state`)
//! - Holds `allocation`, `max` and `available` and derives `need = max - allocation`
//! - Rejects ill-formed input (empty system, ragged rows, negative need) up front
//! - Saves and restores the pre-image of a tentative grant
//!
//! ### Safety Algorithm (`safety`)
//! - Sweeps processes in index order, finishing every process whose need fits in `work`
//! - Stops at the first sweep without progress and reports the stuck set
//!
//! ### Request Arbitration (`request`)
//! - Claim check, availability check, tentative grant, safety check, commit or rollback
//! - Denials are outcomes, not errors
//!
//! ### Session (`session`)
//! - Keeps one state across a series of requests
//!
//! Every call works on its own copy of the matrices; the engine keeps nothing
//! between calls.

pub mod request;
pub mod safety;
pub mod session;
pub mod state;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::AnalysisResult;

pub use request::{DenialReason, RequestOutcome};
pub use safety::SafetyReport;
pub use session::BankerSession;
pub use state::{AllocationState, StateSnapshot};

/// Banker's algorithm engine: safety checks and request arbitration
#[derive(Debug, Clone, Default)]
pub struct SafetyEngine {
    config: EngineConfig,
}

impl SafetyEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide whether a safe completion order exists for the given matrices
    pub fn check_safety(&self, allocation: &[Vec<u32>], max: &[Vec<u32>], available: &[u32]) -> AnalysisResult<SafetyReport> {
        let state = self.load(allocation, max, available)?;
        self.check_state(&state)
    }

    /// Safety check of an already validated state
    pub fn check_state(&self, state: &AllocationState) -> AnalysisResult<SafetyReport> {
        self.config.check_limits(state.processes(), state.resource_types())?;
        let report = safety::run_safety(state, self.config.record_trace)?;
        info!(processes = state.processes(), safe = report.safe, "Safety check completed");
        Ok(report)
    }

    /// Arbitrate one request against the given matrices.
    ///
    /// The returned outcome carries the resulting state: the committed grant,
    /// or a state equal to the input when the request is denied.
    pub fn request_resources(&self, process: usize, request: &[u32], allocation: &[Vec<u32>], max: &[Vec<u32>], available: &[u32]) -> AnalysisResult<RequestOutcome> {
        let state = self.load(allocation, max, available)?;
        self.request_state(&state, process, request)
    }

    /// Arbitrate one request against an already validated state
    pub fn request_state(&self, state: &AllocationState, process: usize, request: &[u32]) -> AnalysisResult<RequestOutcome> {
        self.config.check_limits(state.processes(), state.resource_types())?;
        let mut working = state.clone();
        let verdict = request::arbitrate(&mut working, process, request, self.config.record_trace)?;
        debug!(process, granted = verdict.granted, "Request arbitrated");
        Ok(verdict.into_outcome(working))
    }

    fn load(&self, allocation: &[Vec<u32>], max: &[Vec<u32>], available: &[u32]) -> AnalysisResult<AllocationState> {
        self.config.check_limits(allocation.len(), available.len())?;
        AllocationState::new(allocation.to_vec(), max.to_vec(), available.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::presets;

    #[test]
    fn test_check_safety_from_matrices() {
        let snapshot = presets::textbook_snapshot();
        let engine = SafetyEngine::default();
        let report = engine.check_safety(&snapshot.allocation, &snapshot.max, &snapshot.available).unwrap();
        assert!(report.safe);
        assert_eq!(report.sequence, vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_negative_need_is_an_error_not_unsafe() {
        let engine = SafetyEngine::default();
        let result = engine.check_safety(&[vec![3]], &[vec![2]], &[1]);
        assert!(matches!(result, Err(AnalysisError::NegativeNeed { .. })));
    }

    #[test]
    fn test_limits_are_enforced() {
        let engine = SafetyEngine::new(EngineConfig::new().with_max_resource_types(2));
        let snapshot = presets::textbook_snapshot();
        let result = engine.check_safety(&snapshot.allocation, &snapshot.max, &snapshot.available);
        assert!(matches!(result, Err(AnalysisError::LimitExceeded { limit: 2, found: 3, .. })));
    }

    #[test]
    fn test_request_state_leaves_input_alone() {
        let engine = SafetyEngine::default();
        let state = presets::textbook_state();
        let outcome = engine.request_state(&state, 0, &[0, 2, 0]).unwrap();
        assert!(outcome.granted);
        assert_eq!(outcome.state.allocation()[0], vec![0, 3, 0]);
        assert_eq!(state.allocation()[0], vec![0, 1, 0]);
    }
}
