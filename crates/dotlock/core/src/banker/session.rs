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

//! Stateful wrapper that keeps an allocation state across requests

use tracing::debug;

use crate::banker::SafetyEngine;
use crate::banker::request::{RequestOutcome, arbitrate};
use crate::banker::safety::{SafetyReport, run_safety};
use crate::banker::state::AllocationState;
use crate::error::AnalysisResult;

/// Owns one allocation state and applies a series of requests to it.
///
/// Granted requests are committed in place; denied ones leave the state
/// untouched, so a session never exposes a tentative grant.
#[derive(Debug, Clone)]
pub struct BankerSession {
    engine: SafetyEngine,
    state: AllocationState,
    granted: usize,
    denied: usize,
}

impl BankerSession {
    /// Start a session from an initial state
    pub fn new(engine: SafetyEngine, state: AllocationState) -> AnalysisResult<Self> {
        engine.config().check_limits(state.processes(), state.resource_types())?;
        Ok(Self {
            engine,
            state,
            granted: 0,
            denied: 0,
        })
    }

    /// Current state
    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    /// Give the state back, ending the session
    pub fn into_state(self) -> AllocationState {
        self.state
    }

    /// Safety check of the current state
    pub fn check_safety(&self) -> AnalysisResult<SafetyReport> {
        run_safety(&self.state, self.engine.config().record_trace)
    }

    /// Arbitrate a request against the session state
    pub fn request(&mut self, process: usize, request: &[u32]) -> AnalysisResult<RequestOutcome> {
        let verdict = arbitrate(&mut self.state, process, request, self.engine.config().record_trace)?;
        if verdict.granted {
            self.granted += 1;
        } else {
            self.denied += 1;
        }
        debug!(granted = self.granted, denied = self.denied, "Session request processed");
        Ok(verdict.into_outcome(self.state.clone()))
    }

    /// Number of granted and denied requests so far
    pub fn counts(&self) -> (usize, usize) {
        (self.granted, self.denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banker::request::DenialReason;
    use crate::config::EngineConfig;
    use crate::presets;

    #[test]
    fn test_session_commits_and_rolls_back() {
        let mut session = BankerSession::new(SafetyEngine::default(), presets::textbook_state()).unwrap();
        let totals = session.state().totals().unwrap();

        let outcome = session.request(1, &[1, 0, 2]).unwrap();
        assert!(outcome.granted);
        assert_eq!(session.state().available(), &[2, 3, 0]);

        let before = session.state().clone();
        let outcome = session.request(4, &[3, 3, 0]).unwrap();
        assert_eq!(outcome.denial, Some(DenialReason::MustWait));
        assert_eq!(session.state(), &before);

        let outcome = session.request(0, &[0, 2, 0]).unwrap();
        assert_eq!(outcome.denial, Some(DenialReason::Unsafe));
        assert_eq!(session.state(), &before);

        assert_eq!(session.state().totals().unwrap(), totals);
        assert_eq!(session.counts(), (1, 2));
        assert!(session.check_safety().unwrap().safe);
    }

    #[test]
    fn test_session_respects_limits() {
        let engine = SafetyEngine::new(EngineConfig::new().with_max_processes(2));
        assert!(BankerSession::new(engine, presets::textbook_state()).is_err());
    }
}
