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

//! Resource request arbitration

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::banker::safety::{SafetyReport, run_safety};
use crate::banker::state::{AllocationState, first_exceeding};
use crate::error::AnalysisResult;
use crate::trace::{RequestStep, Trace};

/// Why a request was not granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The request is larger than the process's remaining claim
    ExceedsClaim,
    /// Not enough instances are available right now
    MustWait,
    /// Granting would leave the system without a safe sequence
    Unsafe,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::ExceedsClaim => write!(f, "request exceeds maximum claim"),
            DenialReason::MustWait => write!(f, "process must wait"),
            DenialReason::Unsafe => write!(f, "grant would be unsafe"),
        }
    }
}

/// Result of one arbitration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    pub granted: bool,
    /// Set exactly when `granted` is false
    pub denial: Option<DenialReason>,
    pub steps: Vec<RequestStep>,
    /// Safety check of the tentative state, when it ran
    pub safety: Option<SafetyReport>,
    /// State after the call: committed on grant, unchanged on denial
    pub state: AllocationState,
}

/// Verdict of an in-place arbitration; the caller owns the resulting state
#[derive(Debug)]
pub(crate) struct Arbitration {
    pub(crate) granted: bool,
    pub(crate) denial: Option<DenialReason>,
    pub(crate) steps: Vec<RequestStep>,
    pub(crate) safety: Option<SafetyReport>,
}

impl Arbitration {
    fn denied(reason: DenialReason, steps: Vec<RequestStep>, safety: Option<SafetyReport>) -> Self {
        Self {
            granted: false,
            denial: Some(reason),
            steps,
            safety,
        }
    }

    pub(crate) fn into_outcome(self, state: AllocationState) -> RequestOutcome {
        RequestOutcome {
            granted: self.granted,
            denial: self.denial,
            steps: self.steps,
            safety: self.safety,
            state,
        }
    }
}

/// Arbitrate `request` for `process` against `state` in place.
///
/// On any denial (and on any error) `state` is left exactly as it was on entry.
pub(crate) fn arbitrate(state: &mut AllocationState, process: usize, request: &[u32], record_trace: bool) -> AnalysisResult<Arbitration> {
    state.validate_request(process, request)?;

    let mut trace = Trace::new(record_trace);
    trace.record(|| RequestStep::Received {
        process,
        request: request.to_vec(),
    });

    if let Some(resource) = first_exceeding(request, &state.need()[process]) {
        let need = state.need()[process][resource];
        trace.record(|| RequestStep::ExceedsClaim {
            process,
            resource,
            requested: request[resource],
            need,
        });
        info!(process, resource, "Request denied: exceeds maximum claim");
        return Ok(Arbitration::denied(DenialReason::ExceedsClaim, trace.into_steps(), None));
    }
    trace.record(|| RequestStep::WithinClaim);

    if let Some(resource) = first_exceeding(request, state.available()) {
        let available = state.available()[resource];
        trace.record(|| RequestStep::MustWait {
            process,
            resource,
            requested: request[resource],
            available,
        });
        info!(process, resource, "Request denied: process must wait");
        return Ok(Arbitration::denied(DenialReason::MustWait, trace.into_steps(), None));
    }
    trace.record(|| RequestStep::WithinAvailable);

    let pre_image = state.apply(process, request)?;
    trace.record(|| RequestStep::Tentative {
        process,
        available: state.available().to_vec(),
        allocation: state.allocation()[process].clone(),
        need: state.need()[process].clone(),
    });

    let safety = match run_safety(state, record_trace) {
        Ok(report) => report,
        Err(err) => {
            state.restore(pre_image);
            return Err(err);
        }
    };
    trace.record(|| RequestStep::SafetyChecked { safe: safety.safe });

    if safety.safe {
        trace.record(|| RequestStep::Granted { process });
        info!(process, sequence = ?safety.sequence, "Request granted");
        Ok(Arbitration {
            granted: true,
            denial: None,
            steps: trace.into_steps(),
            safety: Some(safety),
        })
    } else {
        state.restore(pre_image);
        trace.record(|| RequestStep::RolledBack { process });
        debug!(process, "Tentative grant rolled back");
        info!(process, "Request denied: would leave the system unsafe");
        Ok(Arbitration::denied(DenialReason::Unsafe, trace.into_steps(), Some(safety)))
    }
}
