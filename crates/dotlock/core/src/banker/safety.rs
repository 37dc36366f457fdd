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

//! Banker's safety algorithm

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::banker::state::{AllocationState, first_exceeding};
use crate::error::{AnalysisError, AnalysisResult};
use crate::trace::{SafetyStep, Trace};

/// Outcome of a safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    /// A safe completion order exists
    pub safe: bool,
    /// Completion order when safe, empty otherwise
    pub sequence: Vec<usize>,
    /// Processes that could not finish, empty when safe
    pub unfinished: Vec<usize>,
    pub steps: Vec<SafetyStep>,
}

/// Run the safety algorithm over `state`.
///
/// Processes are swept in index order and every unfinished process whose need
/// fits in `work` finishes within the same sweep. A process unblocked by a
/// later-indexed release is picked up on the next sweep. The first sweep with
/// no progress ends the search.
pub(crate) fn run_safety(state: &AllocationState, record_trace: bool) -> AnalysisResult<SafetyReport> {
    let processes = state.processes();
    let mut trace = Trace::new(record_trace);
    let mut work = state.available().to_vec();
    let mut finish = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);

    trace.record(|| SafetyStep::Initialize {
        work: work.clone(),
        finish: finish.clone(),
    });

    while sequence.len() < processes {
        let mut progressed = false;

        for i in 0..processes {
            if finish[i] {
                continue;
            }

            let need = &state.need()[i];
            let satisfied = first_exceeding(need, &work).is_none();
            trace.record(|| SafetyStep::Compare {
                process: i,
                need: need.clone(),
                work: work.clone(),
                satisfied,
            });

            if !satisfied {
                continue;
            }

            for (j, &held) in state.allocation()[i].iter().enumerate() {
                work[j] = work[j].checked_add(held).ok_or(AnalysisError::CountOverflow { resource: j })?;
            }
            finish[i] = true;
            sequence.push(i);
            progressed = true;
            trace.record(|| SafetyStep::Release { process: i, work: work.clone() });
        }

        if !progressed {
            break;
        }
    }

    let unfinished: Vec<usize> = (0..processes).filter(|&i| !finish[i]).collect();
    let safe = unfinished.is_empty();

    if safe {
        trace.record(|| SafetyStep::Safe { sequence: sequence.clone() });
        debug!(?sequence, "State is safe");
    } else {
        trace.record(|| SafetyStep::Stuck { unfinished: unfinished.clone() });
        trace.record(|| SafetyStep::Unsafe);
        debug!(?unfinished, "State is unsafe");
        sequence.clear();
    }

    Ok(SafetyReport {
        safe,
        sequence,
        unfinished,
        steps: trace.into_steps(),
    })
}
