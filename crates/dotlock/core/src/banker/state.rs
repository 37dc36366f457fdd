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

//! Allocation state: allocation, max, available and the derived need matrix

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult, dimension_mismatch};

/// Snapshot of who holds what and who may still claim what.
///
/// Always constructed through [`AllocationState::new`], so `need` is
/// consistent with `max - allocation` and every row has `m` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationState {
    allocation: Vec<Vec<u32>>,
    max: Vec<Vec<u32>>,
    available: Vec<u32>,
    need: Vec<Vec<u32>>,
}

/// Plain matrices as supplied by a caller (or a JSON file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub allocation: Vec<Vec<u32>>,
    pub max: Vec<Vec<u32>>,
    pub available: Vec<u32>,
}

/// Values overwritten by a tentative grant, kept for exact rollback
#[derive(Debug, Clone)]
pub(crate) struct PreImage {
    process: usize,
    available: Vec<u32>,
    allocation: Vec<u32>,
    need: Vec<u32>,
}

impl AllocationState {
    /// Validate dimensions and derive `need`.
    pub fn new(allocation: Vec<Vec<u32>>, max: Vec<Vec<u32>>, available: Vec<u32>) -> AnalysisResult<Self> {
        let processes = allocation.len();
        let resources = available.len();
        if processes == 0 || resources == 0 {
            return Err(AnalysisError::EmptySystem);
        }
        if max.len() != processes {
            return Err(dimension_mismatch("max rows", processes, max.len()));
        }
        for (i, row) in allocation.iter().enumerate() {
            if row.len() != resources {
                return Err(dimension_mismatch(format!("allocation row P{i}"), resources, row.len()));
            }
        }
        for (i, row) in max.iter().enumerate() {
            if row.len() != resources {
                return Err(dimension_mismatch(format!("max row P{i}"), resources, row.len()));
            }
        }

        let mut need = Vec::with_capacity(processes);
        for (i, (alloc_row, max_row)) in allocation.iter().zip(max.iter()).enumerate() {
            let mut need_row = Vec::with_capacity(resources);
            for (j, (&held, &claim)) in alloc_row.iter().zip(max_row.iter()).enumerate() {
                let remaining = claim.checked_sub(held).ok_or(AnalysisError::NegativeNeed {
                    process: i,
                    resource: j,
                    max: claim,
                    allocation: held,
                })?;
                need_row.push(remaining);
            }
            need.push(need_row);
        }

        Ok(Self { allocation, max, available, need })
    }

    /// Build from a caller snapshot
    pub fn from_snapshot(snapshot: StateSnapshot) -> AnalysisResult<Self> {
        Self::new(snapshot.allocation, snapshot.max, snapshot.available)
    }

    /// Plain matrices of the current state
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            allocation: self.allocation.clone(),
            max: self.max.clone(),
            available: self.available.clone(),
        }
    }

    /// Number of processes
    pub fn processes(&self) -> usize {
        self.allocation.len()
    }

    /// Number of resource types
    pub fn resource_types(&self) -> usize {
        self.available.len()
    }

    pub fn allocation(&self) -> &[Vec<u32>] {
        &self.allocation
    }

    pub fn max(&self) -> &[Vec<u32>] {
        &self.max
    }

    pub fn available(&self) -> &[u32] {
        &self.available
    }

    pub fn need(&self) -> &[Vec<u32>] {
        &self.need
    }

    /// Total instances per resource type: `available[j] + sum_i allocation[i][j]`
    pub fn totals(&self) -> AnalysisResult<Vec<u64>> {
        let mut totals: Vec<u64> = self.available.iter().map(|&a| u64::from(a)).collect();
        for row in &self.allocation {
            for (j, &held) in row.iter().enumerate() {
                totals[j] = totals[j].checked_add(u64::from(held)).ok_or(AnalysisError::CountOverflow { resource: j })?;
            }
        }
        Ok(totals)
    }

    /// Check that `process` exists and `request` has one entry per resource type
    pub fn validate_request(&self, process: usize, request: &[u32]) -> AnalysisResult<()> {
        if process >= self.processes() {
            return Err(AnalysisError::ProcessOutOfRange {
                process,
                processes: self.processes(),
            });
        }
        if request.len() != self.resource_types() {
            return Err(AnalysisError::RequestLength {
                expected: self.resource_types(),
                found: request.len(),
            });
        }
        Ok(())
    }

    /// Move `request` from available to `process`, returning what was overwritten.
    ///
    /// Callers must have checked `request <= need[process]` and
    /// `request <= available`; the subtraction cannot underflow after that.
    pub(crate) fn apply(&mut self, process: usize, request: &[u32]) -> AnalysisResult<PreImage> {
        let pre_image = PreImage {
            process,
            available: self.available.clone(),
            allocation: self.allocation[process].clone(),
            need: self.need[process].clone(),
        };

        let mut allocated = Vec::with_capacity(request.len());
        for (j, &amount) in request.iter().enumerate() {
            allocated.push(self.allocation[process][j].checked_add(amount).ok_or(AnalysisError::CountOverflow { resource: j })?);
        }

        for (j, &amount) in request.iter().enumerate() {
            self.available[j] -= amount;
            self.need[process][j] -= amount;
        }
        self.allocation[process] = allocated;

        Ok(pre_image)
    }

    /// Restore the exact values saved by [`AllocationState::apply`]
    pub(crate) fn restore(&mut self, pre_image: PreImage) {
        let PreImage { process, available, allocation, need } = pre_image;
        self.available = available;
        self.allocation[process] = allocation;
        self.need[process] = need;
    }
}

/// Element-wise `lhs <= rhs`; returns the first offending index otherwise
pub(crate) fn first_exceeding(lhs: &[u32], rhs: &[u32]) -> Option<usize> {
    lhs.iter().zip(rhs.iter()).position(|(l, r)| l > r)
}
