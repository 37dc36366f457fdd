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

//! Error types shared by both engines

/// Ill-formed input and graph inconsistencies.
///
/// Policy outcomes (a denied request, an unsafe state, a deadlock) are never
/// reported through this type; they are ordinary results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("System must have at least one process and one resource type")]
    EmptySystem,

    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch { what: String, expected: usize, found: usize },

    #[error("Negative need for P{process} on resource {resource}: max {max} < allocation {allocation}")]
    NegativeNeed { process: usize, resource: usize, max: u32, allocation: u32 },

    #[error("Process P{process} out of range (system has {processes} processes)")]
    ProcessOutOfRange { process: usize, processes: usize },

    #[error("Request has {found} entries, system has {expected} resource types")]
    RequestLength { expected: usize, found: usize },

    #[error("Instance count overflow on resource {resource}")]
    CountOverflow { resource: usize },

    #[error("Limit exceeded: {what} is {found}, maximum is {limit}")]
    LimitExceeded { what: String, limit: usize, found: usize },

    #[error("Unknown node {0}")]
    UnknownNode(String),

    #[error("Node {0} already exists")]
    DuplicateNode(String),

    #[error("Invalid edge {from} -> {to}: {reason}")]
    InvalidEdge { from: String, to: String, reason: String },
}

/// Result type for engine operations
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Helper for building dimension errors
pub fn dimension_mismatch(what: impl Into<String>, expected: usize, found: usize) -> AnalysisError {
    AnalysisError::DimensionMismatch {
        what: what.into(),
        expected,
        found,
    }
}
