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

//! Configuration types for the analysis engines

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Configuration shared by the safety engine and the graph analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record step traces in results
    pub record_trace: bool,
    /// Largest number of processes accepted in one call
    pub max_processes: usize,
    /// Largest number of resource types (or resource nodes) accepted in one call
    pub max_resource_types: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_trace: true,
            max_processes: 1024,
            max_resource_types: 256,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable trace recording
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.record_trace = enable;
        self
    }

    /// Set the process limit
    pub fn with_max_processes(mut self, limit: usize) -> Self {
        self.max_processes = limit;
        self
    }

    /// Set the resource type limit
    pub fn with_max_resource_types(mut self, limit: usize) -> Self {
        self.max_resource_types = limit;
        self
    }

    /// Reject inputs larger than the configured limits
    pub fn check_limits(&self, processes: usize, resource_types: usize) -> AnalysisResult<()> {
        if processes > self.max_processes {
            return Err(AnalysisError::LimitExceeded {
                what: "process count".to_string(),
                limit: self.max_processes,
                found: processes,
            });
        }
        if resource_types > self.max_resource_types {
            return Err(AnalysisError::LimitExceeded {
                what: "resource count".to_string(),
                limit: self.max_resource_types,
                found: resource_types,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.record_trace);
        assert_eq!(config.max_processes, 1024);
        assert_eq!(config.max_resource_types, 256);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::new().with_trace(false).with_max_processes(8).with_max_resource_types(4);

        assert!(!config.record_trace);
        assert_eq!(config.max_processes, 8);
        assert_eq!(config.max_resource_types, 4);
    }

    #[test]
    fn test_limits() {
        let config = EngineConfig::new().with_max_processes(2).with_max_resource_types(2);
        assert!(config.check_limits(2, 2).is_ok());
        assert!(matches!(config.check_limits(3, 1), Err(AnalysisError::LimitExceeded { limit: 2, found: 3, .. })));
        assert!(matches!(config.check_limits(1, 5), Err(AnalysisError::LimitExceeded { found: 5, .. })));
    }
}
