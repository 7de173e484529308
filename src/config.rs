//! Dataset build parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// A user passed when their distinct correct steps exceed this
    pub points_threshold: u32,
    /// Days after first activity kept for features
    pub window_days: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            points_threshold: 40,
            window_days: 2,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn with_overrides(self, points_threshold: Option<u32>, window_days: Option<u32>) -> Self {
        Self {
            points_threshold: points_threshold.unwrap_or(self.points_threshold),
            window_days: window_days.unwrap_or(self.window_days),
        }
    }
}
