//! Checker configuration.
//!
//! Hosts construct these directly or deserialize them from their own settings files; nothing here
//! is read from global state.

use crate::debounce::MAX_DELAY;
use crate::error::CheckerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits for [`MultiPassErrorDetector`](crate::MultiPassErrorDetector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of compile attempts per pass.
    pub max_attempts: usize,
    /// Maximum number of records returned per pass.
    pub max_records: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            max_records: 10,
        }
    }
}

/// Limits for [`ErrorLineResolver`](crate::ErrorLineResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Lines searched on each side of the reported line.
    pub window: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { window: 10 }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Detector limits.
    pub detector: DetectorConfig,
    /// Resolver limits.
    pub resolver: ResolverConfig,
    /// Idle time after the last edit before a pass runs, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            resolver: ResolverConfig::default(),
            debounce_ms: 1500,
        }
    }
}

impl CheckerConfig {
    /// The debounce delay as a [`Duration`].
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Reject values that would disable detection entirely.
    pub fn validate(&self) -> Result<(), CheckerError> {
        if self.detector.max_attempts == 0 {
            return Err(CheckerError::InvalidConfig("detector.max_attempts must be at least 1"));
        }
        if self.detector.max_records == 0 {
            return Err(CheckerError::InvalidConfig("detector.max_records must be at least 1"));
        }
        if self.debounce_delay() > MAX_DELAY {
            return Err(CheckerError::InvalidConfig("debounce_ms must not exceed 60000"));
        }
        Ok(())
    }
}
