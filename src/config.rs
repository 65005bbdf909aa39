//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::Tick;

const DEFAULT_RUNWAY_COUNT: usize = 1;
const DEFAULT_QUANTUM: Tick = 2;
const DEFAULT_PROGRESS_BUFFER: usize = 64;

/// Largest quantum whose heaviest round-robin workload (cargo, three
/// quanta) still fits in a [`Tick`].
pub const MAX_QUANTUM: Tick = Tick::MAX / 3;

/// Settings shared by every policy run.
///
/// Missing fields fall back to their defaults when deserialized:
///
/// ```
/// use runway_schedule::config::SchedulerConfig;
///
/// let config = SchedulerConfig::from_json_str(r#"{"runway_count": 3}"#).unwrap();
/// assert_eq!(config.runway_count, 3);
/// assert_eq!(config.quantum, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Runways available to the multi-runway policies (FCFS, Optimized).
    #[serde(default = "default_runway_count")]
    pub runway_count: usize,
    /// Round-robin time slice, in ticks.
    #[serde(default = "default_quantum")]
    pub quantum: Tick,
    /// Capacity of the progress channel between a worker run and its caller.
    #[serde(default = "default_progress_buffer")]
    pub progress_buffer: usize,
}

fn default_runway_count() -> usize {
    DEFAULT_RUNWAY_COUNT
}

fn default_quantum() -> Tick {
    DEFAULT_QUANTUM
}

fn default_progress_buffer() -> usize {
    DEFAULT_PROGRESS_BUFFER
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            runway_count: DEFAULT_RUNWAY_COUNT,
            quantum: DEFAULT_QUANTUM,
            progress_buffer: DEFAULT_PROGRESS_BUFFER,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runway count.
    pub fn with_runways(mut self, runway_count: usize) -> Self {
        self.runway_count = runway_count;
        self
    }

    /// Sets the round-robin quantum.
    pub fn with_quantum(mut self, quantum: Tick) -> Self {
        self.quantum = quantum;
        self
    }

    /// Sets the progress channel capacity.
    pub fn with_progress_buffer(mut self, progress_buffer: usize) -> Self {
        self.progress_buffer = progress_buffer;
        self
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, SchedulerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every field is in range.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.runway_count == 0 {
            return Err(SchedulerError::ResourceConfig(
                "runway count must be at least 1".to_string(),
            ));
        }
        if self.quantum == 0 {
            return Err(SchedulerError::InvalidConfig(
                "round-robin quantum must be at least 1 tick".to_string(),
            ));
        }
        if self.quantum > MAX_QUANTUM {
            return Err(SchedulerError::InvalidConfig(format!(
                "round-robin quantum {} exceeds the maximum of {MAX_QUANTUM} ticks",
                self.quantum
            )));
        }
        if self.progress_buffer == 0 {
            return Err(SchedulerError::InvalidConfig(
                "progress buffer must hold at least one event".to_string(),
            ));
        }
        Ok(())
    }
}
