//! Error types.
//!
//! Every failure a run can hit is surfaced to the immediate caller as a
//! [`SchedulerError`]. Nothing is retried and nothing is logged-and-swallowed.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Schedule, Tick};
use crate::validation::ValidationError;

/// Errors produced while configuring, validating, or running a policy.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The plane collection is empty or malformed. No scheduling was attempted.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    /// The runway pool cannot be built with the requested size.
    #[error("invalid runway configuration: {0}")]
    ResourceConfig(String),

    /// A non-runway configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A runway clock would move backwards. Indicates a policy bug.
    #[error("runway {runway} clock would move backwards from {current} to {requested}")]
    ClockInvariantViolation {
        runway: usize,
        current: Tick,
        requested: Tick,
    },

    /// A plane's work would end past the last representable tick.
    #[error("plane {plane_id} cannot finish: {start} + {work} ticks exceeds the clock range")]
    TickOverflow {
        plane_id: String,
        start: Tick,
        work: Tick,
    },

    /// The progress observer returned an error; the run was aborted.
    #[error("progress observer failed: {reason}")]
    ObserverFailure {
        reason: String,
        /// Assignments emitted before the failure.
        partial: Box<Schedule>,
    },

    /// The caller cancelled the run.
    #[error("run cancelled after {} assignments", .partial.assignment_count())]
    Cancelled { partial: Box<Schedule> },

    /// The worker thread could not be started.
    #[error("failed to start scheduler worker")]
    WorkerSpawn(#[source] std::io::Error),

    /// The worker thread running a policy panicked.
    #[error("scheduler worker panicked")]
    WorkerPanicked,

    #[error("unknown scheduling policy: {0}")]
    UnknownPolicy(String),

    /// The plane source could not be read.
    #[error("failed to read {path}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed plane data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchedulerError {
    /// Partial schedule carried by an aborted run, if any.
    pub fn partial_schedule(&self) -> Option<&Schedule> {
        match self {
            Self::ObserverFailure { partial, .. } | Self::Cancelled { partial } => Some(partial),
            _ => None,
        }
    }

    /// Consumes the error and returns its partial schedule, if any.
    pub fn into_partial_schedule(self) -> Option<Schedule> {
        match self {
            Self::ObserverFailure { partial, .. } | Self::Cancelled { partial } => Some(*partial),
            _ => None,
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

/// Error returned by a progress observer to abort the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
