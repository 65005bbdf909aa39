//! Per-run dispatch context: schedule accumulation, progress reporting
//! and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{ObserverError, SchedulerError};
use crate::models::{Assignment, Schedule};

/// Progress notification emitted while a policy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Assignments emitted so far (round robin: planes completed so far).
    pub completed: usize,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
}

impl ProgressEvent {
    /// Elapsed wall-clock time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Receives progress events in emission order.
///
/// Called synchronously between assignments, so implementations must
/// return quickly. Returning an error aborts the run.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: &ProgressEvent) -> Result<(), ObserverError>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressEvent) -> Result<(), ObserverError>,
{
    fn on_progress(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        self(event)
    }
}

/// Shared flag a caller sets to stop a run between assignments.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of one policy run: the schedule plus wall-clock time spent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub schedule: Schedule,
    pub elapsed: Duration,
}

impl ScheduleOutcome {
    /// Elapsed time in milliseconds, rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        round_ms(self.elapsed)
    }
}

pub(crate) fn round_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}

/// Collects a policy's assignments and relays progress to the observer.
///
/// Policies only ever talk to the context; they never touch the observer
/// or the cancel token directly. Cancellation is checked before every
/// assignment is recorded.
pub struct DispatchContext<'a> {
    schedule: Schedule,
    started: Instant,
    observer: Option<&'a mut dyn ProgressObserver>,
    cancel: Option<&'a CancelToken>,
}

impl<'a> DispatchContext<'a> {
    pub fn new(
        observer: Option<&'a mut dyn ProgressObserver>,
        cancel: Option<&'a CancelToken>,
    ) -> Self {
        Self {
            schedule: Schedule::new(),
            started: Instant::now(),
            observer,
            cancel,
        }
    }

    /// Records an assignment and reports the running assignment count.
    pub fn emit(&mut self, assignment: Assignment) -> Result<(), SchedulerError> {
        self.record(assignment)?;
        let count = self.schedule.assignment_count();
        self.notify(count)
    }

    /// Records an assignment without reporting progress.
    pub fn record(&mut self, assignment: Assignment) -> Result<(), SchedulerError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SchedulerError::Cancelled {
                partial: Box::new(std::mem::take(&mut self.schedule)),
            });
        }
        self.schedule.add_assignment(assignment);
        Ok(())
    }

    /// Reports `completed` units of progress to the observer, if any.
    pub fn notify(&mut self, completed: usize) -> Result<(), SchedulerError> {
        let Some(observer) = self.observer.as_mut() else {
            return Ok(());
        };
        let event = ProgressEvent {
            completed,
            elapsed: self.started.elapsed(),
        };
        observer
            .on_progress(&event)
            .map_err(|err| SchedulerError::ObserverFailure {
                reason: err.to_string(),
                partial: Box::new(std::mem::take(&mut self.schedule)),
            })
    }

    /// Assignments recorded so far.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Ends the run, returning the schedule and elapsed time.
    pub fn finish(self) -> ScheduleOutcome {
        ScheduleOutcome {
            elapsed: self.started.elapsed(),
            schedule: self.schedule,
        }
    }
}
