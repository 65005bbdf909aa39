//! Run driver: validation, policy invocation, KPIs and the metrics log.
//!
//! # Modes
//!
//! - [`RunDriver::run`] schedules on the calling thread and invokes the
//!   observer in-line.
//! - [`RunDriver::spawn`] schedules on a worker thread. Progress events
//!   travel over a bounded channel and reach the observer in
//!   [`RunHandle::wait`], in emission order. The run can be cancelled
//!   through the handle at any time.
//!
//! Input is validated before any scheduling is attempted. A failure to
//! write the metrics log is logged and does not fail the run.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::dispatching::{
    round_ms, CancelToken, PolicyKind, ProgressEvent, ProgressObserver, ScheduleOutcome,
};
use crate::error::{ObserverError, SchedulerError};
use crate::io::{MetricsRecord, MetricsSink};
use crate::models::{Plane, Schedule};
use crate::scheduler::ScheduleKpi;
use crate::validation::validate_planes;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub policy: PolicyKind,
    pub schedule: Schedule,
    /// Wall-clock time spent inside the policy.
    pub elapsed: Duration,
    pub kpi: ScheduleKpi,
}

impl RunReport {
    /// Elapsed time in milliseconds, rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        round_ms(self.elapsed)
    }
}

/// Validates input, runs policies and records their timings.
///
/// # Example
///
/// ```
/// use runway_schedule::config::SchedulerConfig;
/// use runway_schedule::dispatching::PolicyKind;
/// use runway_schedule::models::Plane;
/// use runway_schedule::scheduler::RunDriver;
///
/// let driver = RunDriver::new(SchedulerConfig::default().with_runways(2)).unwrap();
/// let planes = vec![
///     Plane::new("PL1001").with_arrival(0),
///     Plane::new("PL1002").with_arrival(0),
/// ];
/// let report = driver.run(PolicyKind::Fcfs, &planes, None).unwrap();
/// assert_eq!(report.kpi.planes_scheduled, 2);
/// assert_eq!(report.kpi.average_delay, 0.0);
/// ```
#[derive(Clone)]
pub struct RunDriver {
    config: SchedulerConfig,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl fmt::Debug for RunDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunDriver")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl RunDriver {
    /// Creates a driver after validating `config`.
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: None,
        })
    }

    /// Appends a [`MetricsRecord`] to `sink` after every successful run.
    pub fn with_metrics_sink(mut self, sink: impl MetricsSink + 'static) -> Self {
        self.metrics = Some(Arc::new(sink));
        self
    }

    /// Shares an existing sink between drivers.
    pub fn with_shared_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs `policy` over `planes` on the calling thread.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] if `planes` is empty or malformed,
    /// otherwise whatever the policy returns.
    pub fn run(
        &self,
        policy: PolicyKind,
        planes: &[Plane],
        observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<RunReport, SchedulerError> {
        let dispatcher = policy.policy();
        validate(policy, planes, dispatcher.requires_deadlines())?;
        info!(
            policy = %policy,
            planes = planes.len(),
            runways = self.config.runway_count,
            "run started"
        );
        let outcome = dispatcher.schedule(planes, &self.config, observer)?;
        Ok(self.finish(policy, planes, outcome))
    }

    /// Runs every built-in policy over the same planes, in
    /// [`PolicyKind::ALL`] order. Stops at the first failure.
    pub fn run_all(&self, planes: &[Plane]) -> Result<Vec<RunReport>, SchedulerError> {
        PolicyKind::ALL
            .iter()
            .map(|&policy| self.run(policy, planes, None))
            .collect()
    }

    /// Starts `policy` on a worker thread.
    ///
    /// Input is validated on the calling thread, so an invalid plane list
    /// fails here rather than in [`RunHandle::wait`]. The worker blocks once
    /// `progress_buffer` events are waiting, so the caller must drain the
    /// handle with [`RunHandle::wait`].
    pub fn spawn(
        &self,
        policy: PolicyKind,
        planes: Vec<Plane>,
    ) -> Result<RunHandle, SchedulerError> {
        let dispatcher = policy.policy();
        validate(policy, &planes, dispatcher.requires_deadlines())?;

        let (tx, events) = flume::bounded(self.config.progress_buffer);
        let cancel = CancelToken::new();
        let planes = Arc::new(planes);

        let worker_planes = Arc::clone(&planes);
        let worker_cancel = cancel.clone();
        let config = self.config.clone();
        info!(policy = %policy, planes = planes.len(), "worker run started");
        let join = thread::Builder::new()
            .name(format!("runway-{}", policy.label().to_lowercase().replace(' ', "-")))
            .spawn(move || {
                let mut observer = ChannelObserver { tx };
                dispatcher.schedule_with_cancel(
                    &worker_planes,
                    &config,
                    Some(&mut observer),
                    Some(&worker_cancel),
                )
            })
            .map_err(SchedulerError::WorkerSpawn)?;

        Ok(RunHandle {
            policy,
            planes,
            events,
            cancel,
            join,
            driver: self.clone(),
        })
    }

    fn finish(&self, policy: PolicyKind, planes: &[Plane], outcome: ScheduleOutcome) -> RunReport {
        let kpi = ScheduleKpi::calculate(&outcome.schedule, planes);
        let report = RunReport {
            policy,
            schedule: outcome.schedule,
            elapsed: outcome.elapsed,
            kpi,
        };
        info!(
            policy = %policy,
            assignments = report.kpi.assignment_count,
            makespan = report.kpi.makespan,
            average_delay = report.kpi.average_delay,
            elapsed_ms = report.elapsed_ms(),
            "run finished"
        );

        if let Some(sink) = &self.metrics {
            let record = MetricsRecord::now(policy.label(), report.elapsed_ms());
            if let Err(err) = sink.record(&record) {
                warn!(policy = %policy, error = %err, "failed to record run metrics");
            }
        }
        report
    }
}

fn validate(
    policy: PolicyKind,
    planes: &[Plane],
    require_deadlines: bool,
) -> Result<(), SchedulerError> {
    validate_planes(planes, require_deadlines).map_err(|errors| {
        warn!(policy = %policy, errors = errors.len(), "rejected plane input");
        SchedulerError::InvalidInput(errors)
    })
}

/// Forwards worker progress to the caller's side of the channel.
struct ChannelObserver {
    tx: flume::Sender<ProgressEvent>,
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&mut self, event: &ProgressEvent) -> Result<(), ObserverError> {
        self.tx
            .send(*event)
            .map_err(|_| ObserverError::new("progress receiver dropped"))
    }
}

/// A run executing on a worker thread.
#[derive(Debug)]
pub struct RunHandle {
    policy: PolicyKind,
    planes: Arc<Vec<Plane>>,
    events: flume::Receiver<ProgressEvent>,
    cancel: CancelToken,
    join: JoinHandle<Result<ScheduleOutcome, SchedulerError>>,
    driver: RunDriver,
}

impl RunHandle {
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    /// Stops the worker before its next assignment.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this run, for use from other threads.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drains progress events into `observer` and waits for the worker.
    ///
    /// If the observer fails, the worker is cancelled and the returned
    /// [`SchedulerError::ObserverFailure`] carries whatever the worker had
    /// scheduled by then.
    pub fn wait(
        self,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<RunReport, SchedulerError> {
        let RunHandle {
            policy,
            planes,
            events,
            cancel,
            join,
            driver,
        } = self;

        let mut failure = None;
        while let Ok(event) = events.recv() {
            let Some(observer) = observer.as_mut() else {
                continue;
            };
            if let Err(err) = observer.on_progress(&event) {
                failure = Some(err);
                break;
            }
        }

        if failure.is_some() {
            cancel.cancel();
        }
        // Unblocks a worker waiting on a full channel.
        drop(events);
        let result = join.join().map_err(|_| SchedulerError::WorkerPanicked)?;

        if let Some(err) = failure {
            let partial = match result {
                Ok(outcome) => outcome.schedule,
                Err(aborted) if aborted.partial_schedule().is_some() => {
                    aborted.into_partial_schedule().unwrap_or_default()
                }
                Err(other) => return Err(other),
            };
            warn!(
                policy = %policy,
                assignments = partial.assignment_count(),
                reason = %err,
                "observer aborted worker run"
            );
            return Err(SchedulerError::ObserverFailure {
                reason: err.to_string(),
                partial: Box::new(partial),
            });
        }

        let outcome = result?;
        Ok(driver.finish(policy, &planes, outcome))
    }
}
