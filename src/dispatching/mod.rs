//! Dispatch policies for runway scheduling.
//!
//! Five interchangeable algorithms share the plane model, the runway pool
//! and the [`DispatchContext`]. Each differs only in how it orders planes,
//! how it breaks ties and which runway it hands out.
//!
//! # Usage
//!
//! ```
//! use runway_schedule::config::SchedulerConfig;
//! use runway_schedule::dispatching::{DispatchPolicy, PolicyKind};
//! use runway_schedule::models::Plane;
//!
//! let planes = vec![
//!     Plane::new("P1").with_priority(2).with_deadline(10),
//!     Plane::new("P2").with_priority(1).with_deadline(5),
//! ];
//! let policy = PolicyKind::Edf.policy();
//! let outcome = policy.schedule(&planes, &SchedulerConfig::default(), None).unwrap();
//! assert_eq!(outcome.schedule.assignments[0].plane_id, "P2");
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"

mod context;
pub mod policies;
mod state;

pub use context::{CancelToken, DispatchContext, ProgressEvent, ProgressObserver, ScheduleOutcome};
pub(crate) use context::round_ms;
pub use state::{PlaneState, RunState};

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::models::Plane;

/// A runway dispatch algorithm.
///
/// Implementors provide [`dispatch`](Self::dispatch); the provided
/// [`schedule`](Self::schedule) methods wrap it with timing, progress
/// reporting and cancellation.
pub trait DispatchPolicy: Send + Sync + Debug {
    /// Policy name (e.g., "FCFS", "EDF").
    fn name(&self) -> &'static str;

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }

    /// Whether every plane must carry a deadline.
    fn requires_deadlines(&self) -> bool {
        false
    }

    /// Emits this policy's assignments for `planes` into `ctx`.
    ///
    /// `planes` is assumed validated and non-empty.
    fn dispatch(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError>;

    /// Schedules `planes`, reporting progress to `observer` after each
    /// assignment.
    ///
    /// An empty plane list yields an empty schedule and zero elapsed time.
    fn schedule(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        self.schedule_with_cancel(planes, config, observer, None)
    }

    /// Like [`schedule`](Self::schedule), but stops with
    /// [`SchedulerError::Cancelled`] once `cancel` is set.
    fn schedule_with_cancel<'a>(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        observer: Option<&'a mut dyn ProgressObserver>,
        cancel: Option<&'a CancelToken>,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        if planes.is_empty() {
            return Ok(ScheduleOutcome::default());
        }

        let mut ctx = DispatchContext::new(observer, cancel);
        self.dispatch(planes, config, &mut ctx)?;
        let outcome = ctx.finish();

        debug!(
            policy = self.name(),
            planes = planes.len(),
            assignments = outcome.schedule.assignment_count(),
            makespan = outcome.schedule.makespan(),
            elapsed_ms = outcome.elapsed_ms(),
            "dispatch finished"
        );
        Ok(outcome)
    }
}

/// Selector for the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// First-come-first-served over the runway pool.
    Fcfs,
    /// Load-balanced, priority-aware sibling of FCFS.
    Optimized,
    /// Earliest deadline first (static order, single runway).
    Edf,
    /// Quantum-sliced round robin (single runway).
    RoundRobin,
    /// Lowest priority value among arrived planes (single runway).
    PriorityPreemptive,
}

impl PolicyKind {
    /// Every built-in policy, in menu order.
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fcfs,
        PolicyKind::Optimized,
        PolicyKind::Edf,
        PolicyKind::RoundRobin,
        PolicyKind::PriorityPreemptive,
    ];

    /// Display label, also used as the metrics-log policy name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Optimized => "Optimized",
            Self::Edf => "EDF",
            Self::RoundRobin => "Round Robin",
            Self::PriorityPreemptive => "Priority Preemptive",
        }
    }

    /// Instantiates the policy.
    pub fn policy(&self) -> Box<dyn DispatchPolicy> {
        match self {
            Self::Fcfs => Box::new(policies::Fcfs),
            Self::Optimized => Box::new(policies::Optimized),
            Self::Edf => Box::new(policies::Edf),
            Self::RoundRobin => Box::new(policies::RoundRobin),
            Self::PriorityPreemptive => Box::new(policies::PriorityPreemptive),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PolicyKind {
    type Err = SchedulerError;

    /// Accepts labels ("Round Robin"), snake case ("round_robin") and
    /// abbreviations ("rr"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "fcfs" | "firstcomefirstserved" | "firstcomefirstserve" => Ok(Self::Fcfs),
            "optimized" | "optimised" => Ok(Self::Optimized),
            "edf" | "earliestdeadlinefirst" => Ok(Self::Edf),
            "rr" | "roundrobin" => Ok(Self::RoundRobin),
            "pp" | "priority" | "prioritypreemptive" => Ok(Self::PriorityPreemptive),
            _ => Err(SchedulerError::UnknownPolicy(s.to_string())),
        }
    }
}
