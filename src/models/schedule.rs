//! Schedule (run output) model.
//!
//! A schedule is the ordered list of runway assignments one policy run
//! produced. Order is emission order, which is not necessarily sorted by
//! start tick.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{Plane, PlaneKind, Tick};

/// The assignments produced by one policy run, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub assignments: Vec<Assignment>,
}

/// One unit of work performed for a plane on a runway.
///
/// Round robin emits one assignment per quantum slice; every other policy
/// emits exactly one per plane. `kind`, `priority` and `arrival_time` are
/// copied from the plane for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub plane_id: String,
    /// Runway index within the pool.
    pub runway: usize,
    /// Tick at which this unit of work began.
    pub scheduled_at: Tick,
    /// Tick at which this unit of work ended.
    pub completed_at: Tick,
    pub kind: PlaneKind,
    pub priority: u32,
    pub arrival_time: Tick,
}

impl Assignment {
    /// Creates an assignment with default reporting fields.
    pub fn new(
        plane_id: impl Into<String>,
        runway: usize,
        scheduled_at: Tick,
        completed_at: Tick,
    ) -> Self {
        Self {
            plane_id: plane_id.into(),
            runway,
            scheduled_at,
            completed_at,
            kind: PlaneKind::Landing,
            priority: 1,
            arrival_time: 0,
        }
    }

    /// Creates an assignment for `plane`, copying its reporting fields.
    pub fn for_plane(plane: &Plane, runway: usize, scheduled_at: Tick, completed_at: Tick) -> Self {
        Self {
            plane_id: plane.id.clone(),
            runway,
            scheduled_at,
            completed_at,
            kind: plane.kind.clone(),
            priority: plane.priority,
            arrival_time: plane.arrival_time,
        }
    }

    pub fn with_kind(mut self, kind: PlaneKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_arrival(mut self, arrival_time: Tick) -> Self {
        self.arrival_time = arrival_time;
        self
    }

    /// Ticks of runway time this assignment occupies (0 if the ends are
    /// reversed).
    #[inline]
    pub fn duration(&self) -> Tick {
        self.completed_at.saturating_sub(self.scheduled_at)
    }

    /// Ticks the plane waited between arrival and the start of this work.
    #[inline]
    pub fn delay(&self) -> Tick {
        self.scheduled_at.saturating_sub(self.arrival_time)
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Latest `completed_at` across all assignments (0 if empty).
    pub fn makespan(&self) -> Tick {
        self.assignments
            .iter()
            .map(|a| a.completed_at)
            .max()
            .unwrap_or(0)
    }

    /// All assignments for a plane, in emission order.
    pub fn assignments_for_plane(&self, plane_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.plane_id == plane_id)
            .collect()
    }

    /// All assignments on a runway, in emission order.
    pub fn assignments_for_runway(&self, runway: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.runway == runway)
            .collect()
    }

    /// Completion tick of a plane (latest end of its assignments).
    pub fn plane_completion_time(&self, plane_id: &str) -> Option<Tick> {
        self.assignments
            .iter()
            .filter(|a| a.plane_id == plane_id)
            .map(|a| a.completed_at)
            .max()
    }

    /// Position of a plane's first assignment in emission order.
    pub fn first_position(&self, plane_id: &str) -> Option<usize> {
        self.assignments.iter().position(|a| a.plane_id == plane_id)
    }

    /// Number of distinct planes that received at least one assignment.
    pub fn plane_count(&self) -> usize {
        self.assignments
            .iter()
            .map(|a| a.plane_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Assignment count per runway index.
    pub fn assignments_per_runway(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.runway).or_insert(0) += 1;
        }
        counts
    }

    /// Busy fraction of a runway over `[0, horizon)`.
    ///
    /// Returns `None` if `horizon` is zero.
    pub fn runway_busy_fraction(&self, runway: usize, horizon: Tick) -> Option<f64> {
        if horizon == 0 {
            return None;
        }
        let busy: Tick = self
            .assignments
            .iter()
            .filter(|a| a.runway == runway)
            .map(Assignment::duration)
            .fold(0, Tick::saturating_add);
        Some(busy as f64 / horizon as f64)
    }
}
