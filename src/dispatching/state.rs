//! Per-run mutable scheduling state.
//!
//! Planes are shared read-only between runs; the countdown of remaining work
//! and the completion flag live here instead, in an arena indexed by the
//! plane's position in the input slice.

use crate::models::{Plane, Tick};

/// Mutable scheduling record of one plane within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneState {
    /// Service ticks still required.
    pub remaining_work: Tick,
    /// Set exactly once, when the plane's work is done.
    pub completed: bool,
}

/// Scheduling records for every plane of a run, indexed like the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    records: Vec<PlaneState>,
    completed: usize,
}

impl RunState {
    /// Initializes each plane's remaining work with `initial_work(plane)`.
    pub fn new(planes: &[Plane], initial_work: impl Fn(&Plane) -> Tick) -> Self {
        Self {
            records: planes
                .iter()
                .map(|p| PlaneState {
                    remaining_work: initial_work(p),
                    completed: false,
                })
                .collect(),
            completed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for the plane at `index`.
    pub fn get(&self, index: usize) -> &PlaneState {
        &self.records[index]
    }

    pub fn remaining(&self, index: usize) -> Tick {
        self.records[index].remaining_work
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.records[index].completed
    }

    /// Runs the plane for up to `budget` ticks and returns the ticks used.
    pub fn execute(&mut self, index: usize, budget: Tick) -> Tick {
        let record = &mut self.records[index];
        let executed = record.remaining_work.min(budget);
        record.remaining_work -= executed;
        executed
    }

    /// Marks the plane completed.
    pub fn complete(&mut self, index: usize) {
        let record = &mut self.records[index];
        debug_assert!(!record.completed, "plane {index} completed twice");
        if !record.completed {
            record.completed = true;
            self.completed += 1;
        }
    }

    /// Number of planes marked completed.
    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.records.len()
    }
}
