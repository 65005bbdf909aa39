//! Runway pool.
//!
//! Tracks, for each runway, the next tick at which it becomes free.
//! Clocks only move forward; selection always returns the lowest-indexed
//! runway among those with the minimum clock, so runs are deterministic.

use tracing::error;

use super::Tick;
use crate::error::SchedulerError;

/// Fixed set of runway clocks for one run.
///
/// Created fresh per run and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunwayPool {
    clocks: Vec<Tick>,
}

impl RunwayPool {
    /// Creates `count` runways, all free at t=0.
    ///
    /// # Errors
    /// [`SchedulerError::ResourceConfig`] if `count` is zero.
    pub fn new(count: usize) -> Result<Self, SchedulerError> {
        if count == 0 {
            return Err(SchedulerError::ResourceConfig(
                "runway count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            clocks: vec![0; count],
        })
    }

    /// Single-runway pool.
    pub fn single() -> Self {
        Self { clocks: vec![0] }
    }

    /// Number of runways.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Always false: a pool has at least one runway.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Index of the earliest-free runway (ties → lowest index).
    pub fn select(&self) -> usize {
        let mut best = 0;
        for (idx, &clock) in self.clocks.iter().enumerate().skip(1) {
            if clock < self.clocks[best] {
                best = idx;
            }
        }
        best
    }

    /// Current clock of a runway.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn clock(&self, index: usize) -> Tick {
        self.clocks[index]
    }

    /// All runway clocks, by index.
    pub fn clocks(&self) -> &[Tick] {
        &self.clocks
    }

    /// Moves a runway clock forward to `to_tick`.
    ///
    /// # Errors
    /// [`SchedulerError::ClockInvariantViolation`] if `to_tick` is earlier
    /// than the runway's current clock. This is a policy bug, not bad input.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn advance(&mut self, index: usize, to_tick: Tick) -> Result<(), SchedulerError> {
        let current = self.clocks[index];
        if to_tick < current {
            error!(
                runway = index,
                current,
                requested = to_tick,
                "runway clock would move backwards"
            );
            return Err(SchedulerError::ClockInvariantViolation {
                runway: index,
                current,
                requested: to_tick,
            });
        }
        self.clocks[index] = to_tick;
        Ok(())
    }
}
