//! Synthetic plane generation.
//!
//! Produces reproducible plane sets for benchmarks and tests: the same seed
//! always yields the same planes.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Plane, PlaneKind, Tick};

/// Seeded generator of synthetic planes.
///
/// # Example
/// ```
/// use runway_schedule::generate::PlaneGenerator;
///
/// let planes = PlaneGenerator::new(7).generate(100);
/// assert_eq!(planes.len(), 100);
/// assert_eq!(planes[0].id, "PL1001");
/// assert!(planes.iter().all(|p| p.deadline.unwrap() > p.arrival_time));
/// ```
#[derive(Debug, Clone)]
pub struct PlaneGenerator {
    seed: u64,
    kinds: Vec<PlaneKind>,
    max_arrival: Tick,
    max_priority: u32,
    min_slack: Tick,
    max_slack: Tick,
}

impl PlaneGenerator {
    /// Landing/takeoff traffic arriving over ticks 1..=300, priorities 1..=3,
    /// deadlines 10..=300 ticks after arrival.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            kinds: vec![PlaneKind::Landing, PlaneKind::Takeoff],
            max_arrival: 300,
            max_priority: 3,
            min_slack: 10,
            max_slack: 300,
        }
    }

    /// Sets the kinds to draw from (uniformly). Ignored if empty.
    pub fn with_kinds(mut self, kinds: Vec<PlaneKind>) -> Self {
        if !kinds.is_empty() {
            self.kinds = kinds;
        }
        self
    }

    /// Draws from all four standard kinds.
    pub fn with_all_kinds(self) -> Self {
        self.with_kinds(vec![
            PlaneKind::Landing,
            PlaneKind::Takeoff,
            PlaneKind::Cargo,
            PlaneKind::Emergency,
        ])
    }

    /// Sets the latest arrival tick (arrivals are drawn from `1..=max`).
    pub fn with_max_arrival(mut self, max_arrival: Tick) -> Self {
        self.max_arrival = max_arrival.max(1);
        self
    }

    /// Sets the lowest-urgency priority (priorities are drawn from `1..=max`).
    pub fn with_max_priority(mut self, max_priority: u32) -> Self {
        self.max_priority = max_priority.max(1);
        self
    }

    /// Sets the deadline slack range after arrival. `min` is at least 1.
    pub fn with_slack(mut self, min: Tick, max: Tick) -> Self {
        self.min_slack = min.max(1);
        self.max_slack = max.max(self.min_slack);
        self
    }

    /// Generates `count` planes with ids `PL1001`, `PL1002`, ...
    pub fn generate(&self, count: usize) -> Vec<Plane> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (1..=count)
            .map(|i| {
                let arrival = rng.random_range(1..=self.max_arrival);
                let kind = self
                    .kinds
                    .choose(&mut rng)
                    .cloned()
                    .unwrap_or(PlaneKind::Landing);
                Plane {
                    id: format!("PL{}", 1000 + i),
                    kind,
                    priority: rng.random_range(1..=self.max_priority),
                    arrival_time: arrival,
                    deadline: Some(arrival + rng.random_range(self.min_slack..=self.max_slack)),
                }
            })
            .collect()
    }
}
