//! Schedule quality metrics (KPIs).
//!
//! Pure statistics derived from a finished schedule; no policy state is
//! involved.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Average Delay | mean(scheduled_at − arrival) over assignments |
//! | Runway Utilization | (latest − earliest + 1) / (latest + 1), on `scheduled_at` |
//! | Weighted Score | mean(priority × (scheduled_at − arrival)) |
//! | Makespan (C_max) | Latest `completed_at` |
//! | Deadline Misses | Planes completing after their deadline |
//! | On-Time Rate | Fraction of deadline-bearing planes completing on time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Plane, Schedule, Tick};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Assignments in the schedule (round robin: slices).
    pub assignment_count: usize,
    /// Distinct planes with at least one assignment.
    pub planes_scheduled: usize,
    pub earliest_scheduled: Tick,
    pub latest_scheduled: Tick,
    /// Latest `completed_at`.
    pub makespan: Tick,
    /// Mean wait between arrival and start, in ticks.
    pub average_delay: f64,
    /// Fraction of `[0, latest]` spanned by scheduled starts (0.0..1.0).
    pub runway_utilization: f64,
    /// Priority-weighted mean delay.
    pub weighted_score: f64,
    /// Planes finishing after their deadline.
    pub deadline_misses: usize,
    /// Sum of max(0, completion − deadline).
    pub total_tardiness: Tick,
    /// On-time fraction among planes with deadlines (1.0 if none).
    pub on_time_rate: f64,
    pub assignments_per_runway: BTreeMap<usize, usize>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its input planes.
    ///
    /// # Arguments
    /// * `schedule` - The completed schedule.
    /// * `planes` - The input planes (for deadlines).
    pub fn calculate(schedule: &Schedule, planes: &[Plane]) -> Self {
        let assignments = &schedule.assignments;
        let count = assignments.len();

        let earliest = assignments.iter().map(|a| a.scheduled_at).min().unwrap_or(0);
        let latest = assignments.iter().map(|a| a.scheduled_at).max().unwrap_or(0);

        let (total_delay, total_weighted) =
            assignments
                .iter()
                .fold((0.0_f64, 0.0_f64), |(delay, weighted), a| {
                    let d = a.delay() as f64;
                    (delay + d, weighted + a.priority as f64 * d)
                });

        let (average_delay, weighted_score, runway_utilization) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                total_delay / count as f64,
                total_weighted / count as f64,
                ((latest - earliest) as f64 + 1.0) / (latest as f64 + 1.0),
            )
        };

        // Completion per plane = latest end of its assignments
        let mut completion: HashMap<&str, Tick> = HashMap::new();
        for a in assignments {
            let entry = completion.entry(a.plane_id.as_str()).or_insert(0);
            *entry = (*entry).max(a.completed_at);
        }

        let mut deadline_misses = 0;
        let mut total_tardiness: Tick = 0;
        let mut with_deadline = 0;
        for plane in planes {
            let (Some(deadline), Some(&done)) = (plane.deadline, completion.get(plane.id.as_str()))
            else {
                continue;
            };
            with_deadline += 1;
            if done > deadline {
                deadline_misses += 1;
                total_tardiness = total_tardiness.saturating_add(done - deadline);
            }
        }

        let on_time_rate = if with_deadline == 0 {
            1.0
        } else {
            (with_deadline - deadline_misses) as f64 / with_deadline as f64
        };

        Self {
            assignment_count: count,
            planes_scheduled: completion.len(),
            earliest_scheduled: earliest,
            latest_scheduled: latest,
            makespan: schedule.makespan(),
            average_delay,
            runway_utilization,
            weighted_score,
            deadline_misses,
            total_tardiness,
            on_time_rate,
            assignments_per_runway: schedule.assignments_per_runway(),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_average_delay: f64, min_on_time_rate: f64) -> bool {
        self.average_delay <= max_average_delay && self.on_time_rate >= min_on_time_rate
    }
}

impl fmt::Display for ScheduleKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Planes Scheduled: {}", self.planes_scheduled)?;
        writeln!(f, "Earliest Scheduled Time: {}", self.earliest_scheduled)?;
        writeln!(f, "Latest Scheduled Time: {}", self.latest_scheduled)?;
        writeln!(f, "Average Delay per Plane: {:.2}", self.average_delay)?;
        writeln!(
            f,
            "Runway Utilization: {:.2}%",
            self.runway_utilization * 100.0
        )?;
        write!(
            f,
            "Priority-Weighted Completion Score: {:.2}",
            self.weighted_score
        )
    }
}
