//! Run driver and KPI evaluation.
//!
//! [`RunDriver`] validates a plane list, runs one of the dispatch policies
//! (in-line or on a worker thread) and wraps the outcome in a [`RunReport`]
//! with [`ScheduleKpi`] quality metrics.
//!
//! # KPI
//!
//! `ScheduleKpi` computes the run summary: average delay, runway
//! utilization and the priority-weighted score, plus makespan, deadline
//! misses and on-time rate.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod driver;
mod kpi;

pub use driver::{RunDriver, RunHandle, RunReport};
pub use kpi::ScheduleKpi;
