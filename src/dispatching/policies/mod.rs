//! Built-in dispatch policies.
//!
//! # Policies
//!
//! | Policy | Order | Runways | Service |
//! |--------|-------|---------|---------|
//! | FCFS | arrival (stable) | pool, earliest free | 1 tick |
//! | Optimized | (arrival, priority, id) | pool, least loaded | 1 tick |
//! | EDF | deadline (stable) | single | 1 tick |
//! | Round Robin | FIFO by arrival, quantum slices | single | quantum × kind weight |
//! | Priority Preemptive | lowest priority among arrived | single | 1 tick |
//!
//! Every policy starts a plane no earlier than its arrival tick.

mod edf;
mod fcfs;
mod optimized;
mod priority_preemptive;
mod round_robin;

pub use edf::Edf;
pub use fcfs::Fcfs;
pub use optimized::Optimized;
pub use priority_preemptive::PriorityPreemptive;
pub use round_robin::RoundRobin;

use crate::error::SchedulerError;
use crate::models::{Plane, Tick};

/// Service time of one plane under the single-pass policies.
pub const UNIT_SERVICE: Tick = 1;

/// Runway index used by the single-runway policies.
pub(crate) const SINGLE_RUNWAY: usize = 0;

/// Plane indices sorted by arrival tick, ties kept in input order.
pub(crate) fn arrival_order(planes: &[Plane]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..planes.len()).collect();
    order.sort_by_key(|&idx| planes[idx].arrival_time);
    order
}

/// Tick at which `work` ticks started at `start` end.
///
/// # Errors
/// [`SchedulerError::TickOverflow`] if the end is not representable.
pub(crate) fn end_tick(plane: &Plane, start: Tick, work: Tick) -> Result<Tick, SchedulerError> {
    start
        .checked_add(work)
        .ok_or_else(|| SchedulerError::TickOverflow {
            plane_id: plane.id.clone(),
            start,
            work,
        })
}
