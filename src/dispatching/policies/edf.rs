use super::{end_tick, SINGLE_RUNWAY, UNIT_SERVICE};
use crate::config::SchedulerConfig;
use crate::dispatching::{DispatchContext, DispatchPolicy, RunState};
use crate::error::SchedulerError;
use crate::models::{Assignment, Plane, RunwayPool, Tick};

/// Earliest Deadline First.
///
/// Planes are sorted once by deadline (stable) and served in that order on a
/// single runway, each starting at `max(clock, arrival)`. The order is static:
/// planes arriving later never reorder the batch.
///
/// Planes without a deadline sort last; the run driver rejects them up front.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on a single machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Edf;

impl DispatchPolicy for Edf {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn description(&self) -> &'static str {
        "Earliest Deadline First"
    }

    fn requires_deadlines(&self) -> bool {
        true
    }

    fn dispatch(
        &self,
        planes: &[Plane],
        _config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError> {
        let mut pool = RunwayPool::single();
        let mut state = RunState::new(planes, |_| UNIT_SERVICE);

        let mut order: Vec<usize> = (0..planes.len()).collect();
        order.sort_by_key(|&idx| planes[idx].deadline.unwrap_or(Tick::MAX));

        for idx in order {
            let plane = &planes[idx];
            let start = pool.clock(SINGLE_RUNWAY).max(plane.arrival_time);
            let end = end_tick(plane, start, state.execute(idx, UNIT_SERVICE))?;

            pool.advance(SINGLE_RUNWAY, end)?;
            state.complete(idx);
            ctx.emit(Assignment::for_plane(plane, SINGLE_RUNWAY, start, end))?;
        }

        Ok(())
    }
}
