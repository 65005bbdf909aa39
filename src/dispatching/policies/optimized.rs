use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{end_tick, UNIT_SERVICE};
use crate::config::SchedulerConfig;
use crate::dispatching::{DispatchContext, DispatchPolicy, RunState};
use crate::error::SchedulerError;
use crate::models::{Assignment, Plane, RunwayPool, Tick};

/// Load-balanced, priority-aware dispatch.
///
/// A min-heap releases planes by `(arrival_time, priority, id)`; each goes to
/// the least-loaded runway (lowest clock, ties → lowest index), tracked in a
/// second min-heap of `(clock, runway)`.
///
/// # Complexity
/// O(n log n + n log R) throughout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimized;

impl DispatchPolicy for Optimized {
    fn name(&self) -> &'static str {
        "Optimized"
    }

    fn description(&self) -> &'static str {
        "Load-balanced priority dispatch"
    }

    fn dispatch(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError> {
        let mut pool = RunwayPool::new(config.runway_count)?;
        let mut state = RunState::new(planes, |_| UNIT_SERVICE);

        let mut queue: BinaryHeap<Reverse<(Tick, u32, &str, usize)>> = planes
            .iter()
            .enumerate()
            .map(|(idx, p)| Reverse((p.arrival_time, p.priority, p.id.as_str(), idx)))
            .collect();
        let mut free: BinaryHeap<Reverse<(Tick, usize)>> =
            (0..pool.len()).map(|runway| Reverse((0, runway))).collect();

        while let Some(Reverse((arrival, _, _, idx))) = queue.pop() {
            let Some(Reverse((clock, runway))) = free.pop() else {
                break;
            };
            debug_assert_eq!(runway, pool.select());

            let plane = &planes[idx];
            let start = clock.max(arrival);
            let end = end_tick(plane, start, state.execute(idx, UNIT_SERVICE))?;

            pool.advance(runway, end)?;
            free.push(Reverse((end, runway)));
            state.complete(idx);
            ctx.emit(Assignment::for_plane(plane, runway, start, end))?;
        }

        Ok(())
    }
}
