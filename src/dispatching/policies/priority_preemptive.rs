use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use super::{arrival_order, end_tick, SINGLE_RUNWAY, UNIT_SERVICE};
use crate::config::SchedulerConfig;
use crate::dispatching::{DispatchContext, DispatchPolicy, RunState};
use crate::error::SchedulerError;
use crate::models::{Assignment, Plane, RunwayPool, Tick};

/// Fixed-priority dispatch re-evaluated at every pick.
///
/// At each step the ready set is every plane that has arrived and is not yet
/// scheduled. The plane with the lowest `(priority, arrival_time, id)` runs
/// for its single service tick. With nothing ready the clock advances to the
/// next arrival. A newly arrived plane can only win before a pick is made;
/// nothing is interrupted mid-service.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityPreemptive;

impl DispatchPolicy for PriorityPreemptive {
    fn name(&self) -> &'static str {
        "Priority Preemptive"
    }

    fn description(&self) -> &'static str {
        "Fixed-priority selection among arrived planes"
    }

    fn dispatch(
        &self,
        planes: &[Plane],
        _config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError> {
        let mut pool = RunwayPool::single();
        let mut state = RunState::new(planes, |_| UNIT_SERVICE);
        let mut pending: VecDeque<usize> = arrival_order(planes).into();
        let mut ready: BinaryHeap<Reverse<(u32, Tick, &str, usize)>> =
            BinaryHeap::with_capacity(planes.len());

        while !state.all_completed() {
            let now = pool.clock(SINGLE_RUNWAY);
            while let Some(&idx) = pending.front() {
                let plane = &planes[idx];
                if plane.arrival_time > now {
                    break;
                }
                pending.pop_front();
                ready.push(Reverse((
                    plane.priority,
                    plane.arrival_time,
                    plane.id.as_str(),
                    idx,
                )));
            }

            let Some(Reverse((.., idx))) = ready.pop() else {
                match pending.front() {
                    Some(&next) => {
                        pool.advance(SINGLE_RUNWAY, planes[next].arrival_time)?;
                        continue;
                    }
                    None => break,
                }
            };

            let plane = &planes[idx];
            let work = state.remaining(idx);
            let end = end_tick(plane, now, state.execute(idx, work))?;
            pool.advance(SINGLE_RUNWAY, end)?;
            state.complete(idx);
            ctx.emit(Assignment::for_plane(plane, SINGLE_RUNWAY, now, end))?;
        }

        Ok(())
    }
}
