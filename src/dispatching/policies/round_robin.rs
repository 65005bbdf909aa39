use std::collections::VecDeque;

use super::{arrival_order, end_tick, SINGLE_RUNWAY};
use crate::config::{SchedulerConfig, MAX_QUANTUM};
use crate::dispatching::{DispatchContext, DispatchPolicy, RunState};
use crate::error::SchedulerError;
use crate::models::{Assignment, Plane, RunwayPool, Tick};

/// Round Robin with a fixed quantum.
///
/// Each plane needs `quantum × weight` ticks of runway time, where the weight
/// comes from its kind (emergency 1, cargo 3, others 2). The head of the
/// ready FIFO runs for `min(remaining, quantum)` ticks; unfinished planes go
/// back to the tail. One assignment is emitted per slice, but progress is
/// reported once per completed plane.
///
/// Planes join the ready queue in arrival order once the runway clock has
/// reached their arrival tick, ahead of a plane preempted at that same
/// instant. With an empty ready queue the clock jumps to the next arrival.
///
/// # Invariant
/// Slices per plane = `ceil(initial_work / quantum)`, so assignments ≥ planes,
/// with equality iff no plane needs more than one quantum.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl DispatchPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn description(&self) -> &'static str {
        "Round Robin with quantum preemption"
    }

    fn dispatch(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError> {
        let quantum = config.quantum;
        if !(1..=MAX_QUANTUM).contains(&quantum) {
            return Err(SchedulerError::InvalidConfig(format!(
                "round-robin quantum must be within 1..={MAX_QUANTUM} ticks, got {quantum}"
            )));
        }

        let mut pool = RunwayPool::single();
        let mut state = RunState::new(planes, |p| p.round_robin_work(quantum));
        let mut pending: VecDeque<usize> = arrival_order(planes).into();
        let mut ready: VecDeque<usize> = VecDeque::with_capacity(planes.len());

        loop {
            let now = pool.clock(SINGLE_RUNWAY);
            admit_arrivals(planes, &mut pending, &mut ready, now);

            let Some(idx) = ready.pop_front() else {
                match pending.front() {
                    Some(&next) => {
                        pool.advance(SINGLE_RUNWAY, planes[next].arrival_time)?;
                        continue;
                    }
                    None => break,
                }
            };

            let plane = &planes[idx];
            let end = end_tick(plane, now, state.execute(idx, quantum))?;
            pool.advance(SINGLE_RUNWAY, end)?;
            ctx.record(Assignment::for_plane(plane, SINGLE_RUNWAY, now, end))?;

            if state.remaining(idx) == 0 {
                state.complete(idx);
                ctx.notify(state.completed_count())?;
            } else {
                admit_arrivals(planes, &mut pending, &mut ready, end);
                ready.push_back(idx);
            }
        }

        Ok(())
    }
}

/// Moves every pending plane that has arrived by `now` to the ready tail.
fn admit_arrivals(
    planes: &[Plane],
    pending: &mut VecDeque<usize>,
    ready: &mut VecDeque<usize>,
    now: Tick,
) {
    while let Some(&idx) = pending.front() {
        if planes[idx].arrival_time > now {
            break;
        }
        pending.pop_front();
        ready.push_back(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::policies::test_support::{kinded, slots};
    use crate::dispatching::ProgressEvent;
    use crate::error::ObserverError;
    use crate::models::PlaneKind;

    #[test]
    fn test_single_cargo_plane() {
        let planes = vec![kinded("C1", PlaneKind::Cargo, 0)];
        let outcome = RoundRobin
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();

        let completed: Vec<u64> = outcome
            .schedule
            .assignments
            .iter()
            .map(|a| a.completed_at)
            .collect();
        assert_eq!(completed, vec![2, 4, 6]);
        assert!(outcome.schedule.assignments.iter().all(|a| a.duration() == 2));
    }

    #[test]
    fn test_interleaves_slices() {
        let planes = vec![
            kinded("L", PlaneKind::Landing, 0),   // 4 ticks
            kinded("E", PlaneKind::Emergency, 0), // 2 ticks
        ];
        let outcome = RoundRobin
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(
            slots(&outcome.schedule),
            vec![("L", 0, 0), ("E", 0, 2), ("L", 0, 4)]
        );
    }

    #[test]
    fn test_progress_per_completed_plane() {
        let planes = vec![
            kinded("C", PlaneKind::Cargo, 0),     // 3 slices
            kinded("E", PlaneKind::Emergency, 0), // 1 slice
        ];
        let mut counts = Vec::new();
        let mut observer = |event: &ProgressEvent| -> Result<(), ObserverError> {
            counts.push(event.completed);
            Ok(())
        };
        let outcome = RoundRobin
            .schedule(&planes, &SchedulerConfig::default(), Some(&mut observer))
            .unwrap();

        assert_eq!(outcome.schedule.assignment_count(), 4);
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_idle_until_first_arrival() {
        let planes = vec![kinded("E", PlaneKind::Emergency, 7)];
        let outcome = RoundRobin
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(slots(&outcome.schedule), vec![("E", 0, 7)]);
        assert_eq!(outcome.schedule.assignments[0].completed_at, 9);
    }

    #[test]
    fn test_new_arrival_queued_ahead_of_preempted() {
        // Q=2. L runs [0,2); N arrives at 1 and is admitted before L returns.
        let planes = vec![
            kinded("L", PlaneKind::Landing, 0),
            kinded("N", PlaneKind::Emergency, 1),
        ];
        let outcome = RoundRobin
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(
            slots(&outcome.schedule),
            vec![("L", 0, 0), ("N", 0, 2), ("L", 0, 4)]
        );
    }

    #[test]
    fn test_custom_quantum() {
        let planes = vec![kinded("T", PlaneKind::Takeoff, 0)];
        let config = SchedulerConfig::default().with_quantum(3);
        let outcome = RoundRobin.schedule(&planes, &config, None).unwrap();
        // 2 × 3 = 6 ticks in two slices
        assert_eq!(slots(&outcome.schedule), vec![("T", 0, 0), ("T", 0, 3)]);
    }

    #[test]
    fn test_oversized_quantum_rejected() {
        let planes = vec![kinded("E", PlaneKind::Emergency, 1)];
        let config = SchedulerConfig::default().with_quantum(Tick::MAX);
        assert!(matches!(
            RoundRobin.schedule(&planes, &config, None),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_slice_past_clock_range() {
        // One quantum of emergency work only fits if it starts by Tick::MAX - quantum.
        let planes = vec![kinded("E", PlaneKind::Emergency, Tick::MAX - MAX_QUANTUM + 1)];
        let config = SchedulerConfig::default().with_quantum(MAX_QUANTUM);
        match RoundRobin.schedule(&planes, &config, None).unwrap_err() {
            SchedulerError::TickOverflow {
                plane_id,
                start,
                work,
            } => {
                assert_eq!(plane_id, "E");
                assert_eq!(start, Tick::MAX - MAX_QUANTUM + 1);
                assert_eq!(work, MAX_QUANTUM);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let planes = vec![kinded("E", PlaneKind::Emergency, Tick::MAX - MAX_QUANTUM)];
        let outcome = RoundRobin.schedule(&planes, &config, None).unwrap();
        assert_eq!(outcome.schedule.assignments[0].completed_at, Tick::MAX);
    }

    #[test]
    fn test_zero_quantum_rejected() {
        let planes = vec![kinded("T", PlaneKind::Takeoff, 0)];
        let config = SchedulerConfig::default().with_quantum(0);
        assert!(matches!(
            RoundRobin.schedule(&planes, &config, None),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }
}
