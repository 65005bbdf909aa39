use super::{arrival_order, end_tick, UNIT_SERVICE};
use crate::config::SchedulerConfig;
use crate::dispatching::{DispatchContext, DispatchPolicy, RunState};
use crate::error::SchedulerError;
use crate::models::{Assignment, Plane, RunwayPool};

/// First-Come-First-Served.
///
/// Planes are taken in arrival order (stable) and each goes to the
/// earliest-free runway, starting at `max(runway clock, arrival)`.
/// Single pass, no backtracking.
///
/// # Complexity
/// O(n log n) sort + O(n · R) runway scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl DispatchPolicy for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn description(&self) -> &'static str {
        "First-Come-First-Served"
    }

    fn dispatch(
        &self,
        planes: &[Plane],
        config: &SchedulerConfig,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(), SchedulerError> {
        let mut pool = RunwayPool::new(config.runway_count)?;
        let mut state = RunState::new(planes, |_| UNIT_SERVICE);

        for idx in arrival_order(planes) {
            let plane = &planes[idx];
            let runway = pool.select();
            let start = pool.clock(runway).max(plane.arrival_time);
            let end = end_tick(plane, start, state.execute(idx, UNIT_SERVICE))?;

            pool.advance(runway, end)?;
            state.complete(idx);
            ctx.emit(Assignment::for_plane(plane, runway, start, end))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::policies::test_support::{plane, slots};
    use crate::models::Tick;

    #[test]
    fn test_single_runway_sequencing() {
        let planes = vec![plane("A", 0, 1), plane("B", 0, 1), plane("C", 1, 1)];
        let outcome = Fcfs
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(
            slots(&outcome.schedule),
            vec![("A", 0, 0), ("B", 0, 1), ("C", 0, 2)]
        );
    }

    #[test]
    fn test_arrival_order_not_input_order() {
        let planes = vec![plane("late", 10, 1), plane("early", 2, 1)];
        let outcome = Fcfs
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(
            slots(&outcome.schedule),
            vec![("early", 0, 2), ("late", 0, 10)]
        );
    }

    #[test]
    fn test_two_runways() {
        // Arrivals [0, 0, 5]: both runways start at 0, third plane waits for its arrival
        let planes = vec![plane("P1", 0, 1), plane("P2", 0, 1), plane("P3", 5, 1)];
        let config = SchedulerConfig::default().with_runways(2);
        let outcome = Fcfs.schedule(&planes, &config, None).unwrap();
        assert_eq!(
            slots(&outcome.schedule),
            vec![("P1", 0, 0), ("P2", 1, 0), ("P3", 0, 5)]
        );
        assert_eq!(outcome.schedule.assignments[2].completed_at, 6);
    }

    #[test]
    fn test_equal_arrivals_keep_input_order() {
        let planes = vec![plane("Z", 3, 3), plane("A", 3, 1)];
        let outcome = Fcfs
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(slots(&outcome.schedule), vec![("Z", 0, 3), ("A", 0, 4)]);
    }

    #[test]
    fn test_last_tick_is_usable_once() {
        // The first plane ends exactly at Tick::MAX; the second has no room.
        let planes = vec![plane("A", Tick::MAX - 1, 1), plane("B", Tick::MAX - 1, 1)];
        let err = Fcfs
            .schedule(&planes, &SchedulerConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::TickOverflow { ref plane_id, start, .. }
            if plane_id == "B" && start == Tick::MAX));

        let outcome = Fcfs
            .schedule(&planes[..1], &SchedulerConfig::default(), None)
            .unwrap();
        assert_eq!(outcome.schedule.assignments[0].completed_at, Tick::MAX);
    }

    #[test]
    fn test_zero_runways_rejected() {
        let planes = vec![plane("A", 0, 1)];
        let config = SchedulerConfig::default().with_runways(0);
        assert!(matches!(
            Fcfs.schedule(&planes, &config, None),
            Err(SchedulerError::ResourceConfig(_))
        ));
    }
}
