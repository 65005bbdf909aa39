//! Property tests over randomly generated plane sets.

use std::collections::HashMap;

use proptest::prelude::*;

use runway_schedule::config::SchedulerConfig;
use runway_schedule::dispatching::{DispatchPolicy, PolicyKind};
use runway_schedule::error::SchedulerError;
use runway_schedule::models::{Plane, PlaneKind, Schedule, Tick};

fn kind_strategy() -> impl Strategy<Value = PlaneKind> {
    prop_oneof![
        Just(PlaneKind::Landing),
        Just(PlaneKind::Takeoff),
        Just(PlaneKind::Cargo),
        Just(PlaneKind::Emergency),
    ]
}

/// Planes with unique ids, arrivals in 0..50, priorities 1..=3 and a
/// deadline after arrival.
fn planes_strategy() -> impl Strategy<Value = Vec<Plane>> {
    prop::collection::vec((kind_strategy(), 0..50u64, 1..=3u32, 1..100u64), 1..40).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (kind, arrival, priority, slack))| {
                    Plane::new(format!("PL{}", 1000 + i))
                        .with_kind(kind)
                        .with_arrival(arrival)
                        .with_priority(priority)
                        .with_deadline(arrival + slack)
                })
                .collect()
        },
    )
}

fn run(kind: PolicyKind, planes: &[Plane], config: &SchedulerConfig) -> Schedule {
    kind.policy()
        .schedule(planes, config, None)
        .expect("policy run failed")
        .schedule
}

fn per_plane_counts(schedule: &Schedule) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for a in &schedule.assignments {
        *counts.entry(a.plane_id.as_str()).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn single_pass_policies_schedule_each_plane_once(
        planes in planes_strategy(),
        runways in 1..4usize,
    ) {
        let config = SchedulerConfig::default().with_runways(runways);
        let single_pass = [
            PolicyKind::Fcfs,
            PolicyKind::Optimized,
            PolicyKind::Edf,
            PolicyKind::PriorityPreemptive,
        ];
        for kind in single_pass {
            let schedule = run(kind, &planes, &config);
            prop_assert_eq!(schedule.assignment_count(), planes.len());
            let counts = per_plane_counts(&schedule);
            for plane in &planes {
                prop_assert_eq!(counts.get(plane.id.as_str()), Some(&1));
            }
        }
    }

    #[test]
    fn no_plane_starts_before_arrival(
        planes in planes_strategy(),
        runways in 1..4usize,
        quantum in 1..5u64,
    ) {
        let config = SchedulerConfig::default().with_runways(runways).with_quantum(quantum);
        let arrivals: HashMap<&str, Tick> =
            planes.iter().map(|p| (p.id.as_str(), p.arrival_time)).collect();
        for kind in PolicyKind::ALL {
            let schedule = run(kind, &planes, &config);
            for a in &schedule.assignments {
                prop_assert!(a.scheduled_at >= arrivals[a.plane_id.as_str()]);
                prop_assert_eq!(a.arrival_time, arrivals[a.plane_id.as_str()]);
                prop_assert!(a.completed_at > a.scheduled_at);
            }
        }
    }

    #[test]
    fn runway_clocks_never_decrease(
        planes in planes_strategy(),
        runways in 1..5usize,
    ) {
        let config = SchedulerConfig::default().with_runways(runways);
        for kind in [PolicyKind::Fcfs, PolicyKind::Optimized] {
            let schedule = run(kind, &planes, &config);
            let mut clocks = vec![0; runways];
            for a in &schedule.assignments {
                prop_assert!(a.runway < runways);
                prop_assert!(a.scheduled_at >= clocks[a.runway]);
                clocks[a.runway] = a.completed_at;
            }
        }
    }

    #[test]
    fn edf_emits_in_deadline_order(planes in planes_strategy()) {
        let schedule = run(PolicyKind::Edf, &planes, &SchedulerConfig::default());
        let deadlines: HashMap<&str, Tick> = planes
            .iter()
            .map(|p| (p.id.as_str(), p.deadline.unwrap_or(Tick::MAX)))
            .collect();
        let emitted: Vec<Tick> = schedule
            .assignments
            .iter()
            .map(|a| deadlines[a.plane_id.as_str()])
            .collect();
        prop_assert!(emitted.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn round_robin_slices_cover_work(
        planes in planes_strategy(),
        quantum in 1..5u64,
    ) {
        let config = SchedulerConfig::default().with_quantum(quantum);
        let schedule = run(PolicyKind::RoundRobin, &planes, &config);
        for plane in &planes {
            let work = plane.round_robin_work(quantum);
            let slices = schedule.assignments_for_plane(&plane.id);
            let executed: Tick = slices.iter().map(|a| a.duration()).sum();
            prop_assert_eq!(executed, work);
            prop_assert_eq!(slices.len() as Tick, work.div_ceil(quantum));
        }
        prop_assert!(schedule.assignment_count() >= planes.len());
    }

    #[test]
    fn priority_preemptive_orders_equal_arrivals(
        priorities in prop::collection::vec(1..=5u32, 2..20),
    ) {
        let planes: Vec<Plane> = priorities
            .iter()
            .enumerate()
            .map(|(i, &priority)| Plane::new(format!("PL{i:03}")).with_priority(priority))
            .collect();
        let schedule = run(PolicyKind::PriorityPreemptive, &planes, &SchedulerConfig::default());
        let by_id: HashMap<&str, u32> =
            planes.iter().map(|p| (p.id.as_str(), p.priority)).collect();
        let emitted: Vec<u32> = schedule
            .assignments
            .iter()
            .map(|a| by_id[a.plane_id.as_str()])
            .collect();
        prop_assert!(emitted.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn arrivals_near_clock_limit_never_wrap(
        offsets in prop::collection::vec(0..8u64, 1..6),
        runways in 1..3usize,
        quantum in 1..4u64,
    ) {
        let planes: Vec<Plane> = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| Plane::new(format!("PL{i}")).with_arrival(Tick::MAX - offset))
            .collect();
        let config = SchedulerConfig::default().with_runways(runways).with_quantum(quantum);
        for kind in PolicyKind::ALL {
            match kind.policy().schedule(&planes, &config, None) {
                Ok(outcome) => {
                    for a in &outcome.schedule.assignments {
                        prop_assert!(a.scheduled_at >= a.arrival_time);
                        prop_assert!(a.completed_at > a.scheduled_at);
                    }
                }
                Err(SchedulerError::TickOverflow { .. }) => {}
                Err(other) => prop_assert!(false, "{}: {:?}", kind, other),
            }
        }
    }

    #[test]
    fn runs_are_idempotent(
        planes in planes_strategy(),
        runways in 1..4usize,
    ) {
        let config = SchedulerConfig::default().with_runways(runways);
        for kind in PolicyKind::ALL {
            prop_assert_eq!(run(kind, &planes, &config), run(kind, &planes, &config));
        }
    }
}

#[test]
fn edf_example() {
    let planes = vec![
        Plane::new("P1").with_priority(2).with_deadline(10),
        Plane::new("P2").with_priority(1).with_deadline(5),
    ];
    let schedule = run(PolicyKind::Edf, &planes, &SchedulerConfig::default());
    let slots: Vec<(&str, Tick)> = schedule
        .assignments
        .iter()
        .map(|a| (a.plane_id.as_str(), a.scheduled_at))
        .collect();
    assert_eq!(slots, vec![("P2", 0), ("P1", 1)]);
}

#[test]
fn fcfs_two_runway_example() {
    let planes = vec![
        Plane::new("A").with_arrival(0),
        Plane::new("B").with_arrival(0),
        Plane::new("C").with_arrival(5),
    ];
    let schedule = run(
        PolicyKind::Fcfs,
        &planes,
        &SchedulerConfig::default().with_runways(2),
    );
    let slots: Vec<(usize, Tick)> = schedule
        .assignments
        .iter()
        .map(|a| (a.runway, a.scheduled_at))
        .collect();
    assert_eq!(slots, vec![(0, 0), (1, 0), (0, 5)]);
}

#[test]
fn round_robin_cargo_example() {
    let planes = vec![Plane::new("C1").with_kind(PlaneKind::Cargo)];
    let schedule = run(PolicyKind::RoundRobin, &planes, &SchedulerConfig::default());
    let completed: Vec<Tick> = schedule.assignments.iter().map(|a| a.completed_at).collect();
    assert_eq!(completed, vec![2, 4, 6]);
}
