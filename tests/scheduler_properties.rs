//! Scheduler ordering properties

use grindfest::core::types::ActorId;
use grindfest::turn::{EventKind, Scheduler};
use grindfest::SimError;
use proptest::prelude::*;

#[test]
fn test_clock_only_moves_on_pop() {
    let mut scheduler = Scheduler::new(8);
    scheduler.schedule(400, ActorId(1), EventKind::Move).unwrap();
    scheduler.schedule(100, ActorId(2), EventKind::AttackReady).unwrap();
    assert_eq!(scheduler.now(), 0);

    let first = scheduler.pop_next().unwrap();
    assert_eq!((first.time, scheduler.now()), (100, 100));

    scheduler.schedule_after(50, ActorId(2), EventKind::AttackReady).unwrap();
    assert_eq!(scheduler.now(), 100);
    assert_eq!(scheduler.pop_next().map(|e| e.time), Some(150));
    assert_eq!(scheduler.pop_next().map(|e| e.time), Some(400));
    assert!(scheduler.is_empty());
}

#[test]
fn test_full_queue_recoverable() {
    let mut scheduler = Scheduler::new(3);
    for t in 0..3 {
        scheduler.schedule(t * 10, ActorId(t as u32), EventKind::Move).unwrap();
    }
    assert!(matches!(
        scheduler.schedule(99, ActorId(9), EventKind::Move),
        Err(SimError::QueueFull { capacity: 3 })
    ));

    // Draining one makes room again
    scheduler.pop_next();
    assert!(scheduler.schedule(99, ActorId(9), EventKind::Move).is_ok());
    assert_eq!(scheduler.len(), 3);
}

proptest! {
    #[test]
    fn test_pops_in_time_then_insertion_order(times in prop::collection::vec(0_u64..500, 1..200)) {
        let mut scheduler = Scheduler::new(1024);
        for (i, time) in times.iter().enumerate() {
            scheduler.schedule(*time, ActorId(i as u32), EventKind::Move).unwrap();
        }

        let popped: Vec<_> = std::iter::from_fn(|| scheduler.pop_next()).collect();
        prop_assert_eq!(popped.len(), times.len());
        for pair in popped.windows(2) {
            prop_assert!(pair[0].key() < pair[1].key());
            if pair[0].time == pair[1].time {
                // Same time: inserted first, popped first
                prop_assert!(pair[0].actor_id.0 < pair[1].actor_id.0);
            }
        }
    }

    #[test]
    fn test_clock_is_monotonic(
        ops in prop::collection::vec((any::<bool>(), 0_u64..1000), 1..300)
    ) {
        let mut scheduler = Scheduler::new(1024);
        let mut last = scheduler.now();
        for (push, value) in ops {
            if push {
                // Some of these land in the past and get clamped
                let _ = scheduler.schedule(value, ActorId(0), EventKind::Move);
            } else if let Some(event) = scheduler.pop_next() {
                prop_assert_eq!(scheduler.now(), event.time);
            }
            prop_assert!(scheduler.now() >= last);
            last = scheduler.now();
        }
    }

    #[test]
    fn test_relative_scheduling_never_precedes_now(costs in prop::collection::vec(0_u64..300, 1..100)) {
        let mut scheduler = Scheduler::new(1024);
        scheduler.schedule(0, ActorId(0), EventKind::Move).unwrap();
        for cost in costs {
            let event = scheduler.pop_next().unwrap();
            prop_assert_eq!(event.time, scheduler.now());
            scheduler.schedule_after(cost, event.actor_id, EventKind::Move).unwrap();
            prop_assert_eq!(scheduler.peek_time(), Some(scheduler.now() + cost));
        }
    }
}
