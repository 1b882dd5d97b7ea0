//! Discrete-event scheduler
//!
//! A min-heap of pending events ordered by `(time, sequence)`. Popping is
//! the only thing that advances the clock.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Tick};
use crate::turn::event::{EventKind, ScheduledEvent};

/// Heap entry; reversed so `BinaryHeap` pops the smallest key
#[derive(Debug, Clone, Copy)]
struct QueueEntry(ScheduledEvent);

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.key() == other.0.key()
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.0.key().cmp(&self.0.key())
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending actor actions
#[derive(Debug, Clone)]
pub struct Scheduler {
    heap: BinaryHeap<QueueEntry>,
    capacity: usize,
    clock: Tick,
    next_sequence: u64,
}

impl Scheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
            clock: 0,
            next_sequence: 0,
        }
    }

    /// Insert an event at an absolute time
    ///
    /// Fails with `QueueFull` once `capacity` events are pending. Times in
    /// the past are clamped to the current clock.
    pub fn schedule(&mut self, time: Tick, actor_id: ActorId, kind: EventKind) -> Result<()> {
        if self.heap.len() >= self.capacity {
            tracing::warn!(
                actor = %actor_id,
                ?kind,
                capacity = self.capacity,
                "Event queue full, event rejected"
            );
            return Err(SimError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.push(time, actor_id, kind);
        Ok(())
    }

    /// Insert an event `cost` ticks after the current clock
    pub fn schedule_after(&mut self, cost: Tick, actor_id: ActorId, kind: EventKind) -> Result<()> {
        self.schedule(self.clock + cost, actor_id, kind)
    }

    /// Insert a liveness-critical event; never fails
    ///
    /// May grow the queue past `capacity`.
    pub fn schedule_critical(&mut self, time: Tick, actor_id: ActorId, kind: EventKind) {
        if self.heap.len() >= self.capacity {
            tracing::warn!(
                actor = %actor_id,
                ?kind,
                pending = self.heap.len(),
                "Scheduling critical event past queue capacity"
            );
        }
        self.push(time, actor_id, kind);
    }

    fn push(&mut self, time: Tick, actor_id: ActorId, kind: EventKind) {
        let time = if time < self.clock {
            tracing::debug!(
                actor = %actor_id,
                requested = time,
                now = self.clock,
                "Clamping stale event time to current clock"
            );
            self.clock
        } else {
            time
        };

        let event = ScheduledEvent {
            time,
            actor_id,
            kind,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(QueueEntry(event));
    }

    /// Remove and return the earliest event, advancing the clock to its time
    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        let QueueEntry(event) = self.heap.pop()?;
        self.clock = event.time;
        Some(event)
    }

    /// Like `pop_next`, but an empty queue yields a fallback event at
    /// `now + delay` instead of nothing
    pub fn pop_next_or(&mut self, delay: Tick, actor_id: ActorId, kind: EventKind) -> ScheduledEvent {
        if let Some(event) = self.pop_next() {
            return event;
        }
        tracing::warn!(actor = %actor_id, ?kind, now = self.clock, "Event queue empty, rescheduling");
        let event = ScheduledEvent {
            time: self.clock + delay,
            actor_id,
            kind,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.clock = event.time;
        event
    }

    /// Time of the earliest pending event, without removing it
    pub fn peek_time(&self) -> Option<Tick> {
        self.heap.peek().map(|entry| entry.0.time)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current logical time
    pub fn now(&self) -> Tick {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_earliest_first() {
        let mut scheduler = Scheduler::new(16);
        scheduler.schedule(300, ActorId(1), EventKind::Move).unwrap();
        scheduler.schedule(100, ActorId(2), EventKind::Move).unwrap();
        scheduler.schedule(200, ActorId(3), EventKind::AttackReady).unwrap();

        let order: Vec<Tick> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| e.time)
            .collect();
        assert_eq!(order, vec![100, 200, 300]);
    }

    #[test]
    fn test_ties_resolve_in_insertion_order() {
        let mut scheduler = Scheduler::new(16);
        for id in 0..5 {
            scheduler.schedule(50, ActorId(id), EventKind::Move).unwrap();
        }

        let actors: Vec<u32> = std::iter::from_fn(|| scheduler.pop_next())
            .map(|e| e.actor_id.0)
            .collect();
        assert_eq!(actors, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_advances_clock() {
        let mut scheduler = Scheduler::new(16);
        assert_eq!(scheduler.now(), 0);
        scheduler.schedule(120, ActorId(0), EventKind::Move).unwrap();

        let event = scheduler.pop_next().unwrap();
        assert_eq!(event.time, 120);
        assert_eq!(scheduler.now(), 120);
    }

    #[test]
    fn test_schedule_after_is_relative_to_clock() {
        let mut scheduler = Scheduler::new(16);
        scheduler.schedule(500, ActorId(0), EventKind::Move).unwrap();
        scheduler.pop_next();

        scheduler.schedule_after(100, ActorId(0), EventKind::Move).unwrap();
        assert_eq!(scheduler.peek_time(), Some(600));
    }

    #[test]
    fn test_queue_full_rejects() {
        let mut scheduler = Scheduler::new(2);
        scheduler.schedule(1, ActorId(1), EventKind::Move).unwrap();
        scheduler.schedule(2, ActorId(2), EventKind::Move).unwrap();

        let result = scheduler.schedule(3, ActorId(3), EventKind::Move);
        assert!(matches!(result, Err(SimError::QueueFull { capacity: 2 })));
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_critical_schedule_ignores_capacity() {
        let mut scheduler = Scheduler::new(1);
        scheduler.schedule(1, ActorId(1), EventKind::Move).unwrap();
        scheduler.schedule_critical(2, ActorId(0), EventKind::Move);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_stale_time_clamped_to_clock() {
        let mut scheduler = Scheduler::new(8);
        scheduler.schedule(1000, ActorId(1), EventKind::Move).unwrap();
        scheduler.pop_next();

        scheduler.schedule(10, ActorId(2), EventKind::Move).unwrap();
        let event = scheduler.pop_next().unwrap();
        assert_eq!(event.time, 1000);
        assert_eq!(scheduler.now(), 1000);
    }

    #[test]
    fn test_empty_queue_pops_none() {
        let mut scheduler = Scheduler::new(4);
        assert!(scheduler.is_empty());
        assert!(scheduler.pop_next().is_none());
        assert_eq!(scheduler.now(), 0);
    }

    #[test]
    fn test_pop_next_or_falls_back_when_empty() {
        let mut scheduler = Scheduler::new(4);
        scheduler.schedule(250, ActorId(1), EventKind::Move).unwrap();

        let queued = scheduler.pop_next_or(100, ActorId(0), EventKind::Move);
        assert_eq!(queued.actor_id, ActorId(1));

        let fallback = scheduler.pop_next_or(100, ActorId(0), EventKind::Move);
        assert_eq!(fallback.actor_id, ActorId(0));
        assert_eq!(fallback.time, 350);
        assert_eq!(scheduler.now(), 350);
        assert!(fallback.sequence > queued.sequence);
    }
}
