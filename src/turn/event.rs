//! Scheduled events on the logical timeline

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Tick};

/// What an actor does when its event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Decision point: player input or AI turn
    Move,
    /// An auto-attack swing lands
    AttackReady,
    /// A defeated actor tries to come back
    Respawn,
}

/// A pending action, consumed exactly once when popped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Absolute tick at which the event fires
    pub time: Tick,
    pub actor_id: ActorId,
    pub kind: EventKind,
    /// Insertion counter; breaks ties between events at the same time
    pub sequence: u64,
}

impl ScheduledEvent {
    /// Ordering key: earlier time first, then earlier insertion
    pub fn key(&self) -> (Tick, u64) {
        (self.time, self.sequence)
    }
}
