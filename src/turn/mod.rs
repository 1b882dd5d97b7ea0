//! Turn scheduling - one logical timeline for every actor
//!
//! Handlers pop the earliest event, resolve it, and push the actor's next
//! event at `now + cost`. Wall-clock time never enters the picture.

pub mod event;
pub mod scheduler;

pub use event::{EventKind, ScheduledEvent};
pub use scheduler::Scheduler;
