//! Auto-attack combat
//!
//! Engaging starts a chain of `AttackReady` events, one per weapon delay,
//! that runs until the attacker disengages or the target drops. Damage
//! numbers are placeholder arithmetic.

pub mod engagement;
pub mod resolution;

use crate::core::config::SimulationConfig;
use crate::entity::registry::ActorTable;
use crate::spatial::map::Map;
use crate::turn::scheduler::Scheduler;

pub use engagement::{disengage, engage, EngageOutcome};
pub use resolution::{resolve_respawn, resolve_swing, RespawnOutcome, SwingReport};

/// World state combat may read and change
pub struct CombatContext<'a> {
    pub actors: &'a mut ActorTable,
    pub map: &'a mut Map,
    pub scheduler: &'a mut Scheduler,
    pub config: &'a SimulationConfig,
}
