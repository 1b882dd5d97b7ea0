//! Actors and the table that owns them

pub mod actor;
pub mod behavior;
pub mod registry;

pub use actor::{Actor, CombatState, Senses, Vitals};
pub use behavior::{Behavior, WormBrain, WormState};
pub use registry::ActorTable;
