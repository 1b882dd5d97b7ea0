//! Grindfest - turn-based roguelike simulation core
//!
//! An event-scheduled timeline, a tile map with field of view and
//! smell/sound fields, and AI for the creatures that hunt through it.

pub mod ai;
pub mod combat;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod turn;
pub mod world;

pub use crate::core::{Result, SimError, SimulationConfig};
pub use crate::simulation::{ActionOutcome, PlayerAction, StepOutcome, World};
