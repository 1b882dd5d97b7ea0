//! Simulation driver
//!
//! `World` owns the scheduler, map and actors. The driving loop calls
//! `step` until the player's turn comes up, feeds one `PlayerAction`, and
//! repeats. Sensory fields are refreshed only when the player moves.

pub mod action;
pub mod log;
pub mod step;
pub mod world;

pub use action::{ActionOutcome, PlayerAction};
pub use log::{Message, MessageLog};
pub use step::StepOutcome;
pub use world::{ActorSummary, World, WorldSummary};
