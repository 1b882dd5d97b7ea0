//! Behaviour variants; each owns only the state its AI needs

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Worm decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WormState {
    /// Above ground, waiting
    #[default]
    Idle,
    /// About to dig in and pick a destination
    Burrowing,
    /// Underground, heading for `destination`
    Travel { destination: Position },
    /// Following the smell gradient
    Engaged,
}

/// State of a burrowing worm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WormBrain {
    pub state: WormState,
    /// Underground: invisible and not claiming a tile
    pub burrowed: bool,
}

/// How an actor decides what to do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Driven by player intents
    Player,
    Worm(WormBrain),
    /// No specific AI; keeps its turn slot alive
    Generic,
}

impl Behavior {
    pub fn worm() -> Self {
        Behavior::Worm(WormBrain::default())
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Behavior::Player)
    }

    pub fn is_burrowed(&self) -> bool {
        matches!(self, Behavior::Worm(brain) if brain.burrowed)
    }
}
