use thiserror::Error;

use crate::core::types::ActorId;
use crate::world::loader::MapLoadError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Event queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Not the player's turn")]
    NotPlayersTurn,

    #[error("Invalid target: {0}")]
    InvalidTarget(ActorId),

    #[error("No free tile for {0}")]
    NoFreeTile(String),

    #[error("Map load error: {0}")]
    MapLoad(#[from] MapLoadError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
