//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values load from TOML; missing
//! keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Tick;

/// Configuration for the simulation systems
///
/// Defaults give the standard game pacing. Every cost is in
/// ticks; a plain step costs 100, so "one turn" is 100 ticks throughout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === SCHEDULER ===
    /// Maximum number of pending events
    ///
    /// Non-critical scheduling past this point fails with `QueueFull`.
    /// The player's own next move is scheduled through the critical path
    /// and never fails.
    pub scheduler_capacity: usize,

    // === PLAYER ACTION COSTS ===
    /// Cost of one orthogonal or diagonal step
    pub step_cost: Tick,

    /// Cost of waiting in place
    pub wait_cost: Tick,

    /// Cost of instant commands (disengage)
    pub command_cost: Tick,

    /// Delay of the player's next move when the queue is found empty; also
    /// the length of one worm idle turn
    pub default_move_cost: Tick,

    // === SENSES ===
    /// Chebyshev radius of the player's field of view
    pub fov_radius: u32,

    /// Amount every smell cell loses per scent update
    ///
    /// At 4 per update, a fresh 255 trail fades completely after ~64
    /// player moves.
    pub smell_decay: u8,

    /// Amount lost when smell spreads one tile
    ///
    /// Together with `smell_decay` this sets the width of the trail: at 24,
    /// diffusion reaches about 10 tiles from the source.
    pub smell_diffusion_loss: u8,

    /// Path length (in tiles) a noise travels before it stops spreading
    pub sound_radius: u32,

    // === WORM BEHAVIOUR ===
    /// Minimum idle time, in turns of 100 ticks
    pub idle_min_turns: u32,

    /// Maximum idle time, in turns of 100 ticks
    pub idle_max_turns: u32,

    /// Half-width of the burrow destination window (8 gives a 17x17 window)
    pub burrow_search_radius: i32,

    /// Random samples taken before a worm gives up and resurfaces in place
    pub burrow_search_attempts: u32,

    /// Pause after surfacing before the next decision
    pub surface_pause: Tick,

    /// Delay before an engaged worm that lost the scent decides again
    pub lost_scent_cost: Tick,

    // === COMBAT ===
    /// Weapon delay assumed when an actor engages without one
    pub default_weapon_delay: Tick,

    /// TP gained per landed auto-attack
    pub tp_per_hit: i32,

    /// Ticks between defeat and the first respawn attempt
    pub respawn_delay: Tick,

    /// Ticks between respawn attempts when the spawn point is blocked
    pub respawn_retry: Tick,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scheduler_capacity: 1024,

            step_cost: 100,
            wait_cost: 100,
            command_cost: 50,
            default_move_cost: 100,

            fov_radius: 8,
            smell_decay: 4,
            smell_diffusion_loss: 24,
            sound_radius: 10,

            idle_min_turns: 15,
            idle_max_turns: 45,
            burrow_search_radius: 8,
            burrow_search_attempts: 20,
            surface_pause: 10,
            lost_scent_cost: 100,

            default_weapon_delay: 100,
            tp_per_hit: 100,
            respawn_delay: 3000,
            respawn_retry: 100,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate().map_err(SimError::Config)?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.scheduler_capacity == 0 {
            return Err("scheduler_capacity must be positive".into());
        }

        if self.idle_min_turns > self.idle_max_turns {
            return Err(format!(
                "idle_min_turns ({}) should be <= idle_max_turns ({})",
                self.idle_min_turns, self.idle_max_turns
            ));
        }

        // A zero cost would let an actor act forever without time passing
        if self.step_cost == 0 || self.wait_cost == 0 || self.default_move_cost == 0 {
            return Err("Action costs must be positive".into());
        }

        if self.smell_decay == 0 {
            return Err("smell_decay must be positive or trails never fade".into());
        }

        if self.burrow_search_radius < 0 {
            return Err("burrow_search_radius must not be negative".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str("fov_radius = 5\nsound_radius = 3\n").unwrap();
        assert_eq!(config.fov_radius, 5);
        assert_eq!(config.sound_radius, 3);
        assert_eq!(config.step_cost, 100);
        assert_eq!(config.scheduler_capacity, 1024);
    }

    #[test]
    fn test_inverted_idle_range_rejected() {
        let result = SimulationConfig::from_toml_str("idle_min_turns = 50\nidle_max_turns = 10\n");
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = SimulationConfig::from_toml_str("fov_radius = \"far\"");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }

    #[test]
    fn test_zero_step_cost_rejected() {
        let config = SimulationConfig {
            step_cost: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
