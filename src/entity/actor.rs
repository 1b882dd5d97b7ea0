//! Actor definitions

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Position, Tick};
use crate::entity::behavior::Behavior;

/// Which sensory fields an actor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Senses {
    pub sight: bool,
    pub smell: bool,
    pub sound: bool,
}

/// Hit points and technique points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: i32,
    pub max_hp: i32,
    /// 0..=max_tp, gained by landing hits
    pub tp: i32,
    pub max_tp: i32,
}

impl Vitals {
    pub fn new(max_hp: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            tp: 0,
            max_tp: 3000,
        }
    }
}

/// Auto-attack state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatState {
    pub engaged: bool,
    pub target: Option<ActorId>,
    /// Ticks between swings; 0 means "use the configured default"
    pub weapon_delay: Tick,
    pub weapon_damage: i32,
    pub strength: i32,
    /// Time of the swing event currently in the queue, if any
    pub next_swing: Option<Tick>,
}

/// Anything that takes turns on the timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Assigned by the actor table on spawn
    pub id: ActorId,
    pub name: String,
    pub glyph: char,
    pub position: Position,
    /// Where a defeated actor comes back
    pub spawn_point: Position,
    /// Ticks per tile moved
    pub move_speed: Tick,
    /// False while defeated; stale events for it resolve as no-ops
    pub is_active: bool,
    /// Whether defeat schedules a respawn
    pub respawns: bool,
    /// A `Move` event for this actor is waiting in the queue
    pub move_queued: bool,
    pub senses: Senses,
    pub vitals: Vitals,
    pub combat: CombatState,
    pub behavior: Behavior,
}

impl Actor {
    pub fn new(name: impl Into<String>, glyph: char, position: Position, behavior: Behavior) -> Self {
        Self {
            id: ActorId(0),
            name: name.into(),
            glyph,
            position,
            spawn_point: position,
            move_speed: 100,
            is_active: true,
            respawns: false,
            move_queued: false,
            senses: Senses::default(),
            vitals: Vitals::new(10),
            combat: CombatState::default(),
            behavior,
        }
    }

    /// The player character
    pub fn player(name: impl Into<String>, position: Position) -> Self {
        let mut actor = Self::new(name, '@', position, Behavior::Player);
        actor.senses.sight = true;
        actor.vitals = Vitals::new(100);
        actor.combat.strength = 10;
        actor.combat.weapon_delay = 100;
        actor
    }

    /// A burrowing worm that tracks by smell
    pub fn worm(name: impl Into<String>, position: Position) -> Self {
        let mut actor = Self::new(name, 'w', position, Behavior::worm());
        actor.senses.smell = true;
        actor.senses.sound = true;
        actor.move_speed = 120;
        actor.respawns = true;
        actor.vitals = Vitals::new(50);
        actor.combat.strength = 6;
        actor.combat.weapon_delay = 150;
        actor
    }

    pub fn is_player(&self) -> bool {
        self.behavior.is_player()
    }

    pub fn is_burrowed(&self) -> bool {
        self.behavior.is_burrowed()
    }

    /// Active and standing on a tile (claims occupancy)
    pub fn is_placed(&self) -> bool {
        self.is_active && !self.is_burrowed()
    }

    /// Can be chosen as an attack target
    pub fn is_targetable(&self) -> bool {
        self.is_placed() && self.vitals.hp > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::behavior::{WormBrain, WormState};

    #[test]
    fn test_new_worm() {
        let worm = Actor::worm("Sandworm", Position::new(3, 4));
        assert!(worm.is_active);
        assert!(worm.senses.smell);
        assert!(!worm.is_burrowed());
        assert_eq!(worm.spawn_point, Position::new(3, 4));
        assert_eq!(worm.behavior, Behavior::Worm(WormBrain::default()));
    }

    #[test]
    fn test_burrowed_worm_not_placed() {
        let mut worm = Actor::worm("Sandworm", Position::new(0, 0));
        worm.behavior = Behavior::Worm(WormBrain {
            state: WormState::Travel {
                destination: Position::new(2, 2),
            },
            burrowed: true,
        });
        assert!(!worm.is_placed());
        assert!(!worm.is_targetable());
    }

    #[test]
    fn test_player_defaults() {
        let player = Actor::player("Adventurer", Position::new(1, 1));
        assert!(player.is_player());
        assert_eq!(player.vitals.hp, 100);
        assert_eq!(player.vitals.max_tp, 3000);
    }
}
