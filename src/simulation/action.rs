//! Player intents, applied at the player's decision point

use serde::{Deserialize, Serialize};

use crate::combat::{self, CombatContext, EngageOutcome};
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Position, Tick};
use crate::simulation::world::World;
use crate::spatial::map::Exit;
use crate::spatial::tile::TileType;
use crate::turn::event::EventKind;

/// One discrete player decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    MoveBy { dx: i32, dy: i32 },
    Wait,
    Engage(ActorId),
    Disengage,
}

/// What an applied action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved { to: Position },
    /// Stepped onto a teleport and came out at its partner
    Teleported { to: Position },
    /// Standing on an exit to another map
    ReachedExit(Exit),
    /// Destination not walkable or occupied; the turn is still pending
    Blocked,
    Waited,
    Engaged { target: ActorId },
    AlreadyEngaged,
    Disengaged,
}

impl World {
    /// Apply the player's action and end their turn
    ///
    /// Fails with `NotPlayersTurn` if no turn is pending. A `Blocked` move
    /// or a failed engage leaves the turn pending with no time spent. Moves
    /// are one tile in any of the eight directions; anything else is
    /// `Blocked`.
    pub fn apply_player_action(&mut self, action: PlayerAction) -> Result<ActionOutcome> {
        let Some(pending) = self.pending_input else {
            return Err(SimError::NotPlayersTurn);
        };

        let (outcome, cost) = match action {
            PlayerAction::MoveBy { dx, dy } if !is_single_step(dx, dy) => {
                tracing::debug!(dx, dy, "Move is not a single step");
                return Ok(ActionOutcome::Blocked);
            }
            PlayerAction::MoveBy { dx, dy } => match self.move_player(dx, dy) {
                ActionOutcome::Blocked => return Ok(ActionOutcome::Blocked),
                outcome => (outcome, self.config.step_cost),
            },
            PlayerAction::Wait => (ActionOutcome::Waited, self.config.wait_cost),
            PlayerAction::Engage(target) => self.player_engage(target)?,
            PlayerAction::Disengage => {
                let player_id = self.player_id;
                let mut ctx = self.combat_context();
                let outcome = if combat::disengage(&mut ctx, player_id) {
                    self.messages.push(pending.time, "You disengage.");
                    ActionOutcome::Disengaged
                } else {
                    ActionOutcome::Waited
                };
                (outcome, self.config.command_cost)
            }
        };

        self.end_player_turn(cost);
        tracing::debug!(?action, ?outcome, cost, "Player acted");
        Ok(outcome)
    }

    fn move_player(&mut self, dx: i32, dy: i32) -> ActionOutcome {
        let Some(player) = self.actors.get_mut(self.player_id) else {
            return ActionOutcome::Blocked;
        };
        let from = player.position;
        let to = from.offset(dx, dy);
        if !self.map.is_free(to) {
            return ActionOutcome::Blocked;
        }

        self.map.relocate(from, to);
        player.position = to;

        let mut outcome = ActionOutcome::Moved { to };
        if self.map.tile_type(to) == Some(TileType::Teleport) {
            if let Some(partner) = self.map.teleport_partner(to).filter(|p| self.map.is_free(*p)) {
                self.map.relocate(to, partner);
                player.position = partner;
                self.messages.push(self.scheduler.now(), "You are teleported.");
                outcome = ActionOutcome::Teleported { to: partner };
            }
        }

        let here = player.position;
        self.refresh_fields();

        if let Some(exit) = self.map.exit_at(here) {
            tracing::info!(at = %here, destination = %exit.destination_map, "Exit reached");
            self.messages.push(
                self.scheduler.now(),
                format!("An exit leads to {}.", exit.destination_map),
            );
            return ActionOutcome::ReachedExit(exit.clone());
        }
        outcome
    }

    fn player_engage(&mut self, target: ActorId) -> Result<(ActionOutcome, Tick)> {
        let player_id = self.player_id;
        let mut ctx = self.combat_context();
        let engaged = combat::engage(&mut ctx, player_id, target)?;
        match engaged {
            EngageOutcome::Engaged { .. } => {
                let delay = self
                    .actors
                    .get(player_id)
                    .map_or(self.config.default_weapon_delay, |p| p.combat.weapon_delay);
                let name = self
                    .actors
                    .get(target)
                    .map_or_else(|| target.to_string(), |a| a.name.clone());
                self.messages
                    .push(self.scheduler.now(), format!("You engage {name}!"));
                Ok((ActionOutcome::Engaged { target }, delay))
            }
            EngageOutcome::AlreadyEngaged => {
                self.messages
                    .push(self.scheduler.now(), "You are already engaged!");
                Ok((ActionOutcome::AlreadyEngaged, self.config.command_cost))
            }
        }
    }

    /// Schedule the player's next decision; this replaces the parked event
    fn end_player_turn(&mut self, cost: Tick) {
        let time = self.scheduler.now() + cost;
        self.scheduler
            .schedule_critical(time, self.player_id, EventKind::Move);
        if let Some(player) = self.actors.get_mut(self.player_id) {
            player.move_queued = true;
        }
        self.pending_input = None;
    }

    fn combat_context(&mut self) -> CombatContext<'_> {
        CombatContext {
            actors: &mut self.actors,
            map: &mut self.map,
            scheduler: &mut self.scheduler,
            config: &self.config,
        }
    }
}

/// One tile in one of the eight directions
fn is_single_step(dx: i32, dy: i32) -> bool {
    (-1..=1).contains(&dx) && (-1..=1).contains(&dy) && (dx, dy) != (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::actor::Actor;
    use crate::simulation::step::StepOutcome;
    use crate::spatial::map::{Map, TeleportLink};

    fn world_with(rows: &[&str], start: Position) -> World {
        let map = Map::from_rows("test", rows);
        let mut world =
            World::new(map, SimulationConfig::default(), 9, start).expect("world");
        assert!(matches!(world.step(), StepOutcome::AwaitingInput(_)));
        world
    }

    #[test]
    fn test_action_without_turn_rejected() {
        let map = Map::from_rows("test", &["#####", "#...#", "#####"]);
        let mut world =
            World::new(map, SimulationConfig::default(), 9, Position::new(1, 1)).expect("world");
        assert!(matches!(
            world.apply_player_action(PlayerAction::Wait),
            Err(SimError::NotPlayersTurn)
        ));
    }

    #[test]
    fn test_move_updates_occupancy_and_fields() {
        let mut world = world_with(&["#####", "#...#", "#####"], Position::new(1, 1));
        let outcome = world
            .apply_player_action(PlayerAction::MoveBy { dx: 1, dy: 0 })
            .expect("move");
        assert_eq!(outcome, ActionOutcome::Moved { to: Position::new(2, 1) });
        assert!(!world.map().is_occupied(Position::new(1, 1)));
        assert!(world.map().is_occupied(Position::new(2, 1)));
        assert_eq!(world.map().smell_at(Position::new(2, 1)), 255);
        assert!(world.map().is_smelly(Position::new(1, 1)));
        assert!(!world.awaiting_input());
        assert_eq!(world.scheduler().peek_time(), Some(100));
    }

    #[test]
    fn test_blocked_move_keeps_turn() {
        let mut world = world_with(&["#####", "#...#", "#####"], Position::new(1, 1));
        let outcome = world
            .apply_player_action(PlayerAction::MoveBy { dx: 0, dy: -1 })
            .expect("move");
        assert_eq!(outcome, ActionOutcome::Blocked);
        assert!(world.awaiting_input());
        assert!(world.scheduler().is_empty());
        assert_eq!(world.player().map(|p| p.position), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_long_move_cannot_skip_walls() {
        let mut world = world_with(&["#####", "#.#.#", "#####"], Position::new(1, 1));
        for (dx, dy) in [(2, 0), (0, 0), (-3, 1), (1, 2)] {
            let outcome = world
                .apply_player_action(PlayerAction::MoveBy { dx, dy })
                .expect("move");
            assert_eq!(outcome, ActionOutcome::Blocked, "move by ({dx}, {dy})");
        }
        assert_eq!(world.player().map(|p| p.position), Some(Position::new(1, 1)));
        assert!(!world.map().is_occupied(Position::new(3, 1)));
        assert!(world.awaiting_input());
        assert!(world.scheduler().is_empty());
    }

    #[test]
    fn test_wait_costs_wait_ticks() {
        let mut world = world_with(&["#####", "#...#", "#####"], Position::new(1, 1));
        assert_eq!(
            world.apply_player_action(PlayerAction::Wait).expect("wait"),
            ActionOutcome::Waited
        );
        assert_eq!(world.scheduler().peek_time(), Some(100));
    }

    #[test]
    fn test_teleport_followed() {
        let mut world = world_with(&["#######", "#..*.*#", "#######"], Position::new(2, 1));
        world.map.add_teleport(TeleportLink {
            a: Position::new(3, 1),
            b: Position::new(5, 1),
        });
        let outcome = world
            .apply_player_action(PlayerAction::MoveBy { dx: 1, dy: 0 })
            .expect("move");
        assert_eq!(outcome, ActionOutcome::Teleported { to: Position::new(5, 1) });
        assert!(world.map().is_occupied(Position::new(5, 1)));
        assert!(!world.map().is_occupied(Position::new(3, 1)));
        assert_eq!(world.map().occupied_positions().count(), 1);
    }

    #[test]
    fn test_exit_reported() {
        let mut world = world_with(&["#####", "#...#", "#####"], Position::new(1, 1));
        world.map.add_exit(Exit {
            position: Position::new(2, 1),
            destination_map: "town".into(),
            destination: Position::new(10, 4),
        });
        let outcome = world
            .apply_player_action(PlayerAction::MoveBy { dx: 1, dy: 0 })
            .expect("move");
        assert!(matches!(outcome, ActionOutcome::ReachedExit(exit) if exit.destination_map == "town"));
    }

    #[test]
    fn test_engage_swing_resolves_before_next_turn() {
        let mut world = world_with(&["######", "#....#", "######"], Position::new(1, 1));
        let worm = world
            .spawn_actor(Actor::worm("Worm", Position::new(2, 1)))
            .expect("spawn");

        let outcome = world
            .apply_player_action(PlayerAction::Engage(worm))
            .expect("engage");
        assert_eq!(outcome, ActionOutcome::Engaged { target: worm });

        // Swing and next turn share a tick; the swing was queued first
        let player = world.player_id();
        assert_eq!(
            world.step(),
            StepOutcome::Resolved(player, EventKind::AttackReady)
        );
        assert_eq!(world.now(), 100);
        assert_eq!(world.step(), StepOutcome::AwaitingInput(player));
        assert_eq!(world.actor(worm).map(|w| w.vitals.hp), Some(40));
    }

    #[test]
    fn test_engage_invalid_target_keeps_turn() {
        let mut world = world_with(&["#####", "#...#", "#####"], Position::new(1, 1));
        let result = world.apply_player_action(PlayerAction::Engage(ActorId(77)));
        assert!(matches!(result, Err(SimError::ActorNotFound(_))));
        assert!(world.awaiting_input());
    }

    #[test]
    fn test_disengage_uses_command_cost() {
        let mut world = world_with(&["######", "#....#", "######"], Position::new(1, 1));
        let worm = world
            .spawn_actor(Actor::worm("Worm", Position::new(2, 1)))
            .expect("spawn");
        world
            .apply_player_action(PlayerAction::Engage(worm))
            .expect("engage");
        while world.step() != StepOutcome::AwaitingInput(world.player_id()) {}

        let now = world.now();
        assert_eq!(
            world.apply_player_action(PlayerAction::Disengage).expect("disengage"),
            ActionOutcome::Disengaged
        );
        assert!(!world.player().is_some_and(|p| p.combat.engaged));
        assert!(world.scheduler().peek_time() <= Some(now + 50));
    }
}
