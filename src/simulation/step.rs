//! The driving loop: pop one event, resolve it, let handlers reschedule

use crate::ai::{self, AiContext, AiOutcome};
use crate::combat::{self, CombatContext, RespawnOutcome};
use crate::core::types::ActorId;
use crate::simulation::world::World;
use crate::turn::event::{EventKind, ScheduledEvent};

/// Result of a single `World::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The player must act before time can move on
    AwaitingInput(ActorId),
    /// The event was handled
    Resolved(ActorId, EventKind),
    /// The event was stale (actor gone, inactive or superseded)
    Discarded(ScheduledEvent),
}

impl World {
    /// Resolve the next event
    ///
    /// While the player's turn is pending this returns `AwaitingInput`
    /// without touching the queue. Nothing here fails: a full queue ends
    /// the affected swing chain instead.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(event) = self.pending_input {
            return StepOutcome::AwaitingInput(event.actor_id);
        }

        let event = self.scheduler.pop_next_or(
            self.config.default_move_cost,
            self.player_id,
            EventKind::Move,
        );

        match event.kind {
            EventKind::Move => self.resolve_move(event),
            EventKind::AttackReady => self.resolve_attack(event),
            EventKind::Respawn => self.resolve_respawn(event),
        }
    }

    /// Step until the player has to act, the game ends, or `max_events`
    /// events have been resolved; returns the number resolved
    pub fn run_until_input(&mut self, max_events: usize) -> usize {
        let mut resolved = 0;
        while resolved < max_events && !self.is_game_over() {
            match self.step() {
                StepOutcome::AwaitingInput(_) => break,
                StepOutcome::Resolved(..) | StepOutcome::Discarded(_) => resolved += 1,
            }
        }
        resolved
    }

    fn resolve_move(&mut self, event: ScheduledEvent) -> StepOutcome {
        let Some(actor) = self.actors.get_mut(event.actor_id) else {
            return StepOutcome::Discarded(event);
        };
        actor.move_queued = false;
        if !actor.is_active {
            tracing::debug!(actor = %event.actor_id, "Move for inactive actor discarded");
            return StepOutcome::Discarded(event);
        }

        if actor.is_player() {
            self.pending_input = Some(event);
            return StepOutcome::AwaitingInput(event.actor_id);
        }

        let mut ctx = AiContext {
            map: &mut self.map,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
            config: &self.config,
        };
        let outcome = ai::take_turn(actor, &mut ctx);

        if let AiOutcome::Surfaced { at } = outcome {
            let seen = self.map.tile(at).is_some_and(|t| t.visible);
            if seen {
                let name = actor.name.clone();
                self.messages
                    .push(event.time, format!("{name} bursts from the ground!"));
            }
        }
        StepOutcome::Resolved(event.actor_id, EventKind::Move)
    }

    fn resolve_attack(&mut self, event: ScheduledEvent) -> StepOutcome {
        let mut ctx = CombatContext {
            actors: &mut self.actors,
            map: &mut self.map,
            scheduler: &mut self.scheduler,
            config: &self.config,
        };
        let Some(report) = combat::resolve_swing(&mut ctx, &event) else {
            return StepOutcome::Discarded(event);
        };

        let attacker = self.actor_name(report.attacker);
        let target = self.actor_name(report.target);
        self.messages.push(
            event.time,
            format!(
                "{attacker} hits {target} for {} dmg. TP: {}",
                report.damage, report.attacker_tp
            ),
        );
        if report.defeated {
            self.messages
                .push(event.time, format!("{attacker} defeats {target}!"));
            if report.target == self.player_id {
                tracing::info!(tick = event.time, "Player defeated");
            }
        }
        StepOutcome::Resolved(event.actor_id, EventKind::AttackReady)
    }

    fn resolve_respawn(&mut self, event: ScheduledEvent) -> StepOutcome {
        let mut ctx = CombatContext {
            actors: &mut self.actors,
            map: &mut self.map,
            scheduler: &mut self.scheduler,
            config: &self.config,
        };
        match combat::resolve_respawn(&mut ctx, &event) {
            RespawnOutcome::Respawned { at } => {
                if self.map.tile(at).is_some_and(|t| t.visible) {
                    let name = self.actor_name(event.actor_id);
                    self.messages.push(event.time, format!("{name} appears."));
                }
                StepOutcome::Resolved(event.actor_id, EventKind::Respawn)
            }
            RespawnOutcome::Retrying => StepOutcome::Resolved(event.actor_id, EventKind::Respawn),
            RespawnOutcome::Ignored => StepOutcome::Discarded(event),
        }
    }

    fn actor_name(&self, id: ActorId) -> String {
        self.actors
            .get(id)
            .map_or_else(|| id.to_string(), |a| a.name.clone())
    }
}
