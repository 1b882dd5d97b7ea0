//! The world aggregate: scheduler, map and actors owned in one place

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Position, Tick};
use crate::entity::actor::Actor;
use crate::entity::registry::ActorTable;
use crate::simulation::log::MessageLog;
use crate::spatial::map::Map;
use crate::spatial::scent::ScentSettings;
use crate::turn::event::{EventKind, ScheduledEvent};
use crate::turn::scheduler::Scheduler;
use crate::world::generation::{generate_dungeon, random_free_tile};

/// Everything the simulation mutates
///
/// Built once and held by the driving loop. The map and actor table are
/// only changed through `World` methods so occupancy always matches the
/// live actor positions.
pub struct World {
    pub(super) map: Map,
    pub(super) actors: ActorTable,
    pub(super) scheduler: Scheduler,
    pub(super) rng: ChaCha8Rng,
    pub(super) config: SimulationConfig,
    pub(super) messages: MessageLog,
    pub(super) player_id: ActorId,
    /// The player's popped `Move`, parked until an action arrives
    pub(super) pending_input: Option<ScheduledEvent>,
}

impl World {
    /// Create a world on `map` with the player at `player_start`
    ///
    /// Falls back to a random free tile if `player_start` is not free. The
    /// player's first turn is at tick 0.
    pub fn new(
        mut map: Map,
        config: SimulationConfig,
        seed: u64,
        player_start: Position,
    ) -> Result<Self> {
        config.validate().map_err(SimError::Config)?;
        map.set_scent_settings(ScentSettings {
            decay: config.smell_decay,
            diffusion_loss: config.smell_diffusion_loss,
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let start = if map.is_free(player_start) {
            player_start
        } else {
            random_free_tile(&map, &mut rng).ok_or_else(|| SimError::NoFreeTile("player".into()))?
        };

        let mut actors = ActorTable::new();
        let mut player = Actor::player("Adventurer", start);
        player.move_queued = true;
        let player_id = actors.spawn(player);
        map.set_occupied(start, true);

        let mut scheduler = Scheduler::new(config.scheduler_capacity);
        scheduler.schedule(0, player_id, EventKind::Move)?;

        let mut world = Self {
            map,
            actors,
            scheduler,
            rng,
            config,
            messages: MessageLog::default(),
            player_id,
            pending_input: None,
        };
        world.refresh_fields();

        tracing::info!(map = %world.map.name, seed, player = %start, "World created");
        Ok(world)
    }

    /// Create a world on a freshly generated dungeon
    pub fn generated(
        name: &str,
        width: usize,
        height: usize,
        config: SimulationConfig,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = generate_dungeon(name, width, height, &mut rng);
        let start = random_free_tile(&map, &mut rng)
            .ok_or_else(|| SimError::NoFreeTile("player".into()))?;
        Self::new(map, config, seed, start)
    }

    /// Place an actor on the map and give it a first decision
    pub fn spawn_actor(&mut self, mut actor: Actor) -> Result<ActorId> {
        if !self.map.is_free(actor.position) {
            return Err(SimError::NoFreeTile(actor.name));
        }
        let position = actor.position;
        let first_turn = self.scheduler.now() + actor.move_speed;
        actor.spawn_point = position;
        actor.move_queued = true;

        let id = self.actors.spawn(actor);
        if let Err(err) = self.scheduler.schedule(first_turn, id, EventKind::Move) {
            self.actors.despawn(id);
            return Err(err);
        }
        self.map.set_occupied(position, true);
        Ok(id)
    }

    /// Spawn `count` worms on random free tiles
    pub fn spawn_worms(&mut self, count: usize) -> Result<Vec<ActorId>> {
        (1..=count)
            .map(|n| {
                let name = format!("Sandworm {n}");
                let position = random_free_tile(&self.map, &mut self.rng)
                    .ok_or_else(|| SimError::NoFreeTile(name.clone()))?;
                self.spawn_actor(Actor::worm(name, position))
            })
            .collect()
    }

    /// Recompute smell, sound and field of view around the player
    pub(super) fn refresh_fields(&mut self) {
        let Some(origin) = self.actors.get(self.player_id).map(|p| p.position) else {
            return;
        };
        self.map.update_smell(origin);
        self.map.update_sound(origin, self.config.sound_radius);
        self.map.compute_fov(origin, self.config.fov_radius);
    }

    // === READ ACCESS ===

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn actors(&self) -> &ActorTable {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn player_id(&self) -> ActorId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.get(self.player_id)
    }

    /// Current logical time
    pub fn now(&self) -> Tick {
        self.scheduler.now()
    }

    /// True while the player's turn is waiting for an action
    pub fn awaiting_input(&self) -> bool {
        self.pending_input.is_some()
    }

    /// The player has been defeated
    pub fn is_game_over(&self) -> bool {
        self.player().map_or(true, |p| !p.is_active)
    }

    /// Closest targetable actor to the player, by Chebyshev distance
    pub fn nearest_target(&self) -> Option<ActorId> {
        let origin = self.player()?.position;
        self.actors
            .iter()
            .filter(|a| a.id != self.player_id && a.is_targetable())
            .min_by_key(|a| (a.position.chebyshev(&origin), a.id))
            .map(|a| a.id)
    }

    /// Serializable snapshot for reporting
    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            map: self.map.name.clone(),
            tick: self.now(),
            game_over: self.is_game_over(),
            pending_events: self.scheduler.len(),
            actors: self
                .actors
                .iter()
                .map(|a| ActorSummary {
                    id: a.id,
                    name: a.name.clone(),
                    position: a.position,
                    active: a.is_active,
                    burrowed: a.is_burrowed(),
                    hp: a.vitals.hp,
                    tp: a.vitals.tp,
                    engaged: a.combat.engaged,
                })
                .collect(),
            messages: self.messages.iter().map(|m| m.text.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorSummary {
    pub id: ActorId,
    pub name: String,
    pub position: Position,
    pub active: bool,
    pub burrowed: bool,
    pub hp: i32,
    pub tp: i32,
    pub engaged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub map: String,
    pub tick: Tick,
    pub game_over: bool,
    pub pending_events: usize,
    pub actors: Vec<ActorSummary>,
    pub messages: Vec<String>,
}
