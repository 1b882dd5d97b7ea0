//! Swing resolution, defeat and respawn

use serde::Serialize;

use crate::combat::CombatContext;
use crate::core::types::{ActorId, Position};
use crate::entity::actor::CombatState;
use crate::entity::behavior::{Behavior, WormBrain};
use crate::turn::event::{EventKind, ScheduledEvent};

/// Damage dealt when an actor has no strength of its own
const BASE_DAMAGE: i32 = 10;

/// Result of one landed swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwingReport {
    pub attacker: ActorId,
    pub target: ActorId,
    pub damage: i32,
    pub attacker_tp: i32,
    pub target_hp: i32,
    pub defeated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnOutcome {
    /// Back on the map at the spawn point
    Respawned { at: Position },
    /// Spawn point blocked; tried again later
    Retrying,
    /// Actor gone or already active
    Ignored,
}

/// Resolve a popped `AttackReady` event
///
/// Returns `None` when the swing is stale: superseded, the attacker has
/// disengaged, or the target is gone. An attacker whose target went out of
/// reach disengages. So does one whose next swing cannot be queued; the
/// swing in hand still lands.
pub fn resolve_swing(ctx: &mut CombatContext<'_>, event: &ScheduledEvent) -> Option<SwingReport> {
    let attacker = ctx.actors.get_mut(event.actor_id)?;
    if attacker.combat.next_swing != Some(event.time) {
        tracing::debug!(actor = %event.actor_id, time = event.time, "Superseded swing discarded");
        return None;
    }
    attacker.combat.next_swing = None;

    if !attacker.is_active || !attacker.combat.engaged {
        return None;
    }
    let target_id = attacker.combat.target?;
    let combat = attacker.combat;
    let max_tp = attacker.vitals.max_tp;

    let target_hp_before = ctx
        .actors
        .get(target_id)
        .filter(|target| target.is_targetable())
        .map(|target| target.vitals.hp);
    let Some(target_hp_before) = target_hp_before else {
        stop_attacking(ctx, event.actor_id);
        tracing::debug!(actor = %event.actor_id, target = %target_id, "Target out of reach, disengaging");
        return None;
    };

    let damage = swing_damage(&combat);
    let target_hp = (target_hp_before - damage).max(0);
    let defeated = target_hp == 0;

    // Queue the follow-up before touching any state
    let mut next_swing = None;
    if !defeated {
        let next = event.time + combat.weapon_delay;
        match ctx.scheduler.schedule(next, event.actor_id, EventKind::AttackReady) {
            Ok(()) => next_swing = Some(next),
            Err(err) => {
                tracing::warn!(actor = %event.actor_id, error = %err, "Could not queue next swing, disengaging");
            }
        }
    }

    let attacker_tp = match ctx.actors.get_mut(event.actor_id) {
        Some(attacker) => {
            attacker.vitals.tp = (attacker.vitals.tp + ctx.config.tp_per_hit).min(max_tp);
            attacker.combat.next_swing = next_swing;
            attacker.vitals.tp
        }
        None => 0,
    };
    if let Some(target) = ctx.actors.get_mut(target_id) {
        target.vitals.hp = target_hp;
    }

    let report = SwingReport {
        attacker: event.actor_id,
        target: target_id,
        damage,
        attacker_tp,
        target_hp,
        defeated,
    };
    tracing::info!(
        attacker = %report.attacker,
        target = %report.target,
        damage,
        target_hp,
        tp = attacker_tp,
        "Auto-attack hit"
    );

    if next_swing.is_none() {
        stop_attacking(ctx, event.actor_id);
    }
    if defeated {
        defeat(ctx, target_id);
    }

    Some(report)
}

fn stop_attacking(ctx: &mut CombatContext<'_>, actor_id: ActorId) {
    if let Some(attacker) = ctx.actors.get_mut(actor_id) {
        attacker.combat.engaged = false;
        attacker.combat.target = None;
    }
}

fn swing_damage(combat: &CombatState) -> i32 {
    let base = if combat.strength > 0 {
        combat.strength
    } else {
        BASE_DAMAGE
    };
    base + combat.weapon_damage
}

/// Take a defeated actor off the map and queue its respawn
///
/// The respawn replaces the actor's decision chain, so it always goes in.
fn defeat(ctx: &mut CombatContext<'_>, actor_id: ActorId) {
    let Some(actor) = ctx.actors.get_mut(actor_id) else {
        return;
    };
    if actor.is_placed() {
        ctx.map.set_occupied(actor.position, false);
    }
    actor.is_active = false;
    actor.combat.engaged = false;
    actor.combat.target = None;
    tracing::info!(actor = %actor_id, name = %actor.name, "Defeated");

    if actor.respawns {
        let time = ctx.scheduler.now() + ctx.config.respawn_delay;
        ctx.scheduler.schedule_critical(time, actor_id, EventKind::Respawn);
    }
}

/// Resolve a popped `Respawn` event
///
/// A restored actor resumes its queued decision if one is still pending,
/// otherwise it gets a fresh `Move`.
pub fn resolve_respawn(ctx: &mut CombatContext<'_>, event: &ScheduledEvent) -> RespawnOutcome {
    let Some(actor) = ctx.actors.get_mut(event.actor_id) else {
        return RespawnOutcome::Ignored;
    };
    if actor.is_active {
        return RespawnOutcome::Ignored;
    }

    let spawn = actor.spawn_point;
    if !ctx.map.is_free(spawn) {
        let retry = ctx.scheduler.now() + ctx.config.respawn_retry;
        ctx.scheduler.schedule_critical(retry, actor.id, EventKind::Respawn);
        tracing::debug!(actor = %actor.id, at = %spawn, retry, "Spawn point blocked");
        return RespawnOutcome::Retrying;
    }

    actor.position = spawn;
    actor.is_active = true;
    actor.vitals.hp = actor.vitals.max_hp;
    actor.vitals.tp = 0;
    actor.combat.engaged = false;
    actor.combat.target = None;
    if let Behavior::Worm(brain) = &mut actor.behavior {
        *brain = WormBrain::default();
    }
    ctx.map.set_occupied(spawn, true);

    if !actor.move_queued {
        let time = ctx.scheduler.now() + actor.move_speed;
        ctx.scheduler.schedule_critical(time, actor.id, EventKind::Move);
        actor.move_queued = true;
    }

    tracing::info!(actor = %actor.id, name = %actor.name, at = %spawn, "Respawned");
    RespawnOutcome::Respawned { at: spawn }
}
