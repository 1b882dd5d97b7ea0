//! Starting and stopping auto-attack

use crate::ai;
use crate::combat::CombatContext;
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Tick};
use crate::entity::actor::Actor;
use crate::turn::event::EventKind;
use crate::turn::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngageOutcome {
    /// Now attacking; `first_swing` is `None` when a swing from an earlier
    /// engagement is still queued and simply carries on
    Engaged { first_swing: Option<Tick> },
    /// Already attacking this target; nothing changed
    AlreadyEngaged,
}

/// Make `attacker_id` start auto-attacking `target_id`
///
/// The target must be active and above ground. A non-player target is
/// alerted and fights back.
pub fn engage(
    ctx: &mut CombatContext<'_>,
    attacker_id: ActorId,
    target_id: ActorId,
) -> Result<EngageOutcome> {
    if attacker_id == target_id {
        return Err(SimError::InvalidTarget(target_id));
    }
    let target = ctx
        .actors
        .get(target_id)
        .ok_or(SimError::ActorNotFound(target_id))?;
    if !target.is_targetable() {
        return Err(SimError::InvalidTarget(target_id));
    }

    let attacker = ctx
        .actors
        .get_mut(attacker_id)
        .filter(|a| a.is_active)
        .ok_or(SimError::ActorNotFound(attacker_id))?;
    if attacker.combat.engaged && attacker.combat.target == Some(target_id) {
        tracing::debug!(attacker = %attacker_id, target = %target_id, "Already engaged");
        return Ok(EngageOutcome::AlreadyEngaged);
    }

    if attacker.combat.weapon_delay == 0 {
        attacker.combat.weapon_delay = ctx.config.default_weapon_delay;
    }
    let first_swing = start_swing_chain(ctx.scheduler, attacker)?;
    attacker.combat.engaged = true;
    attacker.combat.target = Some(target_id);
    tracing::info!(attacker = %attacker_id, target = %target_id, ?first_swing, "Engaged");

    if let Some(target) = ctx.actors.get_mut(target_id) {
        ai::alert(target);
        if !target.is_player() && !target.combat.engaged {
            retaliate(ctx.scheduler, ctx.config.default_weapon_delay, target, attacker_id);
        }
    }

    Ok(EngageOutcome::Engaged { first_swing })
}

/// Stop auto-attacking; returns false if the actor was not engaged
///
/// A queued swing stays in the queue and is discarded when it fires.
pub fn disengage(ctx: &mut CombatContext<'_>, actor_id: ActorId) -> bool {
    match ctx.actors.get_mut(actor_id) {
        Some(actor) if actor.combat.engaged => {
            actor.combat.engaged = false;
            actor.combat.target = None;
            tracing::info!(actor = %actor_id, "Disengaged");
            true
        }
        _ => false,
    }
}

/// Queue the first swing unless one is already pending
fn start_swing_chain(scheduler: &mut Scheduler, attacker: &mut Actor) -> Result<Option<Tick>> {
    if attacker.combat.next_swing.is_some() {
        return Ok(None);
    }
    let time = scheduler.now() + attacker.combat.weapon_delay;
    scheduler.schedule(time, attacker.id, EventKind::AttackReady)?;
    attacker.combat.next_swing = Some(time);
    Ok(Some(time))
}

fn retaliate(scheduler: &mut Scheduler, default_delay: Tick, defender: &mut Actor, attacker_id: ActorId) {
    if defender.combat.weapon_delay == 0 {
        defender.combat.weapon_delay = default_delay;
    }
    match start_swing_chain(scheduler, defender) {
        Ok(_) => {
            defender.combat.engaged = true;
            defender.combat.target = Some(attacker_id);
            tracing::info!(actor = %defender.id, target = %attacker_id, "Fights back");
        }
        Err(err) => {
            tracing::warn!(actor = %defender.id, error = %err, "Could not fight back");
        }
    }
}
