//! AI controller for non-player actors
//!
//! `take_turn` is invoked by the driving loop each time a non-player
//! actor's `Move` event is popped. Each behavior variant decides what to do
//! and schedules exactly one follow-up `Move` for the actor.

pub mod worm;

use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{Position, Tick};
use crate::entity::actor::Actor;
use crate::entity::behavior::{Behavior, WormState};
use crate::spatial::map::Map;
use crate::turn::event::EventKind;
use crate::turn::scheduler::Scheduler;

/// World state an AI decision may read and change
pub struct AiContext<'a> {
    pub map: &'a mut Map,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut ChaCha8Rng,
    pub config: &'a SimulationConfig,
}

/// What happened on an AI turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiOutcome {
    /// Actor was inactive; nothing scheduled
    Skipped,
    /// Stayed put and scheduled its next decision
    Waited,
    /// Dug in and picked a destination
    Burrowed { destination: Position },
    /// Came back up at `at`
    Surfaced { at: Position },
    /// Destination was taken while underground; searching again
    SurfaceBlocked,
    /// Stepped along the smell gradient
    Moved { to: Position },
    /// No scent left to follow
    LostScent,
}

/// Run one decision for `actor` and schedule its next one
///
/// Call it once the actor's `Move` has been popped; the follow-up takes
/// that event's place. Inactive actors are dropped from scheduling; a
/// respawn gives them a fresh `Move`.
pub fn take_turn(actor: &mut Actor, ctx: &mut AiContext<'_>) -> AiOutcome {
    if !actor.is_active {
        tracing::debug!(actor = %actor.id, "Inactive actor turn skipped");
        return AiOutcome::Skipped;
    }

    let (outcome, cost) = match actor.behavior {
        Behavior::Worm(_) => worm::worm_turn(actor, ctx),
        Behavior::Player | Behavior::Generic => (AiOutcome::Waited, actor.move_speed),
    };

    schedule_next_move(ctx.scheduler, actor, cost);
    outcome
}

/// React to being attacked
///
/// A surfaced worm switches to smell pursuit. Returns true if the state
/// changed.
pub fn alert(actor: &mut Actor) -> bool {
    if !actor.is_active {
        return false;
    }
    match &mut actor.behavior {
        Behavior::Worm(brain) if !brain.burrowed && brain.state != WormState::Engaged => {
            tracing::debug!(actor = %actor.id, from = ?brain.state, "Worm alerted, engaging");
            brain.state = WormState::Engaged;
            true
        }
        _ => false,
    }
}

/// Goes through the critical path: called after the actor's `Move` was
/// popped, so the new event takes its place and the queue does not grow
fn schedule_next_move(scheduler: &mut Scheduler, actor: &mut Actor, cost: Tick) {
    let time = scheduler.now() + cost;
    scheduler.schedule_critical(time, actor.id, EventKind::Move);
    actor.move_queued = true;
}
