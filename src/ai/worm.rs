//! Burrowing worm behavior
//!
//! Idle -> Burrowing -> Travel -> Idle, plus Engaged smell pursuit once
//! the worm has been provoked.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ai::{AiContext, AiOutcome};
use crate::core::types::{Direction, Position, Tick};
use crate::entity::actor::Actor;
use crate::entity::behavior::{Behavior, WormBrain, WormState};

/// Advance the worm state machine one step, returning the cost until its
/// next decision
pub fn worm_turn(actor: &mut Actor, ctx: &mut AiContext<'_>) -> (AiOutcome, Tick) {
    let Behavior::Worm(mut brain) = actor.behavior else {
        return (AiOutcome::Waited, actor.move_speed);
    };

    let result = match brain.state {
        WormState::Idle => idle(&mut brain, ctx),
        WormState::Burrowing => burrow(actor, &mut brain, ctx),
        WormState::Travel { destination } => surface(actor, &mut brain, destination, ctx),
        WormState::Engaged => pursue(actor, &mut brain, ctx),
    };

    actor.behavior = Behavior::Worm(brain);
    result
}

fn idle(brain: &mut WormBrain, ctx: &mut AiContext<'_>) -> (AiOutcome, Tick) {
    let config = ctx.config;
    let turns = ctx
        .rng
        .gen_range(config.idle_min_turns..=config.idle_max_turns);
    brain.state = WormState::Burrowing;
    (AiOutcome::Waited, Tick::from(turns) * config.default_move_cost)
}

fn burrow(actor: &mut Actor, brain: &mut WormBrain, ctx: &mut AiContext<'_>) -> (AiOutcome, Tick) {
    if !brain.burrowed {
        brain.burrowed = true;
        ctx.map.set_occupied(actor.position, false);
    }

    let destination = pick_burrow_destination(actor.position, ctx).unwrap_or_else(|| {
        tracing::warn!(actor = %actor.id, position = %actor.position, "No burrow destination found, staying put");
        actor.position
    });

    brain.state = WormState::Travel { destination };
    let cost = Tick::from(actor.position.manhattan(&destination)) * actor.move_speed;

    tracing::debug!(actor = %actor.id, from = %actor.position, to = %destination, cost, "Worm burrowing");
    (AiOutcome::Burrowed { destination }, cost)
}

/// Sample random offsets in the search window; first free tile wins
fn pick_burrow_destination(origin: Position, ctx: &mut AiContext<'_>) -> Option<Position> {
    let radius = ctx.config.burrow_search_radius;
    (0..ctx.config.burrow_search_attempts).find_map(|_| {
        let dx = ctx.rng.gen_range(-radius..=radius);
        let dy = ctx.rng.gen_range(-radius..=radius);
        let candidate = origin.offset(dx, dy);
        ctx.map.is_free(candidate).then_some(candidate)
    })
}

fn surface(
    actor: &mut Actor,
    brain: &mut WormBrain,
    destination: Position,
    ctx: &mut AiContext<'_>,
) -> (AiOutcome, Tick) {
    let pause = ctx.config.surface_pause;

    if !ctx.map.is_free(destination) {
        tracing::debug!(actor = %actor.id, at = %destination, "Surface tile taken, burrowing again");
        brain.state = WormState::Burrowing;
        return (AiOutcome::SurfaceBlocked, pause);
    }

    actor.position = destination;
    brain.burrowed = false;
    brain.state = WormState::Idle;
    ctx.map.set_occupied(destination, true);

    tracing::debug!(actor = %actor.id, at = %destination, "Worm surfaced");
    (AiOutcome::Surfaced { at: destination }, pause)
}

fn pursue(actor: &mut Actor, brain: &mut WormBrain, ctx: &mut AiContext<'_>) -> (AiOutcome, Tick) {
    match strongest_scent(actor.position, ctx) {
        Some(next) => {
            ctx.map.relocate(actor.position, next);
            actor.position = next;
            (AiOutcome::Moved { to: next }, actor.move_speed)
        }
        None => {
            tracing::debug!(actor = %actor.id, "Worm lost the scent");
            brain.state = WormState::Idle;
            (AiOutcome::LostScent, ctx.config.lost_scent_cost)
        }
    }
}

/// Free neighbour with the highest smell above zero; ties broken at random
fn strongest_scent(origin: Position, ctx: &mut AiContext<'_>) -> Option<Position> {
    let open: Vec<(Position, u8)> = Direction::CARDINALS
        .iter()
        .map(|dir| origin + *dir)
        .filter(|pos| ctx.map.is_free(*pos))
        .map(|pos| (pos, ctx.map.smell_at(pos)))
        .collect();

    let best = open.iter().map(|(_, smell)| *smell).max()?;
    if best == 0 {
        return None;
    }

    let candidates: Vec<Position> = open
        .into_iter()
        .filter(|(_, smell)| *smell == best)
        .map(|(pos, _)| pos)
        .collect();
    candidates.choose(ctx.rng).copied()
}
