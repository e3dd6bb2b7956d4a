//! Next-Play Reset
//!
//! After the dead-ball delay, rebuilds `PlayState` in one step, clears every
//! per-play transient on the players and re-anchors the ball on the new
//! line of scrimmage (or kickoff spot).

use tracing::info;

use crate::engine::components::{Behavior, CommandSlot, MovementIntent};
use crate::engine::events::{EventBus, PlayResetEvent};
use crate::engine::interrupt::InterruptStack;
use crate::engine::state::{MatchState, PlayKind, PlayPhase, PlayState};
use crate::engine::systems::tackle::TackleBook;
use crate::engine::systems::TickContext;
use crate::engine::types::Vec2;
use crate::engine::world::World;

const DELAY_EPSILON: f32 = 1e-4;

pub fn run(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &mut MatchState,
    book: &mut TackleBook,
    ctx: &TickContext,
) {
    if !ctx.gates.dead_ball || play.phase != PlayPhase::PostPlay {
        return;
    }
    play.post_play_elapsed += ctx.dt;
    if play.post_play_elapsed + DELAY_EPSILON < ctx.config.tuning.post_play_delay_seconds {
        return;
    }

    let kind = match match_state.pending_kickoff.take() {
        Some(_) => PlayKind::Kickoff,
        None => PlayKind::Scrimmage,
    };
    let line = match_state.ball_spot;
    play.reset_for_next_play(kind, line);

    clear_transients(world);
    if let Some(ball_id) = world.ball_id() {
        world.positions.insert(ball_id, ctx.field.spot(line));
        world.velocities.insert(ball_id, Vec2::ZERO);
        if let Some(ball) = world.ball.get_mut(ball_id) {
            ball.flight = None;
            ball.height = 0.0;
            ball.state = play.ball_state;
            ball.owner = None;
        }
    }
    world.set_possession(None);
    world.set_offense(match_state.possession);
    book.clear();

    info!(
        play_id = play.play_id,
        ?kind,
        line,
        down = match_state.down,
        to_go = match_state.yards_to_go,
        "next play set"
    );
    bus.publish(PlayResetEvent { play_id: play.play_id, kind, line_of_scrimmage: line });
}

fn clear_transients(world: &mut World) {
    for id in world.player_ids() {
        world.velocities.insert(id, Vec2::ZERO);
        world.intents.insert(id, MovementIntent::default());
        world.behaviors.insert(id, Behavior::default());
        world.interrupts.insert(id, InterruptStack::new());
        world.commands.insert(id, CommandSlot::default());
        if let Some(mods) = world.speed_mods.get_mut(id) {
            mods.clear();
        }
    }
}
