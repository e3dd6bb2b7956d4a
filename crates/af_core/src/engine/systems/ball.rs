//! Ball motion and the PlayState → ball-entity mirror.

use tracing::warn;

use crate::engine::state::{BallState, PlayState};
use crate::engine::systems::TickContext;
use crate::engine::types::Vec2;
use crate::engine::world::World;

/// Advance an in-flight or loose ball by one tick.
pub fn advance(world: &mut World, play: &PlayState, ctx: &TickContext) {
    if !ctx.gates.live {
        return;
    }
    let Some(ball_id) = world.ball_id() else {
        return;
    };
    let dt = ctx.dt;

    match play.ball_state {
        BallState::InAir => {
            let Some(ball) = world.ball.get_mut(ball_id) else {
                return;
            };
            let Some(flight) = ball.flight.as_mut() else {
                return;
            };
            if flight.complete {
                return;
            }
            flight.elapsed += dt;
            if flight.progress() >= 1.0 {
                flight.complete = true;
            }
            let position = flight.position();
            ball.height = flight.height();
            world.positions.insert(ball_id, position);
        }
        BallState::Loose => {
            let velocity = world.velocities.get(ball_id).copied().unwrap_or_default();
            let speed = (velocity.length() - ctx.config.fumble.loose_ball_drag * dt).max(0.0);
            let velocity = velocity.normalized() * speed;
            world.velocities.insert(ball_id, velocity);
            if let Some(position) = world.positions.get_mut(ball_id) {
                *position = ctx.field.clamp(*position + velocity * dt);
            }
        }
        BallState::Held | BallState::Dead => {}
    }
}

/// Copy state/owner onto the ball entity and glue a held ball to its carrier.
///
/// An owner that no longer exists degrades to "no owner"; a held ball
/// without a carrier comes loose where it is.
pub fn sync(world: &mut World, play: &mut PlayState) {
    let Some(ball_id) = world.ball_id() else {
        return;
    };
    if let Some(owner) = play.ball_owner {
        if !world.is_player(owner) {
            warn!(play_id = play.play_id, owner = owner.0, "ball owner no longer exists");
            play.ball_owner = None;
            if play.ball_state == BallState::Held {
                play.ball_state = BallState::Loose;
            }
        }
    }

    let holder = match play.ball_state {
        BallState::Held => play.ball_owner,
        _ => None,
    };
    if let Some(holder) = holder {
        let position = world.positions.get(holder).copied();
        let velocity = world.velocities.get(holder).copied().unwrap_or(Vec2::ZERO);
        if let Some(position) = position {
            world.positions.insert(ball_id, position);
        }
        world.velocities.insert(ball_id, velocity);
    }
    if let Some(ball) = world.ball.get_mut(ball_id) {
        ball.state = play.ball_state;
        ball.owner = play.ball_owner;
        if holder.is_some() {
            ball.height = 0.0;
        }
    }
    world.set_possession(holder);
}
