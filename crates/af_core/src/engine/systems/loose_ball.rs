//! Fumble & Loose Ball
//!
//! 1. `check_fumbles`: a play-ending tackle may strip the ball. A strip
//!    cancels the tackle whistle, so the play stays live.
//! 2. `resolve_fumbles`: the ball comes loose and scatters.
//! 3. `pickup`: each tick a loose, unowned ball goes to the nearest player
//!    inside the pickup radius (smaller id on ties).

use std::f32::consts::PI;

use tracing::{debug, info};

use crate::config::FumbleConfig;
use crate::engine::events::{
    EventBus, FumbleEvent, PickupEvent, PossessionChangedEvent, TackleEvent, WhistleEvent,
};
use crate::engine::rng::{draw, play_seed, salt};
use crate::engine::sort_keys::min_by_value;
use crate::engine::state::{BallState, PlayState, WhistleReason};
use crate::engine::systems::TickContext;
use crate::engine::types::Vec2;
use crate::engine::world::World;

/// Strip chance for a carrier with `ball_control` (0-100).
pub fn fumble_chance(ball_control: u8, cfg: &FumbleConfig) -> f32 {
    (cfg.base_chance - cfg.ball_control_factor * (ball_control as f32 / 100.0))
        .clamp(cfg.min_chance, cfg.max_chance)
}

pub fn check_fumbles(world: &World, bus: &mut EventBus, play: &mut PlayState, ctx: &TickContext) {
    if !ctx.gates.live || !play.is_live() || play.whistle != Some(WhistleReason::Tackle) {
        return;
    }
    if !bus.read::<WhistleEvent>().iter().any(|w| w.reason == WhistleReason::Tackle) {
        return;
    }
    if play.ball_state != BallState::Held {
        return;
    }
    let Some(tackle) = bus
        .read::<TackleEvent>()
        .iter()
        .find(|t| t.outcome.ends_play() && Some(t.carrier) == play.ball_owner)
        .copied()
    else {
        return;
    };
    let ball_control = world.attributes.get(tackle.carrier).map_or(0, |a| a.ball_control);
    let chance = fumble_chance(ball_control, &ctx.config.fumble);
    let u = draw(&[
        play_seed(play.play_id),
        tackle.carrier.seed(),
        tackle.tackler.seed(),
        tackle.attempt,
        salt::FUMBLE_STRIP,
    ]);
    if u >= chance {
        return;
    }

    play.cancel_whistle();
    info!(play_id = play.play_id, carrier = tackle.carrier.0, chance, "fumble");
    bus.publish(FumbleEvent {
        play_id: play.play_id,
        carrier: tackle.carrier,
        tackler: tackle.tackler,
        attempt: tackle.attempt,
        position: tackle.position,
    });
}

pub fn resolve_fumbles(world: &mut World, bus: &EventBus, play: &mut PlayState, ctx: &TickContext) {
    if !ctx.gates.live {
        return;
    }
    let Some(ball_id) = world.ball_id() else {
        return;
    };
    for fumble in bus.read::<FumbleEvent>() {
        if fumble.play_id != play.play_id
            || play.ball_state != BallState::Held
            || play.ball_owner != Some(fumble.carrier)
        {
            debug!(play_id = fumble.play_id, carrier = fumble.carrier.0, "stale fumble ignored");
            continue;
        }
        play.ball_state = BallState::Loose;
        play.ball_owner = None;
        world.set_possession(None);

        let u = draw(&[
            play_seed(fumble.play_id),
            fumble.carrier.seed(),
            fumble.tackler.seed(),
            fumble.attempt,
            salt::FUMBLE_SCATTER,
        ]);
        let angle = u * 2.0 * PI - PI;
        let origin = world.positions.get(fumble.carrier).copied().unwrap_or(fumble.position);
        world.positions.insert(ball_id, origin);
        world.velocities.insert(ball_id, Vec2::from_angle(angle) * ctx.config.fumble.scatter_speed);
    }
}

pub fn pickup(world: &mut World, bus: &mut EventBus, play: &mut PlayState, ctx: &TickContext) {
    if !ctx.gates.live || !play.is_live() || play.whistle.is_some() {
        return;
    }
    if play.ball_state != BallState::Loose || play.ball_owner.is_some() {
        return;
    }
    let (Some(ball_id), Some(ball_pos)) = (world.ball_id(), world.ball_position()) else {
        return;
    };
    let radius = ctx.config.fumble.pickup_radius;
    let nearest = min_by_value(
        world
            .player_ids()
            .into_iter()
            .filter_map(|id| world.positions.get(id).map(|p| (id, p.distance_sq(ball_pos))))
            .filter(|&(_, d)| d <= radius * radius),
    );
    let Some((player, _)) = nearest else {
        return;
    };
    let Some(team) = world.team_of(player) else {
        return;
    };

    play.ball_state = BallState::Held;
    play.ball_owner = Some(player);
    world.set_possession(Some(player));
    world.velocities.insert(ball_id, Vec2::ZERO);
    bus.publish(PickupEvent { player, team, position: ball_pos });
    info!(play_id = play.play_id, player = player.0, ?team, "loose ball recovered");

    if !world.on_offense(player) {
        world.set_offense(team);
        bus.publish(PossessionChangedEvent { from: team.opponent(), to: team, player });
    }
}
