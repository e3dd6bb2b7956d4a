//! Kickoff flight: the kick itself and where it comes down.
//!
//! The kick reuses the pass flight descriptor with [`FlightKind::Kick`].
//! Landing in the receiving team's end zone is a touchback; anywhere else
//! the ball comes down loose and is live for either team.

use tracing::{debug, info};

use crate::engine::components::{BallFlight, FlightKind};
use crate::engine::events::{BallKickedEvent, EventBus, WhistleEvent};
use crate::engine::field::distance_from_own_goal;
use crate::engine::state::{BallState, MatchState, PlayPhase, PlayState, WhistleReason};
use crate::engine::systems::TickContext;
use crate::engine::types::{EntityId, Vec2};
use crate::engine::world::World;

/// Kick from the ball's spot toward the receiving team.
pub fn start_kick(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    kicker: Option<EntityId>,
    ctx: &TickContext,
) -> bool {
    let Some(ball_id) = world.ball_id() else {
        return false;
    };
    let cfg = &ctx.config.kick;
    let field = ctx.field;
    let kicking = match_state.possession.opponent();
    let direction = match_state.attack_direction_of(kicking);

    let start = world.positions.get(ball_id).copied().unwrap_or_else(|| field.spot(play.start_yard));
    let end = field.clamp(Vec2::new(
        start.x + direction.sign() * field.yard_to_x(cfg.distance_yards),
        start.y,
    ));
    let duration = (start.distance(end) / cfg.speed).clamp(cfg.min_duration, cfg.max_duration);

    if let Some(ball) = world.ball.get_mut(ball_id) {
        ball.flight = Some(BallFlight {
            kind: FlightKind::Kick,
            start,
            end,
            duration,
            apex: cfg.apex,
            elapsed: 0.0,
            complete: false,
            thrower: kicker,
            intended_target: None,
            fallback_targets: Vec::new(),
        });
    }
    play.phase = PlayPhase::InPlay;
    play.ball_state = BallState::InAir;
    play.ball_owner = None;
    world.set_possession(None);

    bus.publish(BallKickedEvent { play_id: play.play_id, kicker, kicking, landing: end });
    info!(play_id = play.play_id, ?kicking, landing_yard = field.x_to_yard(end.x), "kickoff");
    true
}

/// Finish a completed kick flight.
pub fn resolve_landing(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    landing: Vec2,
    ctx: &TickContext,
) {
    let receiving = match_state.possession;
    let yard = ctx.field.x_to_yard(landing.x);
    let own = distance_from_own_goal(yard, match_state.attack_direction_of(receiving));

    if let Some(ball_id) = world.ball_id() {
        if let Some(ball) = world.ball.get_mut(ball_id) {
            ball.flight = None;
            ball.height = 0.0;
        }
        world.positions.insert(ball_id, landing);
        world.velocities.insert(ball_id, Vec2::ZERO);
    }

    if own <= 0.0 {
        play.ball_state = BallState::Dead;
        if play.blow_whistle(WhistleReason::Touchback, yard) {
            bus.publish(WhistleEvent {
                play_id: play.play_id,
                reason: WhistleReason::Touchback,
                end_yard: yard,
            });
        }
    } else {
        debug!(play_id = play.play_id, yard, "kick landed in play");
        play.ball_state = BallState::Loose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use crate::engine::types::{Direction, TeamSide};

    fn kickoff_fixture(kick_yards: f32) -> Fixture {
        // Home kicks from absolute 35 toward 100; Away receives
        let mut f = Fixture::kickoff(TeamSide::Home, 35.0);
        f.config.kick.distance_yards = kick_yards;
        f
    }

    #[test]
    fn test_kick_flight_descriptor() {
        let mut f = kickoff_fixture(60.0);
        let ctx = fx::ctx(&f.config, &f.field, fx::PRE_SNAP);
        assert!(start_kick(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, None, &ctx));

        let ball = f.world.ball.get(f.world.ball_id().unwrap()).unwrap();
        let flight = ball.flight.as_ref().unwrap();
        assert_eq!(flight.kind, FlightKind::Kick);
        assert_eq!(flight.end.x, 950.0);
        // 600 units at 150 u/s = 4 s, capped at 3.5
        assert!((flight.duration - 3.5).abs() < 1e-6);
        assert_eq!(f.play.ball_state, BallState::InAir);
        assert_eq!(f.bus.read::<BallKickedEvent>()[0].kicking, TeamSide::Home);
        assert_eq!(f.match_state.attack_direction_of(TeamSide::Away), Direction::TowardZero);
    }

    #[test]
    fn test_landing_in_play_goes_loose() {
        let mut f = kickoff_fixture(60.0);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        f.play.phase = PlayPhase::InPlay;
        resolve_landing(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, Vec2::new(950.0, 266.0), &ctx);
        assert_eq!(f.play.ball_state, BallState::Loose);
        assert_eq!(f.play.whistle, None);
    }

    #[test]
    fn test_landing_in_end_zone_is_touchback() {
        let mut f = kickoff_fixture(70.0);
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        f.play.phase = PlayPhase::InPlay;
        resolve_landing(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, Vec2::new(1040.0, 266.0), &ctx);
        assert_eq!(f.play.whistle, Some(WhistleReason::Touchback));
        assert_eq!(f.bus.read::<WhistleEvent>()[0].end_yard, 104.0);
    }
}
