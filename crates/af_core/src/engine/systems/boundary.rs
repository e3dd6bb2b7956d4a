//! Boundary whistles for the ball carrier: breaking the plane of the goal
//! line being attacked, or leaving the field.

use tracing::info;

use crate::engine::events::{EventBus, WhistleEvent};
use crate::engine::field::{absolute_from_own, distance_from_own_goal, FAR_GOAL_YARD};
use crate::engine::state::{BallState, MatchState, PlayState, WhistleReason};
use crate::engine::systems::TickContext;
use crate::engine::world::World;

pub fn run(
    world: &World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    ctx: &TickContext,
) {
    if !ctx.gates.live || !play.is_live() || play.whistle.is_some() || play.ball_state != BallState::Held {
        return;
    }
    let Some(carrier) = play.ball_owner else {
        return;
    };
    let (Some(position), Some(team)) = (world.positions.get(carrier).copied(), world.team_of(carrier))
    else {
        return;
    };

    let field = ctx.field;
    let direction = match_state.attack_direction_of(team);
    let yard = field.x_to_yard(position.x);

    let call = if distance_from_own_goal(yard, direction) >= FAR_GOAL_YARD {
        Some((WhistleReason::Touchdown, absolute_from_own(FAR_GOAL_YARD, direction)))
    } else if !field.in_bounds(position) {
        Some((WhistleReason::OutOfBounds, yard))
    } else {
        None
    };

    if let Some((reason, end_yard)) = call {
        if play.blow_whistle(reason, end_yard) {
            info!(play_id = play.play_id, carrier = carrier.0, reason = reason.as_str(), end_yard, "whistle");
            bus.publish(WhistleEvent { play_id: play.play_id, reason, end_yard });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Role;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use crate::engine::types::{TeamSide, Vec2};

    fn carrier_at(position: Vec2) -> Fixture {
        let mut f = Fixture::live();
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, position);
        f.give_ball(rb);
        f
    }

    #[test]
    fn test_breaking_the_plane() {
        let mut f = carrier_at(Vec2::new(1000.5, 200.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);
        assert_eq!(f.play.whistle, Some(WhistleReason::Touchdown));
        assert_eq!(f.play.end_yard, 100.0);
    }

    #[test]
    fn test_sideline() {
        let mut f = carrier_at(Vec2::new(450.0, -0.5));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);
        assert_eq!(f.play.whistle, Some(WhistleReason::OutOfBounds));
        assert_eq!(f.play.end_yard, 45.0);
        assert_eq!(f.bus.read::<WhistleEvent>().len(), 1);
    }

    #[test]
    fn test_in_bounds_no_whistle() {
        let mut f = carrier_at(Vec2::new(450.0, 10.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::LIVE);
        run(&f.world, &mut f.bus, &mut f.play, &f.match_state, &ctx);
        assert_eq!(f.play.whistle, None);
    }
}
