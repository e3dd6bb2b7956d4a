//! Starting a play: scrimmage snap to the quarterback, or the kickoff kick.

use tracing::{info, warn};

use crate::engine::components::Role;
use crate::engine::events::{EventBus, SnapEvent};
use crate::engine::sort_keys::min_by_value;
use crate::engine::state::{BallState, MatchState, PlayKind, PlayPhase, PlayState};
use crate::engine::systems::{kick, TickContext};
use crate::engine::types::{EntityId, TeamSide};
use crate::engine::world::World;

/// Start the current play. Returns false if nobody can take the snap.
pub fn snap_ball(
    world: &mut World,
    bus: &mut EventBus,
    play: &mut PlayState,
    match_state: &MatchState,
    snapper: EntityId,
    ctx: &TickContext,
) -> bool {
    match play.kind {
        PlayKind::Kickoff => {
            let kicking = match_state.possession.opponent();
            let kicker = if world.team_of(snapper) == Some(kicking) {
                Some(snapper)
            } else {
                first_with_role(world, kicking, Role::Kicker)
            };
            kick::start_kick(world, bus, play, match_state, kicker, ctx)
        }
        PlayKind::Scrimmage => {
            let offense = match_state.possession;
            let holder = first_with_role(world, offense, Role::Quarterback)
                .or_else(|| (world.team_of(snapper) == Some(offense)).then_some(snapper))
                .or_else(|| nearest_to_ball(world, offense));
            let Some(holder) = holder else {
                warn!(play_id = play.play_id, "snap with no offensive player on the field");
                return false;
            };
            play.phase = PlayPhase::InPlay;
            play.ball_state = BallState::Held;
            play.ball_owner = Some(holder);
            world.set_possession(Some(holder));
            bus.publish(SnapEvent { play_id: play.play_id, holder: Some(holder) });
            info!(play_id = play.play_id, holder = holder.0, line = play.start_yard, "snap");
            true
        }
    }
}

/// Smallest-id player of `team` with `role`.
pub fn first_with_role(world: &World, team: TeamSide, role: Role) -> Option<EntityId> {
    world
        .roles
        .iter()
        .find(|(id, r)| **r == role && world.team_of(*id) == Some(team))
        .map(|(id, _)| id)
}

fn nearest_to_ball(world: &World, team: TeamSide) -> Option<EntityId> {
    let ball = world.ball_position()?;
    min_by_value(world.player_ids().into_iter().filter_map(|id| {
        if world.team_of(id) != Some(team) {
            return None;
        }
        world.positions.get(id).map(|p| (id, p.distance_sq(ball)))
    }))
    .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{self as fx, Fixture};
    use crate::engine::types::Vec2;

    #[test]
    fn test_scrimmage_snap_goes_to_quarterback() {
        let mut f = Fixture::pre_snap();
        let center = f.spawn(TeamSide::Home, Role::OffensiveLine, Vec2::new(300.0, 266.0));
        let qb = f.spawn(TeamSide::Home, Role::Quarterback, Vec2::new(250.0, 266.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::PRE_SNAP);

        assert!(snap_ball(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, center, &ctx));
        assert_eq!(f.play.ball_owner, Some(qb));
        assert_eq!(f.play.ball_state, BallState::Held);
        assert_eq!(f.play.phase, PlayPhase::InPlay);
        assert_eq!(f.world.has_ball.get(qb), Some(&true));
        assert_eq!(f.bus.read::<SnapEvent>().len(), 1);
    }

    #[test]
    fn test_snap_without_quarterback_uses_snapper() {
        let mut f = Fixture::pre_snap();
        let _defender = f.spawn(TeamSide::Away, Role::Linebacker, Vec2::new(310.0, 266.0));
        let rb = f.spawn(TeamSide::Home, Role::RunningBack, Vec2::new(250.0, 266.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::PRE_SNAP);
        assert!(snap_ball(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, rb, &ctx));
        assert_eq!(f.play.ball_owner, Some(rb));
    }

    #[test]
    fn test_snap_with_empty_offense_fails() {
        let mut f = Fixture::pre_snap();
        let defender = f.spawn(TeamSide::Away, Role::Linebacker, Vec2::new(310.0, 266.0));
        let ctx = fx::ctx(&f.config, &f.field, fx::PRE_SNAP);
        assert!(!snap_ball(&mut f.world, &mut f.bus, &mut f.play, &f.match_state, defender, &ctx));
        assert_eq!(f.play.phase, PlayPhase::PreSnap);
    }
}
