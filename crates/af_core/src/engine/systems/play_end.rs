//! Play-End Arbitration
//!
//! The single authority that turns a whistle into a [`PlayEndedEvent`].
//! At most one event per play id, however many times it runs.
//!
//! ## Canonical reason
//! ```text
//! ball team reaches the far goal        → touchdown
//! ball team downed at/behind own goal   → safety   (scrimmage, offense at the snap)
//!                                       → touchback (change of possession, kick)
//! ball team ≠ offense at the snap       → turnover
//! otherwise                             → whistle reason as called
//! ```

use tracing::info;

use crate::engine::events::{EventBus, PlayEndedEvent};
use crate::engine::field::{absolute_from_own, distance_from_own_goal, FAR_GOAL_YARD};
use crate::engine::state::{BallState, MatchState, PlayKind, PlayPhase, PlayResult, PlayState, WhistleReason};
use crate::engine::types::TeamSide;
use crate::engine::world::World;

#[derive(Debug, Clone, Default)]
pub struct PlayEndArbiter {
    last_processed: Option<u64>,
}

impl PlayEndArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_processed(&self) -> Option<u64> {
        self.last_processed
    }

    pub fn run(&mut self, world: &mut World, bus: &mut EventBus, play: &mut PlayState, match_state: &MatchState) {
        if play.phase != PlayPhase::InPlay {
            return;
        }
        let Some(reason) = play.whistle else {
            return;
        };
        if self.last_processed.is_some_and(|id| id >= play.play_id) {
            return;
        }
        self.last_processed = Some(play.play_id);

        let event = arbitrate(world, play, match_state, reason);
        play.phase = PlayPhase::PostPlay;
        play.ball_state = BallState::Dead;
        play.ball_owner = None;
        play.post_play_elapsed = 0.0;
        play.end_yard = event.end_yard;
        play.result = event.result;
        world.set_possession(None);

        info!(
            play_id = event.play_id,
            reason = event.reason.as_str(),
            end_yard = event.end_yard,
            yards = event.result.yards_gained,
            turnover = event.result.turnover,
            "play ended"
        );
        bus.publish(event);
    }
}

/// Team currently entitled to the ball: the holder's team, else whichever
/// team the in-play offense flags name.
fn ball_team(world: &World, play: &PlayState, match_state: &MatchState) -> TeamSide {
    if let Some(team) = play.ball_owner.and_then(|id| world.team_of(id)) {
        return team;
    }
    world
        .teams
        .iter()
        .find(|(_, t)| t.on_offense)
        .map_or(match_state.possession, |(_, t)| t.side)
}

/// Build the play-ended record for `reason`. Pure with respect to the world.
pub fn arbitrate(world: &World, play: &PlayState, match_state: &MatchState, reason: WhistleReason) -> PlayEndedEvent {
    let offense = match_state.possession;
    let offense_dir = match_state.offense_direction;

    if reason == WhistleReason::Incomplete {
        return PlayEndedEvent {
            play_id: play.play_id,
            kind: play.kind,
            reason,
            result: PlayResult::default(),
            end_yard: play.start_yard,
            ball_team: offense,
        };
    }

    let team = ball_team(world, play, match_state);
    let dir = match_state.attack_direction_of(team);
    let own = distance_from_own_goal(play.end_yard, dir);
    let scrimmage = play.kind == PlayKind::Scrimmage;

    let mut result = PlayResult { turnover: scrimmage && team != offense, ..PlayResult::default() };
    let mut end_yard = play.end_yard;
    let canonical = if reason == WhistleReason::Touchdown || own >= FAR_GOAL_YARD {
        result.touchdown = true;
        result.scoring_team = Some(team);
        end_yard = absolute_from_own(FAR_GOAL_YARD, dir);
        WhistleReason::Touchdown
    } else if own <= 0.0 {
        if scrimmage && team == offense {
            result.safety = true;
            result.scoring_team = Some(team.opponent());
            end_yard = absolute_from_own(0.0, dir);
            WhistleReason::Safety
        } else {
            result.touchback = true;
            WhistleReason::Touchback
        }
    } else if result.turnover {
        WhistleReason::Turnover
    } else {
        reason
    };

    result.yards_gained =
        distance_from_own_goal(end_yard, offense_dir) - distance_from_own_goal(play.start_yard, offense_dir);

    PlayEndedEvent { play_id: play.play_id, kind: play.kind, reason: canonical, result, end_yard, ball_team: team }
}
