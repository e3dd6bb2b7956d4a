//! Down & Distance
//!
//! Applies each [`PlayEndedEvent`] to the match: play count, scoring,
//! possession changes, downs and the next spot. Scoring plays stop here;
//! possession after a score belongs to the kickoff scheduler.
//!
//! League-specific placeholders sit behind [`RulesVariant`].

use tracing::{debug, info};

use crate::config::MatchTuning;
use crate::engine::events::{EventBus, PlayEndedEvent};
use crate::engine::field::{absolute_from_own, distance_from_own_goal, FAR_GOAL_YARD};
use crate::engine::state::{MatchState, PlayKind};
use crate::engine::types::TeamSide;

// ============================================================================
// Rules variant
// ============================================================================

/// Extension point for rule-set differences.
pub trait RulesVariant: std::fmt::Debug {
    /// Yards to gain for a new series, `spot_distance` yards from the goal.
    fn yards_to_go(&self, spot_distance: f32, first_down_yards: f32) -> f32;

    /// Team taking the free kick after `conceding` gave up a safety.
    fn safety_kicking_team(&self, conceding: TeamSide) -> TeamSide;

    /// Hook for penalty enforcement before the play is applied.
    fn penalty_adjustment(&self, _ended: &PlayEndedEvent, _state: &mut MatchState) {}
}

/// Goal-to-go inside the first-down distance; the conceding team free-kicks
/// after a safety.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesVariant for StandardRules {
    fn yards_to_go(&self, spot_distance: f32, first_down_yards: f32) -> f32 {
        first_down_yards.min(spot_distance)
    }

    fn safety_kicking_team(&self, conceding: TeamSide) -> TeamSide {
        conceding
    }
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct DownDistance {
    last_applied: Option<u64>,
}

impl DownDistance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, bus: &EventBus, state: &mut MatchState, rules: &dyn RulesVariant, tuning: &MatchTuning) {
        for ended in bus.read::<PlayEndedEvent>() {
            self.apply(ended, state, rules, tuning);
        }
    }

    pub fn apply(&mut self, ended: &PlayEndedEvent, state: &mut MatchState, rules: &dyn RulesVariant, tuning: &MatchTuning) {
        if self.last_applied.is_some_and(|id| id >= ended.play_id) {
            debug!(play_id = ended.play_id, "play already applied");
            return;
        }
        self.last_applied = Some(ended.play_id);

        rules.penalty_adjustment(ended, state);
        state.plays_run += 1;
        let result = &ended.result;

        if result.is_scoring() {
            if let Some(team) = result.scoring_team {
                let points = if result.touchdown { tuning.touchdown_points } else { tuning.safety_points };
                let score = &mut state.score[team.index()];
                *score = score.saturating_add(points).min(tuning.max_score);
                info!(?team, points, home = state.score[0], away = state.score[1], "score");
            }
            return;
        }

        let team = ended.ball_team;
        let dir = state.attack_direction_of(team);
        if ended.kind == PlayKind::Kickoff || result.touchback || team != state.possession {
            let own = if result.touchback {
                tuning.touchback_yard_line
            } else {
                distance_from_own_goal(ended.end_yard, dir)
            };
            if team != state.possession {
                state.drive_id += 1;
            }
            state.possession = team;
            state.offense_direction = dir;
            new_series(state, own, rules, tuning);
            return;
        }

        let gained = distance_from_own_goal(ended.end_yard, dir) - distance_from_own_goal(state.ball_spot, dir);
        let own = distance_from_own_goal(ended.end_yard, dir);
        if gained >= state.yards_to_go {
            new_series(state, own, rules, tuning);
        } else if state.down >= tuning.downs_per_series {
            let defense = team.opponent();
            info!(offense = ?team, "turnover on downs");
            state.possession = defense;
            state.offense_direction = dir.flipped();
            state.drive_id += 1;
            new_series(state, FAR_GOAL_YARD - own, rules, tuning);
        } else {
            state.down += 1;
            state.yards_to_go -= gained;
            state.ball_spot = absolute_from_own(clamp_spot(own, tuning), dir);
        }
    }
}

fn clamp_spot(own: f32, tuning: &MatchTuning) -> f32 {
    own.clamp(tuning.spot_min, tuning.spot_max)
}

/// 1st down for the current possession, `own` yards from its goal line.
fn new_series(state: &mut MatchState, own: f32, rules: &dyn RulesVariant, tuning: &MatchTuning) {
    let own = clamp_spot(own, tuning);
    state.down = 1;
    state.yards_to_go = rules.yards_to_go(FAR_GOAL_YARD - own, tuning.first_down_yards as f32);
    state.ball_spot = absolute_from_own(own, state.offense_direction);
}
