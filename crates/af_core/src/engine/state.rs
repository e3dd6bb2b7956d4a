//! Match and play singletons.
//!
//! `MatchState` is created once per match and written only by the
//! down/distance and kickoff-after-score systems. `PlayState` is rebuilt
//! exactly once per play through [`PlayState::reset_for_next_play`].

use serde::{Deserialize, Serialize};

use crate::engine::field::absolute_from_own;
use crate::engine::types::{Direction, EntityId, TeamSide};

// ============================================================================
// Enums
// ============================================================================

/// Play phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayPhase {
    #[default]
    PreSnap,
    InPlay,
    PostPlay,
}

/// Ball state (authoritative copy lives in `PlayState`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    #[default]
    Dead,
    Held,
    InAir,
    Loose,
}

/// Why the play was blown dead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhistleReason {
    Tackle,
    OutOfBounds,
    Touchdown,
    Safety,
    Touchback,
    Incomplete,
    Turnover,
}

impl WhistleReason {
    pub fn as_str(self) -> &'static str {
        match self {
            WhistleReason::Tackle => "tackle",
            WhistleReason::OutOfBounds => "out_of_bounds",
            WhistleReason::Touchdown => "touchdown",
            WhistleReason::Safety => "safety",
            WhistleReason::Touchback => "touchback",
            WhistleReason::Incomplete => "incomplete",
            WhistleReason::Turnover => "turnover",
        }
    }
}

/// Scrimmage down or kickoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayKind {
    #[default]
    Scrimmage,
    Kickoff,
}

/// Outcome record of a finished play
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayResult {
    pub yards_gained: f32,
    pub turnover: bool,
    pub touchdown: bool,
    pub safety: bool,
    pub touchback: bool,
    /// Team that scored, if any
    pub scoring_team: Option<TeamSide>,
}

impl PlayResult {
    pub fn is_scoring(&self) -> bool {
        self.touchdown || self.safety
    }
}

// ============================================================================
// MatchState
// ============================================================================

/// Kickoff waiting to be set up by the next-play reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingKickoff {
    pub kicking: TeamSide,
    pub receiving: TeamSide,
    /// Kick spot, yards from the kicking team's own goal
    pub kick_yard_line: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Team on offense
    pub possession: TeamSide,
    pub offense_direction: Direction,
    pub down: u8,
    pub yards_to_go: f32,
    /// Absolute yard (0-100)
    pub ball_spot: f32,
    pub quarter: u8,
    pub clock_seconds: u32,
    /// Indexed by [`TeamSide::index`]
    pub score: [u16; 2],
    pub drive_id: u32,
    pub plays_run: u32,
    pub match_over: bool,
    pub opening_receiver: TeamSide,
    pub halftime_kickoff_due: bool,
    pub pending_kickoff: Option<PendingKickoff>,
}

impl MatchState {
    /// Opening state: `kicking` kicks off from its own `kick_yard_line`.
    pub fn opening(kicking: TeamSide, kick_yard_line: f32, quarter_seconds: u32) -> Self {
        let receiving = kicking.opponent();
        let direction = receiving.attack_direction();
        Self {
            possession: receiving,
            offense_direction: direction,
            down: 1,
            yards_to_go: 10.0,
            ball_spot: absolute_from_own(kick_yard_line, direction.flipped()),
            quarter: 1,
            clock_seconds: quarter_seconds,
            score: [0, 0],
            drive_id: 1,
            plays_run: 0,
            match_over: false,
            opening_receiver: receiving,
            halftime_kickoff_due: false,
            pending_kickoff: Some(PendingKickoff { kicking, receiving, kick_yard_line }),
        }
    }

    pub fn score_of(&self, team: TeamSide) -> u16 {
        self.score[team.index()]
    }

    /// Direction `team` is attacking in the current half.
    pub fn attack_direction_of(&self, team: TeamSide) -> Direction {
        if team == self.possession {
            self.offense_direction
        } else {
            self.offense_direction.flipped()
        }
    }
}

// ============================================================================
// PlayState
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayState {
    pub play_id: u64,
    pub kind: PlayKind,
    /// Absolute yards
    pub start_yard: f32,
    pub end_yard: f32,
    pub elapsed_seconds: f32,
    pub phase: PlayPhase,
    pub ball_state: BallState,
    /// Weak reference: the entity may no longer exist
    pub ball_owner: Option<EntityId>,
    pub whistle: Option<WhistleReason>,
    pub result: PlayResult,
    /// Dead-ball time since the whistle
    pub post_play_elapsed: f32,
}

impl PlayState {
    pub fn new(play_id: u64, kind: PlayKind, start_yard: f32) -> Self {
        Self {
            play_id,
            kind,
            start_yard,
            end_yard: start_yard,
            elapsed_seconds: 0.0,
            phase: PlayPhase::PreSnap,
            ball_state: BallState::Dead,
            ball_owner: None,
            whistle: None,
            result: PlayResult::default(),
            post_play_elapsed: 0.0,
        }
    }

    /// The single whole-record reset between plays.
    pub fn reset_for_next_play(&mut self, kind: PlayKind, start_yard: f32) {
        *self = Self::new(self.play_id + 1, kind, start_yard);
    }

    pub fn is_live(&self) -> bool {
        self.phase == PlayPhase::InPlay
    }

    /// Record the first whistle of the play; later whistles are ignored.
    pub fn blow_whistle(&mut self, reason: WhistleReason, end_yard: f32) -> bool {
        if self.whistle.is_some() {
            return false;
        }
        self.whistle = Some(reason);
        self.end_yard = end_yard;
        true
    }

    /// Cancel a whistle (strip on the tackle).
    pub fn cancel_whistle(&mut self) {
        self.whistle = None;
    }
}
