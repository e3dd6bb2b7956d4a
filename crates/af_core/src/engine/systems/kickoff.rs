//! Kickoff-After-Score
//!
//! Owns possession after touchdowns, safeties and halftime. Schedules the
//! kickoff, which the next-play reset turns into a kickoff play.
//!
//! | trigger   | kicking                      | spot (kicker's own) |
//! |-----------|------------------------------|---------------------|
//! | halftime  | opening-kickoff receiver     | kickoff line (35)   |
//! | touchdown | scoring team                 | kickoff line (35)   |
//! | safety    | `safety_kicking_team(conceding)` | safety line (20) |
//!
//! Halftime wins over a score on the same play.

use tracing::info;

use crate::config::MatchTuning;
use crate::engine::events::{EventBus, KickoffScheduledEvent, PlayEndedEvent};
use crate::engine::field::absolute_from_own;
use crate::engine::state::{MatchState, PendingKickoff};
use crate::engine::systems::rules::RulesVariant;
use crate::engine::types::{Direction, TeamSide};

#[derive(Debug, Clone, Default)]
pub struct KickoffScheduler {
    last_handled: Option<u64>,
}

impl KickoffScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, bus: &mut EventBus, state: &mut MatchState, rules: &dyn RulesVariant, tuning: &MatchTuning) {
        let ended: Vec<PlayEndedEvent> = bus.read::<PlayEndedEvent>().to_vec();
        for event in ended {
            if self.last_handled.is_some_and(|id| id >= event.play_id) {
                continue;
            }
            self.last_handled = Some(event.play_id);
            if let Some(scheduled) = schedule(&event, state, rules, tuning) {
                bus.publish(scheduled);
            }
        }
    }
}

fn schedule(
    ended: &PlayEndedEvent,
    state: &mut MatchState,
    rules: &dyn RulesVariant,
    tuning: &MatchTuning,
) -> Option<KickoffScheduledEvent> {
    if state.match_over {
        return None;
    }
    let (kicking, yard_line, receiving_dir) = if state.halftime_kickoff_due {
        state.halftime_kickoff_due = false;
        let kicking = state.opening_receiver;
        // Ends swap for the second half
        (kicking, tuning.kickoff_yard_line, kicking.opponent().attack_direction().flipped())
    } else if ended.result.touchdown {
        let kicking = ended.result.scoring_team?;
        (kicking, tuning.kickoff_yard_line, state.attack_direction_of(kicking.opponent()))
    } else if ended.result.safety {
        let conceding = ended.result.scoring_team?.opponent();
        let kicking = rules.safety_kicking_team(conceding);
        (kicking, tuning.safety_kick_yard_line, state.attack_direction_of(kicking.opponent()))
    } else {
        return None;
    };
    Some(set_kickoff(state, kicking, yard_line, receiving_dir))
}

fn set_kickoff(state: &mut MatchState, kicking: TeamSide, yard_line: f32, receiving_dir: Direction) -> KickoffScheduledEvent {
    let receiving = kicking.opponent();
    let spot = absolute_from_own(yard_line, receiving_dir.flipped());
    state.possession = receiving;
    state.offense_direction = receiving_dir;
    state.down = 1;
    state.yards_to_go = 10.0;
    state.ball_spot = spot;
    state.drive_id += 1;
    state.pending_kickoff = Some(PendingKickoff { kicking, receiving, kick_yard_line: yard_line });
    info!(?kicking, ?receiving, spot, "kickoff scheduled");
    KickoffScheduledEvent { kicking, receiving, spot }
}
