//! Game Clock
//!
//! Whole-second countdown driven by a tick accumulator. Runs only during
//! live play.
//!
//! ```text
//! clock hits 0 → QuarterEnded
//!   quarter == halftime_after_quarter → Halftime (+ halftime kickoff due)
//!   quarter >= quarters               → GameEnded, match over (terminal)
//!   otherwise                         → next quarter, full clock
//! ```

use tracing::info;

use crate::config::MatchTuning;
use crate::engine::events::{EventBus, GameEndedEvent, HalftimeEvent, QuarterEndedEvent};
use crate::engine::loops::Gates;
use crate::engine::state::{MatchState, PlayState};

/// Whether the clock runs this tick. The play must still be live after
/// arbitration, so the whistle tick never counts; without loop machines the
/// play phase alone decides.
pub fn is_running(gates: Option<&Gates>, play: &PlayState) -> bool {
    match gates {
        Some(gates) => gates.live && play.is_live(),
        None => play.is_live(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameClock {
    accumulator_ticks: u32,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulator_ticks(&self) -> u32 {
        self.accumulator_ticks
    }

    pub fn run(&mut self, bus: &mut EventBus, state: &mut MatchState, tuning: &MatchTuning, running: bool) {
        if state.match_over || !running {
            return;
        }
        self.accumulator_ticks += 1;
        if self.accumulator_ticks < tuning.ticks_per_second {
            return;
        }
        self.accumulator_ticks = 0;
        state.clock_seconds = state.clock_seconds.saturating_sub(1);
        if state.clock_seconds > 0 {
            return;
        }

        let quarter = state.quarter;
        info!(quarter, home = state.score[0], away = state.score[1], "quarter ended");
        bus.publish(QuarterEndedEvent { quarter });

        if quarter == tuning.halftime_after_quarter {
            state.halftime_kickoff_due = true;
            bus.publish(HalftimeEvent);
        }
        if quarter >= tuning.quarters {
            state.match_over = true;
            info!(home = state.score[0], away = state.score[1], "game over");
            bus.publish(GameEndedEvent { home_score: state.score[0], away_score: state.score[1] });
        } else {
            state.quarter += 1;
            state.clock_seconds = tuning.quarter_seconds;
        }
    }
}
