//! Tick systems, one module per step of [`Simulation::step`](crate::engine::Simulation::step).
//!
//! Systems never call each other's bookkeeping; they talk through the
//! [`EventBus`](crate::engine::events::EventBus) and the explicitly passed
//! match/play singletons.

pub mod actions;
pub mod ball;
pub mod boundary;
pub mod clock;
pub mod contact;
pub mod engagement;
pub mod kick;
pub mod kickoff;
pub mod loop_driver;
pub mod loose_ball;
pub mod movement;
pub mod pass;
pub mod play_end;
pub mod reset;
pub mod rules;
pub mod snap;
pub mod tackle;

use crate::config::EngineConfig;
use crate::engine::field::Field;
use crate::engine::loops::Gates;

/// Read-only inputs shared by every system in one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub config: &'a EngineConfig,
    pub field: &'a Field,
    /// On-field gates as of the start of the tick
    pub gates: Gates,
    pub dt: f32,
}
