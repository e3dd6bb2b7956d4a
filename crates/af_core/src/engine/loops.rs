//! Loop State Machines
//!
//! Two data-defined machines share one shape: the match-level loop
//! (pregame, halves, final) and the on-field loop (pre-snap, live play,
//! dead ball). Compiled systems never name states directly; they ask
//! whether the on-field machine is in one of the [`PhaseGates`] sets.
//!
//! Targets are resolved when a transition is taken. A definition that names
//! a missing state fails on that transition with
//! [`CoreError::UnknownLoopState`].

use tracing::debug;

use crate::config::{LoopDefinition, PhaseGates};
use crate::error::{CoreError, Result};

/// Loop event names raised by the loop driver
pub mod loop_event {
    pub const SNAP: &str = "snap";
    pub const WHISTLE: &str = "whistle";
    pub const RESET: &str = "reset";
    pub const HALFTIME: &str = "halftime";
    pub const GAME_ENDED: &str = "game_ended";
}

#[derive(Debug, Clone)]
pub struct LoopMachine {
    def: LoopDefinition,
    current: String,
    /// (from, to) per transition taken
    history: Vec<(String, String)>,
}

impl LoopMachine {
    /// Start in the definition's initial state.
    pub fn new(def: LoopDefinition) -> Result<Self> {
        if def.state(&def.initial).is_none() {
            return Err(CoreError::UnknownInitialState {
                machine: def.name.clone(),
                state: def.initial.clone(),
            });
        }
        let current = def.initial.clone();
        Ok(Self { def, current, history: Vec::new() })
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    pub fn in_set(&self, ids: &[String]) -> bool {
        ids.iter().any(|id| *id == self.current)
    }

    /// Apply the current state's unconditional `next`, if any.
    pub fn tick(&mut self) -> Result<bool> {
        let target = self.def.state(&self.current).and_then(|s| s.next.clone());
        match target {
            Some(target) => self.transition_to(target).map(|_| true),
            None => Ok(false),
        }
    }

    /// Take the transition mapped to `event` from the current state.
    ///
    /// Returns `Ok(false)` when the current state does not handle `event`.
    pub fn raise_event(&mut self, event: &str) -> Result<bool> {
        let target = self.def.state(&self.current).and_then(|s| s.on.get(event).cloned());
        match target {
            Some(target) => self.transition_to(target).map(|_| true),
            None => Ok(false),
        }
    }

    fn transition_to(&mut self, target: String) -> Result<()> {
        if self.def.state(&target).is_none() {
            return Err(CoreError::UnknownLoopState {
                machine: self.def.name.clone(),
                from: self.current.clone(),
                target,
            });
        }
        debug!(machine = %self.def.name, from = %self.current, to = %target, "loop transition");
        let from = std::mem::replace(&mut self.current, target);
        self.history.push((from, self.current.clone()));
        Ok(())
    }
}

/// Which on-field gates are open this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gates {
    pub pre_snap: bool,
    pub live: bool,
    pub dead_ball: bool,
}

/// The match-level and on-field machines
#[derive(Debug, Clone)]
pub struct LoopMachines {
    pub game: LoopMachine,
    pub phase: LoopMachine,
}

impl LoopMachines {
    pub fn new(game: LoopDefinition, phase: LoopDefinition) -> Result<Self> {
        Ok(Self { game: LoopMachine::new(game)?, phase: LoopMachine::new(phase)? })
    }

    pub fn gates(&self, sets: &PhaseGates) -> Gates {
        Gates {
            pre_snap: self.phase.in_set(&sets.pre_snap),
            live: self.phase.in_set(&sets.live),
            dead_ball: self.phase.in_set(&sets.dead_ball),
        }
    }

    pub fn tick(&mut self) -> Result<()> {
        self.game.tick()?;
        self.phase.tick()?;
        Ok(())
    }
}
