//! Data-defined loop machine definitions and the phase gate sets.
//!
//! ```yaml
//! name: phase
//! initial: pre_snap
//! states:
//!   - id: pre_snap
//!     on: { snap: live_play }
//!   - id: live_play
//!     on: { whistle: dead_ball }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, Result};

/// One state of a loop machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStateDef {
    pub id: String,
    /// Unconditional transition applied on `tick()`
    #[serde(default)]
    pub next: Option<String>,
    /// Event name → destination state id
    #[serde(default)]
    pub on: BTreeMap<String, String>,
}

impl LoopStateDef {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), next: None, on: BTreeMap::new() }
    }

    pub fn with_next(mut self, next: &str) -> Self {
        self.next = Some(next.to_string());
        self
    }

    pub fn on(mut self, event: &str, target: &str) -> Self {
        self.on.insert(event.to_string(), target.to_string());
        self
    }
}

/// Complete loop machine definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopDefinition {
    pub name: String,
    pub initial: String,
    pub states: Vec<LoopStateDef>,
}

impl LoopDefinition {
    /// Match-level loop: pregame → first half → halftime → second half → final.
    pub fn standard_game_loop() -> Self {
        Self {
            name: "game".to_string(),
            initial: "pregame".to_string(),
            states: vec![
                LoopStateDef::new("pregame").with_next("first_half"),
                LoopStateDef::new("first_half")
                    .on("halftime", "halftime")
                    .on("game_ended", "final"),
                LoopStateDef::new("halftime").with_next("second_half"),
                LoopStateDef::new("second_half").on("game_ended", "final"),
                LoopStateDef::new("final"),
            ],
        }
    }

    /// On-field loop: pre-snap → live play → dead ball → pre-snap.
    pub fn standard_phase_loop() -> Self {
        Self {
            name: "phase".to_string(),
            initial: "pre_snap".to_string(),
            states: vec![
                LoopStateDef::new("pre_snap")
                    .on("snap", "live_play")
                    .on("game_ended", "halted"),
                LoopStateDef::new("live_play")
                    .on("whistle", "dead_ball")
                    .on("game_ended", "halted"),
                LoopStateDef::new("dead_ball")
                    .on("reset", "pre_snap")
                    .on("game_ended", "halted"),
                LoopStateDef::new("halted"),
            ],
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn state(&self, id: &str) -> Option<&LoopStateDef> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Load-time check: unique ids, known initial state, every target known.
    pub fn validate(&self) -> Result<()> {
        let mut ids = BTreeSet::new();
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(CoreError::DuplicateLoopState {
                    machine: self.name.clone(),
                    state: state.id.clone(),
                });
            }
        }
        if !ids.contains(self.initial.as_str()) {
            return Err(CoreError::UnknownInitialState {
                machine: self.name.clone(),
                state: self.initial.clone(),
            });
        }
        for state in &self.states {
            let targets = state.next.iter().chain(state.on.values());
            for target in targets {
                if !ids.contains(target.as_str()) {
                    return Err(CoreError::UnknownLoopState {
                        machine: self.name.clone(),
                        from: state.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// On-field state-id sets that gate compiled systems.
///
/// This is the only place compiled logic refers to loop state ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseGates {
    pub pre_snap: Vec<String>,
    pub live: Vec<String>,
    pub dead_ball: Vec<String>,
}

impl Default for PhaseGates {
    fn default() -> Self {
        Self {
            pre_snap: vec!["pre_snap".to_string()],
            live: vec!["live_play".to_string()],
            dead_ball: vec!["dead_ball".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_loops_validate() {
        assert!(LoopDefinition::standard_game_loop().validate().is_ok());
        assert!(LoopDefinition::standard_phase_loop().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_target() {
        let mut def = LoopDefinition::standard_phase_loop();
        def.states[0] = LoopStateDef::new("pre_snap").on("snap", "missing");
        let err = def.validate().unwrap_err();
        assert!(matches!(err, CoreError::UnknownLoopState { ref target, .. } if target == "missing"));
    }

    #[test]
    fn test_validate_rejects_duplicate_and_bad_initial() {
        let def = LoopDefinition {
            name: "dup".to_string(),
            initial: "a".to_string(),
            states: vec![LoopStateDef::new("a"), LoopStateDef::new("a")],
        };
        assert!(matches!(def.validate(), Err(CoreError::DuplicateLoopState { .. })));

        let def = LoopDefinition {
            name: "bad".to_string(),
            initial: "zzz".to_string(),
            states: vec![LoopStateDef::new("a")],
        };
        assert!(matches!(def.validate(), Err(CoreError::UnknownInitialState { .. })));
    }

    #[test]
    fn test_yaml_round_trip_shape() {
        let yaml = "name: t\ninitial: a\nstates:\n  - id: a\n    next: b\n  - id: b\n    on: { go: a }\n";
        let def = LoopDefinition::from_yaml_str(yaml).unwrap();
        assert_eq!(def.state("a").unwrap().next.as_deref(), Some("b"));
        assert_eq!(def.state("b").unwrap().on.get("go").map(String::as_str), Some("a"));
        assert!(def.validate().is_ok());
    }
}
