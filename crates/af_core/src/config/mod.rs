//! # Engine Configuration
//!
//! Every tuning constant the core consumes, grouped per system. The content
//! loader hands an [`EngineConfig`] to [`crate::engine::Simulation`] at
//! startup; nothing in the core reads configuration from disk.
//!
//! ```rust
//! use af_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.tuning.quarter_seconds < config.tuning.quarter_seconds);
//! ```

mod loop_def;
mod resolution;
mod tuning;

pub use loop_def::{LoopDefinition, LoopStateDef, PhaseGates};
pub use resolution::{
    ActionConfig, ContactConfig, FumbleConfig, KickConfig, MovementConfig, PassConfig,
    TackleConfig,
};
pub use tuning::{FieldConfig, MatchTuning};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

/// Full engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tuning: MatchTuning,
    pub field: FieldConfig,
    pub contact: ContactConfig,
    pub tackle: TackleConfig,
    pub pass: PassConfig,
    pub kick: KickConfig,
    pub fumble: FumbleConfig,
    pub movement: MovementConfig,
    pub actions: ActionConfig,
    pub gates: PhaseGates,
    pub game_loop: LoopDefinition,
    pub phase_loop: LoopDefinition,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tuning: MatchTuning::default(),
            field: FieldConfig::default(),
            contact: ContactConfig::default(),
            tackle: TackleConfig::default(),
            pass: PassConfig::default(),
            kick: KickConfig::default(),
            fumble: FumbleConfig::default(),
            movement: MovementConfig::default(),
            actions: ActionConfig::default(),
            gates: PhaseGates::default(),
            game_loop: crate::data::default_game_loop().clone(),
            phase_loop: crate::data::default_phase_loop().clone(),
        }
    }
}

impl EngineConfig {
    /// Standard rules (default)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Short quarters, looser tackling
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.tuning.quarter_seconds = 120;
        cfg.tuning.post_play_delay_seconds = 0.5;
        cfg.tackle.down_bias = -0.05;
        cfg.tackle.fall_forward_chance = 0.30;
        cfg.actions.sprint_multiplier = 1.40;
        cfg.fumble.base_chance = 0.09;
        cfg
    }

    /// Parse a (possibly partial) YAML config and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load-time checks: range constraints and loop definitions.
    pub fn validate(&self) -> Result<()> {
        self.tuning.validate()?;
        self.field.validate()?;
        self.tackle.validate()?;
        self.pass.validate()?;
        self.actions.validate()?;
        self.game_loop.validate()?;
        self.phase_loop.validate()?;
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.tuning.first_down_yards, 10);
        assert_eq!(cfg.tuning.quarter_seconds, 300);
        assert!((cfg.contact.tackle_radius - 8.0).abs() < f32::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_arcade_is_faster() {
        let realistic = EngineConfig::realistic();
        let arcade = EngineConfig::arcade();
        assert!(arcade.tuning.quarter_seconds < realistic.tuning.quarter_seconds);
        assert!(arcade.tackle.down_bias < realistic.tackle.down_bias);
        assert!(arcade.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial() {
        let cfg = EngineConfig::from_yaml_str("tuning:\n  quarter_seconds: 180\n").unwrap();
        assert_eq!(cfg.tuning.quarter_seconds, 180);
        assert_eq!(cfg.tuning.first_down_yards, 10);
        assert_eq!(cfg.phase_loop, LoopDefinition::standard_phase_loop());
    }

    #[test]
    fn test_from_yaml_rejects_bad_ranges() {
        let err = EngineConfig::from_yaml_str("tuning:\n  first_down_yards: 0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_yaml_rejects_zero_interrupt() {
        let err = EngineConfig::from_yaml_str("actions:\n  engagement_seconds: 0.0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_yaml_rejects_bad_loop() {
        let yaml = "phase_loop:\n  name: phase\n  initial: pre_snap\n  states:\n    - id: pre_snap\n      on: { snap: nowhere }\n";
        let err = EngineConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CoreError::UnknownLoopState { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert!((parsed.pass.lob_speed - cfg.pass.lob_speed).abs() < 0.001);
        assert_eq!(parsed.game_loop, cfg.game_loop);
    }
}
