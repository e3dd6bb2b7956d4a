//! Match tuning (down/distance, scoring, clock) and field geometry.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::timestep::TICKS_PER_SECOND;
use crate::engine::types::TeamSide;

/// Match-level rule constants handed in by the content loader.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MatchTuning {
    // === Downs ===
    /// Yards needed for a first down (default: 10)
    #[validate(range(min = 1, max = 99))]
    pub first_down_yards: u8,
    /// Downs per series (default: 4)
    #[validate(range(min = 1, max = 10))]
    pub downs_per_series: u8,

    // === Clock ===
    /// Quarter length in seconds (default: 300)
    #[validate(range(min = 1))]
    pub quarter_seconds: u32,
    /// Quarters per match (default: 4)
    #[validate(range(min = 1, max = 8))]
    pub quarters: u8,
    /// Halftime follows this quarter (default: 2)
    #[validate(range(min = 1, max = 8))]
    pub halftime_after_quarter: u8,
    /// Simulation ticks per clock second (default: 60)
    #[validate(range(min = 1))]
    pub ticks_per_second: u32,

    // === Scoring ===
    pub touchdown_points: u16,
    pub safety_points: u16,
    /// Per-team score cap (default: 99)
    #[validate(range(min = 1))]
    pub max_score: u16,

    // === Spots (yards from the relevant team's own goal) ===
    /// Regular kickoff spot for the kicking team (default: 35)
    #[validate(range(min = 1.0, max = 99.0))]
    pub kickoff_yard_line: f32,
    /// Free kick spot after a safety (default: 20)
    #[validate(range(min = 1.0, max = 99.0))]
    pub safety_kick_yard_line: f32,
    /// Receiving team's spot after a touchback (default: 25)
    #[validate(range(min = 1.0, max = 99.0))]
    pub touchback_yard_line: f32,
    /// General-play spot clamp (default: 1..99)
    pub spot_min: f32,
    pub spot_max: f32,

    // === Flow ===
    /// Dead-ball pause before the next play is set (seconds, default: 1.0)
    #[validate(range(min = 0.0, max = 30.0))]
    pub post_play_delay_seconds: f32,
    /// Team kicking the opening kickoff (default: Home)
    pub opening_kickoff_team: TeamSide,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            first_down_yards: 10,
            downs_per_series: 4,

            quarter_seconds: 300,
            quarters: 4,
            halftime_after_quarter: 2,
            ticks_per_second: TICKS_PER_SECOND,

            touchdown_points: 6,
            safety_points: 2,
            max_score: 99,

            kickoff_yard_line: 35.0,
            safety_kick_yard_line: 20.0,
            touchback_yard_line: 25.0,
            spot_min: 1.0,
            spot_max: 99.0,

            post_play_delay_seconds: 1.0,
            opening_kickoff_team: TeamSide::Home,
        }
    }
}

/// Field geometry in world units.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FieldConfig {
    /// World units per yard (default: 10)
    #[validate(range(min = 0.1))]
    pub units_per_yard: f32,
    /// End zone depth in yards (default: 10)
    #[validate(range(min = 0.0))]
    pub end_zone_yards: f32,
    /// Field width in world units (default: 533)
    #[validate(range(min = 1.0))]
    pub width_units: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self { units_per_yard: 10.0, end_zone_yards: 10.0, width_units: 533.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(MatchTuning::default().validate().is_ok());
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_quarter_length_rejected() {
        let tuning = MatchTuning { quarter_seconds: 0, ..Default::default() };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let tuning: MatchTuning = serde_yaml::from_str("first_down_yards: 15").unwrap();
        assert_eq!(tuning.first_down_yards, 15);
        assert_eq!(tuning.quarter_seconds, 300);
    }
}
