//! Resolution tuning: contact radii, tackle/pass/kick/fumble constants,
//! movement and action-command effects.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Proximity radii used by the contact detector (world units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Broad-phase pair radius (default: 12)
    pub proximity_radius: f32,
    /// Carrier tackle-contact radius (default: 8)
    pub tackle_radius: f32,
    /// Extra reach when the defender attempted a tackle this tick (default: 2)
    pub tackle_attempt_bonus: f32,
    /// Block-contact radius (default: 12)
    pub block_radius: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 12.0,
            tackle_radius: 8.0,
            tackle_attempt_bonus: 2.0,
            block_radius: 12.0,
        }
    }
}

/// Tackle outcome model
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TackleConfig {
    /// Per-pair re-resolve cooldown (seconds, default: 0.20)
    pub pair_cooldown_seconds: f32,
    /// Added to the rating ratio before clamping (default: 0.02)
    pub down_bias: f32,
    pub p_down_min: f32,
    pub p_down_max: f32,
    /// Stumble band: base + closeness_weight × (1 − closeness)
    pub stumble_base: f32,
    pub stumble_closeness_weight: f32,
    pub stumble_max: f32,
    /// Chance a downed carrier falls forward (default: 0.18)
    pub fall_forward_chance: f32,
    /// Speed multiplier while stumbling (default: 0.65)
    pub stumble_speed_multiplier: f32,
    pub stumble_seconds: f32,
    /// Active tackle interrupt is cut to at most this after a stumble
    pub stumble_interrupt_remaining: f32,
    /// Tackle interrupt pushed on both players at contact (default: 0.35)
    #[validate(range(min = 0.001))]
    pub interrupt_seconds: f32,
}

impl Default for TackleConfig {
    fn default() -> Self {
        Self {
            pair_cooldown_seconds: 0.20,
            down_bias: 0.02,
            p_down_min: 0.02,
            p_down_max: 0.98,
            stumble_base: 0.08,
            stumble_closeness_weight: 0.12,
            stumble_max: 0.40,
            fall_forward_chance: 0.18,
            stumble_speed_multiplier: 0.65,
            stumble_seconds: 0.55,
            stumble_interrupt_remaining: 0.12,
            interrupt_seconds: 0.35,
        }
    }
}

/// Pass flight and catch arbitration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PassConfig {
    /// Units per second (defaults: lob 130, bullet 210)
    pub lob_speed: f32,
    pub bullet_speed: f32,
    pub min_duration: f32,
    pub max_duration: f32,
    /// Cosmetic arc apex (units)
    pub lob_apex: f32,
    pub bullet_apex: f32,
    /// Catch eligibility radius around the ball (default: 14)
    pub eligible_radius: f32,
    /// Incompletion weight in the outcome draw (default: 120)
    #[validate(range(min = 0.001))]
    pub incomplete_base: f32,
    pub lob_defender_multiplier: f32,
    pub lob_incomplete_multiplier: f32,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            lob_speed: 130.0,
            bullet_speed: 210.0,
            min_duration: 0.20,
            max_duration: 1.75,
            lob_apex: 36.0,
            bullet_apex: 8.0,
            eligible_radius: 14.0,
            incomplete_base: 120.0,
            lob_defender_multiplier: 1.15,
            lob_incomplete_multiplier: 0.90,
        }
    }
}

/// Kickoff flight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KickConfig {
    pub speed: f32,
    pub min_duration: f32,
    pub max_duration: f32,
    pub apex: f32,
    /// Kick length in yards (default: 60)
    pub distance_yards: f32,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self { speed: 150.0, min_duration: 0.8, max_duration: 3.5, apex: 80.0, distance_yards: 60.0 }
    }
}

/// Fumble strip and loose-ball handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FumbleConfig {
    pub base_chance: f32,
    /// Subtracted per full ball-control rating (default: 0.045)
    pub ball_control_factor: f32,
    pub min_chance: f32,
    pub max_chance: f32,
    /// Scatter speed (units/s, default: 45)
    pub scatter_speed: f32,
    /// Loose-ball deceleration (units/s², default: 60)
    pub loose_ball_drag: f32,
    /// Pickup radius (default: 10)
    pub pickup_radius: f32,
}

impl Default for FumbleConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.06,
            ball_control_factor: 0.045,
            min_chance: 0.005,
            max_chance: 0.25,
            scatter_speed: 45.0,
            loose_ball_drag: 60.0,
            pickup_radius: 10.0,
        }
    }
}

/// Player movement speed model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed at 0 max-speed rating (units/s)
    pub base_speed: f32,
    /// Added speed per max-speed rating point
    pub speed_per_rating: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { base_speed: 45.0, speed_per_rating: 0.35 }
    }
}

/// Effects of action commands
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ActionConfig {
    pub sprint_multiplier: f32,
    pub sprint_seconds: f32,
    pub juke_multiplier: f32,
    pub juke_seconds: f32,
    /// Self tackle interrupt after a dive (default: 0.5)
    #[validate(range(min = 0.001))]
    pub dive_seconds: f32,
    /// Block engagement interrupt (default: 0.45)
    #[validate(range(min = 0.001))]
    pub engagement_seconds: f32,
    /// Speed multiplier while engaged in a block
    pub engaged_speed_multiplier: f32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            sprint_multiplier: 1.25,
            sprint_seconds: 0.8,
            juke_multiplier: 1.10,
            juke_seconds: 0.35,
            dive_seconds: 0.5,
            engagement_seconds: 0.45,
            engaged_speed_multiplier: 0.25,
        }
    }
}
