//! Field Geometry
//!
//! Absolute yard 0 is the home goal line, 100 the away goal line. World
//! `x = yard × units_per_yard`; end zones extend past both goal lines.
//!
//! ```text
//!  -10      0                      50                     100     110  (yards)
//!   | home EZ |----------------------|----------------------| away EZ |
//! ```

use crate::config::FieldConfig;
use crate::engine::types::{Direction, Vec2};

/// Goal line of the away team (absolute yards)
pub const FAR_GOAL_YARD: f32 = 100.0;

/// Derived field geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub units_per_yard: f32,
    pub end_zone_yards: f32,
    pub width: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

impl Field {
    pub fn from_config(cfg: &FieldConfig) -> Self {
        Self {
            units_per_yard: cfg.units_per_yard,
            end_zone_yards: cfg.end_zone_yards,
            width: cfg.width_units,
        }
    }

    #[inline]
    pub fn yard_to_x(&self, yard: f32) -> f32 {
        yard * self.units_per_yard
    }

    #[inline]
    pub fn x_to_yard(&self, x: f32) -> f32 {
        x / self.units_per_yard
    }

    /// Back line of the home end zone (world x)
    pub fn min_x(&self) -> f32 {
        self.yard_to_x(-self.end_zone_yards)
    }

    /// Back line of the away end zone (world x)
    pub fn max_x(&self) -> f32 {
        self.yard_to_x(FAR_GOAL_YARD + self.end_zone_yards)
    }

    pub fn center_y(&self) -> f32 {
        self.width * 0.5
    }

    /// Point on the field centered laterally at an absolute yard.
    pub fn spot(&self, yard: f32) -> Vec2 {
        Vec2::new(self.yard_to_x(yard), self.center_y())
    }

    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= 0.0 && p.y <= self.width
    }

    /// Outside the sidelines (lateral bounds only).
    pub fn out_laterally(&self, p: Vec2) -> bool {
        p.y < 0.0 || p.y > self.width
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min_x(), self.max_x()), p.y.clamp(0.0, self.width))
    }
}

// ============================================================================
// Yard conversions
// ============================================================================

/// Yards from the attacking team's own goal line.
///
/// `0` is the own goal line, `100` the opponent's.
#[inline]
pub fn distance_from_own_goal(absolute_yard: f32, dir: Direction) -> f32 {
    match dir {
        Direction::TowardHundred => absolute_yard,
        Direction::TowardZero => FAR_GOAL_YARD - absolute_yard,
    }
}

/// Inverse of [`distance_from_own_goal`].
#[inline]
pub fn absolute_from_own(own_yards: f32, dir: Direction) -> f32 {
    match dir {
        Direction::TowardHundred => own_yards,
        Direction::TowardZero => FAR_GOAL_YARD - own_yards,
    }
}
