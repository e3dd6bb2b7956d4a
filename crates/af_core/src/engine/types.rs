//! Core value types shared by every system.
//!
//! World coordinates are in *units*. `x` runs along the length of the field
//! (see [`crate::engine::field`] for the yard mapping), `y` across it.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

// ============================================================================
// Vec2
// ============================================================================

/// 2D vector in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Squared distance (comparison only, no sqrt)
    #[inline]
    pub fn distance_sq(self, other: Self) -> f32 {
        (other - self).length_sq()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Unit vector, or zero for a degenerate input.
    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 1e-6 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Linear interpolation, `t` is not clamped.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Stable entity handle, a dense index into the world's component arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// RNG input for this id.
    #[inline]
    pub const fn seed(self) -> u32 {
        self.0
    }
}

/// RNG input for an optional entity; absent entities hash as `u32::MAX`.
#[inline]
pub fn seed_of(id: Option<EntityId>) -> u32 {
    id.map_or(u32::MAX, EntityId::seed)
}

/// Team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Index into per-team arrays (home = 0, away = 1)
    pub const fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }

    /// Direction this team attacks in the first half.
    ///
    /// Home defends yard 0 and attacks toward yard 100.
    pub const fn attack_direction(self) -> Direction {
        match self {
            TeamSide::Home => Direction::TowardHundred,
            TeamSide::Away => Direction::TowardZero,
        }
    }
}

/// Direction of attack along the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Attacks toward absolute yard 100 (`+1`)
    TowardHundred,
    /// Attacks toward absolute yard 0 (`-1`)
    TowardZero,
}

impl Direction {
    pub const fn sign(self) -> f32 {
        match self {
            Direction::TowardHundred => 1.0,
            Direction::TowardZero => -1.0,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Direction::TowardHundred => Direction::TowardZero,
            Direction::TowardZero => Direction::TowardHundred,
        }
    }
}
