//! Deterministic draws
//!
//! Every probabilistic decision hashes a fixed list of stable integers
//! (play id, entity ids, call-site salt) into a uniform value in `[0, 1)`.
//! There is no RNG state: the same inputs in the same order always produce
//! the same draw, on every platform.
//!
//! ## Construction
//!
//! 1. `x = 0`; for each input `k` in order:
//!    `x ^= k + 0x9e3779b9 + (x << 6) + (x >> 2)` (wrapping u32)
//! 2. xorshift32: `x ^= x << 13; x ^= x >> 17; x ^= x << 5`
//! 3. `u = (x & 0xFFFFFF) / 2^24`
//!
//! Changing any constant or the input order invalidates recorded replays.
//!
//! ```ignore
//! let u = draw(&[play_id, tackler.seed(), carrier.seed(), salt::TACKLE_OUTCOME]);
//! ```

// ============================================================================
// Salts
// ============================================================================

/// Per-call-site salts, one per independent decision.
///
/// Range rule: each system uses its own `0x0Nxx` block.
pub mod salt {
    // Tackle (0x01xx)
    /// Downed / stumble / broken selection
    pub const TACKLE_OUTCOME: u32 = 0x0100;
    /// Fall-forward reclassification
    pub const TACKLE_FALL_FORWARD: u32 = 0x0101;
    /// Fall-forward extra yards
    pub const TACKLE_FALL_YARDS: u32 = 0x0102;

    // Pass (0x02xx)
    /// Catch / interception / incomplete selection
    pub const PASS_OUTCOME: u32 = 0x0200;

    // Fumble (0x03xx)
    /// Strip check on a tackle whistle
    pub const FUMBLE_STRIP: u32 = 0x0300;
    /// Scatter direction
    pub const FUMBLE_SCATTER: u32 = 0x0301;
}

/// Golden-ratio mixing constant
const MIX_CONSTANT: u32 = 0x9e37_79b9;

/// 2^24
const UNIT_DIVISOR: f32 = 16_777_216.0;

// ============================================================================
// Core Functions
// ============================================================================

/// Fold one input into the running state.
#[inline]
pub fn mix(x: u32, k: u32) -> u32 {
    x ^ k
        .wrapping_add(MIX_CONSTANT)
        .wrapping_add(x << 6)
        .wrapping_add(x >> 2)
}

/// 32-bit xorshift finalizer.
#[inline]
pub fn xorshift32(mut x: u32) -> u32 {
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    x
}

/// Raw hash of the inputs, in order.
#[inline]
pub fn hash_inputs(inputs: &[u32]) -> u32 {
    xorshift32(inputs.iter().fold(0u32, |x, &k| mix(x, k)))
}

/// Uniform draw in `[0, 1)` from the low 24 bits of the hash.
#[inline]
pub fn draw(inputs: &[u32]) -> f32 {
    (hash_inputs(inputs) & 0x00FF_FFFF) as f32 / UNIT_DIVISOR
}

/// Play ids are `u64`; the low 32 bits seed draws.
#[inline]
pub fn play_seed(play_id: u64) -> u32 {
    play_id as u32
}

// ============================================================================
// Tests
// ============================================================================
