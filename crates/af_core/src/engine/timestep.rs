/// timestep.rs
/// Fixed Timestep Constants
///
/// One simulation tick = one ordered pass through every system. The clock
/// counts ticks; movement, flight and interrupt timers integrate `dt`.

/// Simulation ticks per second
pub const TICKS_PER_SECOND: u32 = 60;

/// Fixed tick length (seconds)
pub const TICK_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
