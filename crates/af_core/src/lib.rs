//! # af_core - Deterministic American Football Play Engine
//!
//! Tick-based simulation of individual plays and whole games: snap, kick,
//! pass, contact, tackle, fumble, whistle, down-and-distance, scoring and
//! the game clock, driven by data-defined game/phase loops.
//!
//! ## Features
//! - Bit-for-bit deterministic (no wall clock, no global RNG)
//! - Fixed 60 Hz timestep with a strict per-tick system order
//! - YAML-configurable tuning, resolution models and loops
//! - Serializable snapshots and a closed telemetry stream

// Allow unused code for features under development
#![allow(dead_code)]
// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
#![allow(clippy::empty_line_after_doc_comments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Systems take the world, bus and singletons explicitly
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod data;
pub mod engine;
pub mod error;

pub use config::{EngineConfig, FieldConfig, LoopDefinition, MatchTuning};
pub use engine::{
    ActionCommand, EntityId, MatchState, PendingCommand, PlayKind, PlayState, PlayerAttributes, PlayerSpawn,
    Role, SimSnapshot, Simulation, TeamSide, TelemetryEvent, TelemetryRecord, Vec2,
};
pub use error::{CoreError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_simulation() {
        let mut sim = Simulation::new(EngineConfig::default()).unwrap();
        sim.run_ticks(120).unwrap();
        assert_eq!(sim.tick(), 120);
        assert_eq!(sim.match_state().score, [0, 0]);
        let json = sim.snapshot().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["tick"], 120);
    }

    #[test]
    fn test_yaml_config_is_validated() {
        let err = EngineConfig::from_yaml_str("tuning:\n  quarters: 0\n");
        assert!(err.is_err());
    }
}
