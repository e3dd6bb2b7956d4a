//! Embedded content defaults.
//!
//! The loop machine YAML shipped with the crate is embedded at compile time
//! so a host without a content pack can still start a match.
//!
//! ```rust
//! use af_core::data::{embedded_phase_loop, embedded_game_loop};
//!
//! let phase = embedded_phase_loop().unwrap();
//! assert_eq!(phase.initial, "pre_snap");
//! assert!(embedded_game_loop().unwrap().validate().is_ok());
//! ```

use std::sync::OnceLock;

use crate::config::LoopDefinition;
use crate::error::Result;

// =============================================================================
// Embedded YAML Data
// =============================================================================

/// Match-level loop definition (compile-time embedded)
pub const GAME_LOOP_YAML: &str = include_str!("../../data/loops/game_loop.yaml");

/// On-field loop definition (compile-time embedded)
pub const PHASE_LOOP_YAML: &str = include_str!("../../data/loops/phase_loop.yaml");

// =============================================================================
// Public API
// =============================================================================

/// Parse a loop document and reject dangling state references.
pub fn parse_loop(yaml: &str) -> Result<LoopDefinition> {
    let def = LoopDefinition::from_yaml_str(yaml)?;
    def.validate()?;
    Ok(def)
}

/// Parse and validate the embedded match-level loop.
pub fn embedded_game_loop() -> Result<LoopDefinition> {
    parse_loop(GAME_LOOP_YAML)
}

/// Parse and validate the embedded on-field loop.
pub fn embedded_phase_loop() -> Result<LoopDefinition> {
    parse_loop(PHASE_LOOP_YAML)
}

// =============================================================================
// Static Caching
// =============================================================================

static GAME_LOOP: OnceLock<LoopDefinition> = OnceLock::new();
static PHASE_LOOP: OnceLock<LoopDefinition> = OnceLock::new();

/// Embedded match-level loop, parsed once.
pub fn default_game_loop() -> &'static LoopDefinition {
    GAME_LOOP.get_or_init(|| embedded_game_loop().expect("Embedded game_loop.yaml is corrupted"))
}

/// Embedded on-field loop, parsed once.
pub fn default_phase_loop() -> &'static LoopDefinition {
    PHASE_LOOP.get_or_init(|| embedded_phase_loop().expect("Embedded phase_loop.yaml is corrupted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_embedded_loops_match_code_defaults() {
        assert_eq!(embedded_game_loop().unwrap(), LoopDefinition::standard_game_loop());
        assert_eq!(embedded_phase_loop().unwrap(), LoopDefinition::standard_phase_loop());
    }

    #[test]
    fn test_cached_loops_are_shared() {
        assert!(std::ptr::eq(default_game_loop(), default_game_loop()));
        assert_eq!(default_phase_loop().initial, "pre_snap");
    }

    #[test]
    fn test_broken_loop_document_is_an_error() {
        let yaml = "name: game\ninitial: pregame\nstates:\n  - id: pregame\n    next: kickoff\n";
        let err = parse_loop(yaml).unwrap_err();
        assert!(matches!(err, CoreError::UnknownLoopState { ref target, .. } if target == "kickoff"));
        assert!(err.is_config_error());
        assert!(parse_loop("states: [").is_err());
    }
}
