use thiserror::Error;

/// Fatal configuration and programmer errors.
///
/// Gameplay outcomes (interceptions, touchbacks, a pass with no receiver) are
/// data, never errors.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Loop '{machine}': state '{from}' transitions to unknown state '{target}'")]
    UnknownLoopState { machine: String, from: String, target: String },

    #[error("Loop '{machine}': initial state '{state}' is not defined")]
    UnknownInitialState { machine: String, state: String },

    #[error("Loop '{machine}': state '{state}' is defined more than once")]
    DuplicateLoopState { machine: String, state: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interrupt error: {0}")]
    Interrupt(#[from] InterruptError),
}

impl CoreError {
    /// Configuration errors come from data handed to the engine at startup.
    pub fn is_config_error(&self) -> bool {
        match self {
            CoreError::UnknownLoopState { .. }
            | CoreError::UnknownInitialState { .. }
            | CoreError::DuplicateLoopState { .. }
            | CoreError::InvalidConfig(_)
            | CoreError::Yaml(_) => true,
            CoreError::Json(_) | CoreError::Interrupt(_) => false,
        }
    }
}

/// Contract violations on the interrupt stack.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InterruptError {
    #[error("Interrupt duration must be positive, got {0}")]
    NonPositiveDuration(f32),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownLoopState {
            machine: "phase".to_string(),
            from: "live_play".to_string(),
            target: "nowhere".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Loop 'phase': state 'live_play' transitions to unknown state 'nowhere'"
        );
        assert!(err.is_config_error());

        let err = InterruptError::NonPositiveDuration(0.0);
        assert_eq!(err.to_string(), "Interrupt duration must be positive, got 0");
    }

    #[test]
    fn test_yaml_error_is_config_error() {
        let parsed: std::result::Result<u32, _> = serde_yaml::from_str("not: [a number");
        let err: CoreError = parsed.unwrap_err().into();
        assert!(err.is_config_error());
    }
}
