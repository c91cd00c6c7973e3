use thiserror::Error;

/// Rejected hyperparameters, reported at agent construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("learning_rate must be finite and greater than 0, got {0}")]
    LearningRate(f64),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("exploration_decay_step must be finite and non-negative, got {0}")]
    DecayStep(f64),

    #[error("final_exploration_rate ({final_rate}) is above initial_exploration_rate ({initial_rate})")]
    FloorAboveStart { initial_rate: f64, final_rate: f64 },

    #[error("action space must hold at least one action")]
    EmptyActionSpace,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment is not ready to receive actions, call reset first")]
    NotReady,

    #[error("action {0} is not part of the action space")]
    InvalidAction(usize),
}
