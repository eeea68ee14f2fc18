use std::fmt;

/// Result type for POMDP agent operations
pub type Result<T> = std::result::Result<T, PomdpError>;

/// Main error type for the bayes_pomdp library
#[derive(Debug, Clone, PartialEq)]
pub enum PomdpError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Observation index outside the observation model
    InvalidObservation {
        observation: usize,
        num_observations: usize,
    },

    /// Invalid action
    InvalidAction {
        action: usize,
        num_actions: usize,
    },

    /// Observation has zero (or non-finite) likelihood under the predicted belief
    DegenerateBelief {
        observation: usize,
        normalizer: f64,
    },

    /// A Dirichlet row could not be sampled or normalised
    DirichletDegenerate {
        state: usize,
        action: usize,
    },

    /// Value iteration hit its sweep cap
    PlanningNotConverged {
        iterations: usize,
        residual: f64,
    },

    /// A reward-bearing step arrived before the episode-start step
    EpisodeNotStarted,

    /// Numerical computation errors
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for PomdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PomdpError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            PomdpError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            PomdpError::InvalidObservation { observation, num_observations } => {
                write!(f, "Invalid observation {}: must be less than {}", observation, num_observations)
            }
            PomdpError::InvalidAction { action, num_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, num_actions)
            }
            PomdpError::DegenerateBelief { observation, normalizer } => {
                write!(
                    f,
                    "Degenerate belief: observation {} has normalizer {} under the predicted belief",
                    observation, normalizer
                )
            }
            PomdpError::DirichletDegenerate { state, action } => {
                write!(f, "Degenerate Dirichlet row for state {}, action {}", state, action)
            }
            PomdpError::PlanningNotConverged { iterations, residual } => {
                write!(
                    f,
                    "Value iteration did not converge after {} sweeps (residual {})",
                    iterations, residual
                )
            }
            PomdpError::EpisodeNotStarted => {
                write!(f, "Episode not started: the first interaction of an episode must carry no reward")
            }
            PomdpError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PomdpError::IoError(msg) => write!(f, "IO error: {}", msg),
            PomdpError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PomdpError {}

// Conversion from std::io::Error
impl From<std::io::Error> for PomdpError {
    fn from(err: std::io::Error) -> Self {
        PomdpError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PomdpError {
    fn from(err: serde_json::Error) -> Self {
        PomdpError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl PomdpError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        PomdpError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        PomdpError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
