//! Configuration for the Thompson-sampling POMDP agent.

use crate::error::{PomdpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the belief tracker does when an observation has zero likelihood
/// under the predicted belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateBeliefPolicy {
    /// Return `PomdpError::DegenerateBelief` and leave the belief untouched.
    Fail,
    /// Replace the belief with the uniform distribution and carry on.
    ResetToUniform,
}

impl Default for DegenerateBeliefPolicy {
    fn default() -> Self {
        DegenerateBeliefPolicy::Fail
    }
}

/// Hyper-parameters of a [`ThompsonPomdpAgent`](crate::agent::ThompsonPomdpAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Dirichlet prior strength added to every soft pseudo-count (must be > 0).
    pub dirichlet_param: f64,
    /// Initial reward estimate for every (state, action, next state) triple.
    pub reward_param: f64,
    /// Number of interaction steps between replans (T).
    pub horizon: usize,
    /// Discount factor for value iteration, in `[0, 1)`.
    pub discount: f64,
    /// Stop value iteration once the largest per-state change falls below this.
    pub tolerance: f64,
    /// Maximum number of value-iteration sweeps before giving up.
    pub max_iterations: usize,
    /// Handling of zero-likelihood observations.
    pub degenerate_belief: DegenerateBeliefPolicy,
    /// Seed for the default random generator; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            dirichlet_param: 1.0,
            reward_param: 0.0,
            horizon: 10,
            discount: 0.95,
            tolerance: 1e-2,
            max_iterations: 1_000_000,
            degenerate_belief: DegenerateBeliefPolicy::Fail,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn new(dirichlet_param: f64, reward_param: f64) -> Self {
        Self {
            dirichlet_param,
            reward_param,
            ..Default::default()
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_degenerate_belief(mut self, policy: DegenerateBeliefPolicy) -> Self {
        self.degenerate_belief = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter range.
    pub fn validate(&self) -> Result<()> {
        if !(self.dirichlet_param.is_finite() && self.dirichlet_param > 0.0) {
            return Err(PomdpError::InvalidParameter {
                name: "dirichlet_param".to_string(),
                reason: format!("must be a positive finite number, got {}", self.dirichlet_param),
            });
        }
        if !self.reward_param.is_finite() {
            return Err(PomdpError::InvalidParameter {
                name: "reward_param".to_string(),
                reason: format!("must be finite, got {}", self.reward_param),
            });
        }
        if self.horizon == 0 {
            return Err(PomdpError::invalid_parameter("horizon", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.discount) {
            return Err(PomdpError::InvalidParameter {
                name: "discount".to_string(),
                reason: format!("must lie in [0, 1), got {}", self.discount),
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PomdpError::InvalidParameter {
                name: "tolerance".to_string(),
                reason: format!("must be a positive finite number, got {}", self.tolerance),
            });
        }
        if self.max_iterations == 0 {
            return Err(PomdpError::invalid_parameter("max_iterations", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&data)?;
        log::info!("Loaded agent configuration from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
