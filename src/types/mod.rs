use crate::error::{PomdpError, Result};
use ndarray::{Array1, Array2, Array3, ArrayView1};
use serde::{Deserialize, Serialize};

/// Probability distribution over hidden states
pub type Belief = Array1<f64>;

/// S×A×S tensor indexed `[state, action, next_state]`
pub type TransitionTensor = Array3<f64>;

/// Fixed sizes of a tabular POMDP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDims {
    pub num_states: usize,
    pub num_actions: usize,
    pub num_observations: usize,
}

impl ModelDims {
    pub fn new(num_states: usize, num_actions: usize, num_observations: usize) -> Result<Self> {
        if num_states == 0 {
            return Err(PomdpError::invalid_parameter("num_states", "must be at least 1"));
        }
        if num_actions == 0 {
            return Err(PomdpError::invalid_parameter("num_actions", "must be at least 1"));
        }
        if num_observations == 0 {
            return Err(PomdpError::invalid_parameter("num_observations", "must be at least 1"));
        }
        Ok(ModelDims { num_states, num_actions, num_observations })
    }

    /// Shape of S×A×S tensors
    pub fn transition_shape(&self) -> (usize, usize, usize) {
        (self.num_states, self.num_actions, self.num_states)
    }

    pub fn check_action(&self, action: usize) -> Result<()> {
        if action >= self.num_actions {
            return Err(PomdpError::InvalidAction { action, num_actions: self.num_actions });
        }
        Ok(())
    }

    pub fn check_observation(&self, observation: usize) -> Result<()> {
        if observation >= self.num_observations {
            return Err(PomdpError::InvalidObservation {
                observation,
                num_observations: self.num_observations,
            });
        }
        Ok(())
    }
}

/// Immutable S×O matrix of observation likelihoods `P(observation | state)`.
///
/// Rows need not sum to one; entries must be finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationModel {
    likelihoods: Array2<f64>,
}

impl ObservationModel {
    pub fn new(likelihoods: Array2<f64>) -> Result<Self> {
        let (rows, cols) = likelihoods.dim();
        if rows == 0 || cols == 0 {
            return Err(PomdpError::dimension_mismatch(
                "non-empty S×O matrix".to_string(),
                format!("{}×{}", rows, cols),
            ));
        }
        if let Some(bad) = likelihoods.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(PomdpError::InvalidParameter {
                name: "observation_model".to_string(),
                reason: format!("entries must be finite and non-negative, found {}", bad),
            });
        }
        Ok(ObservationModel { likelihoods })
    }

    /// Build from nested rows, one row per hidden state.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let num_states = rows.len();
        let num_observations = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(row) = rows.iter().find(|r| r.len() != num_observations) {
            return Err(PomdpError::dimension_mismatch(
                format!("rows of length {}", num_observations),
                format!("row of length {}", row.len()),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let likelihoods = Array2::from_shape_vec((num_states, num_observations), flat)
            .map_err(|e| PomdpError::dimension_mismatch("S×O matrix".to_string(), e.to_string()))?;
        Self::new(likelihoods)
    }

    pub fn num_states(&self) -> usize {
        self.likelihoods.nrows()
    }

    pub fn num_observations(&self) -> usize {
        self.likelihoods.ncols()
    }

    /// Likelihood of `observation` in every hidden state
    pub fn likelihood(&self, observation: usize) -> ArrayView1<'_, f64> {
        self.likelihoods.column(observation)
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.likelihoods
    }
}
