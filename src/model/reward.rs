use crate::error::{PomdpError, Result};
use crate::types::ModelDims;
use ndarray::{s, Array2, Array3, Zip};
use serde::{Deserialize, Serialize};

/// Running estimate of `E[reward | state, action, next state]`.
///
/// Each observed reward is blended into every `(prev, action, next)` entry with the
/// weight of its soft transition mass `tp`:
///
/// `R[prev, a, next] = R[prev, a, next] · (1 − tp) + reward · tp`
///
/// Entries with negligible mass stay near their current value; the blend is
/// unconditional, so later rewards keep moving entries that were already visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEstimator {
    estimates: Array3<f64>,
    reward_param: f64,
}

impl RewardEstimator {
    pub fn new(dims: ModelDims, reward_param: f64) -> Result<Self> {
        if !reward_param.is_finite() {
            return Err(PomdpError::InvalidParameter {
                name: "reward_param".to_string(),
                reason: format!("must be finite, got {}", reward_param),
            });
        }
        Ok(RewardEstimator {
            estimates: Array3::from_elem(dims.transition_shape(), reward_param),
            reward_param,
        })
    }

    /// Blend `reward` into the `[.., action, ..]` slice weighted by `mass`.
    pub fn update(&mut self, action: usize, reward: f64, mass: &Array2<f64>) -> Result<()> {
        if !reward.is_finite() {
            return Err(PomdpError::InvalidParameter {
                name: "reward".to_string(),
                reason: format!("must be finite, got {}", reward),
            });
        }
        let (num_states, num_actions, _) = self.estimates.dim();
        if action >= num_actions {
            return Err(PomdpError::InvalidAction { action, num_actions });
        }
        if mass.dim() != (num_states, num_states) {
            return Err(PomdpError::dimension_mismatch(
                format!("{}×{} soft mass", num_states, num_states),
                format!("{:?}", mass.dim()),
            ));
        }

        Zip::from(self.estimates.slice_mut(s![.., action, ..]))
            .and(mass)
            .for_each(|estimate, &tp| {
                *estimate = *estimate * (1.0 - tp) + reward * tp;
            });
        Ok(())
    }

    pub fn estimates(&self) -> &Array3<f64> {
        &self.estimates
    }

    pub fn get(&self, state: usize, action: usize, next_state: usize) -> f64 {
        self.estimates[[state, action, next_state]]
    }

    pub fn reward_param(&self) -> f64 {
        self.reward_param
    }

    pub fn reset(&mut self) {
        self.estimates.fill(self.reward_param);
    }
}
