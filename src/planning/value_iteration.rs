use crate::config::AgentConfig;
use crate::error::{PomdpError, Result};
use crate::model::SampledTransitionModel;
use crate::types::TransitionTensor;
use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// State and action values of one planning epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    /// `V[s]`, length S
    state_values: Array1<f64>,
    /// `Q[s, a]`, S×A
    action_values: Array2<f64>,
    /// Sweeps needed to converge
    iterations: usize,
    /// Largest change in the final sweep
    residual: f64,
}

impl ValueTable {
    pub fn zeros(num_states: usize, num_actions: usize) -> Self {
        ValueTable {
            state_values: Array1::zeros(num_states),
            action_values: Array2::zeros((num_states, num_actions)),
            iterations: 0,
            residual: 0.0,
        }
    }

    pub fn state_values(&self) -> &Array1<f64> {
        &self.state_values
    }

    pub fn action_values(&self) -> &Array2<f64> {
        &self.action_values
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Belief-weighted action values `Σ_s b(s) · Q[s, :]`
    pub fn blend(&self, belief: ArrayView1<f64>) -> Array1<f64> {
        belief.dot(&self.action_values)
    }
}

/// Discounted value iteration with in-place (Gauss-Seidel) sweeps.
///
/// `Q[s, a] = Σ_s' P[s, a, s'] · (R[s, a, s'] + γ · V[s'])` and `V[s] = max_a Q[s, a]`.
/// Sweeps stop once no state value moves by `tolerance` or more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueIteration {
    discount: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl ValueIteration {
    pub fn new(discount: f64, tolerance: f64, max_iterations: usize) -> Result<Self> {
        if !(0.0..1.0).contains(&discount) {
            return Err(PomdpError::InvalidParameter {
                name: "discount".to_string(),
                reason: format!("must lie in [0, 1), got {}", discount),
            });
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(PomdpError::InvalidParameter {
                name: "tolerance".to_string(),
                reason: format!("must be a positive finite number, got {}", tolerance),
            });
        }
        if max_iterations == 0 {
            return Err(PomdpError::invalid_parameter("max_iterations", "must be at least 1"));
        }
        Ok(ValueIteration { discount, tolerance, max_iterations })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::new(config.discount, config.tolerance, config.max_iterations)
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    fn backup(
        &self,
        transitions: &TransitionTensor,
        rewards: &TransitionTensor,
        values: &Array1<f64>,
        state: usize,
        action: usize,
    ) -> f64 {
        let p = transitions.slice(s![state, action, ..]);
        let r = rewards.slice(s![state, action, ..]);
        p.iter()
            .zip(r.iter())
            .zip(values.iter())
            .map(|((&p, &r), &v)| p * (r + self.discount * v))
            .sum()
    }

    /// Solve the MDP `(model, rewards)`.
    pub fn solve(&self, model: &SampledTransitionModel, rewards: &TransitionTensor) -> Result<ValueTable> {
        let transitions = model.transitions();
        if transitions.dim() != rewards.dim() {
            return Err(PomdpError::dimension_mismatch(
                format!("rewards of shape {:?}", transitions.dim()),
                format!("{:?}", rewards.dim()),
            ));
        }
        let (num_states, num_actions, _) = transitions.dim();

        let mut values = Array1::<f64>::zeros(num_states);
        let mut iterations = 0;
        let residual = loop {
            let mut residual = 0.0f64;
            for state in 0..num_states {
                let best = (0..num_actions)
                    .map(|action| self.backup(transitions, rewards, &values, state, action))
                    .fold(f64::NEG_INFINITY, f64::max);
                residual = residual.max((best - values[state]).abs());
                values[state] = best;
            }
            iterations += 1;

            if residual < self.tolerance {
                break residual;
            }
            if iterations >= self.max_iterations {
                return Err(PomdpError::PlanningNotConverged { iterations, residual });
            }
        };

        let action_values = Array2::from_shape_fn((num_states, num_actions), |(state, action)| {
            self.backup(transitions, rewards, &values, state, action)
        });

        Ok(ValueTable {
            state_values: values,
            action_values,
            iterations,
            residual,
        })
    }
}
