//! # Belief Tracking Module
//!
//! This module maintains a probability distribution over hidden states for tabular
//! partially observable environments. The belief is advanced with a one-step Bayes
//! filter: predict through the sampled transition model, then condition on the
//! observation likelihood.
//!
//! ## Core Concepts
//!
//! - **Belief State**: `P(hidden state | history)`, a length-S probability vector
//! - **Predict**: `b'(s) = Σ_prev b(prev) · P(s | prev, a)`
//! - **Update**: `b''(s) ∝ b'(s) · O(s, o)`, renormalised by `Z = Σ_s b'(s) · O(s, o)`
//!
//! A zero or non-finite `Z` means the observation is impossible under the predicted
//! belief. [`DegenerateBeliefPolicy`] decides whether that is reported as
//! [`PomdpError::DegenerateBelief`] or answered by falling back to the uniform belief.

use crate::config::DegenerateBeliefPolicy;
use crate::debug::check_distribution;
use crate::error::{PomdpError, Result};
use crate::types::{Belief, ObservationModel, TransitionTensor};
use ndarray::{s, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Core trait for belief state representations
pub trait BeliefState: Send + Sync {
    /// Condition the belief on an observation without a transition step
    fn observe(&mut self, observation: usize) -> Result<()>;

    /// Push the belief through `transitions` under `action`, then condition on `observation`
    fn predict_and_update(
        &mut self,
        transitions: &TransitionTensor,
        action: usize,
        observation: usize,
    ) -> Result<()>;

    /// Current distribution over hidden states
    fn probabilities(&self) -> ArrayView1<'_, f64>;

    /// Reset belief to initial distribution
    fn reset(&mut self);

    /// Get entropy of belief distribution (uncertainty measure)
    fn entropy(&self) -> f64;
}

/// Predict step: distribution over next states after taking `action`.
pub fn predict(belief: ArrayView1<f64>, transitions: &TransitionTensor, action: usize) -> Belief {
    belief.dot(&transitions.slice(s![.., action, ..]))
}

/// Update step: Bayes rule against the likelihood column of `observation`.
pub fn condition(
    prior: ArrayView1<f64>,
    observation_model: &ObservationModel,
    observation: usize,
) -> Result<Belief> {
    let unnormalized = &prior * &observation_model.likelihood(observation);
    let normalizer = unnormalized.sum();
    if !(normalizer.is_finite() && normalizer > 0.0) {
        return Err(PomdpError::DegenerateBelief { observation, normalizer });
    }
    Ok(unnormalized / normalizer)
}

/// Exact belief over a finite set of hidden states
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscreteBelief {
    probabilities: Belief,
    observation_model: ObservationModel,
    degenerate_policy: DegenerateBeliefPolicy,
}

impl DiscreteBelief {
    /// Uniform belief over the states of `observation_model`
    pub fn uniform(observation_model: ObservationModel, degenerate_policy: DegenerateBeliefPolicy) -> Self {
        let num_states = observation_model.num_states();
        Self {
            probabilities: Array1::from_elem(num_states, 1.0 / num_states as f64),
            observation_model,
            degenerate_policy,
        }
    }

    /// Start from an explicit distribution
    pub fn from_probabilities(
        probabilities: Belief,
        observation_model: ObservationModel,
        degenerate_policy: DegenerateBeliefPolicy,
    ) -> Result<Self> {
        if probabilities.len() != observation_model.num_states() {
            return Err(PomdpError::dimension_mismatch(
                format!("belief of length {}", observation_model.num_states()),
                format!("length {}", probabilities.len()),
            ));
        }
        let issues = check_distribution(probabilities.view(), 1e-9);
        if !issues.is_empty() {
            return Err(PomdpError::InvalidParameter {
                name: "belief".to_string(),
                reason: format!("not a probability distribution: {:?}", issues),
            });
        }
        Ok(Self { probabilities, observation_model, degenerate_policy })
    }

    pub fn num_states(&self) -> usize {
        self.probabilities.len()
    }

    pub fn observation_model(&self) -> &ObservationModel {
        &self.observation_model
    }

    fn check_observation(&self, observation: usize) -> Result<()> {
        let num_observations = self.observation_model.num_observations();
        if observation >= num_observations {
            return Err(PomdpError::InvalidObservation { observation, num_observations });
        }
        Ok(())
    }

    fn commit(&mut self, next: Result<Belief>) -> Result<()> {
        match next {
            Ok(belief) => {
                self.probabilities = belief;
                Ok(())
            }
            Err(PomdpError::DegenerateBelief { observation, normalizer })
                if self.degenerate_policy == DegenerateBeliefPolicy::ResetToUniform =>
            {
                log::warn!(
                    "Observation {} impossible under current belief (Z = {}); resetting to uniform",
                    observation,
                    normalizer
                );
                self.reset();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl BeliefState for DiscreteBelief {
    fn observe(&mut self, observation: usize) -> Result<()> {
        self.check_observation(observation)?;
        let next = condition(self.probabilities.view(), &self.observation_model, observation);
        self.commit(next)
    }

    fn predict_and_update(
        &mut self,
        transitions: &TransitionTensor,
        action: usize,
        observation: usize,
    ) -> Result<()> {
        self.check_observation(observation)?;
        let (from, num_actions, to) = transitions.dim();
        if from != self.num_states() || to != self.num_states() {
            return Err(PomdpError::dimension_mismatch(
                format!("{}×A×{} transition tensor", self.num_states(), self.num_states()),
                format!("{}×{}×{}", from, num_actions, to),
            ));
        }
        if action >= num_actions {
            return Err(PomdpError::InvalidAction { action, num_actions });
        }

        let predicted = predict(self.probabilities.view(), transitions, action);
        let next = condition(predicted.view(), &self.observation_model, observation);
        self.commit(next)
    }

    fn probabilities(&self) -> ArrayView1<'_, f64> {
        self.probabilities.view()
    }

    fn reset(&mut self) {
        let num_states = self.num_states();
        self.probabilities.fill(1.0 / num_states as f64);
    }

    fn entropy(&self) -> f64 {
        -self.probabilities.iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.ln())
            .sum::<f64>()
    }
}
