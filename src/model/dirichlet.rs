use crate::error::{PomdpError, Result};
use crate::model::counts::TransitionCounts;
use crate::types::TransitionTensor;
use ndarray::{s, Array1, Array3, ArrayView1};
use rand::Rng;
use rand_distr::{Dirichlet, Distribution};
use serde::{Deserialize, Serialize};

/// Redraws allowed when gamma variates underflow to an all-zero row
const MAX_DRAWS_PER_ROW: usize = 16;

/// One posterior sample of the transition dynamics.
///
/// Every `[state, action, ..]` row is a probability distribution over next states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledTransitionModel {
    transitions: TransitionTensor,
}

impl SampledTransitionModel {
    pub fn transitions(&self) -> &TransitionTensor {
        &self.transitions
    }

    pub fn row(&self, state: usize, action: usize) -> ArrayView1<'_, f64> {
        self.transitions.slice(s![state, action, ..])
    }

    pub fn num_states(&self) -> usize {
        self.transitions.dim().0
    }

    pub fn num_actions(&self) -> usize {
        self.transitions.dim().1
    }
}

/// Draws transition tensors from `Dirichlet(counts + dirichlet_param)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirichletSampler {
    dirichlet_param: f64,
}

impl DirichletSampler {
    pub fn new(dirichlet_param: f64) -> Result<Self> {
        if !(dirichlet_param.is_finite() && dirichlet_param > 0.0) {
            return Err(PomdpError::InvalidParameter {
                name: "dirichlet_param".to_string(),
                reason: format!("must be a positive finite number, got {}", dirichlet_param),
            });
        }
        Ok(DirichletSampler { dirichlet_param })
    }

    pub fn dirichlet_param(&self) -> f64 {
        self.dirichlet_param
    }

    /// Posterior concentration for one `(state, action)` row
    pub fn concentration(&self, counts: &TransitionCounts, state: usize, action: usize) -> Array1<f64> {
        counts.row(state, action).mapv(|c| c + self.dirichlet_param)
    }

    /// Draw every row independently from its posterior.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        counts: &TransitionCounts,
        rng: &mut R,
    ) -> Result<SampledTransitionModel> {
        let (num_states, num_actions, _) = counts.counts().dim();
        let mut transitions = Array3::zeros((num_states, num_actions, num_states));

        for state in 0..num_states {
            for action in 0..num_actions {
                let row = self.sample_row(counts, state, action, rng)?;
                transitions.slice_mut(s![state, action, ..]).assign(&row);
            }
        }

        Ok(SampledTransitionModel { transitions })
    }

    fn sample_row<R: Rng + ?Sized>(
        &self,
        counts: &TransitionCounts,
        state: usize,
        action: usize,
        rng: &mut R,
    ) -> Result<Array1<f64>> {
        let alpha = self.concentration(counts, state, action);
        // A single next state is certain; Dirichlet needs at least two categories.
        if alpha.len() == 1 {
            return Ok(Array1::ones(1));
        }

        let alpha = alpha.to_vec();
        let dirichlet = Dirichlet::new(&alpha)
            .map_err(|_| PomdpError::DirichletDegenerate { state, action })?;

        for _ in 0..MAX_DRAWS_PER_ROW {
            let draw: Vec<f64> = dirichlet.sample(rng);
            let sum: f64 = draw.iter().sum();
            if draw.iter().all(|p| p.is_finite() && *p >= 0.0) && sum > 0.0 {
                return Ok(Array1::from_vec(draw) / sum);
            }
        }
        Err(PomdpError::DirichletDegenerate { state, action })
    }
}
