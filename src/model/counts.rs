use crate::error::{PomdpError, Result};
use crate::types::{ModelDims, TransitionTensor};
use ndarray::{s, Array2, Array3, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

/// Belief-weighted mass of every `(prev, next)` pair under `action`.
///
/// `mass[[prev, next]] = belief[prev] * transitions[[prev, action, next]]`
pub fn soft_transition_mass(
    belief: ArrayView1<f64>,
    transitions: &TransitionTensor,
    action: usize,
) -> Array2<f64> {
    let slice = transitions.slice(s![.., action, ..]);
    Array2::from_shape_fn(slice.dim(), |(prev, next)| belief[prev] * slice[[prev, next]])
}

/// Soft visitation evidence accumulated since the last reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionCounts {
    counts: Array3<f64>,
}

impl TransitionCounts {
    pub fn new(dims: ModelDims) -> Self {
        TransitionCounts {
            counts: Array3::zeros(dims.transition_shape()),
        }
    }

    /// Add `mass` to the `[.., action, ..]` slice.
    ///
    /// Increments must be finite and non-negative so counts never shrink.
    pub fn accumulate(&mut self, action: usize, mass: &Array2<f64>) -> Result<()> {
        let (num_states, num_actions, _) = self.counts.dim();
        if action >= num_actions {
            return Err(PomdpError::InvalidAction { action, num_actions });
        }
        if mass.dim() != (num_states, num_states) {
            return Err(PomdpError::dimension_mismatch(
                format!("{}×{} soft mass", num_states, num_states),
                format!("{:?}", mass.dim()),
            ));
        }
        if mass.iter().any(|m| !(m.is_finite() && *m >= 0.0)) {
            return Err(PomdpError::NumericalError(
                "soft transition mass must be finite and non-negative".to_string(),
            ));
        }

        Zip::from(self.counts.slice_mut(s![.., action, ..]))
            .and(mass)
            .for_each(|count, &m| *count += m);
        Ok(())
    }

    pub fn counts(&self) -> &Array3<f64> {
        &self.counts
    }

    /// Pseudo-counts over next states for one `(state, action)` pair
    pub fn row(&self, state: usize, action: usize) -> ArrayView1<'_, f64> {
        self.counts.slice(s![state, action, ..])
    }

    /// Total soft evidence collected
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }

    pub fn reset(&mut self) {
        self.counts.fill(0.0);
    }
}
