use crate::error::{PomdpError, Result};
use ndarray::ArrayView1;
use rand::Rng;

/// Values closer than this to the maximum count as ties
pub const TIE_TOLERANCE: f64 = 1e-12;

/// Trait for agents acting in a tabular partially observable environment
pub trait PomdpAgent {
    fn num_states(&self) -> usize;

    fn num_actions(&self) -> usize;

    /// Consume one environment step and return the next action.
    ///
    /// `reward = None` marks the start of an episode and must be the first call of each
    /// episode. `idx` is the caller's step index, used only for diagnostics.
    fn interact(
        &mut self,
        reward: Option<f64>,
        observation: usize,
        next_state_is_terminal: bool,
        idx: usize,
    ) -> Result<usize>;

    /// Forget everything learned and start over
    fn reset(&mut self) -> Result<()>;
}

/// Uniformly random action
pub fn random_action<R: Rng + ?Sized>(num_actions: usize, rng: &mut R) -> usize {
    rng.gen_range(0..num_actions)
}

/// Index of the largest value, choosing uniformly among ties
pub fn argmax_breaking_ties_randomly<R: Rng + ?Sized>(values: ArrayView1<f64>, rng: &mut R) -> Result<usize> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PomdpError::NumericalError(format!("cannot rank non-finite values {}", values)));
    }
    let max = values.iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let candidates: Vec<usize> = values.iter()
        .enumerate()
        .filter(|(_, &v)| max - v <= TIE_TOLERANCE)
        .map(|(idx, _)| idx)
        .collect();

    match candidates.len() {
        0 => Err(PomdpError::NumericalError("No values to rank".to_string())),
        1 => Ok(candidates[0]),
        n => Ok(candidates[rng.gen_range(0..n)]),
    }
}
