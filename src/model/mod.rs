//! # Learned Model Module
//!
//! Online estimates of the hidden dynamics, all driven by the same belief-weighted
//! soft transition mass `tp[prev, next] = b(prev) · P(next | prev, a)`:
//!
//! - [`TransitionCounts`]: soft Dirichlet pseudo-counts per `(state, action, next state)`
//! - [`DirichletSampler`]: draws a [`SampledTransitionModel`] from the count posterior
//! - [`RewardEstimator`]: soft-credit running estimate of the immediate reward

pub mod counts;
pub mod dirichlet;
pub mod reward;

pub use counts::{soft_transition_mass, TransitionCounts};
pub use dirichlet::{DirichletSampler, SampledTransitionModel};
pub use reward::RewardEstimator;
