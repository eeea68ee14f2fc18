//! # bayes_pomdp - Posterior Sampling for Partially Observable Environments
//!
//! bayes_pomdp is a Rust library for learning and planning in small tabular POMDPs whose
//! dynamics and rewards are unknown. The hidden state is tracked with an exact Bayes
//! filter, the transition model is learned as belief-weighted Dirichlet pseudo-counts,
//! and actions come from value iteration on a model drawn from the posterior
//! (Thompson sampling), refreshed every few steps.
//!
//! ## Key Features
//!
//! - **Belief Tracking**: predict/update Bayes filter over hidden states
//! - **Soft Counts**: fractional transition evidence weighted by the current belief
//! - **Posterior Sampling**: independent Dirichlet draws per `(state, action)` row
//! - **Planning**: discounted value iteration producing per-action values
//! - **Deterministic Testing**: every random draw goes through an injected generator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bayes_pomdp::agent::ThompsonPomdpAgentBuilder;
//! use bayes_pomdp::config::AgentConfig;
//! use bayes_pomdp::types::ObservationModel;
//!
//! let sensor = ObservationModel::from_rows(&[
//!     vec![0.8, 0.2],
//!     vec![0.2, 0.8],
//! ]).unwrap();
//!
//! let mut agent = ThompsonPomdpAgentBuilder::new()
//!     .num_actions(2)
//!     .observation_model(sensor)
//!     .config(AgentConfig::new(1.0, 0.0).with_horizon(10))
//!     .build()
//!     .unwrap();
//!
//! let first = agent.interact(None, 1, false, 0).unwrap();
//! let next = agent.interact(Some(1.0), 0, false, 1).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The Thompson-sampling agent and the `PomdpAgent` trait
//! - [`belief`] - Bayes filter over hidden states
//! - [`config`] - Agent hyper-parameters and JSON loading
//! - [`debug`] - Numerical checks for distributions and value tables
//! - [`error`] - Error types and result handling
//! - [`model`] - Soft counts, Dirichlet sampling and reward estimation
//! - [`planning`] - Value iteration over sampled models
//! - [`types`] - Observation model, dimensions and tensor aliases

pub mod agent;
pub mod belief;
pub mod config;
pub mod debug;
pub mod error;
pub mod model;
pub mod planning;
pub mod types;

pub use agent::{PomdpAgent, ThompsonPomdpAgent, ThompsonPomdpAgentBuilder};
pub use error::{PomdpError, Result};

#[cfg(test)]
mod tests;
