//! # POMDP Agents Module
//!
//! This module provides the posterior-sampling agent and the traits shared by agents
//! that act from a belief over hidden states.
//!
//! ## Core Concepts
//!
//! - **Agent**: consumes `(reward, observation, terminal)` steps and returns actions
//! - **Thompson Sampling**: plan against one transition model drawn from the posterior
//!   instead of the posterior mean
//! - **Replanning**: every `horizon` steps a fresh model is drawn and solved
//! - **Action Selection**: greedy on belief-weighted action values, random among ties
//!
//! ## Interaction Protocol
//!
//! 1. `interact(None, observation, false, idx)` starts an episode; the action is uniformly
//!    random because nothing has been learned about the current history yet.
//! 2. `interact(Some(reward), observation, terminal, idx)` for every following step.
//! 3. `reset()` forgets all learned evidence and replans.
//!
//! ## Example Usage
//!
//! ```rust
//! use bayes_pomdp::agent::{PomdpAgent, ThompsonPomdpAgent};
//! use bayes_pomdp::config::AgentConfig;
//! use bayes_pomdp::types::ObservationModel;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let sensor = ObservationModel::from_rows(&[vec![0.9, 0.1], vec![0.1, 0.9]]).unwrap();
//! let mut agent = ThompsonPomdpAgent::new(2, 1, sensor, AgentConfig::default(), StdRng::seed_from_u64(0)).unwrap();
//!
//! let action = PomdpAgent::interact(&mut agent, None, 0, false, 0).unwrap();
//! assert_eq!(action, 0);
//! assert!(agent.belief()[0] > 0.89);
//! ```

pub mod traits;

mod thompson;
pub use thompson::{AgentPhase, ThompsonPomdpAgent, ThompsonPomdpAgentBuilder};
pub use traits::{argmax_breaking_ties_randomly, random_action, PomdpAgent};
