//! # Planning Module
//!
//! Solves the MDP defined by one sampled transition model and the current reward
//! estimates. The planner is run afresh every planning epoch; its [`ValueTable`] is
//! replaced wholesale, never repaired.

pub mod value_iteration;

pub use value_iteration::{ValueIteration, ValueTable};
