pub mod numerical_check;

pub use numerical_check::{check_distribution, check_transition_rows, check_values, NumericalIssue};
