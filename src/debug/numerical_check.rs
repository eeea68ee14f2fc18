use ndarray::{Array2, Array3, ArrayView1};

/// Types of numerical issues found in beliefs, models and value tables
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { count: usize },
    Infinity { count: usize },
    Negative { count: usize },
    /// A distribution whose mass differs from one by more than the tolerance
    Unnormalized { row: Vec<usize>, sum: f64 },
}

fn count_non_finite(values: impl Iterator<Item = f64>, negatives: bool) -> Vec<NumericalIssue> {
    let mut issues = Vec::new();
    let mut nan_count = 0;
    let mut inf_count = 0;
    let mut neg_count = 0;

    for value in values {
        if value.is_nan() {
            nan_count += 1;
        } else if value.is_infinite() {
            inf_count += 1;
        } else if negatives && value < 0.0 {
            neg_count += 1;
        }
    }

    if nan_count > 0 {
        issues.push(NumericalIssue::NaN { count: nan_count });
    }
    if inf_count > 0 {
        issues.push(NumericalIssue::Infinity { count: inf_count });
    }
    if neg_count > 0 {
        issues.push(NumericalIssue::Negative { count: neg_count });
    }
    issues
}

/// Check that a vector is a probability distribution
pub fn check_distribution(values: ArrayView1<f64>, tolerance: f64) -> Vec<NumericalIssue> {
    let mut issues = count_non_finite(values.iter().copied(), true);
    let sum = values.sum();
    if issues.is_empty() && (sum - 1.0).abs() > tolerance {
        issues.push(NumericalIssue::Unnormalized { row: Vec::new(), sum });
    }
    issues
}

/// Check every `[state, action, :]` row of a transition tensor
pub fn check_transition_rows(tensor: &Array3<f64>, tolerance: f64) -> Vec<NumericalIssue> {
    let mut issues = count_non_finite(tensor.iter().copied(), true);
    if !issues.is_empty() {
        return issues;
    }

    let (num_states, num_actions, _) = tensor.dim();
    for s in 0..num_states {
        for a in 0..num_actions {
            let sum = tensor.slice(ndarray::s![s, a, ..]).sum();
            if (sum - 1.0).abs() > tolerance {
                issues.push(NumericalIssue::Unnormalized { row: vec![s, a], sum });
            }
        }
    }
    issues
}

/// Check a value table for NaN and Inf entries
pub fn check_values(values: &Array2<f64>) -> Vec<NumericalIssue> {
    let issues = count_non_finite(values.iter().copied(), false);
    for issue in &issues {
        log::warn!("Value table: {:?}", issue);
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_check_distribution() {
        assert!(check_distribution(array![0.25, 0.75].view(), 1e-9).is_empty());
        assert_eq!(
            check_distribution(array![0.5, 0.25].view(), 1e-9),
            vec![NumericalIssue::Unnormalized { row: vec![], sum: 0.75 }]
        );
        assert_eq!(
            check_distribution(array![f64::NAN, 1.0].view(), 1e-9),
            vec![NumericalIssue::NaN { count: 1 }]
        );
        assert_eq!(
            check_distribution(array![-0.5, 1.5].view(), 1e-9),
            vec![NumericalIssue::Negative { count: 1 }]
        );
    }

    #[test]
    fn test_check_transition_rows() {
        let mut tensor = Array3::from_elem((2, 1, 2), 0.5);
        assert!(check_transition_rows(&tensor, 1e-9).is_empty());

        tensor[[1, 0, 1]] = 0.0;
        let issues = check_transition_rows(&tensor, 1e-9);
        assert_eq!(issues, vec![NumericalIssue::Unnormalized { row: vec![1, 0], sum: 0.5 }]);
    }

    #[test]
    fn test_check_values() {
        let values = array![[1.0, -2.0], [f64::INFINITY, 0.0]];
        assert_eq!(check_values(&values), vec![NumericalIssue::Infinity { count: 1 }]);
    }
}
