use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::agent::ThompsonPomdpAgent;
use crate::config::AgentConfig;
use crate::error::PomdpError;
use crate::types::ObservationModel;

fn sensor() -> ObservationModel {
    ObservationModel::from_rows(&[vec![0.7, 0.3], vec![0.4, 0.6]]).unwrap()
}

fn build(num_states: usize, num_actions: usize, config: AgentConfig) -> Result<ThompsonPomdpAgent, PomdpError> {
    ThompsonPomdpAgent::new(num_states, num_actions, sensor(), config, StdRng::seed_from_u64(0))
}

#[test]
fn test_observation_model_shape_mismatch() {
    let result = build(3, 2, AgentConfig::default());
    assert!(matches!(result, Err(PomdpError::DimensionMismatch { .. })));
}

#[test]
fn test_zero_actions_rejected() {
    let result = build(2, 0, AgentConfig::default());
    assert!(matches!(result, Err(PomdpError::InvalidParameter { .. })));
}

#[test]
fn test_non_positive_dirichlet_param_rejected() {
    for param in [0.0, -0.5, f64::NAN] {
        let result = build(2, 2, AgentConfig::new(param, 0.0));
        assert!(matches!(result, Err(PomdpError::InvalidParameter { .. })), "accepted {}", param);
    }
}

#[test]
fn test_zero_horizon_rejected() {
    assert!(build(2, 2, AgentConfig::default().with_horizon(0)).is_err());
}

#[test]
fn test_non_finite_reward_leaves_state_untouched() {
    let mut agent = build(2, 2, AgentConfig::default()).unwrap();
    agent.interact(None, 0, false, 0).unwrap();
    let rewards = agent.reward_estimate().clone();

    for reward in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = agent.interact(Some(reward), 1, false, 1);
        assert!(matches!(result, Err(PomdpError::InvalidParameter { .. })));
    }
    assert_eq!(agent.reward_estimate(), &rewards);
    assert_eq!(agent.transition_counts().total(), 0.0);
    assert_eq!(agent.policy_step(), 0);
}

#[test]
fn test_all_zero_observation_row() {
    // State 1 never emits anything; observing from it is still well defined via state 0
    let sensor = ObservationModel::new(array![[0.5, 0.5], [0.0, 0.0]]).unwrap();
    let mut agent = ThompsonPomdpAgent::new(2, 2, sensor, AgentConfig::default(), StdRng::seed_from_u64(1)).unwrap();

    agent.interact(None, 0, false, 0).unwrap();
    assert_eq!(agent.belief(), array![1.0, 0.0]);
    for idx in 1..10 {
        agent.interact(Some(0.0), idx % 2, false, idx).unwrap();
        assert_eq!(agent.belief(), array![1.0, 0.0]);
    }
}

#[test]
fn test_extreme_rewards_stay_finite() {
    let mut agent = build(2, 2, AgentConfig::new(1.0, 0.0).with_horizon(1)).unwrap();
    agent.interact(None, 0, false, 0).unwrap();

    for idx in 1..20 {
        let reward = if idx % 2 == 0 { 1e6 } else { -1e6 };
        agent.interact(Some(reward), idx % 2, false, idx).unwrap();
    }
    assert!(agent.value_table().action_values().iter().all(|v| v.is_finite()));
    assert!(agent.reward_estimate().estimates().iter().all(|v| v.is_finite()));
}

#[test]
fn test_planning_cap_surfaces_error() {
    let config = AgentConfig::new(1.0, 1.0)
        .with_discount(0.999)
        .with_tolerance(1e-12)
        .with_max_iterations(2);
    let result = build(2, 2, config);
    assert!(matches!(result, Err(PomdpError::PlanningNotConverged { iterations: 2, .. })));
}

#[test]
fn test_empty_observation_model_rejected() {
    assert!(ObservationModel::new(Array2::zeros((0, 2))).is_err());
    assert!(ObservationModel::new(Array2::zeros((2, 0))).is_err());
}

fn stalling_agent() -> ThompsonPomdpAgent {
    // Zero initial rewards converge in one sweep; any real reward needs more than two
    let config = AgentConfig::new(1.0, 0.0)
        .with_horizon(1)
        .with_discount(0.99)
        .with_max_iterations(2);
    build(2, 2, config).unwrap()
}

#[test]
fn test_failed_replan_leaves_step_unapplied() {
    let mut agent = stalling_agent();
    agent.interact(None, 0, false, 0).unwrap();
    agent.interact(Some(5.0), 1, false, 1).unwrap();
    assert_eq!(agent.policy_step(), 1);

    let belief = agent.belief().to_owned();
    let counts = agent.transition_counts().clone();
    let rewards = agent.reward_estimate().clone();
    let model = agent.sampled_model().clone();
    let last_action = agent.last_action();

    for idx in 2..5 {
        let result = agent.interact(Some(5.0), 1, false, idx);
        assert!(matches!(result, Err(PomdpError::PlanningNotConverged { iterations: 2, .. })));
        assert_eq!(agent.belief(), belief);
        assert_eq!(agent.transition_counts(), &counts);
        assert_eq!(agent.reward_estimate(), &rewards);
        assert_eq!(agent.sampled_model(), &model);
        assert_eq!(agent.last_action(), last_action);
        assert_eq!(agent.policy_step(), 1);
        assert_eq!(agent.replan_count(), 1);
    }
}

#[test]
fn test_reset_recovers_after_failed_replan() {
    let mut agent = stalling_agent();
    agent.interact(None, 0, false, 0).unwrap();
    agent.interact(Some(5.0), 1, false, 1).unwrap();
    assert!(agent.interact(Some(5.0), 1, false, 2).is_err());

    agent.reset().unwrap();
    assert_eq!(agent.policy_step(), 0);
    assert_eq!(agent.replan_count(), 2);
    assert_eq!(agent.transition_counts().total(), 0.0);
    assert!(agent.value_table().action_values().iter().all(|&q| q == 0.0));

    // Zero rewards plan fine again
    agent.interact(None, 0, false, 0).unwrap();
    agent.interact(Some(0.0), 1, false, 1).unwrap();
    agent.interact(Some(0.0), 0, false, 2).unwrap();
    assert_eq!(agent.replan_count(), 3);
}

#[test]
fn test_degenerate_observation_mid_episode_leaves_step_unapplied() {
    // Observation 1 never happens in any state
    let sensor = ObservationModel::from_rows(&[vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
    let mut agent = ThompsonPomdpAgent::new(2, 2, sensor, AgentConfig::default(), StdRng::seed_from_u64(4)).unwrap();
    agent.interact(None, 0, false, 0).unwrap();
    let rewards = agent.reward_estimate().clone();
    let last_action = agent.last_action();

    let result = agent.interact(Some(1.0), 1, false, 1);
    assert!(matches!(result, Err(PomdpError::DegenerateBelief { observation: 1, .. })));
    assert_eq!(agent.transition_counts().total(), 0.0);
    assert_eq!(agent.reward_estimate(), &rewards);
    assert_eq!(agent.belief(), array![0.5, 0.5]);
    assert_eq!(agent.last_action(), last_action);
    assert_eq!(agent.policy_step(), 0);
}
