use crate::agent::traits::{argmax_breaking_ties_randomly, random_action, PomdpAgent};
use crate::belief::{BeliefState, DiscreteBelief};
use crate::config::AgentConfig;
use crate::debug::check_values;
use crate::error::{PomdpError, Result};
use crate::model::{soft_transition_mass, DirichletSampler, RewardEstimator, SampledTransitionModel, TransitionCounts};
use crate::planning::{ValueIteration, ValueTable};
use crate::types::{ModelDims, ObservationModel};
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Where the agent is within an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentPhase {
    /// No action remembered; the next call must start an episode
    AwaitingFirstObservation,
    Interacting,
    /// The last step led into a terminal state
    Terminal,
}

/// Posterior-sampling (Thompson sampling) agent for tabular POMDPs.
///
/// The agent tracks an exact belief over hidden states, learns the transition dynamics
/// as soft Dirichlet pseudo-counts and the rewards as a soft-credit running estimate,
/// and every `horizon` steps plans against one transition model drawn from the
/// posterior.
///
/// # Example
///
/// ```rust
/// use bayes_pomdp::agent::ThompsonPomdpAgentBuilder;
/// use bayes_pomdp::config::AgentConfig;
/// use bayes_pomdp::types::ObservationModel;
///
/// let sensor = ObservationModel::from_rows(&[vec![0.9, 0.1], vec![0.1, 0.9]]).unwrap();
/// let mut agent = ThompsonPomdpAgentBuilder::new()
///     .num_actions(2)
///     .observation_model(sensor)
///     .config(AgentConfig::new(1.0, 0.0).with_horizon(5).with_seed(7))
///     .build()
///     .unwrap();
///
/// // Start of episode: no reward yet
/// let mut action = agent.interact(None, 0, false, 0).unwrap();
/// for idx in 1..20 {
///     // ... apply `action` to the environment, read back reward and observation
///     let (reward, observation) = (if action == 0 { 1.0 } else { 0.0 }, idx % 2);
///     action = agent.interact(Some(reward), observation, false, idx).unwrap();
/// }
/// assert!(action < 2);
/// ```
#[derive(Debug, Clone)]
pub struct ThompsonPomdpAgent<R: Rng = StdRng> {
    dims: ModelDims,
    config: AgentConfig,
    belief: DiscreteBelief,
    counts: TransitionCounts,
    rewards: RewardEstimator,
    sampler: DirichletSampler,
    planner: ValueIteration,
    model: SampledTransitionModel,
    values: ValueTable,
    policy_step: usize,
    last_action: Option<usize>,
    phase: AgentPhase,
    replans: u64,
    rng: R,
}

/// Draw a posterior model and solve it
fn plan<R: Rng + ?Sized>(
    sampler: &DirichletSampler,
    planner: &ValueIteration,
    counts: &TransitionCounts,
    rewards: &RewardEstimator,
    rng: &mut R,
) -> Result<(SampledTransitionModel, ValueTable)> {
    let model = sampler.sample(counts, rng)?;
    let values = planner.solve(&model, rewards.estimates())?;
    let issues = check_values(values.action_values());
    if !issues.is_empty() {
        return Err(PomdpError::NumericalError(format!("value table contains {:?}", issues)));
    }
    Ok((model, values))
}

impl<R: Rng> ThompsonPomdpAgent<R> {
    /// Create an agent and run the first planning epoch.
    pub fn new(
        num_states: usize,
        num_actions: usize,
        observation_model: ObservationModel,
        config: AgentConfig,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        if observation_model.num_states() != num_states {
            return Err(PomdpError::dimension_mismatch(
                format!("observation model with {} rows", num_states),
                format!("{} rows", observation_model.num_states()),
            ));
        }
        let dims = ModelDims::new(num_states, num_actions, observation_model.num_observations())?;

        let belief = DiscreteBelief::uniform(observation_model, config.degenerate_belief);
        let counts = TransitionCounts::new(dims);
        let rewards = RewardEstimator::new(dims, config.reward_param)?;
        let sampler = DirichletSampler::new(config.dirichlet_param)?;
        let planner = ValueIteration::from_config(&config)?;
        let (model, values) = plan(&sampler, &planner, &counts, &rewards, &mut rng)?;

        log::info!(
            "Created Thompson POMDP agent: {} states, {} actions, {} observations, horizon {}",
            dims.num_states,
            dims.num_actions,
            dims.num_observations,
            config.horizon
        );

        Ok(ThompsonPomdpAgent {
            dims,
            config,
            belief,
            counts,
            rewards,
            sampler,
            planner,
            model,
            values,
            policy_step: 0,
            last_action: None,
            phase: AgentPhase::AwaitingFirstObservation,
            replans: 1,
            rng,
        })
    }

    /// Draw a fresh transition model from the posterior and recompute the value table.
    ///
    /// The current model and values are kept if planning fails.
    pub fn replan(&mut self) -> Result<()> {
        let (model, values) = plan(&self.sampler, &self.planner, &self.counts, &self.rewards, &mut self.rng)?;
        self.install_plan(model, values);
        Ok(())
    }

    fn install_plan(&mut self, model: SampledTransitionModel, values: ValueTable) {
        log::debug!(
            "Replanned after {} steps: {} sweeps, residual {:.3e}, soft evidence {:.3}",
            self.policy_step,
            values.iterations(),
            values.residual(),
            self.counts.total()
        );
        self.model = model;
        self.values = values;
        self.policy_step = 0;
        self.replans += 1;
    }

    /// Process one environment step and choose the next action.
    ///
    /// The step is applied as a whole: on any error the belief, counts, rewards, plan and
    /// remembered action are exactly as before the call.
    pub fn interact(
        &mut self,
        reward: Option<f64>,
        observation: usize,
        next_state_is_terminal: bool,
        idx: usize,
    ) -> Result<usize> {
        self.dims.check_observation(observation)?;
        let reward = match reward {
            None => return self.start_episode(observation, idx),
            Some(reward) => reward,
        };
        let last_action = self.last_action.ok_or(PomdpError::EpisodeNotStarted)?;

        // Credit the transition using the belief held before this step
        let mass = soft_transition_mass(self.belief.probabilities(), self.model.transitions(), last_action);
        let mut rewards = self.rewards.clone();
        let mut counts = self.counts.clone();
        rewards.update(last_action, reward, &mass)?;
        counts.accumulate(last_action, &mass)?;

        let replanned = if self.policy_step >= self.config.horizon {
            Some(plan(&self.sampler, &self.planner, &counts, &rewards, &mut self.rng)?)
        } else {
            None
        };
        let (model, values) = match &replanned {
            Some((model, values)) => (model, values),
            None => (&self.model, &self.values),
        };

        let mut belief = self.belief.clone();
        belief.predict_and_update(model.transitions(), last_action, observation)?;
        let blended = values.blend(belief.probabilities());
        let next_action = argmax_breaking_ties_randomly(blended.view(), &mut self.rng)?;

        self.belief = belief;
        self.rewards = rewards;
        self.counts = counts;
        if let Some((model, values)) = replanned {
            self.install_plan(model, values);
        }
        self.policy_step += 1;
        self.last_action = Some(next_action);
        self.phase = if next_state_is_terminal {
            AgentPhase::Terminal
        } else {
            AgentPhase::Interacting
        };

        log::trace!(
            "step {}: reward {}, observation {}, action {} -> {}",
            idx,
            reward,
            observation,
            last_action,
            next_action
        );
        Ok(next_action)
    }

    fn start_episode(&mut self, observation: usize, idx: usize) -> Result<usize> {
        self.belief.observe(observation)?;
        let action = random_action(self.dims.num_actions, &mut self.rng);
        self.last_action = Some(action);
        self.phase = AgentPhase::Interacting;
        log::trace!("step {}: episode start, observation {}, action {}", idx, observation, action);
        Ok(action)
    }

    /// Restore counts, rewards and belief to their initial values and replan.
    ///
    /// Nothing is cleared if the fresh plan fails.
    pub fn reset(&mut self) -> Result<()> {
        let mut counts = self.counts.clone();
        let mut rewards = self.rewards.clone();
        counts.reset();
        rewards.reset();
        let (model, values) = plan(&self.sampler, &self.planner, &counts, &rewards, &mut self.rng)?;

        self.belief.reset();
        self.counts = counts;
        self.rewards = rewards;
        self.last_action = None;
        self.phase = AgentPhase::AwaitingFirstObservation;
        self.policy_step = 0;
        self.install_plan(model, values);
        log::info!("Agent reset");
        Ok(())
    }

    pub fn dims(&self) -> ModelDims {
        self.dims
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn belief(&self) -> ArrayView1<'_, f64> {
        self.belief.probabilities()
    }

    pub fn belief_entropy(&self) -> f64 {
        self.belief.entropy()
    }

    pub fn transition_counts(&self) -> &TransitionCounts {
        &self.counts
    }

    pub fn reward_estimate(&self) -> &RewardEstimator {
        &self.rewards
    }

    pub fn sampled_model(&self) -> &SampledTransitionModel {
        &self.model
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.values
    }

    /// Steps since the last replan
    pub fn policy_step(&self) -> usize {
        self.policy_step
    }

    pub fn last_action(&self) -> Option<usize> {
        self.last_action
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// Planning epochs run so far, including the one at construction
    pub fn replan_count(&self) -> u64 {
        self.replans
    }
}

impl<R: Rng> PomdpAgent for ThompsonPomdpAgent<R> {
    fn num_states(&self) -> usize {
        self.dims.num_states
    }

    fn num_actions(&self) -> usize {
        self.dims.num_actions
    }

    fn interact(
        &mut self,
        reward: Option<f64>,
        observation: usize,
        next_state_is_terminal: bool,
        idx: usize,
    ) -> Result<usize> {
        ThompsonPomdpAgent::interact(self, reward, observation, next_state_is_terminal, idx)
    }

    fn reset(&mut self) -> Result<()> {
        ThompsonPomdpAgent::reset(self)
    }
}

/// Builder pattern for ThompsonPomdpAgent
pub struct ThompsonPomdpAgentBuilder {
    num_states: Option<usize>,
    num_actions: usize,
    observation_model: Option<ObservationModel>,
    config: AgentConfig,
}

impl ThompsonPomdpAgentBuilder {
    pub fn new() -> Self {
        ThompsonPomdpAgentBuilder {
            num_states: None,
            num_actions: 0,
            observation_model: None,
            config: AgentConfig::default(),
        }
    }

    /// Defaults to the number of rows of the observation model
    pub fn num_states(mut self, num_states: usize) -> Self {
        self.num_states = Some(num_states);
        self
    }

    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    pub fn observation_model(mut self, observation_model: ObservationModel) -> Self {
        self.observation_model = Some(observation_model);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dirichlet_param(mut self, dirichlet_param: f64) -> Self {
        self.config.dirichlet_param = dirichlet_param;
        self
    }

    pub fn reward_param(mut self, reward_param: f64) -> Self {
        self.config.reward_param = reward_param;
        self
    }

    pub fn horizon(mut self, horizon: usize) -> Self {
        self.config.horizon = horizon;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build with a `StdRng` seeded from the configuration (or from entropy)
    pub fn build(self) -> Result<ThompsonPomdpAgent<StdRng>> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(rng)
    }

    /// Build with a caller-supplied random generator
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<ThompsonPomdpAgent<R>> {
        let observation_model = self.observation_model
            .ok_or_else(|| PomdpError::InvalidParameter {
                name: "observation_model".to_string(),
                reason: "Observation model must be specified".to_string(),
            })?;
        let num_states = self.num_states.unwrap_or_else(|| observation_model.num_states());
        ThompsonPomdpAgent::new(num_states, self.num_actions, observation_model, self.config, rng)
    }
}

impl Default for ThompsonPomdpAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
