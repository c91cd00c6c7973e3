use std::fmt::Debug;
use std::hash::Hash;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::action_selection::EpsilonGreedy;
use crate::config::{AgentConfig, TraceKind, TraceReset};
use crate::error::ConfigError;
use crate::exploration::ExplorationSchedule;
use crate::table::{ActionTable, TraceTable, ValueTable};

use super::Agent;

/// Tabular SARSA(λ) with backward-view eligibility traces.
///
/// Every call to [`learn`](Self::learn) computes one TD error and spreads it
/// over every state known to the value table, weighted by that pair's
/// eligibility. The sweep is `O(states * actions)`, which is fine for small
/// discrete state spaces only.
pub struct SarsaLambdaAgent<T: Hash + Eq + Clone, R: Rng = SmallRng> {
    config: AgentConfig,
    values: ValueTable<T>,
    traces: TraceTable<T>,
    action_selection: EpsilonGreedy<R>,
    exploration: ExplorationSchedule,
    training_error: Vec<f64>,
}

impl<T: Hash + Eq + Clone + Debug> SarsaLambdaAgent<T, SmallRng> {
    pub fn with_seed(
        config: AgentConfig,
        action_space_size: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(config, action_space_size, SmallRng::seed_from_u64(seed))
    }
}

impl<T: Hash + Eq + Clone + Debug, R: Rng> SarsaLambdaAgent<T, R> {
    pub fn new(config: AgentConfig, action_space_size: usize, rng: R) -> Result<Self, ConfigError> {
        if action_space_size == 0 {
            return Err(ConfigError::EmptyActionSpace);
        }
        config.validate()?;
        if config.exploration_decay_step == 0.0
            && config.initial_exploration_rate > config.final_exploration_rate
        {
            warn!(
                rate = config.initial_exploration_rate,
                "exploration_decay_step is 0, the exploration rate will never decay"
            );
        }
        debug!(?config, action_space_size, "creating SARSA(λ) agent");
        Ok(Self {
            values: ActionTable::new(action_space_size),
            traces: ActionTable::new(action_space_size),
            action_selection: EpsilonGreedy::new(rng),
            exploration: ExplorationSchedule::new(
                config.initial_exploration_rate,
                config.exploration_decay_step,
                config.final_exploration_rate,
            ),
            training_error: vec![],
            config,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn action_space_size(&self) -> usize {
        self.values.action_count()
    }

    pub fn select_action(&mut self, state: &T) -> usize {
        let exploration_rate: f64 = self.exploration.rate();
        let values = self.values.get(state);
        self.action_selection.select(values, exploration_rate)
    }

    /// One backward-view SARSA(λ) step, returns the TD error.
    ///
    /// The trace of `(state, action)` is bumped before the sweep, so that pair
    /// receives `learning_rate * delta * (old_trace + 1)` in the same call.
    /// A terminal transition bootstraps from 0 and leaves `next_state`
    /// untouched.
    pub fn learn(
        &mut self,
        state: &T,
        action: usize,
        reward: f64,
        terminated: bool,
        next_state: &T,
        next_action: usize,
    ) -> f64 {
        let action_count: usize = self.action_space_size();
        assert!(
            action < action_count && next_action < action_count,
            "action index out of range: action {}, next_action {}, action space {}",
            action,
            next_action,
            action_count
        );

        let future_q_value: f64 = if terminated {
            0.0
        } else {
            self.values.get(next_state)[next_action]
        };
        let curr_q_value: f64 = self.values.get(state)[action];
        let temporal_difference: f64 =
            reward + self.config.discount_factor * future_q_value - curr_q_value;

        let curr_trace = &mut self.traces.get_mut(state)[action];
        match self.config.trace_kind {
            TraceKind::Accumulating => *curr_trace += 1.0,
            TraceKind::Replacing => *curr_trace = 1.0,
        }

        let step: f64 = self.config.learning_rate * temporal_difference;
        let decay: f64 = self.config.discount_factor * self.config.lambda_factor;
        for (obs, values) in self.values.iter_mut() {
            let trace_values = self.traces.get_mut(obs);
            values.scaled_add(step, &*trace_values);
            *trace_values *= decay;
        }

        self.training_error.push(temporal_difference);
        temporal_difference
    }

    pub fn decay_exploration(&mut self) {
        self.exploration.decay();
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration.rate()
    }

    pub fn values(&self) -> &ValueTable<T> {
        &self.values
    }

    pub fn traces(&self) -> &TraceTable<T> {
        &self.traces
    }

    /// Every TD error recorded by [`learn`](Self::learn), oldest first.
    pub fn training_error(&self) -> &[f64] {
        &self.training_error
    }

    pub fn reset_traces(&mut self) {
        self.traces.fill_zero();
    }
}

impl<T: Hash + Eq + Clone + Debug, R: Rng> Agent<T> for SarsaLambdaAgent<T, R> {
    fn get_action(&mut self, obs: &T) -> usize {
        self.select_action(obs)
    }

    fn update(
        &mut self,
        curr_obs: &T,
        curr_action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &T,
        next_action: usize,
    ) -> f64 {
        self.learn(
            curr_obs,
            curr_action,
            reward,
            terminated,
            next_obs,
            next_action,
        )
    }

    fn end_episode(&mut self) {
        self.decay_exploration();
        if self.config.trace_reset == TraceReset::OnEpisodeEnd {
            self.reset_traces();
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.traces.clear();
        self.training_error.clear();
        self.exploration.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greedy_config(lambda_factor: f64) -> AgentConfig {
        AgentConfig {
            learning_rate: 0.1,
            initial_exploration_rate: 0.0,
            exploration_decay_step: 0.0,
            final_exploration_rate: 0.0,
            discount_factor: 1.0,
            lambda_factor,
            ..AgentConfig::default()
        }
    }

    fn agent(config: AgentConfig) -> SarsaLambdaAgent<u32> {
        SarsaLambdaAgent::with_seed(config, 2, 42).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = AgentConfig {
            learning_rate: -1.0,
            ..AgentConfig::default()
        };
        assert_eq!(
            SarsaLambdaAgent::<u32>::with_seed(config, 2, 0).err(),
            Some(ConfigError::LearningRate(-1.0))
        );
        assert_eq!(
            SarsaLambdaAgent::<u32>::with_seed(AgentConfig::default(), 0, 0).err(),
            Some(ConfigError::EmptyActionSpace)
        );
    }

    #[test]
    fn tables_start_empty() {
        let agent = agent(greedy_config(0.5));
        assert!(agent.values().is_empty());
        assert!(agent.traces().is_empty());
        assert!(agent.training_error().is_empty());
    }

    #[test]
    fn select_action_materializes_zeroed_state() {
        let mut agent = agent(greedy_config(0.5));
        assert_eq!(agent.select_action(&3), 0);
        assert_eq!(agent.values().peek(&3).unwrap().to_vec(), vec![0.0, 0.0]);
        assert!(agent.values().peek(&4).is_none());
    }

    #[test]
    fn terminal_transition_ignores_next_state() {
        let mut agent = agent(greedy_config(0.0));
        agent.values.set(&9, 1, 100.0);
        let delta: f64 = agent.learn(&1, 0, 0.5, true, &9, 1);
        assert_eq!(delta, 0.5);
        assert_eq!(agent.values().peek(&9).unwrap()[1], 100.0);

        let delta: f64 = agent.learn(&2, 0, 0.5, true, &10, 1);
        assert_eq!(delta, 0.5);
        assert!(!agent.values().contains(&10));
    }

    #[test]
    fn bumped_trace_is_used_before_decay() {
        let mut agent = agent(greedy_config(0.5));
        agent.traces.set(&1, 0, 2.0);
        agent.values.get(&1);
        let delta: f64 = agent.learn(&1, 0, 1.0, true, &1, 0);
        assert_eq!(delta, 1.0);
        // 0.1 * 1.0 * (2 + 1)
        assert!((agent.values().peek(&1).unwrap()[0] - 0.3).abs() < 1e-12);
        // (2 + 1) * 1.0 * 0.5
        assert!((agent.traces().peek(&1).unwrap()[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn replacing_trace_caps_at_one() {
        let config = greedy_config(1.0).with_trace_kind(TraceKind::Replacing);
        let mut agent = agent(config);
        agent.learn(&1, 0, 0.0, false, &1, 0);
        agent.learn(&1, 0, 0.0, false, &1, 0);
        assert_eq!(agent.traces().peek(&1).unwrap()[0], 1.0);

        let mut accumulating = self::agent(greedy_config(1.0));
        accumulating.learn(&1, 0, 0.0, false, &1, 0);
        accumulating.learn(&1, 0, 0.0, false, &1, 0);
        assert_eq!(accumulating.traces().peek(&1).unwrap()[0], 2.0);
    }

    #[test]
    fn traces_persist_across_episodes_by_default() {
        let mut agent = agent(greedy_config(0.5));
        agent.learn(&1, 0, 1.0, true, &2, 0);
        agent.end_episode();
        assert_eq!(agent.traces().peek(&1).unwrap()[0], 0.5);
    }

    #[test]
    fn traces_reset_on_episode_end_when_configured() {
        let config = greedy_config(0.5).with_trace_reset(TraceReset::OnEpisodeEnd);
        let mut agent = agent(config);
        agent.learn(&1, 0, 1.0, true, &2, 0);
        agent.end_episode();
        assert_eq!(agent.traces().peek(&1).unwrap()[0], 0.0);
        assert!(agent.values().peek(&1).unwrap()[0] > 0.0);
    }

    #[test]
    fn training_error_records_every_delta() {
        let mut agent = agent(greedy_config(0.5));
        let first: f64 = agent.learn(&1, 0, 1.0, false, &2, 1);
        let second: f64 = agent.learn(&2, 1, -1.0, true, &2, 1);
        assert_eq!(agent.training_error(), &[first, second]);
    }

    #[test]
    fn end_episode_decays_exploration() {
        let config = AgentConfig {
            initial_exploration_rate: 1.0,
            exploration_decay_step: 0.4,
            final_exploration_rate: 0.1,
            ..AgentConfig::default()
        };
        let mut agent = agent(config);
        agent.end_episode();
        assert!((agent.exploration_rate() - 0.6).abs() < 1e-12);
        agent.decay_exploration();
        agent.decay_exploration();
        assert_eq!(agent.exploration_rate(), 0.1);
    }

    #[test]
    fn reset_forgets_everything() {
        let config = AgentConfig {
            exploration_decay_step: 0.5,
            ..greedy_config(0.5)
        };
        let mut agent = agent(AgentConfig {
            initial_exploration_rate: 1.0,
            ..config
        });
        agent.learn(&1, 0, 1.0, true, &2, 0);
        agent.decay_exploration();
        agent.reset();
        assert!(agent.values().is_empty());
        assert!(agent.traces().is_empty());
        assert!(agent.training_error().is_empty());
        assert_eq!(agent.exploration_rate(), 1.0);
    }

    #[test]
    #[should_panic(expected = "action index out of range")]
    fn out_of_range_action_panics() {
        let mut agent = agent(greedy_config(0.5));
        agent.learn(&1, 2, 0.0, false, &1, 0);
    }
}
