use kdam::{tqdm, BarExt};
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::env::Env;
use crate::error::EnvError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainResults {
    pub training_reward: Vec<f64>,
    pub training_length: Vec<u128>,
    pub training_error: Vec<f64>,
    pub evaluation_reward: Vec<f64>,
    pub evaluation_length: Vec<f64>,
}

/// Drives the SARSA control loop of an [`Agent`] against an [`Env`].
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    show_progress: bool,
}

impl Trainer {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    /// Trains for `n_episodes`, evaluating for `eval_for` episodes every
    /// `eval_at` episodes (`eval_at == 0` disables evaluation).
    pub fn train<T>(
        &mut self,
        env: &mut dyn Env<T>,
        agent: &mut dyn Agent<T>,
        n_episodes: u128,
        eval_at: u128,
        eval_for: u128,
    ) -> Result<TrainResults, EnvError> {
        let mut results: TrainResults = TrainResults::default();

        let mut pb = tqdm!(total = n_episodes as usize, disable = !self.show_progress);
        pb.set_description(format!("GEN {}", 1));
        if let Err(e) = pb.refresh() {
            warn!(error = %e, "failed to draw progress bar");
        }
        info!(
            n_episodes = n_episodes as u64,
            eval_at = eval_at as u64,
            eval_for = eval_for as u64,
            "training started"
        );

        for episode in 0..n_episodes {
            let mut action_counter: u128 = 0;
            let mut epi_reward: f64 = 0.0;
            let (mut curr_obs, _info) = env.reset();
            let mut curr_action: usize = agent.get_action(&curr_obs);

            loop {
                action_counter += 1;
                let step = env.step(curr_action)?;
                let next_action: usize = agent.get_action(&step.obs);
                let td: f64 = agent.update(
                    &curr_obs,
                    curr_action,
                    step.reward,
                    step.terminated,
                    &step.obs,
                    next_action,
                );
                results.training_error.push(td);
                epi_reward += step.reward;
                let done: bool = step.is_done();
                curr_obs = step.obs;
                curr_action = next_action;
                if done {
                    break;
                }
            }
            agent.end_episode();
            results.training_reward.push(epi_reward);
            results.training_length.push(action_counter);

            if eval_at != 0 && episode % eval_at == 0 {
                let (r, l) = self.evaluate(env, agent, eval_for)?;
                let mr: f64 = r.iter().sum::<f64>() / r.len().max(1) as f64;
                let ml: f64 = l.iter().sum::<u128>() as f64 / l.len().max(1) as f64;
                debug!(episode = episode as u64, eval_reward = mr, eval_length = ml, "evaluation");
                pb.set_postfix(format!("eval reward={:.3}, eval ep len={:.2}", mr, ml));
                pb.set_description(format!("GEN {}", (episode / eval_at) + 1));
                results.evaluation_reward.push(mr);
                results.evaluation_length.push(ml);
            }
            if let Err(e) = pb.update(1) {
                warn!(error = %e, "failed to draw progress bar");
            }
        }
        info!(steps = results.training_error.len(), "training finished");
        Ok(results)
    }

    /// Plays `n_episodes` without learning.
    pub fn evaluate<T>(
        &self,
        env: &mut dyn Env<T>,
        agent: &mut dyn Agent<T>,
        n_episodes: u128,
    ) -> Result<(Vec<f64>, Vec<u128>), EnvError> {
        let mut reward_history: Vec<f64> = vec![];
        let mut episode_length: Vec<u128> = vec![];
        for _episode in 0..n_episodes {
            let mut action_counter: u128 = 0;
            let mut epi_reward: f64 = 0.0;
            let (obs, _info) = env.reset();
            let mut curr_action: usize = agent.get_action(&obs);
            loop {
                action_counter += 1;
                let step = env.step(curr_action)?;
                epi_reward += step.reward;
                if step.is_done() {
                    break;
                }
                curr_action = agent.get_action(&step.obs);
            }
            reward_history.push(epi_reward);
            episode_length.push(action_counter);
        }
        Ok((reward_history, episode_length))
    }
}
