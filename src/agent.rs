mod sarsa_lambda_agent;

pub use sarsa_lambda_agent::SarsaLambdaAgent;

/// What the [`Trainer`](crate::trainer::Trainer) needs from a learner.
pub trait Agent<T> {
    fn get_action(&mut self, obs: &T) -> usize;

    /// Learns from one transition and returns its temporal-difference error.
    fn update(
        &mut self,
        curr_obs: &T,
        curr_action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &T,
        next_action: usize,
    ) -> f64;

    /// Called once per episode boundary, terminal or truncated.
    fn end_episode(&mut self);

    fn reset(&mut self);
}
