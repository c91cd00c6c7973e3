use ndarray::{Array, Array1};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::utils::argmax;

/// ε-greedy selection over a vector of action values.
///
/// The random source is injected so runs are reproducible under a fixed
/// seed. Ties among the best actions go to the lowest index.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<R: Rng = SmallRng> {
    rng: R,
}

impl EpsilonGreedy<SmallRng> {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EpsilonGreedy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn should_explore(&mut self, exploration_rate: f64) -> bool {
        exploration_rate != 0.0 && self.rng.gen::<f64>() < exploration_rate
    }

    pub fn select(&mut self, values: &Array1<f64>, exploration_rate: f64) -> usize {
        if self.should_explore(exploration_rate) {
            self.rng.gen_range(0..values.len())
        } else {
            argmax(values.iter())
        }
    }

    /// Probability of each action under `select` with the same rate.
    pub fn exploration_probs(&self, values: &Array1<f64>, exploration_rate: f64) -> Array1<f64> {
        let mut policy_probs: Array1<f64> =
            Array::from_elem((values.len(),), exploration_rate / values.len() as f64);
        policy_probs[argmax(values.iter())] += 1.0 - exploration_rate;
        policy_probs
    }
}
