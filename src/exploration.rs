/// Per-episode decay for `initial_rate` to hit zero after
/// `exploration_fraction * n_episodes` episodes.
pub fn linear_decay_step(initial_rate: f64, n_episodes: u128, exploration_fraction: f64) -> f64 {
    let horizon: f64 = exploration_fraction * n_episodes as f64;
    if horizon > 0.0 {
        initial_rate / horizon
    } else {
        0.0
    }
}

/// Linearly decaying exploration rate with a floor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationSchedule {
    initial_rate: f64,
    rate: f64,
    decay_step: f64,
    final_rate: f64,
}

impl ExplorationSchedule {
    pub fn new(initial_rate: f64, decay_step: f64, final_rate: f64) -> Self {
        Self {
            initial_rate,
            rate: initial_rate,
            decay_step,
            final_rate,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn final_rate(&self) -> f64 {
        self.final_rate
    }

    /// `rate = max(final_rate, rate - decay_step)`
    pub fn decay(&mut self) {
        self.rate = self.final_rate.max(self.rate - self.decay_step);
    }

    pub fn is_exhausted(&self) -> bool {
        self.rate <= self.final_rate
    }

    pub fn reset(&mut self) {
        self.rate = self.initial_rate;
    }
}
