use crate::error::ConfigError;

/// How the eligibility of the pair just taken is bumped before the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceKind {
    /// `e(s, a) += 1`
    #[default]
    Accumulating,
    /// `e(s, a) = 1`
    Replacing,
}

/// When the trace table is zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceReset {
    /// Traces live as long as the agent does.
    #[default]
    Never,
    /// Traces are zeroed every time an episode ends.
    OnEpisodeEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub initial_exploration_rate: f64,
    pub exploration_decay_step: f64,
    pub final_exploration_rate: f64,
    pub discount_factor: f64,
    pub lambda_factor: f64,
    pub trace_kind: TraceKind,
    pub trace_reset: TraceReset,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            initial_exploration_rate: 1.0,
            exploration_decay_step: 0.0,
            final_exploration_rate: 0.0,
            discount_factor: 0.95,
            lambda_factor: 0.5,
            trace_kind: TraceKind::Accumulating,
            trace_reset: TraceReset::Never,
        }
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check too
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

impl AgentConfig {
    /// Checks every hyperparameter, never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        unit_range("initial_exploration_rate", self.initial_exploration_rate)?;
        unit_range("final_exploration_rate", self.final_exploration_rate)?;
        unit_range("discount_factor", self.discount_factor)?;
        unit_range("lambda_factor", self.lambda_factor)?;
        if !(self.exploration_decay_step.is_finite() && self.exploration_decay_step >= 0.0) {
            return Err(ConfigError::DecayStep(self.exploration_decay_step));
        }
        if self.final_exploration_rate > self.initial_exploration_rate {
            return Err(ConfigError::FloorAboveStart {
                initial_rate: self.initial_exploration_rate,
                final_rate: self.final_exploration_rate,
            });
        }
        Ok(())
    }

    pub fn with_trace_kind(mut self, trace_kind: TraceKind) -> Self {
        self.trace_kind = trace_kind;
        self
    }

    pub fn with_trace_reset(mut self, trace_reset: TraceReset) -> Self {
        self.trace_reset = trace_reset;
        self
    }
}
