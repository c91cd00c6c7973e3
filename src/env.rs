mod blackjack;

use fxhash::FxHashMap;

use crate::error::EnvError;

pub use blackjack::{BlackJackEnv, BlackJackObservation};

/// Side information attached to a reset or a step, never read by the agent.
pub type Info = FxHashMap<&'static str, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Step<T> {
    pub obs: T,
    pub reward: f64,
    /// The episode reached a terminal state of the game.
    pub terminated: bool,
    /// The episode was cut short, `obs` is not terminal.
    pub truncated: bool,
    pub info: Info,
}

impl<T> Step<T> {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

pub trait Env<T> {
    fn reset(&mut self) -> (T, Info);
    fn step(&mut self, action: usize) -> Result<Step<T>, EnvError>;
    fn action_space_size(&self) -> usize;
    fn render(&self) -> String;
}
