use std::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{Env, Info, Step};
use crate::error::EnvError;

#[derive(Hash, Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd)]
pub struct BlackJackObservation {
    pub p_score: u8,
    pub d_card: u8,
    pub usable_ace: bool,
}

impl BlackJackObservation {
    pub fn new(p_score: u8, d_card: u8, usable_ace: bool) -> Self {
        Self {
            p_score,
            d_card,
            usable_ace,
        }
    }
}

fn hand_sum(hand: &[u8]) -> u8 {
    hand.iter().sum()
}

fn usable_ace(hand: &[u8]) -> bool {
    hand.contains(&1) && hand_sum(hand) + 10 <= 21
}

fn score(hand: &[u8]) -> u8 {
    if usable_ace(hand) {
        hand_sum(hand) + 10
    } else {
        hand_sum(hand)
    }
}

/// Simplified blackjack against a dealer who draws to 17.
///
/// Cards come from an infinite deck (face cards count 10, aces 1 or 11).
/// Action 0 hits, action 1 sticks. Win +1, draw 0, loss or bust -1.
#[derive(Debug, Clone)]
pub struct BlackJackEnv {
    ready: bool,
    player: Vec<u8>,
    dealer: Vec<u8>,
    steps: u32,
    max_steps: Option<u32>,
    rng: SmallRng,
}

impl BlackJackEnv {
    pub const ACTIONS: [&'static str; 2] = ["HIT", "STICK"];
    const DECK: [u8; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

    pub fn new(seed: u64) -> Self {
        Self {
            ready: false,
            player: vec![],
            dealer: vec![],
            steps: 0,
            max_steps: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Truncates episodes that last `max_steps` steps.
    pub fn with_step_limit(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn get_action_label(&self, action: usize) -> Option<&'static str> {
        Self::ACTIONS.get(action).copied()
    }

    fn get_new_card(&mut self) -> u8 {
        Self::DECK[self.rng.gen_range(0..Self::DECK.len())]
    }

    fn observation(&self) -> BlackJackObservation {
        BlackJackObservation::new(score(&self.player), self.dealer[0], usable_ace(&self.player))
    }

    fn finish(&mut self, reward: f64) -> Step<BlackJackObservation> {
        self.ready = false;
        let mut info: Info = Info::default();
        info.insert("player_score", score(&self.player) as f64);
        info.insert("dealer_score", score(&self.dealer) as f64);
        Step {
            obs: self.observation(),
            reward,
            terminated: true,
            truncated: false,
            info,
        }
    }
}

impl Default for BlackJackEnv {
    fn default() -> Self {
        Self::new(42)
    }
}

impl Env<BlackJackObservation> for BlackJackEnv {
    fn reset(&mut self) -> (BlackJackObservation, Info) {
        self.player = vec![self.get_new_card(), self.get_new_card()];
        self.dealer = vec![self.get_new_card(), self.get_new_card()];
        self.steps = 0;
        self.ready = true;
        (self.observation(), Info::default())
    }

    fn step(&mut self, action: usize) -> Result<Step<BlackJackObservation>, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        self.steps += 1;
        match action {
            0 => {
                let card: u8 = self.get_new_card();
                self.player.push(card);
                if score(&self.player) > 21 {
                    return Ok(self.finish(-1.0));
                }
                let truncated: bool = self.max_steps.map_or(false, |max| self.steps >= max);
                if truncated {
                    self.ready = false;
                }
                Ok(Step {
                    obs: self.observation(),
                    reward: 0.0,
                    terminated: false,
                    truncated,
                    info: Info::default(),
                })
            }
            1 => {
                while score(&self.dealer) < 17 {
                    let card: u8 = self.get_new_card();
                    self.dealer.push(card);
                }
                let p_score: u8 = score(&self.player);
                let d_score: u8 = score(&self.dealer);
                let reward: f64 = if d_score > 21 {
                    1.0
                } else {
                    match p_score.cmp(&d_score) {
                        Ordering::Greater => 1.0,
                        Ordering::Less => -1.0,
                        Ordering::Equal => 0.0,
                    }
                };
                Ok(self.finish(reward))
            }
            _ => Err(EnvError::InvalidAction(action)),
        }
    }

    fn action_space_size(&self) -> usize {
        Self::ACTIONS.len()
    }

    fn render(&self) -> String {
        let cards = |hand: &[u8]| -> String {
            hand.iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let dealer: String = if self.ready {
            self.dealer.first().map(|c| c.to_string()).unwrap_or_default()
        } else {
            cards(&self.dealer[..])
        };
        format!("Dealer: {} \nPlayer: {}", dealer, cards(&self.player[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_before_reset_is_rejected() {
        let mut env = BlackJackEnv::new(1);
        assert_eq!(env.step(0), Err(EnvError::NotReady));
    }

    #[test]
    fn invalid_action_is_rejected() {
        let mut env = BlackJackEnv::new(1);
        env.reset();
        assert_eq!(env.step(2), Err(EnvError::InvalidAction(2)));
    }

    #[test]
    fn stick_always_terminates() {
        let mut env = BlackJackEnv::new(5);
        for _ in 0..100 {
            let (obs, _) = env.reset();
            assert!(obs.p_score >= 4 && obs.p_score <= 21);
            assert!((1..=10).contains(&obs.d_card));
            let step = env.step(1).unwrap();
            assert!(step.terminated && !step.truncated);
            assert!([-1.0, 0.0, 1.0].contains(&step.reward));
            assert!(step.info.contains_key("dealer_score"));
            assert_eq!(env.step(1), Err(EnvError::NotReady));
        }
    }

    #[test]
    fn hitting_ends_in_bust_or_stays_playable() {
        let mut env = BlackJackEnv::new(9);
        for _ in 0..100 {
            env.reset();
            loop {
                let step = env.step(0).unwrap();
                if step.terminated {
                    assert_eq!(step.reward, -1.0);
                    assert!(step.obs.p_score > 21);
                    break;
                }
                assert_eq!(step.reward, 0.0);
                assert!(step.obs.p_score <= 21);
            }
        }
    }

    #[test]
    fn step_limit_truncates() {
        let mut env = BlackJackEnv::new(3).with_step_limit(1);
        let mut truncated: bool = false;
        for _ in 0..50 {
            env.reset();
            let step = env.step(0).unwrap();
            if !step.terminated {
                assert!(step.truncated);
                assert!(step.is_done());
                truncated = true;
            }
        }
        assert!(truncated);
    }

    #[test]
    fn usable_ace_counts_eleven() {
        assert_eq!(score(&[1, 6]), 17);
        assert!(usable_ace(&[1, 6]));
        assert_eq!(score(&[1, 6, 9]), 16);
        assert!(!usable_ace(&[1, 6, 9]));
    }
}
