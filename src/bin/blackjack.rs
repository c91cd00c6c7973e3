use std::error::Error;
use std::time::Instant;

use td_lambda::env::{BlackJackEnv, Env};
use td_lambda::exploration::linear_decay_step;
use td_lambda::trainer::Trainer;
use td_lambda::utils::{moving_average, save_json};
use td_lambda::{AgentConfig, SarsaLambdaAgent, TraceKind, TraceReset};

extern crate structopt;

use serde_json::json;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Train a SARSA(λ) agent on BlackJack and save its learning curves
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - BlackJack SARSA(λ)")]
struct Cli {
    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "100000")]
    n_episodes: u128,

    /// Learning rate of the RL agent
    #[structopt(long = "learning_rate", default_value = "0.05")]
    learning_rate: f64,

    /// Initial value for the exploration ratio
    #[structopt(long = "initial_epsilon", default_value = "1.0")]
    initial_epsilon: f64,

    /// Value to determine percentage of episodes where exploration is possible;
    #[structopt(long = "exploration_time", default_value = "0.5")]
    exploration_time: f64,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon", default_value = "0.0")]
    final_epsilon: f64,

    /// Discont factor to be used on the temporal difference calculation
    #[structopt(long = "discount_factor", default_value = "0.95")]
    discount_factor: f64,

    /// Lambda factor to be used on the eligibility traces
    #[structopt(long = "lambda_factor", default_value = "0.5")]
    lambda_factor: f64,

    /// Zero the eligibility traces at the end of every episode
    #[structopt(long = "reset_traces")]
    reset_traces: bool,

    /// Set the trace of the visited pair to 1 instead of adding 1
    #[structopt(long = "replacing_traces")]
    replacing_traces: bool,

    /// Evaluate the agent every this many episodes (0 disables)
    #[structopt(long = "eval_at", default_value = "10000")]
    eval_at: u128,

    /// Number of episodes of each evaluation
    #[structopt(long = "eval_for", default_value = "1000")]
    eval_for: u128,

    /// Number of episodes played after training to measure win rate
    #[structopt(long = "test_episodes", default_value = "100000")]
    test_episodes: u128,

    /// Moving average window to be used on the visualization of results
    #[structopt(long = "moving_average_window", default_value = "100")]
    moving_average_window: usize,

    /// Seed for the environment and the agent
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,

    /// Where to write the learning curves
    #[structopt(long = "output", default_value = "results.json")]
    output: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli: Cli = Cli::from_args();
    let n_episodes: u128 = cli.n_episodes;

    let config = AgentConfig {
        learning_rate: cli.learning_rate,
        initial_exploration_rate: cli.initial_epsilon,
        exploration_decay_step: linear_decay_step(
            cli.initial_epsilon,
            n_episodes,
            cli.exploration_time,
        ),
        final_exploration_rate: cli.final_epsilon,
        discount_factor: cli.discount_factor,
        lambda_factor: cli.lambda_factor,
        trace_kind: if cli.replacing_traces {
            TraceKind::Replacing
        } else {
            TraceKind::Accumulating
        },
        trace_reset: if cli.reset_traces {
            TraceReset::OnEpisodeEnd
        } else {
            TraceReset::Never
        },
    };

    let mut env = BlackJackEnv::new(cli.seed);
    let mut agent: SarsaLambdaAgent<_> =
        SarsaLambdaAgent::with_seed(config, env.action_space_size(), cli.seed)?;
    let mut trainer = Trainer::new(true);

    let now: Instant = Instant::now();
    let results = trainer.train(&mut env, &mut agent, n_episodes, cli.eval_at, cli.eval_for)?;
    info!(elapsed = ?now.elapsed(), states = agent.values().len(), "training done");

    let (test_rewards, test_lengths) = trainer.evaluate(&mut env, &mut agent, cli.test_episodes)?;
    let total: f64 = test_rewards.len().max(1) as f64;
    let wins: usize = test_rewards.iter().filter(|r| **r > 0.0).count();
    let losses: usize = test_rewards.iter().filter(|r| **r < 0.0).count();
    let draws: usize = test_rewards.len() - wins - losses;
    info!(
        win_rate = wins as f64 / total,
        loss_rate = losses as f64 / total,
        draw_rate = draws as f64 / total,
        "evaluation done"
    );

    let window: usize = cli.moving_average_window;
    let training_length: Vec<f64> = results.training_length.iter().map(|x| *x as f64).collect();
    let test_length: Vec<f64> = test_lengths.iter().map(|x| *x as f64).collect();
    save_json(
        &cli.output,
        json!({
            "train_rewards": moving_average(window, &results.training_reward),
            "train_episodes_length": moving_average(window, &training_length),
            "train_errors": moving_average(window, &results.training_error),
            "eval_rewards": &results.evaluation_reward,
            "eval_episodes_length": &results.evaluation_length,
            "test_rewards": moving_average(window, &test_rewards),
            "test_episodes_length": moving_average(window, &test_length),
            "final_epsilon": agent.exploration_rate(),
        }),
    )?;
    info!(path = %cli.output, "results saved");
    Ok(())
}
