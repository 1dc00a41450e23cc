//! Argument groups shared across commands

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        DEFAULT_DISCOUNT, DEFAULT_EPISODES, DEFAULT_EPSILON, DEFAULT_ITERATIONS,
        DEFAULT_LEARNING_RATE, DEFAULT_TOLERANCE, PolicyIterationConfig, QLearningConfig,
        RewardConfig, ValueIterationConfig,
    },
    opponents::OpponentKind,
    tictactoe::{GameState, Player},
};

/// Solution method
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Value iteration
    Vi,
    /// Policy iteration
    Pi,
    /// Q-learning
    Ql,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Vi => "Value iteration",
            Method::Pi => "Policy iteration",
            Method::Ql => "Q-learning",
        }
    }
}

/// Who plays what, against whom, for which rewards
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Side the agent plays (`x` or `o`); X always opens
    #[arg(long, default_value = "x")]
    pub player: Player,

    /// Opponent the agent is trained against (random, aggressive, defensive, minimax)
    #[arg(long, short = 'o', default_value = "random")]
    pub opponent: OpponentKind,

    /// Reward for winning
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub win: f64,

    /// Reward for losing
    #[arg(long, default_value_t = -10.0, allow_negative_numbers = true)]
    pub lose: f64,

    /// Reward for a step that does not end the game
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub living: f64,

    /// Reward for a draw
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub draw: f64,
}

impl ModelArgs {
    pub fn rewards(&self) -> RewardConfig {
        RewardConfig::default()
            .with_win(self.win)
            .with_lose(self.lose)
            .with_living(self.living)
            .with_draw(self.draw)
    }

    /// State whose value and move are reported: the empty board for X, the
    /// reply to a centre opening for O
    pub fn reference_state(&self) -> GameState {
        let empty = GameState::new();
        match self.player {
            Player::X => empty,
            Player::O => empty.make_move(4).unwrap_or(empty),
        }
    }
}

/// Hyper-parameters for all three methods
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Discount factor γ
    #[arg(long, short = 'g', default_value_t = DEFAULT_DISCOUNT)]
    pub discount: f64,

    /// Value iteration sweeps
    #[arg(long, short = 'k', default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Policy evaluation tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Q-learning step size α
    #[arg(long, short = 'a', default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,

    /// Q-learning exploration rate ε
    #[arg(long, short = 'e', default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Exponent ω of the per-pair step size α / n^ω (0 keeps α fixed)
    #[arg(long, default_value_t = 0.0)]
    pub learning_rate_decay: f64,

    /// Per-episode multiplicative ε decay
    #[arg(long, default_value_t = 1.0)]
    pub epsilon_decay: f64,

    /// Lower bound for the decayed ε
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,

    /// Q-learning training episodes
    #[arg(long, short = 'n', default_value_t = DEFAULT_EPISODES)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SolverArgs {
    pub fn value_iteration(&self) -> ValueIterationConfig {
        ValueIterationConfig::default()
            .with_discount(self.discount)
            .with_iterations(self.iterations)
    }

    pub fn policy_iteration(&self) -> PolicyIterationConfig {
        PolicyIterationConfig {
            discount: self.discount,
            tolerance: self.tolerance,
            seed: self.seed,
        }
    }

    pub fn q_learning(&self) -> QLearningConfig {
        QLearningConfig {
            learning_rate: self.learning_rate,
            learning_rate_decay: self.learning_rate_decay,
            discount: self.discount,
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            min_epsilon: self.min_epsilon,
            episodes: self.episodes,
            q_init: 0.0,
            seed: self.seed,
        }
    }
}
