//! Solver and reward configuration.
//!
//! Every config is a plain builder-style struct with documented defaults and a
//! `validate` method. Solvers call `validate` when they are constructed, so an
//! out-of-range parameter never reaches a training loop.
//!
//! # Examples
//!
//! ```
//! use tictactoe_mdp::config::QLearningConfig;
//!
//! let config = QLearningConfig::default()
//!     .with_episodes(20_000)
//!     .with_epsilon(0.3)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{GameState, Player},
};

pub const DEFAULT_DISCOUNT: f64 = 0.9;
pub const DEFAULT_ITERATIONS: usize = 50;
pub const DEFAULT_TOLERANCE: f64 = 0.1;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EPSILON: f64 = 0.1;
pub const DEFAULT_EPISODES: usize = 100_000;

/// Rewards from the agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub win: f64,
    pub lose: f64,
    /// Reward for a step that does not end the game
    pub living: f64,
    pub draw: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win: 10.0,
            lose: -10.0,
            living: 0.0,
            draw: 0.0,
        }
    }
}

impl RewardConfig {
    pub fn with_win(mut self, win: f64) -> Self {
        self.win = win;
        self
    }

    pub fn with_lose(mut self, lose: f64) -> Self {
        self.lose = lose;
        self
    }

    pub fn with_living(mut self, living: f64) -> Self {
        self.living = living;
        self
    }

    pub fn with_draw(mut self, draw: f64) -> Self {
        self.draw = draw;
        self
    }

    /// Reward for reaching `state` if it ends the game, from `agent`'s side
    pub fn terminal_reward(&self, state: &GameState, agent: Player) -> Option<f64> {
        match state.winner() {
            Some(winner) if winner == agent => Some(self.win),
            Some(_) => Some(self.lose),
            None if state.is_draw() => Some(self.draw),
            None => None,
        }
    }

    /// Reward for a step that lands in `state`
    pub fn step_reward(&self, state: &GameState, agent: Player) -> f64 {
        self.terminal_reward(state, agent).unwrap_or(self.living)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("win reward", self.win),
            ("lose reward", self.lose),
            ("living reward", self.living),
            ("draw reward", self.draw),
        ] {
            if !value.is_finite() {
                return Err(Error::parameter(name, format!("must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

/// Configuration for value iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueIterationConfig {
    /// Discount factor γ in [0, 1]
    pub discount: f64,
    /// Number of full sweeps; there is no early stop
    pub iterations: usize,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl ValueIterationConfig {
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        if self.iterations == 0 {
            return Err(Error::parameter("iterations", "must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration for policy iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyIterationConfig {
    pub discount: f64,
    /// Each state is re-evaluated until its value moves by no more than this
    pub tolerance: f64,
    /// Seed for the random initial policy
    pub seed: Option<u64>,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
        }
    }
}

impl PolicyIterationConfig {
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        check_tolerance(self.tolerance)
    }
}

/// Configuration for tabular Q-learning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Step size α in (0, 1]
    pub learning_rate: f64,
    /// Exponent ω in [0, 1] of the per-pair step size α / n^ω, where n counts
    /// updates of the pair; 0 keeps α fixed
    pub learning_rate_decay: f64,
    pub discount: f64,
    /// Exploration rate ε in [0, 1]
    pub epsilon: f64,
    /// Multiplied into ε after every episode; 1.0 keeps ε fixed
    pub epsilon_decay: f64,
    /// Floor for the decayed ε
    pub min_epsilon: f64,
    pub episodes: usize,
    /// Value given to state-action pairs first seen during training
    pub q_init: f64,
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            learning_rate_decay: 0.0,
            discount: DEFAULT_DISCOUNT,
            epsilon: DEFAULT_EPSILON,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            episodes: DEFAULT_EPISODES,
            q_init: 0.0,
            seed: None,
        }
    }
}

impl QLearningConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Shrink the step size for each pair as `learning_rate / n^decay`
    pub fn with_learning_rate_decay(mut self, decay: f64) -> Self {
        self.learning_rate_decay = decay;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Step size for the `visits`-th update of a pair (counting from 1)
    pub fn step_size(&self, visits: u64) -> f64 {
        if self.learning_rate_decay == 0.0 || visits <= 1 {
            return self.learning_rate;
        }
        self.learning_rate / (visits as f64).powf(self.learning_rate_decay)
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Decay ε geometrically per episode, never below `min_epsilon`
    pub fn with_epsilon_decay(mut self, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount)?;
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::parameter(
                "learning rate",
                format!("must be in (0, 1], got {}", self.learning_rate),
            ));
        }
        check_unit_interval("learning rate decay", self.learning_rate_decay)?;
        check_unit_interval("epsilon", self.epsilon)?;
        check_unit_interval("min epsilon", self.min_epsilon)?;
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::parameter(
                "epsilon decay",
                format!("must be in (0, 1], got {}", self.epsilon_decay),
            ));
        }
        if self.episodes == 0 {
            return Err(Error::parameter("episodes", "must be at least 1"));
        }
        if !self.q_init.is_finite() {
            return Err(Error::parameter("initial q-value", "must be finite"));
        }
        Ok(())
    }
}

/// Resolve an optional seed, drawing one from the thread RNG when unset
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

fn check_discount(discount: f64) -> Result<()> {
    check_unit_interval("discount", discount)
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::parameter(name, format!("must be in [0, 1], got {value}")))
    }
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance > 0.0 && tolerance.is_finite() {
        Ok(())
    } else {
        Err(Error::parameter(
            "tolerance",
            format!("must be positive, got {tolerance}"),
        ))
    }
}
