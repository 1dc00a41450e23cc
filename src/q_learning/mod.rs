//! Model-free learning
//!
//! Q-learning never sees the transition model. It learns from sampled
//! `(s, a, r, s')` steps produced by an [`Environment`], updating
//!
//! ```text
//! Q(s,a) ← (1−α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
//! ```
//!
//! with the bootstrap term taken as 0 at terminal states.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tictactoe_mdp::{
//!     config::{QLearningConfig, RewardConfig},
//!     opponents::OpponentKind,
//!     q_learning::QLearningSolver,
//!     tictactoe::{Player, StateSpace},
//! };
//!
//! let space = Arc::new(StateSpace::enumerate(Player::X)?);
//! let mut solver = QLearningSolver::for_game(
//!     Player::X,
//!     RewardConfig::default(),
//!     OpponentKind::Random.build(),
//!     space,
//!     QLearningConfig::default().with_seed(42),
//! )?;
//! let policy = solver.train()?;
//! # Ok::<(), tictactoe_mdp::Error>(())
//! ```

pub mod environment;
pub mod q_table;
pub mod solver;

pub use environment::{Environment, TicTacToeEnv};
pub use q_table::QTable;
pub use solver::QLearningSolver;
