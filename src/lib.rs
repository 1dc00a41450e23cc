//! Tic-Tac-Toe as a Markov decision process
//!
//! This crate provides:
//! - Game state, move legality and enumeration of every state an agent faces
//! - A generic finite-MDP interface and the game modelled against a
//!   stochastic opponent (random, aggressive, defensive or minimax)
//! - Value iteration and policy iteration over the full transition model
//! - Tabular ε-greedy Q-learning over a sampled environment
//! - An exhibition harness and CLI for playing the resulting policies

pub mod cli;
pub mod config;
pub mod error;
pub mod mdp;
pub mod opponents;
pub mod pipeline;
pub mod planning;
pub mod policy;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod utils;

pub use config::{PolicyIterationConfig, QLearningConfig, RewardConfig, ValueIterationConfig};
pub use error::{Error, Result};
pub use mdp::{Mdp, Outcome, TicTacToeMdp, Transition};
pub use opponents::{Opponent, OpponentKind};
pub use planning::{PolicyIterationSolver, ValueIterationSolver};
pub use policy::{Policy, ValueFunction};
pub use q_learning::{Environment, QLearningSolver, QTable, TicTacToeEnv};
pub use tictactoe::{GameState, Move, Player, StateSpace};
