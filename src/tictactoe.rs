//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;
pub mod state_space;
pub mod validation;

pub use board::{Cell, GameState, GameStatus, Player};
pub use game::{Game, GameOutcome, Move};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use state_space::StateSpace;
