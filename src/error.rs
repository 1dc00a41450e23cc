//! Error types for the tictactoe-mdp crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is out of bounds or already occupied")]
    InvalidMove { position: usize },

    #[error("illegal action {action} in state {state}: {reason}")]
    IllegalAction {
        action: String,
        state: String,
        reason: String,
    },

    #[error("invalid {parameter}: {reason}")]
    ConvergenceParameter { parameter: String, reason: String },

    #[error("state space enumeration for {player} produced no states")]
    EmptyStateSpace { player: String },

    #[error("state {state} is not part of the enumerated state space")]
    StateOutsideSpace { state: String },

    #[error("policy has no entry for state {state}")]
    MissingPolicyEntry { state: String },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("board string too short: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid piece counts: X={x_count}, O={o_count} (must be equal or X ahead by 1)")]
    InvalidPieceCounts { x_count: usize, o_count: usize },

    #[error("invalid opponent '{input}'. Expected one of: {expected}")]
    ParseOpponent { input: String, expected: String },

    #[error("invalid player '{input}' (expected 'x' or 'o')")]
    ParsePlayer { input: String },

    #[error("invalid progress bar template: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a convergence-parameter error for a named setting
    pub(crate) fn parameter(parameter: &str, reason: impl Into<String>) -> Self {
        Error::ConvergenceParameter {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
