//! Opponent strategies
//!
//! An opponent is described by the probability it assigns to each reply, so
//! the same object drives both the exact MDP transitions used by the planners
//! and the sampled replies seen by the Q-learning environment.

pub mod minimax;
pub mod strategies;

use std::{fmt, str::FromStr, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{GameState, Move},
    utils::weighted_sample,
};

pub use minimax::MinimaxOpponent;
pub use strategies::{AggressiveOpponent, DefensiveOpponent, UniformOpponent};

/// A stochastic reply policy for whoever is to move
pub trait Opponent: Send + Sync + fmt::Debug {
    fn kind(&self) -> OpponentKind;

    /// Probability of each reply position; empty for terminal states.
    ///
    /// Probabilities sum to 1 whenever the state has a legal move.
    fn reply_distribution(&self, state: &GameState) -> Vec<(usize, f64)>;

    /// Draw one reply from [`reply_distribution`](Self::reply_distribution).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] when the state has no legal reply.
    fn sample_reply(&self, state: &GameState, rng: &mut StdRng) -> Result<Move> {
        let distribution = self.reply_distribution(state);
        let position = weighted_sample(rng, &distribution).ok_or(Error::NoValidMoves)?;
        Ok(Move::new(position, state.to_move))
    }
}

/// Selectable opponent strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    /// Uniformly random over legal moves
    #[default]
    Random,
    /// Takes an immediate win when one exists
    Aggressive,
    /// Blocks an immediate loss when one exists
    Defensive,
    /// Plays only game-theoretically optimal moves
    Minimax,
}

impl OpponentKind {
    pub const ALL: [OpponentKind; 4] = [
        OpponentKind::Random,
        OpponentKind::Aggressive,
        OpponentKind::Defensive,
        OpponentKind::Minimax,
    ];

    /// Short label used on the command line and in summaries
    pub fn label(&self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Aggressive => "aggressive",
            OpponentKind::Defensive => "defensive",
            OpponentKind::Minimax => "minimax",
        }
    }

    /// Build the strategy for this kind
    pub fn build(self) -> Arc<dyn Opponent> {
        match self {
            OpponentKind::Random => Arc::new(UniformOpponent),
            OpponentKind::Aggressive => Arc::new(AggressiveOpponent),
            OpponentKind::Defensive => Arc::new(DefensiveOpponent),
            OpponentKind::Minimax => Arc::new(MinimaxOpponent::new()),
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim().to_ascii_lowercase();
        OpponentKind::ALL
            .into_iter()
            .find(|kind| kind.label() == input)
            .ok_or_else(|| Error::ParseOpponent {
                input: s.to_string(),
                expected: OpponentKind::ALL.map(|kind| kind.label()).join(", "),
            })
    }
}

/// Lets a scripted opponent sit in a game as an [`Agent`]
#[derive(Debug)]
pub struct OpponentAgent {
    name: String,
    opponent: Arc<dyn Opponent>,
    rng: StdRng,
}

impl OpponentAgent {
    pub fn new(opponent: Arc<dyn Opponent>) -> Self {
        Self {
            name: opponent.kind().label().to_string(),
            opponent,
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    pub fn with_seed(opponent: Arc<dyn Opponent>, seed: u64) -> Self {
        Self {
            name: opponent.kind().label().to_string(),
            opponent,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for OpponentAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Move> {
        self.opponent.sample_reply(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        for kind in OpponentKind::ALL {
            assert_eq!(kind.label().parse::<OpponentKind>().unwrap(), kind);
        }
        assert_eq!(" Minimax ".parse::<OpponentKind>().unwrap(), OpponentKind::Minimax);
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "greedy".parse::<OpponentKind>().unwrap_err();
        match err {
            Error::ParseOpponent { input, expected } => {
                assert_eq!(input, "greedy");
                assert!(expected.contains("defensive"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_built_opponents_report_kind() {
        for kind in OpponentKind::ALL {
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn test_distributions_sum_to_one() {
        let states = [
            GameState::new(),
            GameState::from_string("X...O....").unwrap(),
            GameState::from_string("XX.OO....").unwrap(),
            GameState::from_string("XOXOX.O..").unwrap(),
        ];
        for kind in OpponentKind::ALL {
            let opponent = kind.build();
            for state in &states {
                let dist = opponent.reply_distribution(state);
                let total: f64 = dist.iter().map(|(_, p)| p).sum();
                assert!((total - 1.0).abs() < 1e-9, "{kind} on {state}: {total}");
                for (pos, _) in dist {
                    assert!(state.is_empty(pos));
                }
            }
        }
    }

    #[test]
    fn test_terminal_state_has_no_replies() {
        let won = GameState::from_string("XXXOO....").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for kind in OpponentKind::ALL {
            let opponent = kind.build();
            assert!(opponent.reply_distribution(&won).is_empty());
            assert!(matches!(
                opponent.sample_reply(&won, &mut rng),
                Err(Error::NoValidMoves)
            ));
        }
    }

    #[test]
    fn test_opponent_agent_is_reproducible() {
        let opponent = OpponentKind::Random.build();
        let mut a = OpponentAgent::with_seed(Arc::clone(&opponent), 9);
        let mut b = OpponentAgent::with_seed(opponent, 9);
        let state = GameState::new();
        for _ in 0..10 {
            assert_eq!(a.select_move(&state).unwrap(), b.select_move(&state).unwrap());
        }
        assert_eq!(a.name(), "random");
    }
}
