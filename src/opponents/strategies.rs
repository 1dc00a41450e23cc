//! Rule-based opponents

use super::{Opponent, OpponentKind};
use crate::{
    tictactoe::{GameState, LineAnalyzer},
    utils::uniform_over,
};

/// Plays every legal move with equal probability
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformOpponent;

impl Opponent for UniformOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Random
    }

    fn reply_distribution(&self, state: &GameState) -> Vec<(usize, f64)> {
        uniform_over(&state.legal_positions())
    }
}

/// Completes its own line whenever it can, otherwise plays uniformly
#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveOpponent;

impl Opponent for AggressiveOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Aggressive
    }

    fn reply_distribution(&self, state: &GameState) -> Vec<(usize, f64)> {
        let legal = state.legal_positions();
        if legal.is_empty() {
            return Vec::new();
        }
        let wins = LineAnalyzer::winning_moves(&state.cells, state.to_move);
        if wins.is_empty() {
            uniform_over(&legal)
        } else {
            uniform_over(&wins)
        }
    }
}

/// Blocks a line the other side could complete next move, otherwise plays
/// uniformly
#[derive(Debug, Clone, Copy, Default)]
pub struct DefensiveOpponent;

impl Opponent for DefensiveOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Defensive
    }

    fn reply_distribution(&self, state: &GameState) -> Vec<(usize, f64)> {
        let legal = state.legal_positions();
        if legal.is_empty() {
            return Vec::new();
        }
        let blocks = LineAnalyzer::winning_moves(&state.cells, state.to_move.opponent());
        if blocks.is_empty() {
            uniform_over(&legal)
        } else {
            uniform_over(&blocks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(dist: &[(usize, f64)]) -> Vec<usize> {
        dist.iter().map(|(pos, _)| *pos).collect()
    }

    #[test]
    fn test_uniform_covers_all_empty_cells() {
        let state = GameState::from_string("X...O....").unwrap();
        let dist = UniformOpponent.reply_distribution(&state);
        assert_eq!(positions(&dist), vec![1, 2, 3, 5, 6, 7, 8]);
        assert!(dist.iter().all(|(_, p)| (*p - 1.0 / 7.0).abs() < 1e-12));
    }

    #[test]
    fn test_aggressive_takes_the_win() {
        // O to move with 3-4 open on row two
        let state = GameState::from_string("XX.OO.X..").unwrap();
        let dist = AggressiveOpponent.reply_distribution(&state);
        assert_eq!(positions(&dist), vec![5]);
        assert_eq!(dist[0].1, 1.0);
    }

    #[test]
    fn test_aggressive_without_win_is_uniform() {
        let state = GameState::from_string("X........").unwrap();
        let dist = AggressiveOpponent.reply_distribution(&state);
        assert_eq!(dist.len(), 8);
    }

    #[test]
    fn test_defensive_blocks() {
        // O to move, X threatens 0-1-2
        let state = GameState::from_string("XX..O....").unwrap();
        let dist = DefensiveOpponent.reply_distribution(&state);
        assert_eq!(positions(&dist), vec![2]);
    }

    #[test]
    fn test_defensive_splits_between_two_threats() {
        // X threatens both 2 (top row) and 6 (left column)
        let state = GameState::from_string("XX.XOO...").unwrap();
        let dist = DefensiveOpponent.reply_distribution(&state);
        assert_eq!(positions(&dist), vec![2, 6]);
        assert!(dist.iter().all(|(_, p)| (*p - 0.5).abs() < 1e-12));
    }
}
