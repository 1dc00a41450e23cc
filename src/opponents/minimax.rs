//! Game-theoretically optimal opponent
//!
//! Every position reachable from the empty board is solved once at
//! construction; positions outside that set (hand-built boards) are solved on
//! demand.

use std::collections::HashMap;

use super::{Opponent, OpponentKind};
use crate::{
    tictactoe::{GameState, Player},
    utils::uniform_over,
};

/// Minimax value of a position and the moves that achieve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// +1 X wins, -1 O wins, 0 draw, under optimal play
    pub value: i8,
    pub optimal_moves: Vec<usize>,
}

/// Plays uniformly among the minimax-optimal replies
#[derive(Debug, Clone)]
pub struct MinimaxOpponent {
    table: HashMap<GameState, Solution>,
}

impl MinimaxOpponent {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        solve(GameState::new(), &mut table);
        Self { table }
    }

    /// Solution for `state`
    pub fn solution(&self, state: &GameState) -> Solution {
        match self.table.get(state) {
            Some(solution) => solution.clone(),
            None => {
                let mut memo = HashMap::new();
                solve(*state, &mut memo);
                memo.remove(state).unwrap_or(Solution {
                    value: 0,
                    optimal_moves: Vec::new(),
                })
            }
        }
    }

    /// Number of positions solved up front
    pub fn solved_positions(&self) -> usize {
        self.table.len()
    }
}

impl Default for MinimaxOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for MinimaxOpponent {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Minimax
    }

    fn reply_distribution(&self, state: &GameState) -> Vec<(usize, f64)> {
        uniform_over(&self.solution(state).optimal_moves)
    }
}

fn solve(state: GameState, memo: &mut HashMap<GameState, Solution>) -> i8 {
    if let Some(solution) = memo.get(&state) {
        return solution.value;
    }

    if state.is_terminal() {
        let value = match state.winner() {
            Some(Player::X) => 1,
            Some(Player::O) => -1,
            None => 0,
        };
        memo.insert(
            state,
            Solution {
                value,
                optimal_moves: Vec::new(),
            },
        );
        return value;
    }

    let maximizing = state.to_move == Player::X;
    let mut best_value = if maximizing { i8::MIN } else { i8::MAX };
    let mut best_moves = Vec::new();

    for pos in state.legal_positions() {
        let Ok(next) = state.make_move(pos) else {
            continue;
        };
        let child = solve(next, memo);
        let better = if maximizing {
            child > best_value
        } else {
            child < best_value
        };
        if better {
            best_value = child;
            best_moves.clear();
            best_moves.push(pos);
        } else if child == best_value {
            best_moves.push(pos);
        }
    }

    memo.insert(
        state,
        Solution {
            value: best_value,
            optimal_moves: best_moves,
        },
    );
    best_value
}
