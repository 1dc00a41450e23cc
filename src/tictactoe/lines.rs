//! Winning line analysis

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Line queries used by win detection and the heuristic opponents
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player has three in a row
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Positions that would complete a line for `player`, ascending and deduplicated
    pub fn winning_moves(cells: &[Cell; 9], player: Player) -> Vec<usize> {
        let mut moves: Vec<usize> = WINNING_LINES
            .iter()
            .filter_map(|line| Self::completing_cell(cells, player, line))
            .collect();
        moves.sort_unstable();
        moves.dedup();
        moves
    }

    /// Whether `player` has two in a line with the third cell empty
    pub fn has_immediate_win(cells: &[Cell; 9], player: Player) -> bool {
        WINNING_LINES
            .iter()
            .any(|line| Self::completing_cell(cells, player, line).is_some())
    }

    fn completing_cell(cells: &[Cell; 9], player: Player, line: &[usize; 3]) -> Option<usize> {
        let target = player.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None,
            }
        }

        if count == 2 { empty_pos } else { None }
    }
}
