//! Reachability checks for game states

use super::{
    board::{Cell, GameState, Player},
    lines::WINNING_LINES,
};

impl GameState {
    /// Check whether the state can arise from X-first alternating play.
    ///
    /// X has the same number of marks as O or one more, the side to move
    /// matches the counts, at most one player has a line, the winner moved
    /// last, and all of the winner's lines pass through a common cell.
    pub fn is_valid(&self) -> bool {
        let x_count = self.cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = self.cells.iter().filter(|&&c| c == Cell::O).count();

        let expected_turn = if x_count == o_count {
            Player::X
        } else if x_count == o_count + 1 {
            Player::O
        } else {
            return false;
        };
        if self.to_move != expected_turn {
            return false;
        }

        let x_wins = self.has_won(Player::X);
        let o_wins = self.has_won(Player::O);
        if x_wins && o_wins {
            return false;
        }
        if x_wins && x_count != o_count + 1 {
            return false;
        }
        if o_wins && o_count != x_count {
            return false;
        }

        [Player::X, Player::O]
            .into_iter()
            .all(|player| self.winning_lines_share_cell(player))
    }

    /// Whether every completed line of `player` shares one cell, which is
    /// required for several lines to have been closed by a single move
    pub fn winning_lines_share_cell(&self, player: Player) -> bool {
        let cell = player.to_cell();
        let lines: Vec<&[usize; 3]> = WINNING_LINES
            .iter()
            .filter(|line| line.iter().all(|&idx| self.cells[idx] == cell))
            .collect();

        if lines.len() < 2 {
            return true;
        }

        (0..9).any(|pos| lines.iter().all(|line| line.contains(&pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_played_states_are_valid() {
        let mut state = GameState::new();
        assert!(state.is_valid());
        for pos in [4, 0, 8, 2, 1] {
            state = state.make_move(pos).unwrap();
            assert!(state.is_valid(), "{state} should be valid");
        }
    }

    #[test]
    fn test_double_line_through_shared_cell_is_valid() {
        // XXX
        // XOO
        // XOO  (X closed row and column with its last move at 0)
        let state = GameState::from_string("XXXXOOXOO").unwrap();
        assert!(state.is_valid());
    }

    #[test]
    fn test_disjoint_double_line_is_invalid() {
        let mut cells = [Cell::Empty; 9];
        for pos in [0, 1, 2, 6, 7, 8] {
            cells[pos] = Cell::X;
        }
        cells[3] = Cell::O;
        cells[4] = Cell::O;
        let state = GameState {
            cells,
            to_move: Player::O,
        };
        assert!(!state.is_valid());
    }

    #[test]
    fn test_win_with_wrong_turn_is_invalid() {
        // O has a line but X has more marks, so O cannot have moved last
        let state = GameState::from_string("OOOXX.XX.").unwrap();
        assert!(!state.is_valid());
    }
}
