//! Moves, outcomes and played-game records

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{GameState, Player};

/// A move: the cell to mark and the mark being placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

impl Move {
    pub fn new(position: usize, player: Player) -> Self {
        Self { position, player }
    }

    /// Row and column (0-2) of the marked cell
    pub fn coordinates(&self) -> (usize, usize) {
        (self.position / 3, self.position % 3)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.coordinates();
        write!(f, "{}@({row},{col})", self.player)
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a terminal state, `None` while the game is still running
    pub fn of(state: &GameState) -> Option<Self> {
        if let Some(winner) = state.winner() {
            Some(GameOutcome::Win(winner))
        } else if state.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}

/// A game with its move history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub initial: GameState,
    pub moves: Vec<Move>,
    pub outcome: Option<GameOutcome>,
    current: GameState,
}

impl Game {
    /// Start a game from the empty board, X to move
    pub fn new() -> Self {
        let initial = GameState::new();
        Game {
            initial,
            moves: Vec::new(),
            outcome: None,
            current: initial,
        }
    }

    /// Play a move for the side to move
    pub fn play(&mut self, mv: Move) -> Result<(), crate::Error> {
        self.current = self.current.apply(&mv)?;
        self.moves.push(mv);
        self.outcome = GameOutcome::of(&self.current);
        Ok(())
    }

    pub fn current_state(&self) -> GameState {
        self.current
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_records_history_and_outcome() {
        let mut game = Game::new();
        for (pos, player) in [
            (0, Player::X),
            (3, Player::O),
            (1, Player::X),
            (4, Player::O),
            (2, Player::X),
        ] {
            assert!(!game.is_over());
            game.play(Move::new(pos, player)).unwrap();
        }

        assert_eq!(game.moves.len(), 5);
        assert_eq!(game.outcome, Some(GameOutcome::Win(Player::X)));
        assert!(game.play(Move::new(5, Player::O)).is_err());
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = Game::new();
        game.play(Move::new(4, Player::X)).unwrap();
        assert!(game.play(Move::new(4, Player::O)).is_err());
        assert_eq!(game.moves.len(), 1);
        assert_eq!(game.current_state().to_move, Player::O);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new(5, Player::O).to_string(), "O@(1,2)");
    }
}
