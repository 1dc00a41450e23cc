//! Game state representation and basic operations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{game::Move, lines::LineAnalyzer};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

impl FromStr for Player {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Player::X),
            "o" => Ok(Player::O),
            _ => Err(crate::Error::ParsePlayer {
                input: s.to_string(),
            }),
        }
    }
}

/// Terminal status of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    XWon,
    OWon,
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// A board position together with the player to move.
///
/// Equality and hashing are structural (cells + side to move), so the type can
/// key every map the solvers keep. It is `Copy` and never mutated in place:
/// moves produce a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

/// Count of each piece type on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceCount {
    x: usize,
    o: usize,
}

impl GameState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        GameState {
            cells: [Cell::Empty; 9],
            to_move: Player::X,
        }
    }

    fn count_pieces(cells: &[Cell; 9]) -> PieceCount {
        let mut count = PieceCount { x: 0, o: 0 };
        for cell in cells {
            match cell {
                Cell::X => count.x += 1,
                Cell::O => count.o += 1,
                Cell::Empty => {}
            }
        }
        count
    }

    /// Parse a board from nine cell characters (`X`, `O`, `.`), row-major.
    ///
    /// Whitespace is ignored. The player to move is derived from the piece
    /// counts, since X always opens.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 cells are given, a character is not a
    /// cell, or the piece counts cannot arise from X-first play.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let count = Self::count_pieces(&cells);
        let to_move = if count.x == count.o {
            Player::X
        } else if count.x == count.o + 1 {
            Player::O
        } else {
            return Err(crate::Error::InvalidPieceCounts {
                x_count: count.x,
                o_count: count.o,
            });
        };

        Ok(GameState { cells, to_move })
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        let count = Self::count_pieces(&self.cells);
        count.x + count.o
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Positions the player to move may mark; empty once the game is over
    pub fn legal_positions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Legal moves for the player to move, in ascending position order
    pub fn legal_moves(&self) -> Vec<Move> {
        self.legal_positions()
            .into_iter()
            .map(|position| Move::new(position, self.to_move))
            .collect()
    }

    /// Whether `mv` may be played here
    pub fn is_legal(&self, mv: &Move) -> bool {
        !self.is_terminal()
            && mv.position < 9
            && self.is_empty(mv.position)
            && mv.player == self.to_move
    }

    /// Mark `pos` for the player to move and return the resulting state
    #[must_use = "make_move returns a new state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<GameState, crate::Error> {
        if pos >= 9 || !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = self.to_move.to_cell();
        new_state.to_move = self.to_move.opponent();
        Ok(new_state)
    }

    /// Apply a fully specified move, rejecting it unless it is legal here
    #[must_use = "apply returns a new state; the original is unchanged"]
    pub fn apply(&self, mv: &Move) -> Result<GameState, crate::Error> {
        if !self.is_legal(mv) {
            let reason = if self.is_terminal() {
                "game is already over".to_string()
            } else if mv.player != self.to_move {
                format!("it is {}'s turn", self.to_move)
            } else {
                format!("position {} is not available", mv.position)
            };
            return Err(crate::Error::IllegalAction {
                action: mv.to_string(),
                state: self.encode(),
                reason,
            });
        }
        self.make_move(mv.position)
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(Player::X) => GameStatus::XWon,
            Some(Player::O) => GameStatus::OWon,
            None if self.is_draw() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Compact string form, e.g. `XO......._X`
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move
        )
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
