//! Enumeration of the states an agent can face
//!
//! The state space for a player holds every position reachable from the empty
//! board (X opening) where that player is to move, plus every terminal
//! position. Terminal positions are kept regardless of whose turn the board
//! nominally records, so all successors of an agent decision are present.

use std::collections::{HashMap, HashSet};

use super::board::{GameState, Player};
use crate::{Error, Result};

/// Read-only universe of states shared by every solver
#[derive(Debug, Clone)]
pub struct StateSpace {
    player: Player,
    states: Vec<GameState>,
    index: HashMap<GameState, usize>,
}

impl StateSpace {
    /// Enumerate the state space for `player` by backtracking over legal play.
    ///
    /// States are ordered deepest-first (most marks first, ties in discovery
    /// order), so every successor of a state precedes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyStateSpace`] if the enumeration yields nothing.
    pub fn enumerate(player: Player) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut discovered = Vec::new();
        Self::collect(GameState::new(), player, &mut seen, &mut discovered)?;

        if discovered.is_empty() {
            return Err(Error::EmptyStateSpace {
                player: player.to_string(),
            });
        }

        discovered.sort_by_key(|state| std::cmp::Reverse(state.occupied_count()));
        let index = discovered
            .iter()
            .enumerate()
            .map(|(i, state)| (*state, i))
            .collect();

        Ok(Self {
            player,
            states: discovered,
            index,
        })
    }

    fn collect(
        state: GameState,
        player: Player,
        seen: &mut HashSet<GameState>,
        out: &mut Vec<GameState>,
    ) -> Result<()> {
        if !seen.insert(state) {
            return Ok(());
        }

        let terminal = state.is_terminal();
        if terminal || state.to_move == player {
            out.push(state);
        }
        if terminal {
            return Ok(());
        }

        for pos in state.legal_positions() {
            let next = state.make_move(pos)?;
            Self::collect(next, player, seen, out)?;
        }
        Ok(())
    }

    /// The player whose decisions this space describes
    pub fn player(&self) -> Player {
        self.player
    }

    /// All states, deepest-first
    pub fn states(&self) -> &[GameState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, state: &GameState) -> bool {
        self.index.contains_key(state)
    }

    /// Position of `state` in [`states`](Self::states)
    pub fn index_of(&self, state: &GameState) -> Option<usize> {
        self.index.get(state).copied()
    }

    /// States where the player still has a decision to make
    pub fn decision_states(&self) -> impl Iterator<Item = &GameState> {
        self.states.iter().filter(|state| !state.is_terminal())
    }

    pub fn terminal_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_terminal()).count()
    }
}
