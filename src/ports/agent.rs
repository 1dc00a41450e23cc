//! Agent port - anything that can choose a move in a game
//!
//! Trained policies and scripted opponents both sit behind this trait so the
//! exhibition harness can pit any two of them against each other.

use std::sync::Arc;

use crate::{
    Error, Result,
    policy::Policy,
    tictactoe::{GameState, Move},
};

/// A move-selecting player
///
/// # Examples
///
/// ```no_run
/// use tictactoe_mdp::{ports::Agent, tictactoe::GameState};
///
/// fn opening<A: Agent>(agent: &mut A) -> tictactoe_mdp::Result<usize> {
///     Ok(agent.select_move(&GameState::new())?.position)
/// }
/// ```
pub trait Agent: Send {
    /// Select a move for the player to move in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent has no move for the state.
    fn select_move(&mut self, state: &GameState) -> Result<Move>;

    /// Name used in logs and summaries
    fn name(&self) -> &str;

    /// Seed the agent's random number generator, if it has one.
    ///
    /// Deterministic agents ignore the seed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

/// Plays a trained policy greedily
#[derive(Debug, Clone)]
pub struct PolicyAgent {
    name: String,
    policy: Arc<Policy>,
}

impl PolicyAgent {
    pub fn new(name: impl Into<String>, policy: Arc<Policy>) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl Agent for PolicyAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Move> {
        self.policy
            .action(state)
            .copied()
            .ok_or_else(|| Error::MissingPolicyEntry {
                state: state.encode(),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
