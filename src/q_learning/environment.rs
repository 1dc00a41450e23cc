//! Episodic environments for model-free learning

use std::{fmt::Debug, hash::Hash, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    config::RewardConfig,
    mdp::Outcome,
    opponents::Opponent,
    tictactoe::{GameState, Move, Player},
};

/// Generic episodic environment interface
pub trait Environment {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Debug;

    /// Start a new episode and return its first state
    fn reset(&mut self) -> Result<Self::State>;

    /// Whether the current episode is over
    fn is_terminal(&self) -> bool;

    fn current_state(&self) -> Self::State;

    /// Legal actions in `state`, in a stable order
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    fn is_terminal_state(&self, state: &Self::State) -> bool;

    /// Apply `action` in the current state and advance to the next decision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalAction`] if the action is not legal now.
    fn execute_move(&mut self, action: &Self::Action) -> Result<Outcome<Self::State, Self::Action>>;
}

/// A live game against a sampled opponent
///
/// Each step is the agent's move followed, if the game goes on, by one reply
/// drawn from the opponent's distribution. Rewards follow the same rule as
/// [`TicTacToeMdp`](crate::mdp::TicTacToeMdp).
#[derive(Debug)]
pub struct TicTacToeEnv {
    agent: Player,
    rewards: RewardConfig,
    opponent: Arc<dyn Opponent>,
    start: GameState,
    state: GameState,
    rng: StdRng,
}

impl TicTacToeEnv {
    /// Episodes start from the empty board. When the agent plays O, the
    /// opponent opens on reset.
    pub fn new(
        agent: Player,
        rewards: RewardConfig,
        opponent: Arc<dyn Opponent>,
        seed: u64,
    ) -> Result<Self> {
        rewards.validate()?;
        let mut env = Self {
            agent,
            rewards,
            opponent,
            start: GameState::new(),
            state: GameState::new(),
            rng: StdRng::seed_from_u64(seed),
        };
        env.reset()?;
        Ok(env)
    }

    /// Start every episode from `start` instead of the empty board.
    ///
    /// # Errors
    ///
    /// Rejects states that cannot arise from legal play.
    pub fn with_start(mut self, start: GameState) -> Result<Self> {
        if !start.is_valid() {
            return Err(Error::IllegalAction {
                action: "reset".to_string(),
                state: start.encode(),
                reason: "start state is not reachable".to_string(),
            });
        }
        self.start = start;
        self.reset()?;
        Ok(self)
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn start(&self) -> GameState {
        self.start
    }
}

impl Environment for TicTacToeEnv {
    type State = GameState;
    type Action = Move;

    fn reset(&mut self) -> Result<GameState> {
        self.state = self.start;
        if !self.state.is_terminal() && self.state.to_move != self.agent {
            let reply = self.opponent.sample_reply(&self.state, &mut self.rng)?;
            self.state = self.state.apply(&reply)?;
        }
        Ok(self.state)
    }

    fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn current_state(&self) -> GameState {
        self.state
    }

    fn legal_actions(&self, state: &GameState) -> Vec<Move> {
        if state.to_move != self.agent {
            return Vec::new();
        }
        state.legal_moves()
    }

    fn is_terminal_state(&self, state: &GameState) -> bool {
        state.is_terminal()
    }

    fn execute_move(&mut self, action: &Move) -> Result<Outcome<GameState, Move>> {
        let source = self.state;
        if action.player != self.agent {
            return Err(Error::IllegalAction {
                action: action.to_string(),
                state: source.encode(),
                reason: format!("the agent plays {}", self.agent),
            });
        }
        let after_agent = source.apply(action)?;

        let next = if after_agent.is_terminal() {
            after_agent
        } else {
            let reply = self.opponent.sample_reply(&after_agent, &mut self.rng)?;
            after_agent.apply(&reply)?
        };

        self.state = next;
        Ok(Outcome {
            source,
            action: *action,
            reward: self.rewards.step_reward(&next, self.agent),
            next,
        })
    }
}
