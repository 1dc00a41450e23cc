//! Tic-Tac-Toe seen from one player's side
//!
//! An action is the agent's move; the opponent's reply is part of the
//! environment, so one step goes from an agent decision to the next agent
//! decision (or to the end of the game).

use std::sync::Arc;

use super::{Mdp, Outcome, Transition};
use crate::{
    Error, Result,
    config::RewardConfig,
    opponents::Opponent,
    tictactoe::{GameState, Move, Player, StateSpace},
};

/// The game as an MDP for a fixed agent symbol and opponent
#[derive(Debug, Clone)]
pub struct TicTacToeMdp {
    agent: Player,
    rewards: RewardConfig,
    opponent: Arc<dyn Opponent>,
    space: Arc<StateSpace>,
}

impl TicTacToeMdp {
    /// Build the model over a pre-enumerated space.
    ///
    /// # Errors
    ///
    /// Fails if a reward is not finite or the space belongs to the other
    /// player.
    pub fn new(
        agent: Player,
        rewards: RewardConfig,
        opponent: Arc<dyn Opponent>,
        space: Arc<StateSpace>,
    ) -> Result<Self> {
        rewards.validate()?;
        if space.player() != agent {
            return Err(Error::parameter(
                "state space",
                format!(
                    "enumerated for {} but the agent plays {agent}",
                    space.player()
                ),
            ));
        }
        Ok(Self {
            agent,
            rewards,
            opponent,
            space,
        })
    }

    /// Enumerate the agent's state space and build the model over it
    pub fn for_agent(
        agent: Player,
        rewards: RewardConfig,
        opponent: Arc<dyn Opponent>,
    ) -> Result<Self> {
        let space = Arc::new(StateSpace::enumerate(agent)?);
        Self::new(agent, rewards, opponent, space)
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    pub fn opponent(&self) -> &Arc<dyn Opponent> {
        &self.opponent
    }

    pub fn space(&self) -> &Arc<StateSpace> {
        &self.space
    }
}

impl Mdp for TicTacToeMdp {
    type State = GameState;
    type Action = Move;

    fn states(&self) -> &[GameState] {
        self.space.states()
    }

    fn is_terminal(&self, state: &GameState) -> bool {
        state.is_terminal()
    }

    fn legal_actions(&self, state: &GameState) -> Vec<Move> {
        if state.to_move != self.agent {
            return Vec::new();
        }
        state.legal_moves()
    }

    fn transitions(&self, state: &GameState, action: &Move) -> Result<Vec<Transition<GameState, Move>>> {
        if !state.is_terminal() && state.to_move != self.agent {
            return Err(Error::IllegalAction {
                action: action.to_string(),
                state: state.encode(),
                reason: format!("the agent plays {} but {} is to move", self.agent, state.to_move),
            });
        }
        let after_agent = state.apply(action)?;

        if let Some(reward) = self.rewards.terminal_reward(&after_agent, self.agent) {
            return Ok(vec![Transition {
                probability: 1.0,
                outcome: Outcome {
                    source: *state,
                    action: *action,
                    reward,
                    next: after_agent,
                },
            }]);
        }

        let mut transitions = Vec::new();
        for (reply, probability) in self.opponent.reply_distribution(&after_agent) {
            if probability <= 0.0 {
                continue;
            }
            let next = after_agent.make_move(reply)?;
            transitions.push(Transition {
                probability,
                outcome: Outcome {
                    source: *state,
                    action: *action,
                    reward: self.rewards.step_reward(&next, self.agent),
                    next,
                },
            });
        }

        if transitions.is_empty() {
            return Err(Error::NoValidMoves);
        }
        Ok(transitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponents::OpponentKind;

    fn model(agent: Player, kind: OpponentKind) -> TicTacToeMdp {
        TicTacToeMdp::for_agent(agent, RewardConfig::default(), kind.build()).unwrap()
    }

    fn total_probability(transitions: &[Transition<GameState, Move>]) -> f64 {
        transitions.iter().map(|t| t.probability).sum()
    }

    #[test]
    fn test_opening_move_against_random() {
        let mdp = model(Player::X, OpponentKind::Random);
        let empty = GameState::new();
        let transitions = mdp.transitions(&empty, &Move::new(4, Player::X)).unwrap();

        assert_eq!(transitions.len(), 8);
        assert!((total_probability(&transitions) - 1.0).abs() < 1e-9);
        for t in &transitions {
            assert_eq!(t.outcome.reward, 0.0);
            assert_eq!(t.outcome.next.occupied_count(), 2);
            assert!(mdp.space().contains(&t.outcome.next));
        }
    }

    #[test]
    fn test_winning_move_has_single_transition() {
        let mdp = model(Player::X, OpponentKind::Random);
        let state = GameState::from_string("XX.OO....").unwrap();
        let transitions = mdp.transitions(&state, &Move::new(2, Player::X)).unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].probability, 1.0);
        assert_eq!(transitions[0].outcome.reward, 10.0);
        assert!(transitions[0].outcome.next.is_terminal());
    }

    #[test]
    fn test_opponent_win_gets_lose_reward() {
        let mdp = model(Player::X, OpponentKind::Aggressive);
        // X ignores the threat on 3-4-5; the aggressive reply completes it
        let state = GameState::from_string("XX.OO....").unwrap();
        let transitions = mdp.transitions(&state, &Move::new(8, Player::X)).unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.reward, -10.0);
        assert_eq!(transitions[0].outcome.next.winner(), Some(Player::O));
    }

    #[test]
    fn test_filling_the_board_draws() {
        let mdp = model(Player::X, OpponentKind::Random);
        // X to move with one cell left
        let state = GameState::from_string("XOXXOOOX.").unwrap();
        let transitions = mdp.transitions(&state, &Move::new(8, Player::X)).unwrap();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.reward, 0.0);
        assert!(transitions[0].outcome.next.is_draw());
    }

    #[test]
    fn test_agent_as_o() {
        let mdp = model(Player::O, OpponentKind::Random);
        let state = GameState::from_string("X........").unwrap();
        let transitions = mdp.transitions(&state, &Move::new(4, Player::O)).unwrap();
        assert_eq!(transitions.len(), 7);
        assert!((total_probability(&transitions) - 1.0).abs() < 1e-9);
        assert!(mdp.legal_actions(&GameState::new()).is_empty());
    }

    #[test]
    fn test_terminal_state_rejects_actions() {
        let mdp = model(Player::X, OpponentKind::Random);
        let won = GameState::from_string("XXXOO....").unwrap();
        let err = mdp.transitions(&won, &Move::new(5, Player::X)).unwrap_err();
        assert!(matches!(err, Error::IllegalAction { .. }));
        assert!(mdp.is_terminal(&won));
        assert!(mdp.legal_actions(&won).is_empty());
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mdp = model(Player::X, OpponentKind::Random);
        let state = GameState::from_string("X...O....").unwrap();
        let err = mdp.transitions(&state, &Move::new(4, Player::X)).unwrap_err();
        assert!(matches!(err, Error::IllegalAction { .. }));
    }

    #[test]
    fn test_space_for_wrong_player_rejected() {
        let space = Arc::new(StateSpace::enumerate(Player::O).unwrap());
        let result = TicTacToeMdp::new(
            Player::X,
            RewardConfig::default(),
            OpponentKind::Random.build(),
            space,
        );
        assert!(result.is_err());
    }
}
