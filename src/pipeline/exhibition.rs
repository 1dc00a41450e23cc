//! Exhibition games between a trained agent and an opponent

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    Error, Result,
    ports::{Agent, Observer},
    tictactoe::{Game, GameOutcome, Player},
};

/// Exhibition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExhibitionConfig {
    pub games: usize,
    /// Side the agent plays; X always opens
    pub agent_player: Player,
    pub seed: Option<u64>,
}

impl Default for ExhibitionConfig {
    fn default() -> Self {
        Self {
            games: 1000,
            agent_player: Player::X,
            seed: None,
        }
    }
}

/// Tally of an exhibition from the agent's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitionResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl ExhibitionResult {
    pub fn new(games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if games > 0 {
                count as f64 / games as f64
            } else {
                0.0
            }
        };
        Self {
            games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
        }
    }

    /// Save result to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Plays a fixed number of games between two agents
pub struct Exhibition {
    config: ExhibitionConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Exhibition {
    pub fn new(config: ExhibitionConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Play all games with `agent` on the configured side
    #[instrument(skip_all, fields(
        games = self.config.games,
        agent = agent.name(),
        opponent = opponent.name()
    ))]
    pub fn run(
        &mut self,
        agent: &mut dyn Agent,
        opponent: &mut dyn Agent,
    ) -> Result<ExhibitionResult> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }

        for observer in &mut self.observers {
            observer.on_start(self.config.games)?;
        }

        let (mut wins, mut draws, mut losses) = (0, 0, 0);
        for game in 0..self.config.games {
            let outcome = self.play_game(agent, opponent)?;
            match outcome {
                GameOutcome::Win(winner) if winner == self.config.agent_player => wins += 1,
                GameOutcome::Win(_) => losses += 1,
                GameOutcome::Draw => draws += 1,
            }
            for observer in &mut self.observers {
                observer.on_game_end(game, outcome)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_end()?;
        }

        let result = ExhibitionResult::new(self.config.games, wins, draws, losses);
        info!(
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            "exhibition finished"
        );
        Ok(result)
    }

    fn play_game(&self, agent: &mut dyn Agent, opponent: &mut dyn Agent) -> Result<GameOutcome> {
        let mut game = Game::new();
        while !game.is_over() {
            let state = game.current_state();
            let mover: &mut dyn Agent = if state.to_move == self.config.agent_player {
                &mut *agent
            } else {
                &mut *opponent
            };
            let mv = mover.select_move(&state)?;
            game.play(mv)?;
        }
        game.outcome.ok_or(Error::NoValidMoves)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        opponents::{OpponentAgent, OpponentKind},
        policy::Policy,
        ports::PolicyAgent,
        tictactoe::{GameState, Move},
    };

    fn config(games: usize, agent_player: Player) -> ExhibitionConfig {
        ExhibitionConfig {
            games,
            agent_player,
            seed: Some(21),
        }
    }

    #[test]
    fn test_counts_add_up() {
        let mut agent = OpponentAgent::new(OpponentKind::Random.build());
        let mut opponent = OpponentAgent::new(OpponentKind::Random.build());
        let result = Exhibition::new(config(200, Player::X))
            .run(&mut agent, &mut opponent)
            .unwrap();

        assert_eq!(result.games, 200);
        assert_eq!(result.wins + result.draws + result.losses, 200);
        assert!((result.win_rate + result.draw_rate + result.loss_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let run = || {
            let mut agent = OpponentAgent::new(OpponentKind::Defensive.build());
            let mut opponent = OpponentAgent::new(OpponentKind::Random.build());
            Exhibition::new(config(100, Player::O))
                .run(&mut agent, &mut opponent)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_minimax_never_loses() {
        let mut agent = OpponentAgent::new(OpponentKind::Minimax.build());
        let mut opponent = OpponentAgent::new(OpponentKind::Random.build());
        let result = Exhibition::new(config(100, Player::O))
            .run(&mut agent, &mut opponent)
            .unwrap();
        assert_eq!(result.losses, 0);
    }

    #[test]
    fn test_incomplete_policy_aborts() {
        let policy = Policy::from_map(HashMap::from([(GameState::new(), Move::new(4, Player::X))]));
        let mut agent = PolicyAgent::new("partial", Arc::new(policy));
        let mut opponent = OpponentAgent::new(OpponentKind::Random.build());
        let err = Exhibition::new(config(1, Player::X))
            .run(&mut agent, &mut opponent)
            .unwrap_err();
        assert!(matches!(err, Error::MissingPolicyEntry { .. }));
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let result = ExhibitionResult::new(4, 2, 1, 1);
        result.save(&path).unwrap();
        assert_eq!(ExhibitionResult::load(&path).unwrap(), result);
    }

    #[test]
    fn test_empty_exhibition_has_zero_rates() {
        let result = ExhibitionResult::new(0, 0, 0, 0);
        assert_eq!(result.win_rate, 0.0);
    }
}
