//! ε-greedy Q-learning over an [`Environment`]

use std::sync::Arc;

use rand::{Rng, SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use tracing::{debug, info, instrument};

use super::{
    environment::{Environment, TicTacToeEnv},
    q_table::QTable,
};
use crate::{
    Error, Result,
    config::{QLearningConfig, RewardConfig, resolve_seed},
    opponents::Opponent,
    policy::Policy,
    tictactoe::{Player, StateSpace},
};

/// Episodes between progress log lines
const LOG_INTERVAL: usize = 10_000;

/// Off-policy TD control: learns Q* while acting ε-greedily
#[derive(Debug)]
pub struct QLearningSolver<E: Environment> {
    env: E,
    config: QLearningConfig,
    table: QTable<E::State, E::Action>,
    epsilon: f64,
    rng: StdRng,
    episodes_run: usize,
}

impl<E: Environment> QLearningSolver<E> {
    /// Build a solver whose table covers every legal pair of `states` at
    /// `q_init`. The exploration RNG is seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is out of range or `states` is empty.
    pub fn new(env: E, states: &[E::State], config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        if states.is_empty() {
            return Err(Error::EmptyStateSpace {
                player: "q-learning".to_string(),
            });
        }

        let mut table = QTable::new(config.q_init);
        for state in states {
            let actions = if env.is_terminal_state(state) {
                Vec::new()
            } else {
                env.legal_actions(state)
            };
            table.ensure(state, &actions);
        }

        Ok(Self {
            env,
            config,
            table,
            epsilon: config.epsilon,
            rng: StdRng::seed_from_u64(resolve_seed(config.seed)),
            episodes_run: 0,
        })
    }

    pub fn table(&self) -> &QTable<E::State, E::Action> {
        &self.table
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Play the configured number of episodes and return the greedy policy
    #[instrument(skip_all, fields(
        episodes = self.config.episodes,
        learning_rate = self.config.learning_rate,
        learning_rate_decay = self.config.learning_rate_decay,
        epsilon = self.config.epsilon
    ))]
    pub fn train(&mut self) -> Result<Policy<E::State, E::Action>> {
        let mut total_return = 0.0;
        for episode in 1..=self.config.episodes {
            total_return += self.run_episode()?;
            if episode % LOG_INTERVAL == 0 {
                debug!(
                    episode,
                    epsilon = self.epsilon,
                    mean_return = total_return / LOG_INTERVAL as f64,
                    "q-learning progress"
                );
                total_return = 0.0;
            }
        }
        info!(
            episodes = self.episodes_run,
            states = self.table.len(),
            pairs = self.table.pair_count(),
            "q-learning finished"
        );
        self.extract_policy()
    }

    /// Play one episode from reset to a terminal state, updating the table
    /// after every step. Returns the undiscounted return.
    pub fn run_episode(&mut self) -> Result<f64> {
        self.env.reset()?;
        let mut episode_return = 0.0;

        while !self.env.is_terminal() {
            let state = self.env.current_state();
            let actions = self.env.legal_actions(&state);
            if actions.is_empty() {
                break;
            }
            self.table.ensure(&state, &actions);

            let action = self.choose_action(&state, &actions)?;
            let outcome = self.env.execute_move(&action)?;

            let next_terminal = self.env.is_terminal_state(&outcome.next);
            let next_actions = if next_terminal {
                Vec::new()
            } else {
                self.env.legal_actions(&outcome.next)
            };
            self.table.ensure(&outcome.next, &next_actions);
            let visits = self.table.visits(&outcome.source, &outcome.action) + 1;
            self.table.update(
                &outcome,
                next_terminal,
                self.config.step_size(visits),
                self.config.discount,
            );
            episode_return += outcome.reward;
        }

        self.episodes_run += 1;
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        Ok(episode_return)
    }

    fn choose_action(&mut self, state: &E::State, actions: &[E::Action]) -> Result<E::Action> {
        let explore = self.rng.random::<f64>() < self.epsilon;
        let chosen = if explore {
            actions.choose(&mut self.rng).cloned()
        } else {
            self.table
                .greedy_action(state)
                .or_else(|| actions.first().cloned())
        };
        chosen.ok_or(Error::NoValidMoves)
    }

    /// Greedy action for every non-terminal state in the table
    pub fn extract_policy(&self) -> Result<Policy<E::State, E::Action>> {
        let mut policy = Policy::default();
        for state in self.table.states() {
            if self.env.is_terminal_state(state) {
                continue;
            }
            if let Some(action) = self.table.greedy_action(state) {
                policy.insert(state.clone(), action);
            }
        }
        Ok(policy)
    }
}

impl QLearningSolver<TicTacToeEnv> {
    /// Q-learning for `agent` against `opponent` over a shared state space.
    ///
    /// The environment's RNG is seeded one past the solver's seed so
    /// exploration and opponent replies draw from separate streams.
    pub fn for_game(
        agent: Player,
        rewards: RewardConfig,
        opponent: Arc<dyn Opponent>,
        space: Arc<StateSpace>,
        config: QLearningConfig,
    ) -> Result<Self> {
        let seed = resolve_seed(config.seed);
        let env = TicTacToeEnv::new(agent, rewards, opponent, seed.wrapping_add(1))?;
        let config = QLearningConfig {
            seed: Some(seed),
            ..config
        };
        Self::new(env, space.states(), config)
    }
}
