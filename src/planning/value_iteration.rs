//! Value iteration with a fixed number of synchronous sweeps

use tracing::{debug, info, instrument};

use crate::{
    Error, Result,
    config::ValueIterationConfig,
    mdp::{Mdp, greedy_action},
    policy::{Policy, ValueFunction},
};

/// Runs `V(s) ← max_a Σ p·(r + γ·V(s'))` over every state, `iterations` times.
///
/// Each sweep reads only the previous sweep's values. Terminal states keep
/// value 0.
#[derive(Debug)]
pub struct ValueIterationSolver<M: Mdp> {
    mdp: M,
    config: ValueIterationConfig,
    values: ValueFunction<M::State>,
}

impl<M: Mdp> ValueIterationSolver<M> {
    /// # Errors
    ///
    /// Fails if the configuration is out of range or the model has no states.
    pub fn new(mdp: M, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        if mdp.states().is_empty() {
            return Err(Error::EmptyStateSpace {
                player: "value iteration".to_string(),
            });
        }
        let values = ValueFunction::zeros(mdp.states());
        Ok(Self {
            mdp,
            config,
            values,
        })
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    pub fn config(&self) -> &ValueIterationConfig {
        &self.config
    }

    pub fn values(&self) -> &ValueFunction<M::State> {
        &self.values
    }

    /// Run all sweeps. The value function is only replaced once every sweep
    /// has succeeded.
    #[instrument(skip_all, fields(iterations = self.config.iterations, discount = self.config.discount))]
    pub fn run(&mut self) -> Result<()> {
        let discount = self.config.discount;
        let mut values = self.values.clone();

        for sweep in 0..self.config.iterations {
            let previous = values.clone();
            let mut max_delta: f64 = 0.0;

            for state in self.mdp.states() {
                if self.mdp.is_terminal(state) {
                    continue;
                }
                let Some((_, best)) = greedy_action(&self.mdp, &previous, state, discount)? else {
                    continue;
                };
                let old = previous.get(state).unwrap_or(0.0);
                max_delta = max_delta.max((best - old).abs());
                values.set(state.clone(), best);
            }

            debug!(sweep, max_delta, "value iteration sweep");
        }

        self.values = values;
        info!(states = self.values.len(), "value iteration finished");
        Ok(())
    }

    /// Greedy policy with respect to the current values.
    ///
    /// Ties go to the first legal action; terminal states get no entry.
    pub fn extract_policy(&self) -> Result<Policy<M::State, M::Action>> {
        let mut policy = Policy::default();
        for state in self.mdp.states() {
            if self.mdp.is_terminal(state) {
                continue;
            }
            if let Some((action, _)) =
                greedy_action(&self.mdp, &self.values, state, self.config.discount)?
            {
                policy.insert(state.clone(), action);
            }
        }
        Ok(policy)
    }

    /// Run the sweeps and return the greedy policy
    pub fn train(&mut self) -> Result<Policy<M::State, M::Action>> {
        self.run()?;
        self.extract_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mdp::{RewardConfig, TicTacToeMdp, toy::SelfLoop},
        opponents::OpponentKind,
        tictactoe::{GameState, Move, Player},
    };

    fn solved(kind: OpponentKind) -> ValueIterationSolver<TicTacToeMdp> {
        let mdp = TicTacToeMdp::for_agent(Player::X, RewardConfig::default(), kind.build()).unwrap();
        let mut solver = ValueIterationSolver::new(mdp, ValueIterationConfig::default()).unwrap();
        solver.run().unwrap();
        solver
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = ValueIterationConfig::default().with_iterations(0);
        let err = ValueIterationSolver::new(SelfLoop, config).unwrap_err();
        assert!(matches!(err, Error::ConvergenceParameter { .. }));
    }

    #[test]
    fn test_self_loop_converges_to_geometric_sum() {
        let config = ValueIterationConfig::default().with_discount(0.5);
        let mut solver = ValueIterationSolver::new(SelfLoop, config).unwrap();
        solver.run().unwrap();
        assert!((solver.values().get(&0).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(solver.values().get(&1), Some(0.0));
    }

    #[test]
    fn test_single_sweep_reads_previous_values() {
        let config = ValueIterationConfig::default()
            .with_discount(0.5)
            .with_iterations(1);
        let mut solver = ValueIterationSolver::new(SelfLoop, config).unwrap();
        solver.run().unwrap();
        assert_eq!(solver.values().get(&0), Some(1.0));
    }

    #[test]
    fn test_opening_is_corner_against_random() {
        let solver = solved(OpponentKind::Random);
        let empty = GameState::new();
        let policy = solver.extract_policy().unwrap();

        assert_eq!(policy.action(&empty), Some(&Move::new(0, Player::X)));
        let value = solver.values().get(&empty).unwrap();
        assert!((value - 7.92703).abs() < 1e-4, "V(empty) = {value}");
    }

    #[test]
    fn test_win_in_one_has_win_value() {
        let solver = solved(OpponentKind::Random);
        let state = GameState::from_string("XX.OO....").unwrap();
        let policy = solver.extract_policy().unwrap();

        assert_eq!(policy.action(&state), Some(&Move::new(2, Player::X)));
        assert!((solver.values().get(&state).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_values_stay_zero() {
        let solver = solved(OpponentKind::Random);
        let policy = solver.extract_policy().unwrap();
        for state in solver.mdp().states().iter().filter(|s| s.is_terminal()) {
            assert_eq!(solver.values().get(state), Some(0.0));
            assert!(!policy.contains(state));
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let solver = solved(OpponentKind::Defensive);
        assert_eq!(solver.extract_policy().unwrap(), solver.extract_policy().unwrap());
    }

    #[test]
    fn test_minimax_opponent_forces_a_draw() {
        let solver = solved(OpponentKind::Minimax);
        let value = solver.values().get(&GameState::new()).unwrap();
        assert!(value.abs() < 1e-9, "V(empty) = {value}");
    }
}
