//! Policy iteration: alternate evaluation and greedy improvement until the
//! policy stops changing.

use rand::{SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use tracing::{debug, info, instrument};

use crate::{
    Error, Result,
    config::{PolicyIterationConfig, check_tolerance, resolve_seed},
    mdp::{Mdp, expected_value},
    policy::{Policy, ValueFunction},
};

#[derive(Debug)]
pub struct PolicyIterationSolver<M: Mdp> {
    mdp: M,
    config: PolicyIterationConfig,
    values: ValueFunction<M::State>,
    policy: Policy<M::State, M::Action>,
    rounds: usize,
}

impl<M: Mdp> PolicyIterationSolver<M> {
    /// Start from zero values and a uniformly random legal action per state.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is out of range or the model has no states.
    pub fn new(mdp: M, config: PolicyIterationConfig) -> Result<Self> {
        config.validate()?;
        if mdp.states().is_empty() {
            return Err(Error::EmptyStateSpace {
                player: "policy iteration".to_string(),
            });
        }

        let seed = resolve_seed(config.seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut policy = Policy::default();
        for state in mdp.states() {
            if mdp.is_terminal(state) {
                continue;
            }
            if let Some(action) = mdp.legal_actions(state).choose(&mut rng) {
                policy.insert(state.clone(), action.clone());
            }
        }
        debug!(seed, entries = policy.len(), "initial random policy");

        let values = ValueFunction::zeros(mdp.states());
        Ok(Self {
            mdp,
            config,
            values,
            policy,
            rounds: 0,
        })
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    pub fn values(&self) -> &ValueFunction<M::State> {
        &self.values
    }

    pub fn policy(&self) -> &Policy<M::State, M::Action> {
        &self.policy
    }

    /// Evaluation/improvement rounds completed by [`train`](Self::train)
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Evaluate the current policy in place, one state at a time.
    ///
    /// Each state is recomputed until its own value moves by at most
    /// `tolerance`, then evaluation moves to the next state in space order.
    /// Returns the total number of recomputations.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive tolerance; propagates model errors, in which
    /// case the previous values are kept.
    pub fn evaluate_policy(&mut self, tolerance: f64) -> Result<usize> {
        check_tolerance(tolerance)?;
        let discount = self.config.discount;
        let mut values = self.values.clone();
        let mut updates = 0;

        for state in self.mdp.states() {
            if self.mdp.is_terminal(state) {
                continue;
            }
            let Some(action) = self.policy.action(state) else {
                continue;
            };
            loop {
                let updated = expected_value(&self.mdp, &values, state, action, discount)?;
                let old = values.get(state).unwrap_or(0.0);
                values.set(state.clone(), updated);
                updates += 1;
                if (updated - old).abs() <= tolerance {
                    break;
                }
            }
        }

        self.values = values;
        debug!(updates, "policy evaluated");
        Ok(updates)
    }

    /// Make the policy greedy with respect to the current values.
    ///
    /// The incumbent action is replaced only by a strictly better one, so ties
    /// never cause churn. Returns whether any state changed.
    pub fn improve_policy(&mut self) -> Result<bool> {
        let discount = self.config.discount;
        let mut policy = self.policy.clone();
        let mut changed = 0usize;

        for state in self.mdp.states() {
            if self.mdp.is_terminal(state) {
                continue;
            }
            let actions = self.mdp.legal_actions(state);
            let Some(first) = actions.first() else {
                continue;
            };
            let incumbent = policy.action(state).unwrap_or(first).clone();
            let mut best_value = expected_value(&self.mdp, &self.values, state, &incumbent, discount)?;
            let mut best_action = incumbent.clone();

            for action in actions {
                if action == incumbent {
                    continue;
                }
                let value = expected_value(&self.mdp, &self.values, state, &action, discount)?;
                if value > best_value {
                    best_value = value;
                    best_action = action;
                }
            }

            if policy.action(state) != Some(&best_action) {
                policy.insert(state.clone(), best_action);
                changed += 1;
            }
        }

        self.policy = policy;
        debug!(changed, "policy improved");
        Ok(changed > 0)
    }

    /// Alternate evaluation and improvement until the policy is stable
    #[instrument(skip_all, fields(discount = self.config.discount, tolerance = self.config.tolerance))]
    pub fn train(&mut self) -> Result<Policy<M::State, M::Action>> {
        loop {
            self.evaluate_policy(self.config.tolerance)?;
            self.rounds += 1;
            if !self.improve_policy()? {
                break;
            }
        }
        info!(rounds = self.rounds, "policy iteration converged");
        Ok(self.policy.clone())
    }
}
