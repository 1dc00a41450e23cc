//! Markov decision process abstractions
//!
//! The planning solvers are written against the [`Mdp`] trait so they work on
//! any finite model; [`TicTacToeMdp`] is the model for the game itself, with
//! the opponent's replies folded into the transition distribution.

pub mod tictactoe;

use std::{fmt::Debug, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, policy::ValueFunction};

pub use crate::config::RewardConfig;
pub use tictactoe::TicTacToeMdp;

/// One unit of experience: `(s, a, r, s')`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<S, A> {
    pub source: S,
    pub action: A,
    pub reward: f64,
    pub next: S,
}

/// A possible outcome of an action together with its probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S, A> {
    pub probability: f64,
    pub outcome: Outcome<S, A>,
}

/// A finite MDP over an enumerated state space
pub trait Mdp {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Debug;

    /// Every state the solvers iterate over
    fn states(&self) -> &[Self::State];

    /// Whether `state` ends the episode. Must be free of side effects.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Legal actions in `state`, in a stable order used for tie-breaking
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Distribution over outcomes of taking `action` in `state`.
    ///
    /// # Errors
    ///
    /// Fails when `state` is terminal or `action` is not legal in it.
    fn transitions(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Vec<Transition<Self::State, Self::Action>>>;
}

/// One-step lookahead `Σ p · (r + γ · V(s'))` for taking `action` in `state`.
///
/// # Errors
///
/// Propagates transition errors, and reports successors missing from `values`.
pub fn expected_value<M: Mdp>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    state: &M::State,
    action: &M::Action,
    discount: f64,
) -> Result<f64> {
    let mut total = 0.0;
    for transition in mdp.transitions(state, action)? {
        let next = &transition.outcome.next;
        let next_value = values.get(next).ok_or_else(|| Error::StateOutsideSpace {
            state: format!("{next:?}"),
        })?;
        total += transition.probability * (transition.outcome.reward + discount * next_value);
    }
    Ok(total)
}

/// The first legal action with the highest lookahead, with its value.
///
/// Later actions only win on a strictly larger value. Returns `None` when the
/// state has no legal actions.
pub fn greedy_action<M: Mdp>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    state: &M::State,
    discount: f64,
) -> Result<Option<(M::Action, f64)>> {
    let mut best: Option<(M::Action, f64)> = None;
    for action in mdp.legal_actions(state) {
        let value = expected_value(mdp, values, state, &action, discount)?;
        match &best {
            Some((_, best_value)) if value <= *best_value => {}
            _ => best = Some((action, value)),
        }
    }
    Ok(best)
}


#[cfg(test)]
mod tests {
    use super::{toy::SelfLoop, *};

    #[test]
    fn test_expected_value_uses_current_values() {
        let mut values = ValueFunction::zeros(SelfLoop.states());
        assert_eq!(expected_value(&SelfLoop, &values, &0, &"stay", 0.5).unwrap(), 1.0);

        values.set(0, 2.0);
        assert_eq!(expected_value(&SelfLoop, &values, &0, &"stay", 0.5).unwrap(), 2.0);
    }

    #[test]
    fn test_expected_value_reports_unknown_successor() {
        let values = ValueFunction::zeros(&[1u8]);
        let err = expected_value(&SelfLoop, &values, &0, &"stay", 0.5).unwrap_err();
        assert!(matches!(err, Error::StateOutsideSpace { .. }));
    }

    #[test]
    fn test_greedy_action_none_for_terminal() {
        let values = ValueFunction::zeros(SelfLoop.states());
        assert!(greedy_action(&SelfLoop, &values, &1, 0.5).unwrap().is_none());
    }
}
