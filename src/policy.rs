//! Policies and state-value functions produced by the solvers

use std::{
    collections::{HashMap, hash_map},
    hash::Hash,
};

use crate::tictactoe::{GameState, Move};

/// Deterministic policy: the action to take in each non-terminal state.
///
/// Built fresh by a solver; callers can only read it.
#[derive(Debug, Clone)]
pub struct Policy<S = GameState, A = Move> {
    actions: HashMap<S, A>,
}

impl<S, A> Default for Policy<S, A> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<S: Eq + Hash, A> Policy<S, A> {
    pub fn from_map(actions: HashMap<S, A>) -> Self {
        Self { actions }
    }

    /// Action for `state`, if the policy covers it
    pub fn action(&self, state: &S) -> Option<&A> {
        self.actions.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.actions.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, S, A> {
        self.actions.iter()
    }

    pub(crate) fn insert(&mut self, state: S, action: A) -> Option<A> {
        self.actions.insert(state, action)
    }
}

impl<S: Eq + Hash, A: PartialEq> Policy<S, A> {
    /// Number of states both policies cover and map to the same action
    pub fn agreement(&self, other: &Self) -> usize {
        self.actions
            .iter()
            .filter(|(state, action)| other.action(state) == Some(*action))
            .count()
    }
}

impl<S: Eq + Hash, A: PartialEq> PartialEq for Policy<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions
    }
}

/// State values, defined over the whole enumerated space
#[derive(Debug, Clone)]
pub struct ValueFunction<S = GameState> {
    values: HashMap<S, f64>,
}

impl<S: Clone + Eq + Hash> ValueFunction<S> {
    /// Zero for every state in `states`
    pub fn zeros(states: &[S]) -> Self {
        Self {
            values: states.iter().map(|state| (state.clone(), 0.0)).collect(),
        }
    }

    pub fn get(&self, state: &S) -> Option<f64> {
        self.values.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, S, f64> {
        self.values.iter()
    }

    /// Largest absolute difference to `other` over this function's states.
    /// States missing from `other` count as 0 there.
    pub fn max_difference(&self, other: &Self) -> f64 {
        self.values
            .iter()
            .map(|(state, value)| (value - other.get(state).unwrap_or(0.0)).abs())
            .fold(0.0, f64::max)
    }

    /// Overwrite the value of a known state. Unknown states are ignored so
    /// the domain stays fixed.
    pub(crate) fn set(&mut self, state: S, value: f64) {
        if let Some(slot) = self.values.get_mut(&state) {
            *slot = value;
        }
    }
}

impl<S: Eq + Hash> PartialEq for ValueFunction<S> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}
