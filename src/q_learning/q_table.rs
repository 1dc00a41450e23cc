//! Q-table for tabular temporal difference learning

use std::{collections::HashMap, fmt::Debug, hash::Hash};

use crate::mdp::Outcome;

/// One state's actions with their Q-values and update counts
#[derive(Debug, Clone)]
struct Row<A> {
    values: Vec<(A, f64)>,
    visits: Vec<u64>,
}

impl<A: PartialEq> Row<A> {
    fn position(&self, action: &A) -> Option<usize> {
        self.values.iter().position(|(candidate, _)| candidate == action)
    }
}

/// Q-values keyed by state, each holding its legal actions in a fixed order.
///
/// The order is the order actions were registered in and decides greedy
/// ties: the first action with the highest value wins.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    entries: HashMap<S, Row<A>>,
    q_init: f64,
}

impl<S, A> QTable<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Debug,
{
    /// Empty table; states added later start at `q_init`
    pub fn new(q_init: f64) -> Self {
        Self {
            entries: HashMap::new(),
            q_init,
        }
    }

    /// Register `state` with its legal actions unless it is already known.
    ///
    /// Terminal states are registered with no actions.
    pub fn ensure(&mut self, state: &S, actions: &[A]) {
        if self.entries.contains_key(state) {
            return;
        }
        let row = Row {
            values: actions.iter().map(|action| (action.clone(), self.q_init)).collect(),
            visits: vec![0; actions.len()],
        };
        self.entries.insert(state.clone(), row);
    }

    pub fn get(&self, state: &S, action: &A) -> Option<f64> {
        let row = self.entries.get(state)?;
        row.position(action).map(|index| row.values[index].1)
    }

    /// How many times `(state, action)` has been updated
    pub fn visits(&self, state: &S, action: &A) -> u64 {
        self.entries
            .get(state)
            .and_then(|row| row.position(action).map(|index| row.visits[index]))
            .unwrap_or(0)
    }

    /// All `(action, q)` pairs of a state in registration order
    pub fn actions(&self, state: &S) -> Option<&[(A, f64)]> {
        self.entries.get(state).map(|row| row.values.as_slice())
    }

    /// Highest Q-value in `state`; 0 for unknown states or states without
    /// actions
    pub fn max_q(&self, state: &S) -> f64 {
        self.greedy(state).map_or(0.0, |(_, q)| q)
    }

    /// First action with the highest Q-value
    pub fn greedy_action(&self, state: &S) -> Option<A> {
        self.greedy(state).map(|(action, _)| action.clone())
    }

    fn greedy(&self, state: &S) -> Option<(&A, f64)> {
        let mut best: Option<(&A, f64)> = None;
        for (action, q) in &self.entries.get(state)?.values {
            match best {
                Some((_, best_q)) if *q <= best_q => {}
                _ => best = Some((action, *q)),
            }
        }
        best
    }

    /// Apply `Q(s,a) ← (1−α)·Q(s,a) + α·(r + γ·max Q(s',·))` and count the
    /// visit.
    ///
    /// The bootstrap term is 0 when `next_terminal` is set. The updated pair is
    /// registered at `q_init` first if it was unknown. Returns the new value.
    pub fn update(
        &mut self,
        outcome: &Outcome<S, A>,
        next_terminal: bool,
        learning_rate: f64,
        discount: f64,
    ) -> f64 {
        let max_next = if next_terminal {
            0.0
        } else {
            self.max_q(&outcome.next)
        };
        let target = outcome.reward + discount * max_next;
        let q_init = self.q_init;

        let row = self.entries.entry(outcome.source.clone()).or_insert_with(|| Row {
            values: Vec::new(),
            visits: Vec::new(),
        });
        let index = match row.position(&outcome.action) {
            Some(index) => index,
            None => {
                row.values.push((outcome.action.clone(), q_init));
                row.visits.push(0);
                row.values.len() - 1
            }
        };
        row.visits[index] += 1;
        let slot = &mut row.values[index].1;
        *slot = (1.0 - learning_rate) * *slot + learning_rate * target;
        *slot
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of state-action pairs in the table
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(|row| row.values.len()).sum()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.entries.keys()
    }
}
