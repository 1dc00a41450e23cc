//! Model-based planners
//!
//! Both solvers need the full transition model and work over the enumerated
//! state space of any [`Mdp`](crate::mdp::Mdp).

pub mod policy_iteration;
pub mod value_iteration;

pub use policy_iteration::PolicyIterationSolver;
pub use value_iteration::ValueIterationSolver;
