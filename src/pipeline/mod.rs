//! Playing trained agents against opponents
//!
//! The exhibition harness pits any two [`Agent`](crate::ports::Agent)s
//! against each other and reports the outcome from the agent's side;
//! observers attach progress reporting without the harness knowing about it.

pub mod exhibition;
pub mod observers;

pub use exhibition::{Exhibition, ExhibitionConfig, ExhibitionResult};
pub use observers::{ProgressObserver, TracingObserver};

pub use crate::ports::{Agent, Observer};
