//! Ports (trait boundaries) between the solvers and the code that plays or
//! watches games.

pub mod agent;
pub mod observer;

pub use agent::{Agent, PolicyAgent};
pub use observer::Observer;
