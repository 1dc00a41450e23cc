//! CLI infrastructure
//!
//! Argument definitions and command implementations for the `tictactoe-mdp`
//! binary. Commands report errors through `anyhow`.

pub mod commands;
pub mod config;
pub mod output;
