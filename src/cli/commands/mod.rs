//! Subcommands of the `tictactoe-mdp` binary

pub mod compare;
pub mod solve;
