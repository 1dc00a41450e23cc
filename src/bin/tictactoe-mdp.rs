//! tictactoe-mdp CLI - solve Tic-Tac-Toe as a Markov decision process
//!
//! - `solve`: train one method (value iteration, policy iteration or
//!   Q-learning) and play the resulting policy against an opponent
//! - `compare`: train all three and report where their policies agree

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tictactoe-mdp")]
#[command(version, about = "Planning and learning for Tic-Tac-Toe as an MDP", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a policy and play it against an opponent
    Solve(Box<tictactoe_mdp::cli::commands::solve::SolveArgs>),

    /// Train all methods and compare their policies
    Compare(Box<tictactoe_mdp::cli::commands::compare::CompareArgs>),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tictactoe_mdp={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve(args) => tictactoe_mdp::cli::commands::solve::execute(*args),
        Commands::Compare(args) => tictactoe_mdp::cli::commands::compare::execute(*args),
    }
}
