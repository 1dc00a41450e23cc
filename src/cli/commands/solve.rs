//! Solve command - train one method, then play it against an opponent

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    cli::{
        config::{Method, ModelArgs, SolverArgs},
        output::{format_number, format_percent, print_kv, print_section, print_subsection},
    },
    config::{PolicyIterationConfig, QLearningConfig, RewardConfig, ValueIterationConfig},
    mdp::TicTacToeMdp,
    opponents::{OpponentAgent, OpponentKind},
    pipeline::{Exhibition, ExhibitionConfig, ExhibitionResult, ProgressObserver, TracingObserver},
    planning::{PolicyIterationSolver, ValueIterationSolver},
    policy::Policy,
    ports::PolicyAgent,
    q_learning::QLearningSolver,
    tictactoe::{GameState, Move, Player, StateSpace},
};

#[derive(Parser, Debug)]
#[command(about = "Train a policy and play it against an opponent")]
pub struct SolveArgs {
    /// Solution method
    #[arg(long, short = 'm', value_enum, default_value = "vi")]
    pub method: Method,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Exhibition games played after training (0 to skip)
    #[arg(long, default_value_t = 1000)]
    pub games: usize,

    /// Opponent for the exhibition (defaults to the training opponent)
    #[arg(long)]
    pub exhibition_opponent: Option<OpponentKind>,

    /// Write a JSON summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// A trained policy with what is known about its reference state
pub struct Trained {
    pub method: Method,
    pub policy: Policy,
    /// V(s) for the planners, max Q(s, ·) for Q-learning
    pub reference_value: Option<f64>,
    pub seconds: f64,
}

impl Trained {
    pub fn reference_move(&self, state: &GameState) -> Option<Move> {
        self.policy.action(state).copied()
    }
}

/// Hyper-parameters actually used by the method, for the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MethodConfig {
    ValueIteration(ValueIterationConfig),
    PolicyIteration(PolicyIterationConfig),
    QLearning(QLearningConfig),
}

/// Everything `solve --summary` writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    pub player: Player,
    pub opponent: OpponentKind,
    pub rewards: RewardConfig,
    pub config: MethodConfig,
    pub states: usize,
    pub policy_entries: usize,
    pub reference_state: String,
    pub reference_move: Option<usize>,
    pub reference_value: Option<f64>,
    pub training_seconds: f64,
    pub exhibition_opponent: OpponentKind,
    pub exhibition: Option<ExhibitionResult>,
}

/// Enumerate the agent's state space once
pub fn state_space(player: Player) -> Result<Arc<StateSpace>> {
    let space = StateSpace::enumerate(player)
        .with_context(|| format!("failed to enumerate states for {player}"))?;
    info!(
        player = %player,
        states = space.len(),
        terminal = space.terminal_count(),
        "state space enumerated"
    );
    Ok(Arc::new(space))
}

/// Train `method` for the model described by `model` and `solver`
pub fn train(
    method: Method,
    model: &ModelArgs,
    solver: &SolverArgs,
    space: &Arc<StateSpace>,
) -> Result<Trained> {
    let start = Instant::now();
    let reference = model.reference_state();
    let opponent = model.opponent.build();

    let (policy, reference_value) = match method {
        Method::Vi => {
            let mdp = TicTacToeMdp::new(model.player, model.rewards(), opponent, Arc::clone(space))?;
            let mut vi = ValueIterationSolver::new(mdp, solver.value_iteration())?;
            let policy = vi.train().context("value iteration failed")?;
            (policy, vi.values().get(&reference))
        }
        Method::Pi => {
            let mdp = TicTacToeMdp::new(model.player, model.rewards(), opponent, Arc::clone(space))?;
            let mut pi = PolicyIterationSolver::new(mdp, solver.policy_iteration())?;
            let policy = pi.train().context("policy iteration failed")?;
            info!(rounds = pi.rounds(), "policy iteration rounds");
            (policy, pi.values().get(&reference))
        }
        Method::Ql => {
            let mut ql = QLearningSolver::for_game(
                model.player,
                model.rewards(),
                opponent,
                Arc::clone(space),
                solver.q_learning(),
            )?;
            let policy = ql.train().context("q-learning failed")?;
            let value = ql
                .table()
                .actions(&reference)
                .map(|_| ql.table().max_q(&reference));
            (policy, value)
        }
    };

    Ok(Trained {
        method,
        policy,
        reference_value,
        seconds: start.elapsed().as_secs_f64(),
    })
}

fn method_config(method: Method, solver: &SolverArgs) -> MethodConfig {
    match method {
        Method::Vi => MethodConfig::ValueIteration(solver.value_iteration()),
        Method::Pi => MethodConfig::PolicyIteration(solver.policy_iteration()),
        Method::Ql => MethodConfig::QLearning(solver.q_learning()),
    }
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let model = &args.model;
    print_section(&format!("{} for {} vs {}", args.method.name(), model.player, model.opponent));

    let space = state_space(model.player)?;
    print_kv("States", &format_number(space.len()));
    print_kv("Terminal states", &format_number(space.terminal_count()));

    let trained = train(args.method, model, &args.solver, &space)?;
    print_kv("Policy entries", &format_number(trained.policy.len()));
    print_kv("Training time", &format!("{:.2}s", trained.seconds));

    let reference = model.reference_state();
    print_subsection("Reference state");
    print_kv("State", &reference.encode());
    let reference_move = trained.reference_move(&reference);
    if let Some(mv) = reference_move {
        print_kv("Chosen move", &format!("{} (cell {})", mv, mv.position));
    }
    if let Some(value) = trained.reference_value {
        print_kv("Value", &format!("{value:.4}"));
    }

    let exhibition_opponent = args.exhibition_opponent.unwrap_or(model.opponent);
    let exhibition = if args.games > 0 {
        Some(run_exhibition(&args, &trained, exhibition_opponent)?)
    } else {
        None
    };

    if let Some(path) = &args.summary {
        let summary = SolveSummary {
            player: model.player,
            opponent: model.opponent,
            rewards: model.rewards(),
            config: method_config(args.method, &args.solver),
            states: space.len(),
            policy_entries: trained.policy.len(),
            reference_state: reference.encode(),
            reference_move: reference_move.map(|mv| mv.position),
            reference_value: trained.reference_value,
            training_seconds: trained.seconds,
            exhibition_opponent,
            exhibition,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

fn run_exhibition(
    args: &SolveArgs,
    trained: &Trained,
    opponent: OpponentKind,
) -> Result<ExhibitionResult> {
    print_subsection(&format!(
        "Exhibition: {} games vs {}",
        format_number(args.games),
        opponent
    ));

    let config = ExhibitionConfig {
        games: args.games,
        agent_player: args.model.player,
        seed: args.solver.seed.map(|seed| seed.wrapping_add(2)),
    };
    let mut exhibition = Exhibition::new(config).with_observer(Box::new(TracingObserver));
    if !args.no_progress {
        exhibition = exhibition.with_observer(Box::new(ProgressObserver::new(args.model.player)));
    }

    let mut agent = PolicyAgent::new(trained.method.name(), Arc::new(trained.policy.clone()));
    let mut opponent = OpponentAgent::new(opponent.build());
    let result = exhibition.run(&mut agent, &mut opponent)?;

    print_kv("Wins", &format!("{} ({})", result.wins, format_percent(result.win_rate)));
    print_kv("Draws", &format!("{} ({})", result.draws, format_percent(result.draw_rate)));
    print_kv("Losses", &format!("{} ({})", result.losses, format_percent(result.loss_rate)));
    Ok(result)
}
