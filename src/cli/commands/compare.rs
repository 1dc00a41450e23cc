//! Compare command - train all three methods on the same model and report
//! where their policies agree

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use super::solve::{Trained, state_space, train};
use crate::{
    cli::{
        config::{Method, ModelArgs, SolverArgs},
        output::{format_number, format_percent, print_kv, print_section, print_subsection},
    },
    opponents::OpponentKind,
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Train value iteration, policy iteration and Q-learning and compare their policies")]
pub struct CompareArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Write the comparison as JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Per-method line of the comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    pub method: Method,
    pub policy_entries: usize,
    pub reference_move: Option<usize>,
    pub reference_value: Option<f64>,
    pub training_seconds: f64,
}

/// Agreement between two methods' policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agreement {
    pub left: Method,
    pub right: Method,
    pub matching: usize,
    pub total: usize,
}

impl Agreement {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matching as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareSummary {
    pub player: Player,
    pub opponent: OpponentKind,
    pub methods: Vec<MethodReport>,
    pub agreements: Vec<Agreement>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let model = &args.model;
    print_section(&format!("Comparing methods for {} vs {}", model.player, model.opponent));

    let space = state_space(model.player)?;
    let reference = model.reference_state();
    print_kv("Reference state", &reference.encode());

    let mut results: Vec<Trained> = Vec::new();
    for method in [Method::Vi, Method::Pi, Method::Ql] {
        let trained = train(method, model, &args.solver, &space)?;
        print_subsection(method.name());
        print_kv("Policy entries", &format_number(trained.policy.len()));
        if let Some(mv) = trained.reference_move(&reference) {
            print_kv("Chosen move", &format!("cell {}", mv.position));
        }
        if let Some(value) = trained.reference_value {
            print_kv("Value", &format!("{value:.4}"));
        }
        print_kv("Training time", &format!("{:.2}s", trained.seconds));
        results.push(trained);
    }

    print_subsection("Policy agreement");
    let mut agreements = Vec::new();
    for (i, left) in results.iter().enumerate() {
        for right in &results[i + 1..] {
            let agreement = Agreement {
                left: left.method,
                right: right.method,
                matching: left.policy.agreement(&right.policy),
                total: left.policy.len().max(right.policy.len()),
            };
            print_kv(
                &format!("{:?} / {:?}", agreement.left, agreement.right),
                &format!(
                    "{} of {} ({})",
                    format_number(agreement.matching),
                    format_number(agreement.total),
                    format_percent(agreement.rate())
                ),
            );
            agreements.push(agreement);
        }
    }

    if let Some(path) = &args.export {
        let summary = CompareSummary {
            player: model.player,
            opponent: model.opponent,
            methods: results
                .iter()
                .map(|trained| MethodReport {
                    method: trained.method,
                    policy_entries: trained.policy.len(),
                    reference_move: trained.reference_move(&reference).map(|mv| mv.position),
                    reference_value: trained.reference_value,
                    training_seconds: trained.seconds,
                })
                .collect(),
            agreements,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("\nComparison written to {}", path.display());
    }

    Ok(())
}
