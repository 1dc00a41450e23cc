//! Observer implementations for exhibition runs

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::{
    Result,
    ports::Observer,
    tictactoe::{GameOutcome, Player},
};

/// Progress bar with a running win/draw/loss tally for one side
pub struct ProgressObserver {
    agent: Player,
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    pub fn new(agent: Player) -> Self {
        Self {
            agent,
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn tally(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Observer for ProgressObserver {
    fn on_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game: usize, outcome: GameOutcome) -> Result<()> {
        match outcome {
            GameOutcome::Win(winner) if winner == self.agent => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game as u64 + 1);
            pb.set_message(self.tally());
        }
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.tally());
        }
        Ok(())
    }
}

/// Emits a debug event for every finished game
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_game_end(&mut self, game: usize, outcome: GameOutcome) -> Result<()> {
        debug!(game, ?outcome, "exhibition game finished");
        Ok(())
    }
}
