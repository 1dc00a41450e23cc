//! Observer port - hooks into an exhibition run
//!
//! Observers see each finished game without the harness knowing how the
//! information is presented (progress bars, logs, counters).

use crate::{Result, tictactoe::GameOutcome};

/// Receives exhibition events in order: `on_start`, then `on_game_end` once
/// per game, then `on_end`.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_mdp::{ports::Observer, tictactoe::GameOutcome};
///
/// struct Counter {
///     games: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_game_end(&mut self, _game: usize, _outcome: GameOutcome) -> tictactoe_mdp::Result<()> {
///         self.games += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called after game `game` (0-based) finished with `outcome`
    fn on_game_end(&mut self, _game: usize, _outcome: GameOutcome) -> Result<()> {
        Ok(())
    }

    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}
