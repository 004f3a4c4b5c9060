use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Where the player stands in the current game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    Playing,
    Won,
    Lost,
}

impl PlayState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Owns the board of the current game and everything around it that is not a rule of the game
/// itself: the chosen difficulty, the flag budget and the clock.
///
/// A new board is built for every restart or difficulty change, seeded from the session's own rng.
#[derive(Debug)]
pub struct Session {
    difficulty: Difficulty,
    board: Board,
    rng: SmallRng,
    started_at: Instant,
    ended_at: Option<Instant>,
}

impl Session {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::new(difficulty.config(), rng.random());
        Self {
            difficulty,
            board,
            rng,
            started_at: Instant::now(),
            ended_at: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Throws the current game away and starts a fresh one with the same difficulty.
    pub fn restart(&mut self) {
        self.board = Board::new(self.difficulty.config(), self.rng.random());
        self.started_at = Instant::now();
        self.ended_at = None;
        log::debug!("new {} game", self.difficulty);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.restart();
    }

    pub fn play_state(&self) -> PlayState {
        let status = self.board.status();
        match (status.done, status.exploded) {
            (false, _) => PlayState::Playing,
            (true, false) => PlayState::Won,
            (true, true) => PlayState::Lost,
        }
    }

    /// Flags the player may still place. Marks dropped by mine placement come back to the budget.
    pub fn flags_remaining(&self) -> CellCount {
        self.difficulty
            .flag_budget()
            .saturating_sub(self.board.marked_count())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_playing()?;
        let outcome = self.board.try_reveal(coords)?;
        if self.play_state().is_finished() {
            self.ended_at = Some(Instant::now());
            log::debug!("{} game finished: {:?}", self.difficulty, self.play_state());
        }
        Ok(outcome)
    }

    /// Toggles a mark, refusing to place a new one once the flag budget is spent.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_playing()?;
        let coords = self.board.validate_coords(coords)?;
        let placing = self.board.cell_at(coords).is_some_and(Cell::is_hidden);
        if placing && self.flags_remaining() == 0 {
            return Err(GameError::NoFlagsLeft);
        }
        self.board.try_toggle_mark(coords)
    }

    /// Time spent on the current game, frozen once it is finished.
    pub fn elapsed(&self) -> Duration {
        self.ended_at
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.started_at)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    fn check_playing(&self) -> Result<()> {
        if self.play_state().is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }
}
