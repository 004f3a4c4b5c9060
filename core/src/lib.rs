#![no_std]

extern crate alloc;

use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod types;

/// Board dimensions as `(rows, cols)` plus the requested mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Empty boards are bumped to a single row/column. The mine count is only a target, placement
    /// clamps it to the cells that are actually available.
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        Self::new_unchecked((rows, cols), mines)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Board presets offered to players.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((8, 10), 10),
            Self::Medium => GameConfig::new_unchecked((14, 18), 40),
            Self::Hard => GameConfig::new_unchecked((20, 24), 99),
        }
    }

    /// Number of flags a player may place, one per mine.
    pub const fn flag_budget(self) -> CellCount {
        self.config().mines
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

/// Where the mines are, fixed once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !coords.is_within(size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        dim_to_size(self.mine_mask.dim())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    Unmarked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Cells were uncovered and the game goes on.
    Revealed,
    /// The targeted cell held a mine.
    HitMine,
    /// Every safe cell is now revealed.
    Won,
}
