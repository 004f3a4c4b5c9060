use core::fmt;
use serde::{Deserialize, Serialize};

/// What the player currently sees of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Marked,
}

/// One grid position as stored by the board engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub visibility: Visibility,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.visibility, Visibility::Revealed)
    }

    pub const fn is_marked(self) -> bool {
        matches!(self.visibility, Visibility::Marked)
    }

    /// Flood reveal only spreads out of safe cells without adjacent mines.
    pub(crate) const fn expands_flood(self) -> bool {
        !self.has_mine && self.adjacent_mines == 0
    }

    /// Player-facing rendering of this cell.
    pub const fn view(self, exploded: bool) -> CellView {
        match (self.has_mine, self.visibility) {
            (true, _) if exploded => CellView::Mine,
            (_, Visibility::Hidden) => CellView::Hidden,
            (_, Visibility::Marked) => CellView::Flagged,
            (true, Visibility::Revealed) => CellView::Mine,
            (false, Visibility::Revealed) => CellView::Count(self.adjacent_mines),
        }
    }
}

/// Rendered state of a single cell, displayed as `H`, `F`, `M` or a digit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

impl CellView {
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => 'H',
            Self::Flagged => 'F',
            Self::Mine => 'M',
            Self::Count(count) => (b'0' + count) as char,
        }
    }
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.symbol())
    }
}
