use ndarray::Array2;

/// Single board axis, used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts and cell totals.
pub type CellCount = u16;

/// Board position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Radius of the square around the first reveal that never receives a mine.
pub const SAFE_RADIUS: Coord = 2;

pub trait CoordExt: Sized {
    /// `ndarray` index for this position.
    fn to_nd_index(self) -> [usize; 2];

    /// Largest of the row and column distances between two positions.
    fn chebyshev_distance(self, other: Self) -> Coord;

    /// Whether the position lies inside a board of `size` rows and columns.
    fn is_within(self, size: Self) -> bool;
}

impl CoordExt for Coord2 {
    fn to_nd_index(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }

    fn chebyshev_distance(self, other: Self) -> Coord {
        self.0.abs_diff(other.0).max(self.1.abs_diff(other.1))
    }

    fn is_within(self, (rows, cols): Self) -> bool {
        self.0 < rows && self.1 < cols
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Converts a grid dimension back into board coordinates.
pub(crate) fn dim_to_size(dim: (usize, usize)) -> Coord2 {
    // grids are only ever allocated from a `Coord2`
    (dim.0 as Coord, dim.1 as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter {
        NeighborIter::new(center, dim_to_size(self.dim()))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Moves `coords` by `delta`, keeping only results that stay on the board.
fn apply_delta(coords: Coord2, (dr, dc): (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let next = (
        coords.0.checked_add_signed(dr)?,
        coords.1.checked_add_signed(dc)?,
    );
    next.is_within(bounds).then_some(next)
}

/// Iterates the up to 8 on-board neighbours of a cell, row by row.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(self.index) {
            self.index += 1;
            if let Some(next) = apply_delta(self.center, delta, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}
