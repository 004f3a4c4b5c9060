use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Snapshot of the board counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStatus {
    pub done: bool,
    pub exploded: bool,
    pub rows: Coord,
    pub cols: Coord,
    pub marked_count: CellCount,
    pub revealed_count: CellCount,
    pub mines_placed: CellCount,
}

/// The rules engine for a single game.
///
/// Mines are placed on the first reveal, so the opening move is always safe. Every operation
/// checks its preconditions before touching any cell: a rejected move leaves the board unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board<G = SafeZoneGenerator> {
    config: GameConfig,
    cells: Array2<Cell>,
    generator: G,
    mines_placed: Option<CellCount>,
    marked_count: CellCount,
    revealed_count: CellCount,
    exploded: bool,
}

impl Board {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_generator(config, SafeZoneGenerator::new(seed))
    }
}

impl<G: MineGenerator> Board<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Self {
        Self {
            config,
            cells: Array2::default(config.size.to_nd_index()),
            generator,
            mines_placed: None,
            marked_count: 0,
            revealed_count: 0,
            exploded: false,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn mines_requested(&self) -> CellCount {
        self.config.mines
    }

    /// Zero until the first reveal places the mines.
    pub fn mines_placed(&self) -> CellCount {
        self.mines_placed.unwrap_or(0)
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn has_started(&self) -> bool {
        self.mines_placed.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.exploded || self.revealed_count == self.config.total_cells() - self.mines_placed()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.is_within(self.config.size) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(|cell| cell.has_mine)
    }

    pub fn adjacent_mine_count_at(&self, coords: Coord2) -> Option<u8> {
        self.cell_at(coords).map(|cell| cell.adjacent_mines)
    }

    /// Primary action: uncover a hidden cell. Returns whether the move was accepted.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        match self.try_reveal(coords) {
            Ok(outcome) => {
                log::trace!("reveal {:?}: {:?}", coords, outcome);
                true
            }
            Err(err) => {
                log::debug!("reveal {:?} rejected: {}", coords, err);
                false
            }
        }
    }

    pub fn try_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.mines_placed.is_none() {
            self.place_mines(coords);
        }

        if !self.cells[coords.to_nd_index()].is_hidden() {
            return Err(GameError::NotHidden);
        }

        self.flood_reveal(coords);

        Ok(if self.cells[coords.to_nd_index()].has_mine {
            self.exploded = true;
            RevealOutcome::HitMine
        } else if self.is_done() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    /// Secondary action: flip a cell between hidden and marked. Returns whether the move was
    /// accepted. There is no limit on the number of marks.
    pub fn toggle_mark(&mut self, coords: Coord2) -> bool {
        match self.try_toggle_mark(coords) {
            Ok(outcome) => {
                log::trace!("toggle mark {:?}: {:?}", coords, outcome);
                true
            }
            Err(err) => {
                log::debug!("toggle mark {:?} rejected: {}", coords, err);
                false
            }
        }
    }

    pub fn try_toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use Visibility::*;

        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        match cell.visibility {
            Hidden => {
                cell.visibility = Marked;
                self.marked_count += 1;
                Ok(MarkOutcome::Marked)
            }
            Marked => {
                cell.visibility = Hidden;
                self.marked_count -= 1;
                Ok(MarkOutcome::Unmarked)
            }
            Revealed => Err(GameError::AlreadyRevealed),
        }
    }

    /// What the player sees, one [`CellView`] per cell.
    pub fn render(&self) -> Array2<CellView> {
        self.cells.map(|cell| cell.view(self.exploded))
    }

    /// Rendering as one string of symbols per row.
    pub fn render_rows(&self) -> Vec<String> {
        let cols = usize::from(self.config.cols());
        self.render()
            .rows()
            .into_iter()
            .map(|row| {
                let line: String = row.iter().map(|view| view.symbol()).collect();
                debug_assert_eq!(line.len(), cols, "rendered row does not match column count");
                line
            })
            .collect()
    }

    pub fn status(&self) -> BoardStatus {
        BoardStatus {
            done: self.is_done(),
            exploded: self.exploded,
            rows: self.config.rows(),
            cols: self.config.cols(),
            marked_count: self.marked_count,
            revealed_count: self.revealed_count,
            mines_placed: self.mines_placed(),
        }
    }

    /// Runs once, on the first reveal: lays out the mines around `trigger`, drops every mark and
    /// fixes the neighbour counts for the rest of the game.
    fn place_mines(&mut self, trigger: Coord2) {
        let layout = self.generator.generate(self.config, trigger);
        debug_assert_eq!(layout.size(), self.config.size, "generated layout has the wrong size");

        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            cell.has_mine = layout.contains_mine(coords);
            cell.adjacent_mines = layout.adjacent_mine_count(coords);
            if cell.is_marked() {
                cell.visibility = Visibility::Hidden;
            }
        }
        if self.marked_count > 0 {
            log::debug!("cleared {} marks placed before the first reveal", self.marked_count);
        }
        self.marked_count = 0;
        self.mines_placed = Some(layout.mine_count());
        log::debug!(
            "placed {} of {} requested mines around {:?}",
            layout.mine_count(),
            self.config.mines,
            trigger
        );
    }

    /// Reveals `start` and spreads through neighbours of empty safe cells. Each cell is revealed at
    /// most once, the hidden check doubling as the visited set.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if !cell.is_hidden() {
                continue;
            }

            cell.visibility = Visibility::Revealed;
            self.revealed_count += 1;

            if cell.expands_flood() {
                to_visit.extend(
                    self.cells
                        .iter_neighbors(coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_hidden()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out a fixed layout regardless of where the first reveal lands.
    struct FixedLayout(MineLayout);

    impl MineGenerator for FixedLayout {
        fn generate(&mut self, _config: GameConfig, _trigger: Coord2) -> MineLayout {
            self.0.clone()
        }
    }

    fn board(size: Coord2, mines: &[Coord2]) -> Board<FixedLayout> {
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let config = GameConfig::new(size, layout.mine_count());
        Board::with_generator(config, FixedLayout(layout))
    }

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(GameConfig::new((4, 5), 3), 0);

        assert_eq!(
            board.status(),
            BoardStatus {
                done: false,
                exploded: false,
                rows: 4,
                cols: 5,
                marked_count: 0,
                revealed_count: 0,
                mines_placed: 0,
            }
        );
        assert_eq!(board.mines_requested(), 3);
        assert!(board.render().iter().all(|&view| view == CellView::Hidden));
    }

    #[test]
    fn reveal_out_of_bounds_is_rejected_without_placing_mines() {
        let mut board = Board::new(GameConfig::new((3, 3), 1), 0);

        assert_eq!(board.try_reveal((3, 0)), Err(GameError::InvalidCoords));
        assert!(!board.reveal((0, 3)));
        assert!(!board.has_started());
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        // row 0: . . . 1 *
        // row 1: . . . 1 1
        // row 2: . . . . .
        let mut board = board((3, 5), &[(0, 4)]);

        assert_eq!(board.try_reveal((2, 0)), Ok(RevealOutcome::Won));
        assert_eq!(board.revealed_count(), 14);
        assert_eq!(board.cell_at((0, 4)).unwrap().visibility, Visibility::Hidden);
        assert_eq!(
            board.render_rows(),
            ["0001H", "00011", "00000"].map(String::from)
        );
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.try_reveal((1, 1)), Ok(RevealOutcome::Revealed));
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.render_rows(), ["HHH", "H1H", "HHH"].map(String::from));
    }

    #[test]
    fn hitting_a_mine_explodes_and_shows_all_mines() {
        let mut board = board((2, 3), &[(0, 0), (1, 2)]);

        assert_eq!(board.try_reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert_eq!(board.revealed_count(), 1);
        assert!(board.status().exploded);
        assert!(board.status().done);
        assert_eq!(board.render_rows(), ["MHH", "HHM"].map(String::from));
    }

    #[test]
    fn revealed_mine_with_no_mined_neighbors_does_not_flood() {
        let mut board = board((3, 3), &[(1, 1)]);

        assert_eq!(board.adjacent_mine_count_at((1, 1)), Some(0));
        assert_eq!(board.try_reveal((1, 1)), Ok(RevealOutcome::HitMine));
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn revealing_twice_is_rejected() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert!(board.reveal((2, 2)));
        let before = board.status();
        assert_eq!(board.try_reveal((2, 2)), Err(GameError::NotHidden));
        assert!(!board.reveal((2, 2)));
        assert_eq!(board.status(), before);
    }

    #[test]
    fn marked_cells_cannot_be_revealed() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((2, 2));

        assert!(board.toggle_mark((0, 0)));
        assert_eq!(board.try_reveal((0, 0)), Err(GameError::NotHidden));
        assert_eq!(board.marked_count(), 1);
        assert!(!board.exploded());
    }

    #[test]
    fn marks_toggle_and_count() {
        let mut board = board((2, 2), &[]);

        assert_eq!(board.try_toggle_mark((0, 1)), Ok(MarkOutcome::Marked));
        assert_eq!(board.try_toggle_mark((1, 1)), Ok(MarkOutcome::Marked));
        assert_eq!(board.marked_count(), 2);
        assert_eq!(board.render_rows(), ["HF", "HF"].map(String::from));

        assert_eq!(board.try_toggle_mark((0, 1)), Ok(MarkOutcome::Unmarked));
        assert_eq!(board.marked_count(), 1);
        assert_eq!(board.try_toggle_mark((2, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn revealed_cells_cannot_be_marked() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((1, 1));

        assert_eq!(board.try_toggle_mark((1, 1)), Err(GameError::AlreadyRevealed));
        assert!(!board.toggle_mark((1, 1)));
        assert_eq!(board.marked_count(), 0);
    }

    #[test]
    fn first_reveal_clears_earlier_marks() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.toggle_mark((0, 0));
        board.toggle_mark((2, 2));

        assert!(board.reveal((2, 2)));
        assert_eq!(board.marked_count(), 0);
        assert_eq!(board.cell_at((0, 0)).unwrap().visibility, Visibility::Hidden);
        assert_eq!(board.cell_at((2, 2)).unwrap().visibility, Visibility::Revealed);
    }

    #[test]
    fn mines_are_placed_only_once() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.reveal((1, 1));
        board.generator.0 = MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap();

        board.reveal((2, 2));
        assert!(board.has_mine_at((0, 0)));
        assert!(!board.has_mine_at((2, 2)));
    }

    #[test]
    fn done_is_sticky_after_a_win() {
        let mut board = board((1, 3), &[(0, 0)]);

        assert_eq!(board.try_reveal((0, 2)), Ok(RevealOutcome::Won));
        assert!(board.is_done());

        assert!(board.toggle_mark((0, 0)));
        assert!(board.is_done());
        assert_eq!(board.try_reveal((0, 0)), Err(GameError::NotHidden));
        board.toggle_mark((0, 0));
        assert_eq!(board.try_reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert!(board.is_done());
    }

    #[test]
    fn status_serializes_to_json() {
        let mut board = Board::new(GameConfig::new((3, 3), 0), 9);
        board.reveal((1, 1));

        let json = serde_json::to_value(board.status()).unwrap();
        assert_eq!(json["done"], true);
        assert_eq!(json["revealed_count"], 9);
        assert_eq!(json["mines_placed"], 0);
    }
}
