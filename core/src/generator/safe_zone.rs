use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use serde::{Deserialize, Serialize};

use super::*;

/// Uniformly random layout that never puts a mine within [`SAFE_RADIUS`] of the first reveal.
///
/// Mines are drawn without replacement from the eligible cells with a partial Fisher-Yates shuffle,
/// so the same seed and trigger always give the same layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeZoneGenerator {
    seed: u64,
}

impl SafeZoneGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Cells farther than [`SAFE_RADIUS`] from `trigger`, in row-major order.
pub fn eligible_cells(size: Coord2, trigger: Coord2) -> Vec<Coord2> {
    let (rows, cols) = size;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&coords| coords.chebyshev_distance(trigger) > SAFE_RADIUS)
        .collect()
}

impl MineGenerator for SafeZoneGenerator {
    fn generate(&mut self, config: GameConfig, trigger: Coord2) -> MineLayout {
        use rand::prelude::*;

        let mut eligible = eligible_cells(config.size, trigger);
        let available = eligible.len();
        let requested = usize::from(config.mines);
        if requested > available {
            log::warn!(
                "Not enough room for mines, requested {} but only {} cells are eligible",
                requested,
                available
            );
        }
        let placed = requested.min(available);

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..placed {
            let j = rng.random_range(i..available);
            eligible.swap(i, j);
            mine_mask[eligible[i].to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if log::log_enabled!(log::Level::Trace) {
            trace_layout(&layout);
        }
        layout
    }
}

/// Dumps the mine map next to the neighbour counts, one board row per line.
fn trace_layout(layout: &MineLayout) {
    let (rows, cols) = layout.size();
    log::trace!("Mines and counts after placement ({} mines):", layout.mine_count());
    for row in 0..rows {
        let mut line = String::with_capacity(usize::from(cols) * 2 + 5);
        for col in 0..cols {
            line.push(if layout[(row, col)] { '*' } else { '.' });
        }
        line.push_str("  |  ");
        for col in 0..cols {
            let _ = write!(line, "{}", layout.adjacent_mine_count((row, col)));
        }
        log::trace!("{}", line);
    }
}
