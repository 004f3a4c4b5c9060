use crate::*;
pub use safe_zone::*;

mod safe_zone;

/// Decides where the mines go once the first reveal is known.
pub trait MineGenerator {
    /// Produces a layout of `config.size`, ideally keeping `trigger` and its surroundings clear.
    fn generate(&mut self, config: GameConfig, trigger: Coord2) -> MineLayout;
}
