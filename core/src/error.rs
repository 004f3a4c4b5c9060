use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is not hidden")]
    NotHidden,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("No flags left to place")]
    NoFlagsLeft,
    #[error("Unknown difficulty")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
