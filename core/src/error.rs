use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile id")]
    InvalidTile,
    #[error("Deck must hold every symbol exactly twice")]
    InvalidDeck,
    #[error("Game already won, no new moves are accepted")]
    AlreadyWon,
}

pub type Result<T> = core::result::Result<T, GameError>;
