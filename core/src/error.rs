use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card index out of range")]
    InvalidIndex,
    #[error("Grid size must be written as <cols>x<rows>")]
    InvalidGridSize,
    #[error("Grid has no cards")]
    EmptyGrid,
    #[error("Not enough unique symbols for this grid size")]
    NotEnoughSymbols,
    #[error("Normal cards cannot be split into pairs")]
    UnpairableLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;
