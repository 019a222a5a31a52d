//! Error types for board setup and interaction.

use thiserror::Error;

/// Errors raised by the board, positions and layout parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinates outside the 8x8 grid
    #[error("Position ({row}, {column}) is off the board (must be 0-7)")]
    OutOfBounds { row: i32, column: i32 },

    #[error("Invalid position: {0:?}")]
    InvalidPosition(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Color must be either `w` or `b`, got {0:?}")]
    InvalidColor(char),

    #[error("Unrecognized piece {0:?}")]
    InvalidPiece(char),
}

pub type BoardResult<T> = Result<T, BoardError>;
