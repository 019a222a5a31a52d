//! Board behaviour switches.
//!
//! The defaults reproduce the classic behaviour of the board: an illegal
//! target leaves the selection in place, and white pawns advance toward row 0.

use clap::ValueEnum;

use crate::types::Color;

/// What a click on a square that is not a legal destination does while a
/// piece is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IllegalClickPolicy {
    /// Nothing happens; the same square stays selected.
    #[default]
    Stay,
    /// The selection is dropped.
    Deselect,
}

/// Which way white pawns walk. Black pawns always walk the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Advance {
    #[default]
    TowardRowZero,
    TowardRowSeven,
}

impl Advance {
    /// Row delta of a single pawn step for `color`.
    pub fn direction(&self, color: Color) -> i32 {
        let white = match self {
            Advance::TowardRowZero => -1,
            Advance::TowardRowSeven => 1,
        };
        match color {
            Color::White => white,
            Color::Black => -white,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardConfig {
    pub illegal_click: IllegalClickPolicy,
    pub white_advance: Advance,
}

impl BoardConfig {
    pub fn new(illegal_click: IllegalClickPolicy, white_advance: Advance) -> Self {
        Self {
            illegal_click,
            white_advance,
        }
    }
}
