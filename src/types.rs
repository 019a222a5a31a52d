use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, BoardResult};

pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Uppercase letters are white, lowercase are black.
    pub fn from_case(c: char) -> BoardResult<Color> {
        if c.is_uppercase() {
            Ok(Color::White)
        } else if c.is_lowercase() {
            Ok(Color::Black)
        } else {
            Err(BoardError::InvalidColor(c))
        }
    }

    pub fn other_color(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// The kinds of piece the board knows how to move.
///
/// Adding a kind means adding an arm to `movegen::legal_destinations`;
/// until then it has no destinations.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
}

impl PieceType {
    pub fn from_char(c: char) -> BoardResult<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'r' => Ok(PieceType::Rook),
            _ => Err(BoardError::InvalidPiece(c)),
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
        }
    }
}

/// A square coordinate. Row and column are both in `0..8`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub column: u8,
}

impl Position {
    pub fn new(row: i32, column: i32) -> BoardResult<Position> {
        Self::checked(row, column).ok_or(BoardError::OutOfBounds { row, column })
    }

    /// Like `new`, but off-board coordinates are simply absent.
    pub fn checked(row: i32, column: i32) -> Option<Position> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&column) {
            Some(Position {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// The square `(row_delta, column_delta)` away, if it is on the board.
    pub fn offset(&self, row_delta: i32, column_delta: i32) -> Option<Position> {
        Self::checked(self.row as i32 + row_delta, self.column as i32 + column_delta)
    }

    /// Row-major index into the 64 squares.
    pub fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.column as usize
    }

    /// Accepts `a1`..`h8`: file `a` is column 0, rank `1` is row 0.
    pub fn from_algebraic(s: &str) -> BoardResult<Position> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => Ok(Position {
                row: rank as u8 - b'1',
                column: file as u8 - b'a',
            }),
            _ => Err(BoardError::InvalidPosition(s.to_string())),
        }
    }

    pub fn to_algebraic(&self) -> String {
        format!(
            "{}{}",
            (self.column + b'a') as char,
            (self.row + b'1') as char
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Parses either `row,column` or algebraic notation.
impl FromStr for Position {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Position> {
        let s = s.trim();
        match s.split_once(',') {
            Some((row, column)) => {
                let parse = |part: &str| {
                    part.trim()
                        .parse::<i32>()
                        .map_err(|_| BoardError::InvalidPosition(s.to_string()))
                };
                Position::new(parse(row)?, parse(column)?)
            }
            None => Position::from_algebraic(s),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
    pub position: Position,
}

impl Piece {
    pub fn new(color: Color, piece_type: PieceType, position: Position) -> Piece {
        Piece {
            color,
            piece_type,
            position,
        }
    }

    pub fn pawn(color: Color, row: u8, column: u8) -> Piece {
        Piece::new(color, PieceType::Pawn, Position { row, column })
    }

    pub fn rook(color: Color, row: u8, column: u8) -> Piece {
        Piece::new(color, PieceType::Rook, Position { row, column })
    }

    /// Builds a piece from a layout char: uppercase is white, lowercase black.
    pub fn from_char(c: char, position: Position) -> BoardResult<Piece> {
        let piece_type = PieceType::from_char(c)?;
        Ok(Piece {
            color: Color::from_case(c)?,
            piece_type,
            position,
        })
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.piece_type, self.color) {
            (PieceType::Pawn, Color::White) => "♙",
            (PieceType::Pawn, Color::Black) => "♟",
            (PieceType::Rook, Color::White) => "♖",
            (PieceType::Rook, Color::Black) => "♜",
        }
    }

    /// Numeric HTML entity for the glyph, for rendering into a page.
    pub fn to_html_entity(&self) -> &str {
        match (self.piece_type, self.color) {
            (PieceType::Pawn, Color::White) => "&#9817;",
            (PieceType::Pawn, Color::Black) => "&#9823;",
            (PieceType::Rook, Color::White) => "&#9814;",
            (PieceType::Rook, Color::Black) => "&#9820;",
        }
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }
}

/// A move that has been applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// The piece as it stood before moving
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(piece: Piece, to: Position, captured: Option<Piece>) -> Self {
        Self {
            piece,
            from: piece.position,
            to,
            captured,
        }
    }

    pub fn to_human(&self) -> String {
        let maybe_capture_str = match self.captured {
            Some(p) => format!(
                " capturing {} {}",
                p.color.to_human(),
                p.piece_type.to_human()
            ),
            None => "".to_string(),
        };
        format!(
            "{} moves {} from {} to {}{}",
            self.piece.color.to_human(),
            self.piece.piece_type.to_human(),
            self.from.to_algebraic(),
            self.to.to_algebraic(),
            maybe_capture_str,
        )
    }

    pub fn to_algebraic(&self) -> String {
        let piece = match self.piece.piece_type {
            PieceType::Pawn => String::new(),
            other => other.to_char().to_string(),
        };
        format!(
            "{}{}{}{}",
            piece,
            self.from.to_algebraic(),
            if self.captured.is_some() { "x" } else { "-" },
            self.to.to_algebraic(),
        )
    }
}
