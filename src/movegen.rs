use once_cell::sync::Lazy;
use tracing::trace;

use crate::board::Board;
use crate::types::*;

/// Squares reachable by sliding from one square, nearest first, one list per
/// axis direction. Board edges are already cut off.
pub struct RaysFromPosition {
    pub up: Vec<Position>,
    pub down: Vec<Position>,
    pub left: Vec<Position>,
    pub right: Vec<Position>,
}

impl RaysFromPosition {
    pub fn new_from_position(pos: Position) -> Self {
        let walk = |row_delta: i32, column_delta: i32| -> Vec<Position> {
            (1..BOARD_SIZE as i32)
                .map_while(|i| pos.offset(i * row_delta, i * column_delta))
                .collect()
        };
        Self {
            down: walk(1, 0),
            up: walk(-1, 0),
            right: walk(0, 1),
            left: walk(0, -1),
        }
    }

    pub fn all(&self) -> [&[Position]; 4] {
        [
            self.down.as_slice(),
            self.up.as_slice(),
            self.right.as_slice(),
            self.left.as_slice(),
        ]
    }
}

/// Rays for every square, indexed by `Position::index`.
pub static ROOK_RAYS: Lazy<Vec<RaysFromPosition>> = Lazy::new(|| {
    (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |column| Position { row, column }))
        .map(RaysFromPosition::new_from_position)
        .collect()
});

/// Squares `piece` could move to by its own geometry.
///
/// Turn order and king safety are ignored. Off-board squares never appear,
/// and a piece that is itself off the board has nowhere to go.
pub fn legal_destinations(piece: &Piece, board: &Board) -> Vec<Position> {
    if board.square(piece.position).is_err() {
        trace!("piece at {} is off the board", piece.position);
        return vec![];
    }
    let destinations = match piece.piece_type {
        PieceType::Pawn => pawn_destinations(piece, board),
        PieceType::Rook => rook_destinations(piece, board),
    };
    trace!(
        "{} {} at {} has {} destinations",
        piece.color.to_human(),
        piece.piece_type.to_human(),
        piece.position,
        destinations.len()
    );
    destinations
}

/// One step forward onto an empty square, or one step diagonally onto an
/// opposing piece.
pub fn pawn_destinations(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(3);
    let direction = board.config().white_advance.direction(piece.color);

    if let Some(ahead) = piece.position.offset(direction, 0) {
        if board.piece_at(ahead).is_none() {
            moves.push(ahead);
        }
    }

    for column_delta in [-1, 1] {
        if let Some(target) = piece.position.offset(direction, column_delta) {
            if is_enemy(board, target, piece.color) {
                moves.push(target);
            }
        }
    }
    moves
}

pub fn rook_destinations(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut moves = Vec::with_capacity(14);
    let Some(rays) = ROOK_RAYS.get(piece.position.index()) else {
        return moves;
    };

    for ray in rays.all() {
        for &target in ray {
            match board.piece_at(target) {
                None => moves.push(target),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(target);
                    }
                    break;
                }
            }
        }
    }
    moves
}

fn is_enemy(board: &Board, position: Position, color: Color) -> bool {
    board
        .piece_at(position)
        .map_or(false, |other| other.color == color.other_color())
}
