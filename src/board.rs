use itertools::Itertools;
use tracing::{debug, info};

use crate::config::{BoardConfig, IllegalClickPolicy};
use crate::error::{BoardError, BoardResult};
use crate::movegen::legal_destinations;
use crate::types::*;

/// The 20-piece opening layout, row 0 first.
pub const STANDARD_LAYOUT: &str = "R6R/PPPPPPPP/8/8/8/8/pppppppp/r6r";

/// One cell of the grid. Squares live as long as the board; only their
/// occupant changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    position: Position,
    piece: Option<Piece>,
}

impl Square {
    fn new(position: Position) -> Self {
        Self {
            position,
            piece: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.piece.is_some()
    }
}

/// What a single click did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Empty square clicked with nothing selected
    Ignored,
    Selected(Position),
    Moved(Move),
    /// Target was not a legal destination; the selection is kept
    Rejected { from: Position, to: Position },
    /// Target was not a legal destination; the selection on this square was dropped
    Deselected(Position),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Row-major, always 64 entries
    squares: Vec<Square>,
    selected: Option<Position>,
    captured: Vec<Piece>,
    config: BoardConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Board {
        Board::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Board {
        let squares = (0..BOARD_SIZE)
            .cartesian_product(0..BOARD_SIZE)
            .map(|(row, column)| Square::new(Position { row, column }))
            .collect();
        let board = Board {
            squares,
            selected: None,
            captured: Vec::new(),
            config,
        };
        debug!("created board with {:?}\n{}", config, board.draw_board());
        board
    }

    /// White pawns on row 1 with rooks in the row 0 corners, black mirrored on
    /// rows 6 and 7.
    pub fn standard(config: BoardConfig) -> Board {
        let mut board = Board::with_config(config);
        for (color, pawn_row, rook_row) in [(Color::White, 1, 0), (Color::Black, 6, 7)] {
            for column in 0..BOARD_SIZE {
                board.put(Piece::pawn(color, pawn_row, column));
            }
            board.put(Piece::rook(color, rook_row, 0));
            board.put(Piece::rook(color, rook_row, BOARD_SIZE - 1));
        }
        board
    }

    /// Parses eight `/`-separated rows, row 0 first. Each row is made of
    /// piece letters (`P`, `R`, `p`, `r`), `.` for an empty square, or a digit
    /// for a run of empty squares.
    pub fn from_layout(layout: &str, config: BoardConfig) -> BoardResult<Board> {
        let rows: Vec<&str> = layout.trim().split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(BoardError::InvalidLayout(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut board = Board::with_config(config);
        for (row, row_data) in rows.iter().enumerate() {
            let mut column = 0i32;
            for c in row_data.chars() {
                match c {
                    '.' => column += 1,
                    _ if c.is_ascii_digit() => match c.to_digit(10) {
                        Some(run @ 1..=8) => column += run as i32,
                        _ => {
                            return Err(BoardError::InvalidLayout(format!(
                                "bad run length {:?} in row {}",
                                c, row
                            )))
                        }
                    },
                    _ => {
                        let position = Position::checked(row as i32, column).ok_or_else(|| {
                            BoardError::InvalidLayout(format!("row {} is too long", row))
                        })?;
                        board.put(Piece::from_char(c, position)?);
                        column += 1;
                    }
                }
            }
            if column != BOARD_SIZE as i32 {
                return Err(BoardError::InvalidLayout(format!(
                    "row {} has {} squares",
                    row, column
                )));
            }
        }
        Ok(board)
    }

    /// Inverse of `from_layout`, with runs of empty squares collapsed.
    pub fn to_layout(&self) -> String {
        self.squares
            .chunks(BOARD_SIZE as usize)
            .map(|row| {
                let mut res = String::new();
                let mut empty = 0;
                for square in row {
                    match square.piece() {
                        Some(piece) => {
                            if empty > 0 {
                                res.push_str(&empty.to_string());
                                empty = 0;
                            }
                            res.push(piece.to_char());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    res.push_str(&empty.to_string());
                }
                res
            })
            .join("/")
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Pieces taken off the board, in capture order.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn square(&self, position: Position) -> BoardResult<&Square> {
        let position = validate(position)?;
        Ok(&self.squares[position.index()])
    }

    /// The occupant of `position`. Off-board positions have no occupant.
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        let position = validate(position).ok()?;
        self.squares[position.index()].piece()
    }

    /// Every piece still on the board, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().filter_map(|s| s.piece())
    }

    /// Legal destinations of whatever stands on `position`.
    pub fn destinations_from(&self, position: Position) -> Vec<Position> {
        match self.piece_at(position) {
            Some(piece) => legal_destinations(piece, self),
            None => vec![],
        }
    }

    /// Puts `piece` on (row, column), replacing any occupant, and moves the
    /// piece's own position there.
    pub fn place_piece(&mut self, piece: Piece, row: i32, column: i32) -> BoardResult<()> {
        let position = Position::new(row, column)?;
        self.put(Piece { position, ..piece });
        Ok(())
    }

    fn put(&mut self, piece: Piece) {
        let square = &mut self.squares[piece.position.index()];
        if let Some(previous) = square.piece.replace(piece) {
            debug!(
                "placing {} {} over {} {} at {}",
                piece.color.to_human(),
                piece.piece_type.to_human(),
                previous.color.to_human(),
                previous.piece_type.to_human(),
                piece.position
            );
        }
    }

    /// Convenience for `handle_click` from raw coordinates.
    pub fn click(&mut self, row: i32, column: i32) -> BoardResult<ClickOutcome> {
        self.handle_click(Position::new(row, column)?)
    }

    /// Routes a click on `position`.
    ///
    /// With nothing selected, an occupied square becomes selected. With a
    /// piece selected, a legal destination applies the move and clears the
    /// selection; any other square is handled by the illegal click policy.
    pub fn handle_click(&mut self, position: Position) -> BoardResult<ClickOutcome> {
        let to = validate(position)?;

        let selected = self
            .selected
            .and_then(|from| self.piece_at(from).copied());

        let Some(piece) = selected else {
            if self.piece_at(to).is_some() {
                debug!("selected {}", to);
                self.selected = Some(to);
                return Ok(ClickOutcome::Selected(to));
            }
            return Ok(ClickOutcome::Ignored);
        };

        let from = piece.position;
        if legal_destinations(&piece, self).contains(&to) {
            let mv = self.apply_move(piece, to);
            return Ok(ClickOutcome::Moved(mv));
        }

        match self.config.illegal_click {
            IllegalClickPolicy::Stay => {
                debug!("{} is not reachable from {}, keeping selection", to, from);
                Ok(ClickOutcome::Rejected { from, to })
            }
            IllegalClickPolicy::Deselect => {
                debug!("{} is not reachable from {}, deselecting", to, from);
                self.selected = None;
                Ok(ClickOutcome::Deselected(from))
            }
        }
    }

    fn apply_move(&mut self, piece: Piece, to: Position) -> Move {
        let from = piece.position;
        let captured = self.squares[to.index()].piece.take();
        let mv = Move::new(piece, to, captured);

        let mut moving = self.squares[from.index()].piece.take().unwrap_or(piece);
        moving.move_to(to);
        self.squares[to.index()].piece = Some(moving);
        self.selected = None;

        if let Some(victim) = captured {
            self.captured.push(victim);
        }
        info!("{}", mv.to_human());
        mv
    }

    /// Text rendering, row 7 on top. Legal destinations of the selected piece
    /// are marked with `*`.
    pub fn draw_board(&self) -> String {
        let marked = self
            .selected
            .map(|from| self.destinations_from(from))
            .unwrap_or_default();

        let mut string = String::new();
        for row in (0..BOARD_SIZE).rev() {
            let cells = (0..BOARD_SIZE)
                .map(|column| {
                    let pos = Position { row, column };
                    match self.piece_at(pos) {
                        Some(p) => p.to_symbol().to_string(),
                        None if marked.contains(&pos) => "*".to_string(),
                        None => ".".to_string(),
                    }
                })
                .join(" ");
            string.push_str(&format!("{} {}\n", row, cells));
        }
        string.push_str(&format!("  {}", (0..BOARD_SIZE).join(" ")));
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

fn validate(position: Position) -> BoardResult<Position> {
    Position::new(position.row as i32, position.column as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Advance;
    use pretty_assertions::assert_eq;

    fn pos(row: u8, column: u8) -> Position {
        Position { row, column }
    }

    fn toward_row_seven() -> BoardConfig {
        BoardConfig {
            white_advance: Advance::TowardRowSeven,
            ..BoardConfig::default()
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.squares().len(), 64);
        assert_eq!(board.pieces().count(), 0);
        assert_eq!(board.selected(), None);
        for (i, square) in board.squares().iter().enumerate() {
            assert_eq!(square.position().index(), i);
            assert!(!square.is_occupied());
        }
    }

    #[test]
    fn test_standard_setup() {
        let board = Board::standard(BoardConfig::default());
        assert_eq!(board.pieces().count(), 20);
        assert_eq!(board.to_layout(), STANDARD_LAYOUT);
        assert_eq!(
            board.piece_at(pos(0, 7)),
            Some(&Piece::rook(Color::White, 0, 7))
        );
        assert_eq!(
            board.piece_at(pos(6, 2)),
            Some(&Piece::pawn(Color::Black, 6, 2))
        );
        for row in 2..6 {
            for column in 0..8 {
                assert_eq!(board.piece_at(pos(row, column)), None);
            }
        }
    }

    #[test]
    fn test_pieces_know_their_square() {
        let board = Board::standard(BoardConfig::default());
        for square in board.squares() {
            if let Some(piece) = square.piece() {
                assert_eq!(piece.position, square.position());
            }
        }
    }

    #[test]
    fn test_layout_round_trip() {
        let layout = "R2p3R/8/8/3r4/8/8/P6p/8";
        let board = Board::from_layout(layout, BoardConfig::default()).unwrap();
        assert_eq!(board.to_layout(), layout);
        assert_eq!(
            board.piece_at(pos(3, 3)),
            Some(&Piece::rook(Color::Black, 3, 3))
        );

        let dotted = Board::from_layout("R......R/8/8/8/8/8/8/8", BoardConfig::default()).unwrap();
        assert_eq!(dotted.to_layout(), "R6R/8/8/8/8/8/8/8");
    }

    #[test]
    fn test_bad_layouts() {
        let config = BoardConfig::default();
        assert!(matches!(
            Board::from_layout("8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert!(matches!(
            Board::from_layout("9/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert!(matches!(
            Board::from_layout("7/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert!(matches!(
            Board::from_layout("8R/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert_eq!(
            Board::from_layout("K7/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidPiece('K'))
        );
        assert!(matches!(
            Board::from_layout("R07/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert!(matches!(
            Board::from_layout("08/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidLayout(_))
        ));
        assert_eq!(
            Board::from_layout("!7/8/8/8/8/8/8/8", config),
            Err(BoardError::InvalidPiece('!'))
        );
    }

    #[test]
    fn test_place_piece_updates_position_and_overwrites() {
        let mut board = Board::new();
        board
            .place_piece(Piece::pawn(Color::White, 0, 0), 4, 4)
            .unwrap();
        assert_eq!(
            board.piece_at(pos(4, 4)),
            Some(&Piece::pawn(Color::White, 4, 4))
        );

        board
            .place_piece(Piece::rook(Color::Black, 4, 4), 4, 4)
            .unwrap();
        assert_eq!(
            board.piece_at(pos(4, 4)),
            Some(&Piece::rook(Color::Black, 4, 4))
        );
        assert_eq!(board.pieces().count(), 1);
    }

    #[test]
    fn test_place_piece_out_of_bounds() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(
            board.place_piece(Piece::pawn(Color::White, 0, 0), 8, 0),
            Err(BoardError::OutOfBounds { row: 8, column: 0 })
        );
        assert_eq!(
            board.place_piece(Piece::pawn(Color::White, 0, 0), 0, -1),
            Err(BoardError::OutOfBounds { row: 0, column: -1 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_click_empty_square_is_noop() {
        let mut board = Board::standard(BoardConfig::default());
        let before = board.clone();
        assert_eq!(board.click(4, 4), Ok(ClickOutcome::Ignored));
        assert_eq!(board, before);
    }

    #[test]
    fn test_click_out_of_bounds() {
        let mut board = Board::standard(BoardConfig::default());
        board.click(1, 0).unwrap();
        let before = board.clone();
        assert_eq!(
            board.click(-1, 0),
            Err(BoardError::OutOfBounds { row: -1, column: 0 })
        );
        assert_eq!(
            board.handle_click(pos(9, 9)),
            Err(BoardError::OutOfBounds { row: 9, column: 9 })
        );
        assert!(board.square(pos(8, 0)).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_select_then_move() {
        let mut board = Board::standard(toward_row_seven());
        assert_eq!(board.click(1, 0), Ok(ClickOutcome::Selected(pos(1, 0))));
        assert_eq!(board.selected(), Some(pos(1, 0)));

        let outcome = board.click(2, 0).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Moved(Move {
                piece: Piece::pawn(Color::White, 1, 0),
                from: pos(1, 0),
                to: pos(2, 0),
                captured: None,
            })
        );
        assert_eq!(board.piece_at(pos(1, 0)), None);
        assert_eq!(
            board.piece_at(pos(2, 0)),
            Some(&Piece::pawn(Color::White, 2, 0))
        );
        assert_eq!(board.selected(), None);

        let before = board.clone();
        assert_eq!(board.click(5, 5), Ok(ClickOutcome::Ignored));
        assert_eq!(board, before);
    }

    #[test]
    fn test_illegal_target_keeps_selection() {
        let mut board = Board::standard(BoardConfig::default());
        board.click(0, 0).unwrap();
        let before = board.clone();

        assert_eq!(
            board.click(5, 0),
            Ok(ClickOutcome::Rejected {
                from: pos(0, 0),
                to: pos(5, 0)
            })
        );
        assert_eq!(board, before);
        assert_eq!(board.selected(), Some(pos(0, 0)));
        assert_eq!(
            board.piece_at(pos(0, 0)),
            Some(&Piece::rook(Color::White, 0, 0))
        );
    }

    #[test]
    fn test_clicking_another_piece_does_not_reselect() {
        let mut board = Board::standard(BoardConfig::default());
        board.click(0, 0).unwrap();
        // a friendly piece is not a destination, so the rook stays selected
        assert!(matches!(
            board.click(1, 3),
            Ok(ClickOutcome::Rejected { .. })
        ));
        assert_eq!(board.selected(), Some(pos(0, 0)));
    }

    #[test]
    fn test_illegal_target_deselects_when_configured() {
        let config = BoardConfig {
            illegal_click: IllegalClickPolicy::Deselect,
            ..BoardConfig::default()
        };
        let mut board = Board::standard(config);
        board.click(0, 0).unwrap();
        assert_eq!(board.click(5, 0), Ok(ClickOutcome::Deselected(pos(0, 0))));
        assert_eq!(board.selected(), None);
        assert_eq!(
            board.piece_at(pos(0, 0)),
            Some(&Piece::rook(Color::White, 0, 0))
        );
    }

    #[test]
    fn test_capture_is_recorded() {
        let mut board =
            Board::from_layout("R7/8/8/8/8/p7/8/8", BoardConfig::default()).unwrap();
        board.click(0, 0).unwrap();
        let outcome = board.click(5, 0).unwrap();

        let victim = Piece::pawn(Color::Black, 5, 0);
        assert!(matches!(
            outcome,
            ClickOutcome::Moved(Move { captured: Some(p), .. }) if p == victim
        ));
        assert_eq!(board.captured(), &[victim]);
        assert_eq!(
            board.piece_at(pos(5, 0)),
            Some(&Piece::rook(Color::White, 5, 0))
        );
        assert_eq!(board.pieces().count(), 1);
    }

    #[test]
    fn test_pawn_capture_through_clicks() {
        let mut board =
            Board::from_layout("8/8/8/8/3p4/4P3/8/8", BoardConfig::default()).unwrap();
        // white pawn on (5,4) walks toward row 0, black pawn sits on (4,3)
        board.click(5, 4).unwrap();
        assert!(matches!(board.click(4, 3), Ok(ClickOutcome::Moved(_))));
        assert_eq!(
            board.piece_at(pos(4, 3)),
            Some(&Piece::pawn(Color::White, 4, 3))
        );
        assert_eq!(board.captured(), &[Piece::pawn(Color::Black, 4, 3)]);
    }

    #[test]
    fn test_draw_board_marks_destinations() {
        let mut board =
            Board::from_layout("R7/P7/8/8/8/8/8/8", BoardConfig::default()).unwrap();
        board.click(0, 0).unwrap();
        let drawing = board.draw_board();
        let lines: Vec<&str> = drawing.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[7], "0 ♖ * * * * * * *");
        assert_eq!(lines[6], "1 ♙ . . . . . . .");
        assert_eq!(lines[0], "7 . . . . . . . .");
        assert_eq!(lines[8], "  0 1 2 3 4 5 6 7");
    }
}
