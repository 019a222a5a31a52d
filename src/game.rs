use chrono::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::*;
use crate::error::BoardResult;
use crate::types::*;

/// A board together with what has been played on it.
pub struct Session {
    board: Board,
    moves: Vec<Move>,
    clicks: usize,
    start_layout: String,
    started_at: DateTime<Local>,
}

impl Session {
    pub fn new(board: Board) -> Self {
        Self {
            start_layout: board.to_layout(),
            board,
            moves: Vec::new(),
            clicks: 0,
            started_at: Local::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    pub fn click(&mut self, position: Position) -> BoardResult<ClickOutcome> {
        let outcome = self.board.handle_click(position)?;
        self.clicks += 1;
        if let ClickOutcome::Moved(mv) = outcome {
            self.moves.push(mv);
        }
        Ok(outcome)
    }

    /// Clicks `count` times at random. While a piece is selected, about half
    /// of the clicks go to one of its legal destinations so that moves
    /// actually happen.
    pub fn play_random<R: Rng>(&mut self, rng: &mut R, count: usize) -> Vec<ClickOutcome> {
        let mut outcomes = Vec::with_capacity(count);
        for _ in 0..count {
            let destinations = self
                .board
                .selected()
                .map(|from| self.board.destinations_from(from))
                .unwrap_or_default();

            let target = match destinations.choose(rng) {
                Some(&to) if rng.gen_bool(0.5) => to,
                _ => Position {
                    row: rng.gen_range(0..BOARD_SIZE),
                    column: rng.gen_range(0..BOARD_SIZE),
                },
            };

            // every generated target is on the board
            if let Ok(outcome) = self.click(target) {
                debug!("random click on {}: {:?}", target, outcome);
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Plain text record of the session, in the spirit of a PGN header.
    pub fn transcript(&self) -> String {
        let mut res = String::new();
        res.push_str(&format!("[Date \"{}\"]\n", self.started_at.format("%Y.%m.%d")));
        res.push_str(&format!("[Time \"{}\"]\n", self.started_at.format("%H:%M:%S")));
        res.push_str(&format!("[Layout \"{}\"]\n", self.start_layout));
        res.push_str(&format!("[Clicks \"{}\"]\n", self.clicks));
        res.push_str(&format!("[Captured \"{}\"]\n", self.board.captured().len()));
        res.push('\n');

        for (i, m) in self.moves.iter().enumerate() {
            res.push_str(&format!("{}. {}\n", i + 1, m.to_algebraic()));
        }
        res
    }
}
