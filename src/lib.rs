pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod movegen;
pub mod types;
