#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod color;
pub mod coord;
pub mod end_state;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod mover;
pub mod moves;
pub mod piece;

pub use crate::{
    board::Board,
    color::Color,
    coord::Coord,
    end_state::{DrawReason, EndState},
    error::MoveError,
    game::{Game, PromotionSelector},
    moves::{CastleSide, Move, MoveKind, Ply},
    piece::{Piece, PieceKind, PromotionChoice, Square},
};
