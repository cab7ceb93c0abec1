use thiserror::Error;

use crate::{end_state::EndState, moves::Move, piece::PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    #[error("{0} is not a legal move")]
    Illegal(Move),
    #[error("it is not the mover's turn")]
    NotYourTurn,
    #[error("the game is already over, {0}")]
    GameOver(EndState),
    #[error("a pawn cannot promote to a {0}")]
    InvalidPromotion(PieceKind),
}
