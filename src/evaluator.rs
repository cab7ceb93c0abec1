use log::trace;

use crate::{
    board::Board,
    color::Color,
    end_state::{DrawReason, EndState},
    moves::Move,
    piece::PieceKind,
};

impl Board {
    pub fn in_check(&self, color: Color) -> bool {
        let Some(king) = self.king_of(color) else {
            return false;
        };
        self.pieces()
            .any(|piece| piece.can_reach(self, king.position))
    }
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.pieces_of(color)
            .flat_map(|piece| piece.legal_moves(self))
            .collect()
    }
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color)
            .any(|piece| !piece.legal_moves(self).is_empty())
    }
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.in_check(color) && !self.has_legal_move(color)
    }
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.in_check(color) && !self.has_legal_move(color)
    }
    // a lone minor piece or a bishop pair on one square color, nothing wider
    pub fn has_insufficient_material(&self) -> bool {
        let extras: Vec<_> = self
            .pieces()
            .filter(|piece| piece.kind != PieceKind::King)
            .collect();
        if self.pieces().count() != extras.len() + 2 {
            return false;
        }
        match extras.as_slice() {
            [] => true,
            [piece] => matches!(piece.kind, PieceKind::Bishop | PieceKind::Knight),
            [a, b] => {
                a.kind == PieceKind::Bishop
                    && b.kind == PieceKind::Bishop
                    && a.position.square_color() == b.position.square_color()
            }
            _ => false,
        }
    }
    pub fn outcome(&self, to_move: Color) -> Option<EndState> {
        let outcome = if self.is_checkmate(to_move) {
            Some(EndState::Win(!to_move))
        } else if self.has_insufficient_material() {
            Some(EndState::Draw(DrawReason::InsufficientMaterial))
        } else if self.is_stalemate(to_move) {
            Some(EndState::Draw(DrawReason::Stalemate))
        } else {
            None
        };
        if let Some(outcome) = outcome {
            trace!("{to_move} to move, game ended: {outcome}");
        }
        outcome
    }
}
