use log::trace;

use crate::{
    board::Board,
    coord::Coord,
    moves::{CastleSide, Move, MoveKind, Ply},
    piece::{Piece, PieceKind},
};

impl Board {
    /// Carries out `ply` without checking its legality.
    ///
    /// # Panics
    ///
    /// When the origin is empty or a piece would land on an occupied square.
    pub(crate) fn execute(&mut self, ply: Ply) {
        let movement = ply.movement;
        let Some(kind) = movement.kind(self) else {
            panic!("nothing to move on {}", movement.origin);
        };
        let double_step = movement.is_pawn_double_step(self);
        trace!("executing {ply} as {kind:?}");
        match kind {
            MoveKind::Regular => self.execute_regular(movement),
            MoveKind::EnPassant => {
                self.remove_piece(movement.en_passant_capture_square());
                self.execute_regular(movement);
            }
            MoveKind::Castle(side) => self.execute_castle(movement, side),
            MoveKind::Promotion => self.execute_promotion(ply),
        }
        self.set_last_double_step(double_step.then_some(movement.destination));
        self.push_history(ply);
        debug_assert!(self.is_consistent(), "board became inconsistent after {ply}");
    }
    fn take_mover(&mut self, movement: Move) -> Piece {
        match self.remove_piece(movement.origin) {
            Some(piece) => piece,
            None => panic!("nothing to move on {}", movement.origin),
        }
    }
    fn execute_regular(&mut self, movement: Move) {
        let piece = self.take_mover(movement);
        if let Some(captured) = self.remove_piece(movement.destination) {
            trace!("{captured} captured");
        }
        self.add_piece(piece, movement.destination);
    }
    fn execute_castle(&mut self, movement: Move, side: CastleSide) {
        let rank = movement.origin.y();
        let king = self.take_mover(movement);
        let rook_origin = Coord::new(side.rook_origin_file(), rank);
        let Some(rook) = self.remove_piece(rook_origin) else {
            panic!("no rook on {rook_origin} to castle with");
        };
        self.add_piece(king, movement.destination);
        self.add_piece(rook, Coord::new(side.rook_destination_file(), rank));
    }
    fn execute_promotion(&mut self, ply: Ply) {
        let movement = ply.movement;
        let pawn = self.take_mover(movement);
        if let Some(captured) = self.remove_piece(movement.destination) {
            trace!("{captured} captured by promotion");
        }
        let promoted = Piece::new(
            PieceKind::from(ply.promotion_or_default()),
            pawn.color,
            movement.destination,
        );
        self.add_piece(promoted, movement.destination);
    }
}
