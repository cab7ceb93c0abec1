use std::fmt::{self, Display, Formatter};

use log::trace;

use crate::{
    board::Board,
    color::Color,
    coord::{Coord, Vector},
    piece::{Piece, PieceKind, PromotionChoice},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}
impl CastleSide {
    pub const ALL: [Self; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    pub fn king_destination_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }
    pub fn rook_origin_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }
    pub fn rook_destination_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }
    fn direction(self) -> Vector {
        match self {
            CastleSide::Kingside => Vector { x: 1, y: 0 },
            CastleSide::Queenside => Vector { x: -1, y: 0 },
        }
    }
}
impl Display for CastleSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CastleSide::Kingside => write!(f, "kingside")?,
            CastleSide::Queenside => write!(f, "queenside")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Regular,
    Castle(CastleSide),
    EnPassant,
    Promotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub color: Color,
    pub origin: Coord,
    pub destination: Coord,
}
impl Move {
    pub fn new(color: Color, origin: Coord, destination: Coord) -> Self {
        Move {
            color,
            origin,
            destination,
        }
    }
    fn piece(self, board: &Board) -> Option<Piece> {
        board.piece_at(self.origin)
    }
    pub fn kind(self, board: &Board) -> Option<MoveKind> {
        let piece = self.piece(board)?;
        let kind = if self.is_promotion(piece) {
            MoveKind::Promotion
        } else if let Some(side) = self.castle_side(board) {
            MoveKind::Castle(side)
        } else if self.is_en_passant(board) {
            MoveKind::EnPassant
        } else {
            MoveKind::Regular
        };
        Some(kind)
    }
    fn is_promotion(self, piece: Piece) -> bool {
        piece.kind == PieceKind::Pawn && self.destination.y() == piece.color.promotion_rank()
    }
    pub fn castle_side(self, board: &Board) -> Option<CastleSide> {
        let king = self.piece(board)?;
        let rank = king.color.home_rank();
        if king.kind != PieceKind::King
            || king.moved
            || self.origin != Coord::new(4, rank)
            || self.destination.y() != rank
        {
            return None;
        }
        let side = CastleSide::ALL
            .into_iter()
            .find(|side| self.destination.x() == side.king_destination_file())?;
        let corner = Coord::new(side.rook_origin_file(), rank);
        let rook = board.piece_at(corner)?;
        if rook.kind != PieceKind::Rook || rook.color != king.color || rook.moved {
            return None;
        }
        let low = Ord::min(self.origin.x(), corner.x());
        let high = Ord::max(self.origin.x(), corner.x());
        let path_is_clear =
            (low + 1..high).all(|x| board.piece_at(Coord::new(x, rank)).is_none());
        path_is_clear.then_some(side)
    }
    pub fn en_passant_capture_square(self) -> Coord {
        Coord::new(self.destination.x(), self.origin.y())
    }
    pub fn is_en_passant(self, board: &Board) -> bool {
        let Some(pawn) = self.piece(board) else {
            return false;
        };
        if pawn.kind != PieceKind::Pawn
            || pawn.position.y() != pawn.color.en_passant_rank()
            || !Vector::pawn_captures(pawn.color).contains(&(self.destination - self.origin))
            || board.piece_at(self.destination).is_some()
        {
            return false;
        }
        let adjacent = self.en_passant_capture_square();
        board.piece_at(adjacent).is_some_and(|target| {
            target.kind == PieceKind::Pawn
                && target.color != pawn.color
                && board.last_double_step() == Some(adjacent)
        })
    }
    pub fn is_pawn_double_step(self, board: &Board) -> bool {
        self.piece(board).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn
                && !piece.moved
                && self.destination - self.origin == Vector::pawn_forward(piece.color) * 2
        })
    }
    pub fn is_legal(self, board: &Board) -> bool {
        let Some(piece) = self.piece(board) else {
            return false;
        };
        if piece.color != self.color {
            return false;
        }
        piece.legal_regular_moves(board).contains(&self.destination)
            || self.is_legal_castle(board)
            || self.is_legal_en_passant(board)
    }
    pub fn is_legal_castle(self, board: &Board) -> bool {
        let Some(side) = self.castle_side(board) else {
            return false;
        };
        if self.piece(board).is_none_or(|king| king.color != self.color)
            || board.in_check(self.color)
        {
            return false;
        }
        let transit = self.origin.move_by(side.direction());
        let passes_safely = transit.into_iter().all(|square| {
            let step = Move::new(self.color, self.origin, square);
            !board.resolve(Ply::speculative(step)).in_check(self.color)
        });
        let lands_safely = !board.resolve(Ply::speculative(self)).in_check(self.color);
        if !(passes_safely && lands_safely) {
            trace!("{self} castles {side} through or into check");
        }
        passes_safely && lands_safely
    }
    pub fn is_legal_en_passant(self, board: &Board) -> bool {
        self.is_en_passant(board)
            && self.piece(board).is_some_and(|pawn| pawn.color == self.color)
            && !board.resolve(Ply::speculative(self)).in_check(self.color)
    }
}
impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.color, self.origin, self.destination)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ply {
    pub movement: Move,
    pub promotion: Option<PromotionChoice>,
}
impl Ply {
    pub fn new(movement: Move, promotion: Option<PromotionChoice>) -> Self {
        Ply {
            movement,
            promotion,
        }
    }
    // A ply for hypothetical boards; promotions always become queens.
    pub fn speculative(movement: Move) -> Self {
        Ply {
            movement,
            promotion: None,
        }
    }
    pub fn promotion_or_default(self) -> PromotionChoice {
        self.promotion.unwrap_or_default()
    }
}
impl Display for Ply {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.movement)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion).lowercase())?;
        }
        Ok(())
    }
}
