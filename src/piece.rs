use std::fmt::{self, Display, Formatter};

use log::trace;
use thiserror::Error;

use crate::{
    board::Board,
    color::Color,
    coord::{Coord, Direction, Vector},
    error::MoveError,
    moves::{CastleSide, Move, Ply},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];

    pub fn offsets(self) -> &'static [Vector] {
        match self {
            PieceKind::Pawn => &Vector::PAWN,
            PieceKind::Knight => &Vector::KNIGHT,
            PieceKind::Bishop => &Vector::BISHOP,
            PieceKind::Rook => &Vector::ROOK,
            PieceKind::Queen => &Vector::QUEEN,
            PieceKind::King => &Vector::KING,
        }
    }
    pub fn reach(self) -> u8 {
        match self {
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => 1,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => 7,
        }
    }
    pub fn lowercase(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
    pub fn uppercase(self) -> char {
        self.lowercase().to_ascii_uppercase()
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error(
    "`{0}` is neither of `p`, `n`, `b`, `r`, `q`, `k`, uppercase letter of any of these, or unicode chess symbols"
)]
pub struct ParsePieceKindError(pub char);

impl TryFrom<char> for PieceKind {
    type Error = ParsePieceKindError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let piece = match value {
            'p' | 'P' | '♙' | '♟' => PieceKind::Pawn,
            'n' | 'N' | '♘' | '♞' => PieceKind::Knight,
            'b' | 'B' | '♗' | '♝' => PieceKind::Bishop,
            'r' | 'R' | '♖' | '♜' => PieceKind::Rook,
            'q' | 'Q' | '♕' | '♛' => PieceKind::Queen,
            'k' | 'K' | '♔' | '♚' => PieceKind::King,
            c => return Err(ParsePieceKindError(c)),
        };
        Ok(piece)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PromotionChoice {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}
impl PromotionChoice {
    pub const ALL: [Self; 4] = [
        PromotionChoice::Queen,
        PromotionChoice::Rook,
        PromotionChoice::Bishop,
        PromotionChoice::Knight,
    ];
}
impl From<PromotionChoice> for PieceKind {
    fn from(value: PromotionChoice) -> Self {
        match value {
            PromotionChoice::Queen => PieceKind::Queen,
            PromotionChoice::Rook => PieceKind::Rook,
            PromotionChoice::Bishop => PieceKind::Bishop,
            PromotionChoice::Knight => PieceKind::Knight,
        }
    }
}
impl TryFrom<PieceKind> for PromotionChoice {
    type Error = MoveError;

    fn try_from(value: PieceKind) -> Result<Self, Self::Error> {
        let choice = match value {
            PieceKind::Queen => PromotionChoice::Queen,
            PieceKind::Rook => PromotionChoice::Rook,
            PieceKind::Bishop => PromotionChoice::Bishop,
            PieceKind::Knight => PromotionChoice::Knight,
            kind @ (PieceKind::Pawn | PieceKind::King) => {
                return Err(MoveError::InvalidPromotion(kind));
            }
        };
        Ok(choice)
    }
}
impl Display for PromotionChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Coord,
    pub moved: bool,
}
impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Coord) -> Self {
        Piece {
            kind,
            color,
            position,
            moved: false,
        }
    }
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        self.kind.offsets().iter().map(move |offset| {
            let offset = match self.kind {
                PieceKind::Pawn => offset.mirrored_for(self.color),
                _ => *offset,
            };
            let length = if self.kind == PieceKind::Pawn && offset.x == 0 && !self.moved {
                2
            } else {
                self.kind.reach()
            };
            Direction::new(self.position, offset, length)
        })
    }
    pub fn reachable(self, board: &Board) -> Vec<Coord> {
        let mut reachable = Vec::new();
        for direction in self.directions() {
            let forward = self.kind == PieceKind::Pawn && direction.offset.x == 0;
            let diagonal = self.kind == PieceKind::Pawn && !forward;
            for position in direction.squares() {
                match board.piece_at(position) {
                    None => {
                        if !diagonal {
                            reachable.push(position);
                        }
                    }
                    Some(piece) => {
                        if piece.color != self.color && !forward {
                            reachable.push(position);
                        }
                        break;
                    }
                }
            }
        }
        reachable
    }
    pub fn can_reach(self, board: &Board, target: Coord) -> bool {
        self.reachable(board).contains(&target)
    }
    pub fn legal_regular_moves(self, board: &Board) -> Vec<Coord> {
        self.reachable(board)
            .into_iter()
            .filter(|destination| {
                let movement = Move::new(self.color, self.position, *destination);
                let safe = !board
                    .resolve(Ply::speculative(movement))
                    .in_check(self.color);
                if !safe {
                    trace!("{movement} leaves the king in check");
                }
                safe
            })
            .collect()
    }
    pub fn legal_moves(self, board: &Board) -> Vec<Move> {
        let mut moves: Vec<_> = self
            .legal_regular_moves(board)
            .into_iter()
            .map(|destination| Move::new(self.color, self.position, destination))
            .collect();
        let special: Vec<_> = match self.kind {
            PieceKind::King => CastleSide::ALL
                .into_iter()
                .map(|side| Coord::new(side.king_destination_file(), self.position.y()))
                .collect(),
            PieceKind::Pawn => Vector::pawn_captures(self.color)
                .into_iter()
                .filter_map(|offset| self.position.move_by(offset))
                .collect(),
            _ => Vec::new(),
        };
        moves.extend(
            special
                .into_iter()
                .map(|destination| Move::new(self.color, self.position, destination))
                .filter(|movement| {
                    movement.is_legal_castle(board) || movement.is_legal_en_passant(board)
                }),
        );
        moves
    }
    pub fn figurine(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.position)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    Empty(Coord),
    Occupied(Piece),
}
impl Square {
    pub fn position(self) -> Coord {
        match self {
            Square::Empty(position) => position,
            Square::Occupied(piece) => piece.position,
        }
    }
    pub fn piece(self) -> Option<Piece> {
        match self {
            Square::Empty(_) => None,
            Square::Occupied(piece) => Some(piece),
        }
    }
    pub fn is_empty(self) -> bool {
        matches!(self, Square::Empty(_))
    }
}
#[cfg(test)]
mod test {
    use rustc_hash::FxHashSet;

    use crate::{
        board::Board,
        color::Color,
        coord,
        coord::Coord,
        error::MoveError,
        piece::{Piece, PieceKind, PromotionChoice},
    };

    fn set(squares: &[&str]) -> FxHashSet<Coord> {
        squares.iter().map(|s| coord!(s)).collect()
    }
    fn reachable(board: &Board, position: &str) -> FxHashSet<Coord> {
        board
            .piece_at(coord!(position))
            .unwrap()
            .reachable(board)
            .into_iter()
            .collect()
    }

    #[test]
    fn reach_table() {
        assert_eq!(PieceKind::King.reach(), 1);
        assert_eq!(PieceKind::Knight.reach(), 1);
        assert_eq!(PieceKind::Pawn.reach(), 1);
        assert_eq!(PieceKind::Queen.reach(), 7);
        assert_eq!(PieceKind::Bishop.offsets().len(), 4);
        assert_eq!(PieceKind::Knight.offsets().len(), 8);
    }
    #[test]
    fn starting_pawn_reaches_two_squares() {
        let board = Board::starting_position();
        assert_eq!(reachable(&board, "e2"), set(&["e3", "e4"]));
        assert_eq!(reachable(&board, "d7"), set(&["d6", "d5"]));
    }
    #[test]
    fn starting_knight_jumps_over_pawns() {
        let board = Board::starting_position();
        assert_eq!(reachable(&board, "g1"), set(&["f3", "h3"]));
        assert_eq!(reachable(&board, "b8"), set(&["a6", "c6"]));
    }
    #[test]
    fn blocked_sliders_reach_nothing() {
        let board = Board::starting_position();
        for position in ["a1", "c1", "d1", "e1", "f8", "h8"] {
            assert!(reachable(&board, position).is_empty(), "{position}");
        }
    }
    #[test]
    fn slider_stops_on_capture() {
        let board = Board::from_arrangement([
            (PieceKind::Rook, Color::White, "d4"),
            (PieceKind::Pawn, Color::Black, "d6"),
            (PieceKind::Pawn, Color::White, "f4"),
            (PieceKind::King, Color::White, "a1"),
            (PieceKind::King, Color::Black, "h8"),
        ]);
        assert_eq!(
            reachable(&board, "d4"),
            set(&["d5", "d6", "e4", "c4", "b4", "a4", "d3", "d2", "d1"])
        );
    }
    #[test]
    fn pawn_cannot_capture_forward() {
        let board = Board::from_arrangement([
            (PieceKind::Pawn, Color::White, "e2"),
            (PieceKind::Knight, Color::Black, "e3"),
            (PieceKind::Knight, Color::Black, "d3"),
            (PieceKind::Pawn, Color::White, "f3"),
            (PieceKind::King, Color::White, "a1"),
            (PieceKind::King, Color::Black, "h8"),
        ]);
        assert_eq!(reachable(&board, "e2"), set(&["d3"]));
    }
    #[test]
    fn pawn_double_step_is_blocked_by_the_first_square() {
        let board = Board::from_arrangement([
            (PieceKind::Pawn, Color::Black, "c7"),
            (PieceKind::Bishop, Color::White, "c6"),
            (PieceKind::King, Color::White, "a1"),
            (PieceKind::King, Color::Black, "h8"),
        ]);
        assert!(reachable(&board, "c7").is_empty());
    }
    #[test]
    fn pinned_piece_has_no_legal_regular_moves() {
        let board = Board::from_arrangement([
            (PieceKind::King, Color::White, "e1"),
            (PieceKind::Knight, Color::White, "e2"),
            (PieceKind::Rook, Color::Black, "e7"),
            (PieceKind::King, Color::Black, "e8"),
        ]);
        let knight = board.piece_at(coord!("e2")).unwrap();
        assert!(!knight.reachable(&board).is_empty());
        assert!(knight.legal_regular_moves(&board).is_empty());
    }
    #[test]
    fn pinned_slider_may_move_along_the_pin() {
        let board = Board::from_arrangement([
            (PieceKind::King, Color::White, "e1"),
            (PieceKind::Rook, Color::White, "e3"),
            (PieceKind::Rook, Color::Black, "e6"),
            (PieceKind::King, Color::Black, "a8"),
        ]);
        let rook = board.piece_at(coord!("e3")).unwrap();
        let moves: FxHashSet<_> = rook.legal_regular_moves(&board).into_iter().collect();
        assert_eq!(moves, set(&["e2", "e4", "e5", "e6"]));
    }
    #[test]
    fn king_cannot_step_into_check() {
        let board = Board::from_arrangement([
            (PieceKind::King, Color::White, "e1"),
            (PieceKind::Rook, Color::Black, "d8"),
            (PieceKind::King, Color::Black, "h8"),
        ]);
        let king = board.piece_at(coord!("e1")).unwrap();
        let moves: FxHashSet<_> = king.legal_regular_moves(&board).into_iter().collect();
        assert_eq!(moves, set(&["e2", "f1", "f2"]));
    }
    #[test]
    fn promotion_choice_rejects_king_and_pawn() {
        assert_eq!(
            PromotionChoice::try_from(PieceKind::Knight),
            Ok(PromotionChoice::Knight)
        );
        assert_eq!(
            PromotionChoice::try_from(PieceKind::King),
            Err(MoveError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(
            PromotionChoice::try_from(PieceKind::Pawn),
            Err(MoveError::InvalidPromotion(PieceKind::Pawn))
        );
        assert_eq!(PromotionChoice::default(), PromotionChoice::Queen);
    }
    #[test]
    fn parse_piece_kind() {
        assert_eq!(PieceKind::try_from('N'), Ok(PieceKind::Knight));
        assert_eq!(PieceKind::try_from('♛'), Ok(PieceKind::Queen));
        assert!(PieceKind::try_from('x').is_err());
    }
    #[test]
    fn new_piece_is_unmoved() {
        let piece = Piece::new(PieceKind::Rook, Color::Black, coord!("a8"));
        assert!(!piece.moved);
        assert_eq!(piece.to_string(), "black rook on a8");
    }
}
