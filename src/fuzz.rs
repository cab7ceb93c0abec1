use std::fmt::{self, Display, Formatter, Write as _};

use chess_referee::{
    Board, Color, Coord, Game, Move, MoveKind, PieceKind, PromotionChoice, end_state::EndState,
};
use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::board_display::BoardDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Key {
    origin: Coord,
    destination: Coord,
    promotion: Option<PieceKind>,
}
impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}
#[allow(clippy::cast_possible_truncation, reason = "file and rank indices are < 8")]
fn coord(square: chess::Square) -> Coord {
    Coord::new(
        square.get_file().to_index() as u8,
        square.get_rank().to_index() as u8,
    )
}
fn piece_kind(piece: chess::Piece) -> PieceKind {
    match piece {
        chess::Piece::Pawn => PieceKind::Pawn,
        chess::Piece::Knight => PieceKind::Knight,
        chess::Piece::Bishop => PieceKind::Bishop,
        chess::Piece::Rook => PieceKind::Rook,
        chess::Piece::Queen => PieceKind::Queen,
        chess::Piece::King => PieceKind::King,
    }
}
fn reference_moves(board: &chess::Board) -> FxHashSet<Key> {
    chess::MoveGen::new_legal(board)
        .map(|movement| Key {
            origin: coord(movement.get_source()),
            destination: coord(movement.get_dest()),
            promotion: movement.get_promotion().map(piece_kind),
        })
        .collect()
}
fn our_moves(board: &Board, color: Color) -> FxHashSet<Key> {
    board
        .legal_moves(color)
        .into_iter()
        .flat_map(|movement| {
            let promotions: Vec<_> = if movement.kind(board) == Some(MoveKind::Promotion) {
                PromotionChoice::ALL.into_iter().map(|choice| Some(PieceKind::from(choice))).collect()
            } else {
                vec![None]
            };
            promotions.into_iter().map(move |promotion| Key {
                origin: movement.origin,
                destination: movement.destination,
                promotion,
            })
        })
        .collect()
}
fn castling_rights(board: &Board) -> String {
    let mut rights = String::new();
    for color in Color::ALL {
        let rank = color.home_rank();
        let king_ready = board.piece_at(Coord::new(4, rank)).is_some_and(|king| {
            king.kind == PieceKind::King && king.color == color && !king.moved
        });
        for (file, letter) in [(7, 'k'), (0, 'q')] {
            let rook_ready = board.piece_at(Coord::new(file, rank)).is_some_and(|rook| {
                rook.kind == PieceKind::Rook && rook.color == color && !rook.moved
            });
            if king_ready && rook_ready {
                rights.push(match color {
                    Color::White => letter.to_ascii_uppercase(),
                    Color::Black => letter,
                });
            }
        }
    }
    if rights.is_empty() {
        rights.push('-');
    }
    rights
}
fn fen(board: &Board, to_move: Color) -> String {
    let mut fen = String::new();
    for y in (0..8).rev() {
        let mut empty = 0;
        for x in 0..8 {
            match board.piece_at(Coord::new(x, y)) {
                Some(piece) => {
                    if empty != 0 {
                        write!(fen, "{empty}").unwrap();
                        empty = 0;
                    }
                    fen.push(match piece.color {
                        Color::White => piece.kind.uppercase(),
                        Color::Black => piece.kind.lowercase(),
                    });
                }
                None => empty += 1,
            }
        }
        if empty != 0 {
            write!(fen, "{empty}").unwrap();
        }
        if y != 0 {
            fen.push('/');
        }
    }
    let side = match to_move {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let en_passant = board.last_double_step().map_or_else(
        || "-".to_owned(),
        |position| {
            let behind = match to_move {
                Color::White => position.y() + 1,
                Color::Black => position.y() - 1,
            };
            Coord::new(position.x(), behind).to_string()
        },
    );
    write!(fen, " {side} {} {en_passant} 0 1", castling_rights(board)).unwrap();
    fen
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub games: u32,
    pub plies: u64,
    pub decisive: u32,
    pub drawn: u32,
}
impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games, {} plies, {} decisive, {} drawn",
            self.games, self.plies, self.decisive, self.drawn
        )?;
        Ok(())
    }
}
pub fn fuzz(seed: u64, games: u32, max_plies: u32) -> Summary {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut summary = Summary::default();
    for _ in 0..games {
        let mut game = Game::new();
        for _ in 0..max_plies {
            if game.outcome().is_some() {
                break;
            }
            let board = game.board();
            let fen = fen(board, game.turn());
            let reference: chess::Board = fen
                .parse()
                .unwrap_or_else(|err| panic!("{fen} was rejected: {err:?}"));
            let moves = our_moves(board, game.turn());
            let expected = reference_moves(&reference);
            if let Some(movement) = moves.difference(&expected).next() {
                panic!(
                    "found {movement} but it's not a legal move\n{}\n{fen}",
                    BoardDisplay::new(board),
                );
            }
            if let Some(movement) = expected.difference(&moves).next() {
                panic!("{movement} not found\n{}\n{fen}", BoardDisplay::new(board));
            }
            let moves: Box<[_]> = moves.into_iter().collect();
            let key = moves[rng.random_range(0..moves.len())];
            let movement = Move::new(game.turn(), key.origin, key.destination);
            let mut promotion = key.promotion.unwrap_or(PieceKind::Queen);
            if let Err(err) = game.apply(movement, &mut promotion) {
                panic!("{key} was generated but rejected: {err}");
            }
            summary.plies += 1;
        }
        match game.outcome() {
            Some(EndState::Win(_)) => summary.decisive += 1,
            Some(EndState::Draw(_)) => summary.drawn += 1,
            None => {}
        }
        summary.games += 1;
        debug!("game {} finished: {:?}", summary.games, game.outcome());
    }
    info!("fuzzing done: {summary}");
    summary
}
