use log::{debug, info};

use crate::{
    board::Board,
    color::Color,
    coord::Coord,
    end_state::EndState,
    error::MoveError,
    moves::{Move, MoveKind, Ply},
    piece::{PieceKind, PromotionChoice, Square},
};

pub trait PromotionSelector {
    fn select(&mut self, movement: &Move) -> PieceKind;
}
impl PromotionSelector for PieceKind {
    fn select(&mut self, _: &Move) -> PieceKind {
        *self
    }
}
impl PromotionSelector for PromotionChoice {
    fn select(&mut self, _: &Move) -> PieceKind {
        PieceKind::from(*self)
    }
}
impl<F> PromotionSelector for F
where
    F: FnMut(&Move) -> PieceKind,
{
    fn select(&mut self, movement: &Move) -> PieceKind {
        self(movement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    outcome: Option<EndState>,
}
impl Game {
    pub fn new() -> Self {
        Game {
            board: Board::starting_position(),
            turn: Color::White,
            outcome: None,
        }
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn turn(&self) -> Color {
        self.turn
    }
    pub fn outcome(&self) -> Option<EndState> {
        self.outcome
    }
    pub fn history(&self) -> &[Ply] {
        self.board.history()
    }
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.board.squares()
    }
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.board.legal_moves(self.turn)
    }
    pub fn legal_destinations(&self, position: Coord) -> Vec<Coord> {
        match self.board.piece_at(position) {
            Some(piece) if piece.color == self.turn && self.outcome.is_none() => piece
                .legal_moves(&self.board)
                .into_iter()
                .map(|movement| movement.destination)
                .collect(),
            _ => Vec::new(),
        }
    }
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.in_check(color)
    }
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.board.is_checkmate(color)
    }
    pub fn is_stalemate(&self, color: Color) -> bool {
        self.board.is_stalemate(color)
    }
    pub fn has_insufficient_material(&self) -> bool {
        self.board.has_insufficient_material()
    }
    /// Plays `movement` for the side to move. On success the turn passes and
    /// the outcome is evaluated for the side now to move. On error nothing
    /// changes.
    pub fn apply(
        &mut self,
        movement: Move,
        selector: &mut impl PromotionSelector,
    ) -> Result<&Board, MoveError> {
        if let Some(outcome) = self.outcome {
            return Err(MoveError::GameOver(outcome));
        }
        if movement.color != self.turn {
            debug!("rejected {movement}, it is {}'s turn", self.turn);
            return Err(MoveError::NotYourTurn);
        }
        if !movement.is_legal(&self.board) {
            debug!("rejected {movement}");
            return Err(MoveError::Illegal(movement));
        }
        let promotion = if movement.kind(&self.board) == Some(MoveKind::Promotion) {
            Some(PromotionChoice::try_from(selector.select(&movement))?)
        } else {
            None
        };
        self.board = self.board.commit(Ply::new(movement, promotion));
        self.turn = !self.turn;
        self.outcome = self.board.outcome(self.turn);
        if let Some(outcome) = self.outcome {
            info!("game over after {} plies: {outcome}", self.board.history().len());
        }
        Ok(&self.board)
    }
}
impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use crate::{
        board::Board,
        color::Color,
        coord,
        end_state::{DrawReason, EndState},
        error::MoveError,
        game::Game,
        moves::{Move, Ply},
        piece::{PieceKind, PromotionChoice, Square},
    };

    fn play(game: &mut Game, moves: &[&str]) {
        for text in moves {
            let movement = Move::new(game.turn(), coord!(&text[0..2]), coord!(&text[2..4]));
            game.apply(movement, &mut PieceKind::Queen).unwrap();
        }
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(
            game.apply(Move::new(Color::Black, coord!("e7"), coord!("e5")), &mut PieceKind::Queen),
            Err(MoveError::NotYourTurn)
        );
        play(&mut game, &["e2e4"]);
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(
            game.apply(Move::new(Color::White, coord!("d2"), coord!("d4")), &mut PieceKind::Queen),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(game.history().len(), 1);
    }
    #[test]
    fn illegal_move_leaves_the_game_untouched() {
        let mut game = Game::new();
        let before = game.clone();
        let movement = Move::new(Color::White, coord!("e2"), coord!("e5"));
        assert_eq!(
            game.apply(movement, &mut PieceKind::Queen),
            Err(MoveError::Illegal(movement))
        );
        assert_eq!(game, before);
    }
    #[test]
    fn scholars_mate_ends_the_game() {
        let mut game = Game::new();
        play(
            &mut game,
            &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
        );
        assert!(game.is_in_check(Color::Black));
        assert!(game.is_checkmate(Color::Black));
        assert_eq!(game.outcome(), Some(EndState::Win(Color::White)));
        assert!(game.legal_moves().is_empty());
        let movement = Move::new(Color::Black, coord!("e8"), coord!("f7"));
        assert_eq!(
            game.apply(movement, &mut PieceKind::Queen),
            Err(MoveError::GameOver(EndState::Win(Color::White)))
        );
    }
    #[test]
    fn legal_destinations_follow_the_turn() {
        let mut game = Game::new();
        let mut destinations = game.legal_destinations(coord!("g1"));
        destinations.sort_by_key(|position| position.x());
        assert_eq!(destinations, [coord!("f3"), coord!("h3")]);
        assert!(game.legal_destinations(coord!("g8")).is_empty());
        assert!(game.legal_destinations(coord!("e4")).is_empty());
        play(&mut game, &["e2e4"]);
        assert!(game.legal_destinations(coord!("g1")).is_empty());
        assert_eq!(game.legal_destinations(coord!("g8")).len(), 2);
    }
    #[test]
    fn en_passant_through_the_game() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert!(game.legal_destinations(coord!("e5")).contains(&coord!("d6")));
        play(&mut game, &["e5d6"]);
        assert!(game.board().piece_at(coord!("d5")).is_none());
    }
    fn promotion_game() -> Game {
        let mut game = Game::new();
        play(
            &mut game,
            &[
                "h2h4", "g7g5", "h4g5", "h7h6", "g5h6", "f8g7", "h6g7", "g8f6",
            ],
        );
        game
    }
    #[test]
    fn promotion_asks_the_selector() {
        let mut game = promotion_game();
        let mut asked = Vec::new();
        let movement = Move::new(Color::White, coord!("g7"), coord!("h8"));
        game.apply(movement, &mut |movement: &Move| {
            asked.push(*movement);
            PieceKind::Knight
        })
        .unwrap();
        assert_eq!(asked, [movement]);
        let knight = game.board().piece_at(coord!("h8")).unwrap();
        assert_eq!((knight.kind, knight.color), (PieceKind::Knight, Color::White));
        assert_eq!(
            game.history().last(),
            Some(&Ply::new(movement, Some(PromotionChoice::Knight)))
        );
    }
    #[test]
    fn promotion_to_a_king_is_rejected() {
        let mut game = promotion_game();
        let before = game.clone();
        let movement = Move::new(Color::White, coord!("g7"), coord!("h8"));
        assert_eq!(
            game.apply(movement, &mut PieceKind::King),
            Err(MoveError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(game, before);
        game.apply(movement, &mut PromotionChoice::Rook).unwrap();
        assert_eq!(game.board().piece_at(coord!("h8")).unwrap().kind, PieceKind::Rook);
    }
    #[test]
    fn regular_moves_never_ask_for_a_promotion() {
        let mut game = Game::new();
        let movement = Move::new(Color::White, coord!("e2"), coord!("e4"));
        game.apply(movement, &mut |_: &Move| -> PieceKind {
            panic!("asked for a promotion on a regular move")
        })
        .unwrap();
    }
    #[test]
    fn castling_through_the_game() {
        let mut game = Game::new();
        play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"]);
        assert!(game.legal_destinations(coord!("e1")).contains(&coord!("g1")));
        play(&mut game, &["e1g1"]);
        assert_eq!(game.board().piece_at(coord!("f1")).unwrap().kind, PieceKind::Rook);
    }
    #[test]
    fn legal_moves_never_leave_the_king_in_check() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..3 {
            let mut game = Game::new();
            for _ in 0..24 {
                let moves = game.legal_moves();
                if moves.is_empty() {
                    break;
                }
                for movement in &moves {
                    let next = game.board().resolve(Ply::speculative(*movement));
                    assert!(!next.in_check(movement.color), "{movement} on {}", game.board());
                }
                let movement = moves[rng.random_range(0..moves.len())];
                let board = game.apply(movement, &mut PieceKind::Queen).unwrap();
                assert_eq!(board.clone(), Board::replay(board.history()));
            }
        }
    }
    #[test]
    fn stalemate_ends_the_game() {
        let mut game = Game::new();
        play(
            &mut game,
            &[
                "e2e3", "a7a5", "d1h5", "a8a6", "h5a5", "h7h5", "h2h4", "a6h6", "a5c7", "f7f6",
                "c7d7", "e8f7", "d7b7", "d8d3", "b7b8", "d3h7", "b8c8", "f7g6",
            ],
        );
        assert_eq!(game.outcome(), None);
        play(&mut game, &["c8e6"]);
        assert_eq!(game.turn(), Color::Black);
        assert!(game.is_stalemate(Color::Black));
        assert!(!game.is_in_check(Color::Black));
        assert_eq!(game.outcome(), Some(EndState::Draw(DrawReason::Stalemate)));
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.apply(Move::new(Color::Black, coord!("g6"), coord!("g5")), &mut PieceKind::Queen),
            Err(MoveError::GameOver(EndState::Draw(DrawReason::Stalemate)))
        );
    }
    #[test]
    fn insufficient_material_ends_the_game() {
        let mut game = Game {
            board: Board::from_arrangement([
                (PieceKind::King, Color::White, "e1"),
                (PieceKind::Knight, Color::White, "c3"),
                (PieceKind::King, Color::Black, "e8"),
                (PieceKind::Pawn, Color::Black, "d5"),
            ]),
            turn: Color::White,
            outcome: None,
        };
        assert!(!game.has_insufficient_material());
        play(&mut game, &["c3d5"]);
        assert!(game.has_insufficient_material());
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(
            game.outcome(),
            Some(EndState::Draw(DrawReason::InsufficientMaterial))
        );
        let kinds: Vec<_> = game
            .squares()
            .filter_map(Square::piece)
            .map(|piece| piece.kind)
            .collect();
        assert_eq!(kinds, [PieceKind::King, PieceKind::Knight, PieceKind::King]);
    }
}
