use std::{
    fmt::{self, Display, Formatter},
    iter::once,
    rc::Rc,
};

use log::{debug, trace};

use crate::{
    color::Color,
    coord::Coord,
    error::MoveError,
    moves::{Move, MoveKind, Ply},
    piece::{Piece, PieceKind, PromotionChoice, Square},
};

const SLOTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PieceIndex(u8);

impl From<PieceIndex> for usize {
    fn from(value: PieceIndex) -> Self {
        usize::from(value.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [Option<Piece>; SLOTS],
    grid: [[Option<PieceIndex>; 8]; 8],
    initial: Rc<[Piece]>,
    history: Vec<Ply>,
    last_double_step: Option<Coord>,
}
impl Board {
    pub fn starting_position() -> Self {
        Board::from_initial(Board::standard_arrangement())
    }
    fn standard_arrangement() -> Rc<[Piece]> {
        Color::ALL
            .into_iter()
            .flat_map(|color| {
                let back_rank = PieceKind::STARTING_CONFIGURATION
                    .into_iter()
                    .zip(0..)
                    .map(move |(kind, x)| {
                        Piece::new(kind, color, Coord::new(x, color.home_rank()))
                    });
                let pawns = (0..8).map(move |x| {
                    Piece::new(PieceKind::Pawn, color, Coord::new(x, color.pawn_rank()))
                });
                back_rank.chain(pawns)
            })
            .collect()
    }
    fn from_initial(initial: Rc<[Piece]>) -> Self {
        let mut board = Board {
            pieces: [None; SLOTS],
            grid: [[None; 8]; 8],
            initial: Rc::clone(&initial),
            history: Vec::new(),
            last_double_step: None,
        };
        for piece in initial.iter().copied() {
            board.place(piece);
        }
        board
    }
    pub fn replay(plies: &[Ply]) -> Self {
        Board::replay_from(Board::standard_arrangement(), plies.iter().copied())
    }
    fn replay_from(initial: Rc<[Piece]>, plies: impl IntoIterator<Item = Ply>) -> Self {
        let mut board = Board::from_initial(initial);
        for ply in plies {
            board.execute(ply);
        }
        board
    }
    /// The board that would result from `ply`, built from scratch out of the
    /// move log. `self` is left untouched.
    pub fn resolve(&self, ply: Ply) -> Self {
        trace!("resolving {ply} on top of {} plies", self.history.len());
        Board::replay_from(
            Rc::clone(&self.initial),
            self.history.iter().copied().chain(once(ply)),
        )
    }
    pub fn apply(
        &self,
        movement: Move,
        promotion: Option<PromotionChoice>,
    ) -> Result<Self, MoveError> {
        if !movement.is_legal(self) {
            debug!("rejected {movement}");
            return Err(MoveError::Illegal(movement));
        }
        let promotion = (movement.kind(self) == Some(MoveKind::Promotion))
            .then(|| promotion.unwrap_or_default());
        Ok(self.commit(Ply::new(movement, promotion)))
    }
    pub(crate) fn commit(&self, ply: Ply) -> Self {
        let mut board = self.clone();
        board.execute(ply);
        debug!("committed {ply}");
        board
    }
    pub fn history(&self) -> &[Ply] {
        &self.history
    }
    pub(crate) fn push_history(&mut self, ply: Ply) {
        self.history.push(ply);
    }
    pub fn last_double_step(&self) -> Option<Coord> {
        self.last_double_step
    }
    pub(crate) fn set_last_double_step(&mut self, position: Option<Coord>) {
        self.last_double_step = position;
    }
    pub fn current_player(&self) -> Color {
        if self.history.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
    pub fn piece_at(&self, position: Coord) -> Option<Piece> {
        self.cell(position)
            .map(|index| self.pieces[usize::from(index)].expect("grid points to an empty slot"))
    }
    pub fn square(&self, position: Coord) -> Square {
        match self.piece_at(position) {
            Some(piece) => Square::Occupied(piece),
            None => Square::Empty(position),
        }
    }
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        Coord::all().map(move |position| self.square(position))
    }
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter().copied().flatten()
    }
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |piece| piece.color == color)
    }
    pub fn king_of(&self, color: Color) -> Option<Piece> {
        self.pieces_of(color)
            .find(|piece| piece.kind == PieceKind::King)
    }
    fn cell(&self, position: Coord) -> Option<PieceIndex> {
        self.grid[usize::from(position.y())][usize::from(position.x())]
    }
    fn cell_mut(&mut self, position: Coord) -> &mut Option<PieceIndex> {
        &mut self.grid[usize::from(position.y())][usize::from(position.x())]
    }
    fn place(&mut self, piece: Piece) {
        let Some(slot) = self.pieces.iter().position(Option::is_none) else {
            panic!("no room left for {piece}");
        };
        self.pieces[slot] = Some(piece);
        *self.cell_mut(piece.position) =
            Some(PieceIndex(u8::try_from(slot).expect("slot count fits in a byte")));
    }
    /// Puts `piece` on `position` and marks it as moved.
    ///
    /// # Panics
    ///
    /// When `position` is already occupied.
    pub(crate) fn add_piece(&mut self, mut piece: Piece, position: Coord) {
        if let Some(occupant) = self.piece_at(position) {
            panic!(
                "cannot add {} {} to {position}, {occupant} is there",
                piece.color, piece.kind
            );
        }
        piece.position = position;
        piece.moved = true;
        self.place(piece);
    }
    pub(crate) fn remove_piece(&mut self, position: Coord) -> Option<Piece> {
        let index = self.cell_mut(position).take()?;
        self.pieces[usize::from(index)].take()
    }
    pub(crate) fn is_consistent(&self) -> bool {
        let from_grid = Coord::all()
            .filter_map(|position| {
                let index = self.cell(position)?;
                Some((position, self.pieces[usize::from(index)]))
            })
            .all(|(position, piece)| piece.is_some_and(|piece| piece.position == position));
        let from_slots = self.pieces().all(|piece| {
            self.cell(piece.position)
                .is_some_and(|index| self.pieces[usize::from(index)] == Some(piece))
        });
        let occupied = self
            .grid
            .iter()
            .flatten()
            .filter(|index| index.is_some())
            .count();
        from_grid && from_slots && occupied == self.pieces().count()
    }
    #[cfg(test)]
    pub(crate) fn from_arrangement<'a>(
        pieces: impl IntoIterator<Item = (PieceKind, Color, &'a str)>,
    ) -> Self {
        let initial: Rc<[Piece]> = pieces
            .into_iter()
            .map(|(kind, color, position)| Piece::new(kind, color, position.parse().unwrap()))
            .collect();
        Board::from_initial(initial)
    }
    #[cfg(test)]
    pub(crate) fn play(&self, moves: &[&str]) -> Result<Self, MoveError> {
        let mut board = self.clone();
        for text in moves {
            let origin = text[0..2].parse().unwrap();
            let destination = text[2..4].parse().unwrap();
            let promotion = text
                .chars()
                .nth(4)
                .map(|c| PromotionChoice::try_from(PieceKind::try_from(c).unwrap()).unwrap());
            let color = board.current_player();
            board = board.apply(Move::new(color, origin, destination), promotion)?;
        }
        Ok(board)
    }
}
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, piece) in self.pieces().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}
