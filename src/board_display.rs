use std::fmt::{self, Display, Formatter};

use chess_referee::{Board, Color, Coord};

const LIGHT: &str = "\x1b[30;107m";
const DARK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const RESET: &str = "\x1b[0m";

pub struct BoardDisplay<'a, 'b, 'c> {
    pub board: &'a Board,
    pub view: Color,
    pub highlighted: &'b [Coord],
    pub info: &'c str,
}
impl<'a> BoardDisplay<'a, '_, '_> {
    pub fn new(board: &'a Board) -> Self {
        BoardDisplay {
            board,
            view: Color::White,
            highlighted: &[],
            info: "",
        }
    }
}
impl Display for BoardDisplay<'_, '_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let y = match self.view {
                Color::White => 7 - row,
                Color::Black => row,
            };
            for column in 0..8 {
                let x = match self.view {
                    Color::White => column,
                    Color::Black => 7 - column,
                };
                let position = Coord::new(x, y);
                let color = if self.highlighted.contains(&position) {
                    HIGHLIGHTED
                } else {
                    match position.square_color() {
                        Color::White => LIGHT,
                        Color::Black => DARK,
                    }
                };
                let figurine = self
                    .board
                    .piece_at(position)
                    .map_or(' ', |piece| piece.figurine());
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{}", y + 1)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use chess_referee::{Board, Color};

    use crate::board_display::BoardDisplay;

    fn strip_ansi(text: &str) -> String {
        let mut stripped = String::new();
        let mut escape = false;
        for c in text.chars() {
            match (escape, c) {
                (false, '\x1b') => escape = true,
                (true, 'm') => escape = false,
                (false, c) => stripped.push(c),
                (true, _) => {}
            }
        }
        stripped
    }

    #[test]
    fn white_sits_at_the_bottom() {
        let board = Board::starting_position();
        let text = strip_ansi(&BoardDisplay::new(&board).to_string());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[7], "♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
        assert_eq!(lines[8], "a b c d e f g h");
    }
    #[test]
    fn flipped_view() {
        let board = Board::starting_position();
        let display = BoardDisplay {
            view: Color::Black,
            info: "white plays",
            ..BoardDisplay::new(&board)
        };
        let text = strip_ansi(&display.to_string());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "♖ ♘ ♗ ♔ ♕ ♗ ♘ ♖ 1 white plays");
        assert_eq!(lines[8], "h g f e d c b a");
    }
}
