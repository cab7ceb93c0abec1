use std::{
    fmt::{self, Display, Formatter, Write as _},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    str::FromStr,
};

use chess_referee::{
    Color, Coord, Game, Move, PieceKind,
    coord::ParseCoordError,
    piece::ParsePieceKindError,
};
use thiserror::Error;

use crate::board_display::BoardDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MoveInput {
    origin: Coord,
    destination: Coord,
    promotion: Option<PieceKind>,
}
impl Display for MoveInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
enum ParseMoveInputError {
    #[error("expected a move like `e2e4`, found nothing")]
    Empty,
    #[error(transparent)]
    Coord(#[from] ParseCoordError),
    #[error(transparent)]
    Promotion(#[from] ParsePieceKindError),
    #[error("unexpected `{0}` after the move")]
    UnexpectedSymbol(char),
}
impl FromStr for MoveInput {
    type Err = ParseMoveInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let mut coord = || -> Result<Coord, ParseMoveInputError> {
            let x = characters.next().ok_or(ParseMoveInputError::Empty)?;
            let y = characters.next().ok_or(ParseCoordError::YNotProvided)?;
            Ok(Coord::from_chars(x, y)?)
        };
        let origin = coord()?;
        let destination = coord()?;
        let promotion = characters.next().map(PieceKind::try_from).transpose()?;
        if let Some(c) = characters.next() {
            return Err(ParseMoveInputError::UnexpectedSymbol(c));
        }
        Ok(MoveInput {
            origin,
            destination,
            promotion,
        })
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Input {
    Help,
    Flip,
    Restart,
    Quit,
    Coord(Coord),
    Move(MoveInput),
}
impl FromStr for Input {
    type Err = ParseMoveInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "quit" | "exit" => Ok(Input::Quit),
            s => {
                if let Ok(position) = s.parse() {
                    Ok(Input::Coord(position))
                } else {
                    Ok(Input::Move(s.parse()?))
                }
            }
        }
    }
}
fn status(game: &Game) -> String {
    let mut info = String::new();
    match game.outcome() {
        Some(outcome) => {
            if let Some(winner) = outcome.winner() {
                writeln!(info, "{} is checkmated", !winner).unwrap();
            }
            writeln!(info, "{outcome}").unwrap();
            writeln!(info, "type `restart` for a new game").unwrap();
        }
        None => {
            writeln!(info, "{} plays", game.turn()).unwrap();
            if game.is_in_check(game.turn()) {
                writeln!(info, "{} is in check", game.turn()).unwrap();
            }
        }
    }
    info
}
pub fn repl() -> io::Result<()> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let mut game = Game::new();
    let mut highlighted = Vec::new();
    let mut view = Color::White;
    let mut first_time = true;
    loop {
        let mut info = status(&game);
        if first_time {
            writeln!(info, "type `help` for instructions").unwrap();
            first_time = false;
        }
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: game.board(),
                view,
                highlighted: &highlighted,
                info: &info,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let text = text?;
            let input = match text.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    writeln!(error, "for available command, enter `help`")?;
                    continue;
                }
            };
            match input {
                Input::Help => {
                    writeln!(output, "flip    - flip the board")?;
                    writeln!(output, "restart - reset to starting position")?;
                    writeln!(output, "quit    - quit the game")?;
                    writeln!(output, "e2      - view legal moves")?;
                    writeln!(output, "e2e4    - play the move")?;
                    writeln!(output, "e7e8n   - move and promote (queen when omitted)")?;
                    writeln!(output, "e1g1    - perform castling")?;
                    continue;
                }
                Input::Flip => {
                    view = !view;
                }
                Input::Restart => {
                    game = Game::new();
                    highlighted.clear();
                }
                Input::Quit => return Ok(()),
                Input::Coord(position) => {
                    let Some(piece) = game.board().piece_at(position) else {
                        writeln!(error, "Error: No piece found on {position}")?;
                        continue;
                    };
                    if piece.color != game.turn() {
                        writeln!(error, "Error: It is {}'s turn", game.turn())?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.extend(game.legal_destinations(position));
                }
                Input::Move(movement) => {
                    let mut promotion = movement.promotion.unwrap_or(PieceKind::Queen);
                    let proposed = Move::new(game.turn(), movement.origin, movement.destination);
                    if let Err(err) = game.apply(proposed, &mut promotion) {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                    highlighted.clear();
                    highlighted.push(movement.origin);
                    highlighted.push(movement.destination);
                }
            }
            break;
        }
    }
}
