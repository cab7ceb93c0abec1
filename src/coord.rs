use std::{
    fmt::{self, Display, Formatter},
    ops::{Mul, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::color::Color;

// coordinate literal for tests, like `coord!("e4")`
#[macro_export]
macro_rules! coord {
    ($square:expr) => {
        <$crate::coord::Coord as ::std::str::FromStr>::from_str($square).unwrap()
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseCoordError {
    #[error("expected 2 characters, found none instead")]
    Empty,
    #[error("expected 2 characters, found 1 instead")]
    YNotProvided,
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidX(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidY(char),
    #[error("unexpected `{0}`, only 2 characters are expected")]
    UnexpectedSymbol(char),
}

// A square of the board: `x` is the file (`a` = 0), `y` is the rank (`1` = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    x: u8,
    y: u8,
}
impl Coord {
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 8, "{x} should be < 8");
        debug_assert!(y < 8, "{y} should be < 8");
        Coord { x, y }
    }
    pub fn new_checked(x: u8, y: u8) -> Option<Self> {
        if x >= 8 || y >= 8 {
            None
        } else {
            Some(Coord::new(x, y))
        }
    }
    pub fn x(self) -> u8 {
        self.x
    }
    pub fn y(self) -> u8 {
        self.y
    }
    pub fn is_on_board(self) -> bool {
        self.x < 8 && self.y < 8
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Coord::new_checked(
            self.x.checked_add_signed(movement.x)?,
            self.y.checked_add_signed(movement.y)?,
        )
    }
    pub fn square_color(self) -> Color {
        match (self.x + self.y) % 2 {
            0 => Color::Black,
            1 => Color::White,
            _ => unreachable!(),
        }
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|y| (0..8).map(move |x| Coord::new(x, y)))
    }
    pub fn from_chars(x: char, y: char) -> Result<Self, ParseCoordError> {
        let x = match x {
            'a'..='h' => x as u8 - b'a',
            _ => return Err(ParseCoordError::InvalidX(x)),
        };
        let y = match y {
            '1'..='8' => y as u8 - b'1',
            _ => return Err(ParseCoordError::InvalidY(y)),
        };
        Ok(Coord::new(x, y))
    }
}
impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let x = (self.x + b'a') as char;
        let y = self.y + 1;
        write!(f, "{x}{y}")?;
        Ok(())
    }
}
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let x = characters.next().ok_or(ParseCoordError::Empty)?;
        let y = characters.next().ok_or(ParseCoordError::YNotProvided)?;
        let coord = Coord::from_chars(x, y)?;
        if let Some(c) = characters.next() {
            return Err(ParseCoordError::UnexpectedSymbol(c));
        }
        Ok(coord)
    }
}
impl Sub<Self> for Coord {
    type Output = Vector;

    #[allow(clippy::cast_possible_wrap, reason = "both operands are < 8")]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x as i8 - rhs.x as i8,
            y: self.y as i8 - rhs.y as i8,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i8,
    pub y: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { x: 0, y: 0 };

    pub const KNIGHT: [Self; 8] = [
        Vector { x: -1, y: -2 },
        Vector { x: -2, y: -1 },
        Vector { x: -2, y: 1 },
        Vector { x: -1, y: 2 },
        Vector { x: 2, y: 1 },
        Vector { x: 1, y: 2 },
        Vector { x: 2, y: -1 },
        Vector { x: 1, y: -2 },
    ];
    pub const KING: [Self; 8] = [
        Vector { x: -1, y: 0 },
        Vector { x: -1, y: 1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 1 },
        Vector { x: 1, y: 0 },
        Vector { x: 1, y: -1 },
        Vector { x: 0, y: -1 },
        Vector { x: -1, y: -1 },
    ];
    pub const QUEEN: [Self; 8] = Vector::KING;
    pub const ROOK: [Self; 4] = [
        Vector { x: -1, y: 0 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 0 },
        Vector { x: 0, y: -1 },
    ];
    pub const BISHOP: [Self; 4] = [
        Vector { x: -1, y: 1 },
        Vector { x: 1, y: 1 },
        Vector { x: 1, y: -1 },
        Vector { x: -1, y: -1 },
    ];
    // written for white, black flips the rank
    pub const PAWN: [Self; 3] = [
        Vector { x: -1, y: 1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 1 },
    ];

    pub fn pawn_forward(color: Color) -> Self {
        Vector {
            x: 0,
            y: color.pawn_direction(),
        }
    }
    pub fn pawn_captures(color: Color) -> [Self; 2] {
        [-1, 1].map(|x| Vector {
            x,
            y: color.pawn_direction(),
        })
    }
    pub fn mirrored_for(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => Vector {
                x: self.x,
                y: -self.y,
            },
        }
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub start: Coord,
    pub offset: Vector,
    pub length: u8,
}
impl Direction {
    pub fn new(start: Coord, offset: Vector, length: u8) -> Self {
        debug_assert_ne!(offset, Vector::ZERO);
        Direction {
            start,
            offset,
            length,
        }
    }
    pub fn squares(self) -> impl Iterator<Item = Coord> {
        (1..=i8::try_from(self.length).unwrap_or(i8::MAX))
            .map_while(move |distance| self.start.move_by(self.offset * distance))
    }
}
