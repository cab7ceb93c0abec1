use std::{
    fmt::{self, Display, Formatter},
    ops::Not,
    str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("provided string was not `w`, `b`, `W`, `B`, `white`, or `black`")]
pub struct ParseColorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const ALL: [Self; 2] = [Color::White, Color::Black];

    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
    pub fn en_passant_rank(self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white")?,
            Color::Black => write!(f, "black")?,
        }
        Ok(())
    }
}
impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let color = match s {
            "w" | "W" | "white" => Color::White,
            "b" | "B" | "black" => Color::Black,
            _ => return Err(ParseColorError),
        };
        Ok(color)
    }
}
impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}
