use std::fmt::{self, Display, Formatter};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
}
impl Display for DrawReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::Stalemate => write!(f, "stalemate")?,
            DrawReason::InsufficientMaterial => write!(f, "insufficient material")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    Win(Color),
    Draw(DrawReason),
}
impl EndState {
    pub fn winner(self) -> Option<Color> {
        match self {
            EndState::Win(color) => Some(color),
            EndState::Draw(_) => None,
        }
    }
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win(color) => write!(f, "{color} wins")?,
            EndState::Draw(reason) => write!(f, "draw by {reason}")?,
        }
        Ok(())
    }
}
