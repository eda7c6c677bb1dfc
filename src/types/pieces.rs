use crate::impl_index;
use std::ops::{self, Index, IndexMut};

use strum_macros::EnumIter;

pub const NUM_COLORS: usize = 2;

impl_index!(Color);
#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

#[macro_export]
macro_rules! impl_index {
    ($enum_name:ident) => {
        impl<T, const N: usize> Index<$enum_name> for [T; N] {
            type Output = T;

            fn index(&self, index: $enum_name) -> &Self::Output {
                &self[index as usize]
            }
        }

        impl<T, const N: usize> IndexMut<$enum_name> for [T; N] {
            fn index_mut(&mut self, index: $enum_name) -> &mut Self::Output {
                &mut self[index as usize]
            }
        }
    };
}

impl Color {
    pub const fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// FEN side-to-move letter
    pub const fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl ops::Not for Color {
    type Output = Color;

    /// Side to move flips by xor with one
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl From<usize> for Color {
    fn from(value: usize) -> Self {
        match value & 1 {
            0 => Color::White,
            _ => Color::Black,
        }
    }
}

/// Material values in centipawns, indexed by `PieceName`
const PIECE_VALUES: [i32; NUM_PIECES] = [100, 320, 330, 500, 900, 0];
pub const NUM_PIECES: usize = 6;

impl_index!(PieceName);
#[derive(Debug, EnumIter, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceName {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceName {
    pub fn value(self) -> i32 {
        PIECE_VALUES[self]
    }

    pub const fn idx(self) -> usize {
        self as usize
    }

    pub(crate) const fn try_from_u8(u: u8) -> Option<PieceName> {
        match u {
            5 => Some(PieceName::King),
            4 => Some(PieceName::Queen),
            3 => Some(PieceName::Rook),
            2 => Some(PieceName::Bishop),
            1 => Some(PieceName::Knight),
            0 => Some(PieceName::Pawn),
            _ => None,
        }
    }

    /// Lowercase letter used by both FEN and UCI promotion suffixes
    pub const fn to_char(self) -> char {
        match self {
            PieceName::Pawn => 'p',
            PieceName::Knight => 'n',
            PieceName::Bishop => 'b',
            PieceName::Rook => 'r',
            PieceName::Queen => 'q',
            PieceName::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceName> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceName::Pawn),
            'n' => Some(PieceName::Knight),
            'b' => Some(PieceName::Bishop),
            'r' => Some(PieceName::Rook),
            'q' => Some(PieceName::Queen),
            'k' => Some(PieceName::King),
            _ => None,
        }
    }
}

#[derive(Eq, Copy, Clone, PartialEq, Debug, Hash)]
pub struct Piece {
    pub name: PieceName,
    pub color: Color,
}

impl Piece {
    pub const fn new(name: PieceName, color: Color) -> Self {
        Self { name, color }
    }

    /// Uppercase for white, lowercase for black
    pub fn to_fen_char(self) -> char {
        match self.color {
            Color::White => self.name.to_char().to_ascii_uppercase(),
            Color::Black => self.name.to_char(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let name = PieceName::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(name, color))
    }
}
