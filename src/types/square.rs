use core::fmt;
use core::ops::{Index, IndexMut};

use crate::moves::moves::Direction;

use super::bitboard::Bitboard;

/// Rank-major square index: a1 = 0, h1 = 7, a8 = 56, h8 = 63
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

pub const NUM_SQUARES: usize = 64;

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    pub const fn from_coords(file: u8, rank: u8) -> Self {
        Square(rank * 8 + file)
    }

    /// Shift for callers that already know the destination is on the board
    #[inline(always)]
    pub const fn shift_unchecked(self, dir: Direction) -> Self {
        Square((self.0 as i8 + dir as i8) as u8)
    }

    /// Rank is the horizontal row of the piece (y-coord)
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// File is the vertical column of the piece (x-coord)
    pub const fn file(self) -> u8 {
        self.0 & 0b111
    }

    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    pub const fn is_valid(self) -> bool {
        self.0 < 64
    }

    pub const fn bitboard(self) -> Bitboard {
        Bitboard(1 << self.0)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..64).map(Self)
    }

    /// Parses a two character coordinate such as `e4`
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a').filter(|f| *f < 8)?;
        let rank = bytes[1].checked_sub(b'1').filter(|r| *r < 8)?;
        Some(Square::from_coords(file, rank))
    }
}

impl<T, const N: usize> Index<Square> for [T; N] {
    type Output = T;

    fn index(&self, index: Square) -> &Self::Output {
        &self[index.0 as usize]
    }
}

impl<T, const N: usize> IndexMut<Square> for [T; N] {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.0 as usize]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}
