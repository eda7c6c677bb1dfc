use std::{fmt, ops};

use crate::moves::{attack_boards::FILES, moves::Direction};

use super::square::Square;

#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Returns the index of the lowest bit of a bitboard, and modifies the bitboard to exclude
    /// that bit
    pub fn pop_lsb(&mut self) -> Square {
        debug_assert!(!self.is_empty());
        let lsb = self.lsb();
        self.0 &= self.0 - 1;
        lsb
    }

    /// Index of the lowest set bit. Returns square 64 for an empty board
    pub const fn lsb(self) -> Square {
        Square(self.0.trailing_zeros() as u8)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn occupied(self, sq: Square) -> bool {
        self & sq.bitboard() != Bitboard::EMPTY
    }

    pub fn empty(self, sq: Square) -> bool {
        !self.occupied(sq)
    }

    pub fn set(&mut self, sq: Square) {
        self.0 |= 1 << sq.0;
    }

    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1 << sq.0);
    }

    pub const fn count_bits(self) -> u32 {
        self.0.count_ones()
    }

    /// Executes a shift, dropping any bits that would wrap around to the other side of the board
    pub const fn shift(self, dir: Direction) -> Bitboard {
        match dir {
            Direction::North => Bitboard(self.0 << 8),
            Direction::NorthWest => Bitboard((self.0 << 7) & !FILES[7].0),
            Direction::West => Bitboard((self.0 >> 1) & !FILES[7].0),
            Direction::SouthWest => Bitboard((self.0 >> 9) & !FILES[7].0),
            Direction::South => Bitboard(self.0 >> 8),
            Direction::SouthEast => Bitboard((self.0 >> 7) & !FILES[0].0),
            Direction::East => Bitboard((self.0 << 1) & !FILES[0].0),
            Direction::NorthEast => Bitboard((self.0 << 9) & !FILES[0].0),
        }
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if *self == Bitboard::EMPTY {
            None
        } else {
            Some(self.pop_lsb())
        }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in (0..8).rev() {
            for col in 0..8 {
                let index = row * 8 + col;
                let bit_is_set = self.0 & (1 << index) != 0;

                if bit_is_set {
                    write!(f, "X")?;
                } else {
                    write!(f, ".")?;
                }

                if col < 7 {
                    write!(f, " ")?;
                }
            }

            if row > 0 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

// Macros from carp
macro_rules! impl_math_ops {
    ($($trait:ident::$fn:ident),*) => {
        $(impl std::ops::$trait for Bitboard {
            type Output = Self;

            fn $fn(self, other: Self) -> Self::Output {
                Self(std::ops::$trait::$fn(self.0, other.0))
            }
        })*
    };
}

impl_math_ops! {
    BitAnd::bitand,
    BitOr::bitor,
    BitXor::bitxor
}

macro_rules! impl_math_assign_ops {
    ($($trait:ident::$fn:ident),*) => {
        $(impl std::ops::$trait for Bitboard {

            fn $fn(&mut self, other: Self) {
                std::ops::$trait::$fn(&mut self.0, other.0)
            }
        })*
    };
}

impl_math_assign_ops! {
    BitAndAssign::bitand_assign,
    BitOrAssign::bitor_assign,
    BitXorAssign::bitxor_assign
}

#[cfg(test)]
mod bitboard_tests {
    use super::*;

    #[test]
    fn test_set_clear_count() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square(3));
        bb.set(Square(40));
        assert_eq!(bb.count_bits(), 2);
        assert!(bb.occupied(Square(40)));
        bb.clear(Square(40));
        assert!(bb.empty(Square(40)));
        assert_eq!(bb.count_bits(), 1);
    }

    #[test]
    fn test_pop_and_iterate() {
        let mut bb = Bitboard(0b1010_0001);
        assert_eq!(bb.pop_lsb(), Square(0));
        assert_eq!(bb.lsb(), Square(5));
        let squares: Vec<Square> = bb.collect();
        assert_eq!(squares, vec![Square(5), Square(7)]);
    }

    #[test]
    fn test_shift_does_not_wrap() {
        let h_file = Square::H1.bitboard();
        assert_eq!(h_file.shift(Direction::East), Bitboard::EMPTY);
        assert_eq!(h_file.shift(Direction::NorthEast), Bitboard::EMPTY);
        let a_file = Square::A8.bitboard();
        assert_eq!(a_file.shift(Direction::West), Bitboard::EMPTY);
        assert_eq!(a_file.shift(Direction::North), Bitboard::EMPTY);
        assert_eq!(Square(27).bitboard().shift(Direction::SouthWest), Square(18).bitboard());
    }
}
