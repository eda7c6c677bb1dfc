use core::fmt;
use std::ops;

use crate::{
    error::MoveError,
    moves::moves::Direction::*,
    types::{pieces::PieceName, square::Square},
};

use strum_macros::EnumIter;

/// Cardinal directions from the point of view of white side
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North = 8,
    NorthWest = 7,
    West = -1,
    SouthWest = -9,
    South = -8,
    SouthEast = -7,
    East = 1,
    NorthEast = 9,
}

impl Direction {
    /// Returns the opposite direction of the given direction
    pub fn opp(&self) -> Self {
        match self {
            North => South,
            NorthWest => SouthEast,
            West => East,
            SouthWest => NorthEast,
            South => North,
            SouthEast => NorthWest,
            East => West,
            NorthEast => SouthWest,
        }
    }
}

/// Metadata bits attached to a move by the generator that produced it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NORMAL: MoveFlags = MoveFlags(0);
    pub const CASTLE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const PROMOTION: MoveFlags = MoveFlags(4);
    pub const CAPTURE: MoveFlags = MoveFlags(8);

    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl ops::BitOr for MoveFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        MoveFlags(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for MoveFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceName>,
    pub flags: MoveFlags,
}

impl Move {
    pub const NULL: Move = Move { from: Square(0), to: Square(0), promotion: None, flags: MoveFlags::NORMAL };

    pub const fn new(from: Square, to: Square, promotion: Option<PieceName>, flags: MoveFlags) -> Self {
        Self { from, to, promotion, flags }
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline(always)]
    pub const fn is_castle(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    #[inline(always)]
    pub const fn is_en_passant(self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    /// Determines if a move is "quiet" for quiescence search
    #[inline(always)]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    pub fn is_null(self) -> bool {
        self == Move::NULL
    }

    /// Which corner a castling move uses, looked up from the king's destination
    pub fn castle_type(self) -> Option<Castle> {
        if !self.is_castle() {
            return None;
        }
        match self.to {
            Square::G1 => Some(Castle::WhiteKing),
            Square::C1 => Some(Castle::WhiteQueen),
            Square::G8 => Some(Castle::BlackKing),
            Square::C8 => Some(Castle::BlackQueen),
            _ => None,
        }
    }

    /// To Long Algebraic Notation
    pub fn to_uci(self) -> String {
        let mut str = format!("{}{}", self.from, self.to);
        if let Some(p) = self.promotion {
            str.push(p.to_char());
        }
        str
    }

    /// Parses a UCI move without a board. Castling is recognized from the four king
    /// start/end square pairs. Captures and en passant can only be known with a position, see
    /// `Position::parse_uci_move`.
    pub fn from_uci(str: &str) -> Result<Move, MoveError> {
        if !str.is_ascii() || !(4..=5).contains(&str.len()) {
            return Err(MoveError::Malformed(str.to_string()));
        }
        let from = Square::from_algebraic(&str[0..2]).ok_or_else(|| MoveError::BadSquare(str[0..2].to_string()))?;
        let to = Square::from_algebraic(&str[2..4]).ok_or_else(|| MoveError::BadSquare(str[2..4].to_string()))?;
        let mut flags = MoveFlags::NORMAL;
        let promotion = match str.chars().nth(4) {
            None => None,
            Some(c) => match PieceName::from_char(c) {
                Some(p @ (PieceName::Queen | PieceName::Rook | PieceName::Bishop | PieceName::Knight))
                    if c.is_ascii_lowercase() =>
                {
                    flags |= MoveFlags::PROMOTION;
                    Some(p)
                }
                _ => return Err(MoveError::BadPromotion(c)),
            },
        };
        if matches!((from, to), (Square::E1, Square::G1 | Square::C1) | (Square::E8, Square::G8 | Square::C8)) {
            flags |= MoveFlags::CASTLE;
        }
        Ok(Move::new(from, to, promotion, flags))
    }

    pub fn pack(self) -> PackedMove {
        PackedMove::encode(self)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// A move needs 16 bits to be stored, with its flags kept alongside
///
/// bit  0- 5: origin square (from 0 to 63)
/// bit  6-11: destination square (from 0 to 63)
/// bit 12-15: promotion piece, zero for none, otherwise piece index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedMove {
    bits: u16,
    flags: MoveFlags,
}

impl PackedMove {
    pub const NULL: PackedMove = PackedMove { bits: 0, flags: MoveFlags::NORMAL };

    pub fn encode(m: Move) -> Self {
        let promotion = m.promotion.map_or(0, |p| p.idx() as u16);
        let bits = m.from.0 as u16 | ((m.to.0 as u16) << 6) | (promotion << 12);
        Self { bits, flags: m.flags }
    }

    pub fn decode(self) -> Move {
        let from = Square((self.bits & 0b111111) as u8);
        let to = Square(((self.bits >> 6) & 0b111111) as u8);
        let promotion = match self.bits >> 12 {
            0 => None,
            p => PieceName::try_from_u8(p as u8),
        };
        Move::new(from, to, promotion, self.flags)
    }

    pub fn is_null(self) -> bool {
        self == PackedMove::NULL
    }
}

/// Castling rights bits, as stored in the position's four bit mask
#[derive(Clone, Copy, Debug, EnumIter, PartialEq, Eq)]
pub enum Castle {
    WhiteKing = 1,
    WhiteQueen = 2,
    BlackKing = 4,
    BlackQueen = 8,
}

impl Castle {
    /// Squares that must be empty between king and rook
    pub const fn empty_squares(self) -> &'static [Square] {
        match self {
            Castle::WhiteKing => &[Square::F1, Square::G1],
            Castle::WhiteQueen => &[Square::B1, Square::C1, Square::D1],
            Castle::BlackKing => &[Square::F8, Square::G8],
            Castle::BlackQueen => &[Square::B8, Square::C8, Square::D8],
        }
    }

    /// Start, transit and destination squares of the king, none of which may be attacked
    pub const fn king_path(self) -> [Square; 3] {
        match self {
            Castle::WhiteKing => [Square::E1, Square::F1, Square::G1],
            Castle::WhiteQueen => [Square::E1, Square::D1, Square::C1],
            Castle::BlackKing => [Square::E8, Square::F8, Square::G8],
            Castle::BlackQueen => [Square::E8, Square::D8, Square::C8],
        }
    }

    /// Rook origin and destination
    pub const fn rook_squares(self) -> (Square, Square) {
        match self {
            Castle::WhiteKing => (Square::H1, Square::F1),
            Castle::WhiteQueen => (Square::A1, Square::D1),
            Castle::BlackKing => (Square::H8, Square::F8),
            Castle::BlackQueen => (Square::A8, Square::D8),
        }
    }

    pub const fn fen_char(self) -> char {
        match self {
            Castle::WhiteKing => 'K',
            Castle::WhiteQueen => 'Q',
            Castle::BlackKing => 'k',
            Castle::BlackQueen => 'q',
        }
    }
}

/// Castling rights that survive a move touching each square. A king move clears both rights of
/// its color, a move from or onto a rook's corner clears that corner's right.
#[rustfmt::skip]
pub const CASTLING_RIGHTS: [u8; 64] = [
    13, 15, 15, 15, 12, 15, 15, 14,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
     7, 15, 15, 15,  3, 15, 15, 11,
];

#[cfg(test)]
mod move_test {
    use super::*;

    #[test]
    fn test_flags() {
        let m = Move::new(Square(12), Square(28), None, MoveFlags::NORMAL);
        assert!(m.is_quiet());
        assert!(!m.is_capture());

        let m = Move::new(Square(52), Square(61), Some(PieceName::Queen), MoveFlags::PROMOTION | MoveFlags::CAPTURE);
        assert!(m.is_promotion());
        assert!(m.is_capture());
        assert!(!m.is_castle());
        assert!(!m.is_quiet());

        let m = Move::new(Square(36), Square(43), None, MoveFlags::CAPTURE | MoveFlags::EN_PASSANT);
        assert!(m.is_en_passant());
        assert!(m.is_capture());
    }

    #[test]
    fn test_uci_text() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from, Square(12));
        assert_eq!(m.to, Square(28));
        assert_eq!(m.to_uci(), "e2e4");

        let m = Move::from_uci("a7a8n").unwrap();
        assert_eq!(m.promotion, Some(PieceName::Knight));
        assert!(m.is_promotion());
        assert_eq!(m.to_string(), "a7a8n");

        let m = Move::from_uci("e8c8").unwrap();
        assert_eq!(m.castle_type(), Some(Castle::BlackQueen));
    }

    #[test]
    fn test_bad_uci_text() {
        assert!(matches!(Move::from_uci("e2"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::from_uci("e2e4qq"), Err(MoveError::Malformed(_))));
        assert!(matches!(Move::from_uci("z2e4"), Err(MoveError::BadSquare(_))));
        assert!(matches!(Move::from_uci("e7e8k"), Err(MoveError::BadPromotion('k'))));
        assert!(matches!(Move::from_uci("e7e8Q"), Err(MoveError::BadPromotion('Q'))));
    }

    #[test]
    fn test_packing() {
        let moves = [
            Move::new(Square(10), Square(20), None, MoveFlags::NORMAL),
            Move::new(Square(55), Square(62), Some(PieceName::Knight), MoveFlags::PROMOTION | MoveFlags::CAPTURE),
            Move::new(Square::E1, Square::G1, None, MoveFlags::CASTLE),
            Move::new(Square(8), Square(0), Some(PieceName::Rook), MoveFlags::PROMOTION),
        ];
        for m in moves {
            assert_eq!(PackedMove::encode(m).decode(), m);
        }
        assert!(PackedMove::encode(Move::NULL).is_null());
    }

    #[test]
    fn test_castling_mask() {
        let all = 0b1111;
        assert_eq!(all & CASTLING_RIGHTS[Square::E1], Castle::BlackKing as u8 | Castle::BlackQueen as u8);
        assert_eq!(all & CASTLING_RIGHTS[Square::H8], all & !(Castle::BlackKing as u8));
        assert_eq!(all & CASTLING_RIGHTS[Square::A1], all & !(Castle::WhiteQueen as u8));
    }

    #[test]
    fn test_generated_moves_round_trip() {
        use crate::board::position::Position;

        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
            "4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1",
        ];
        let mut seen_castle = false;
        let mut seen_en_passant = false;
        let mut seen_promotion = false;
        for fen in fens {
            let mut pos = Position::from_fen(fen).unwrap();
            let moves = pos.generate_legal_moves();
            assert!(!moves.is_empty(), "{fen}");
            for m in moves {
                seen_castle |= m.is_castle();
                seen_en_passant |= m.is_en_passant();
                seen_promotion |= m.is_promotion();

                assert_eq!(m.pack().decode(), m);
                let text = m.to_uci();
                assert_eq!(pos.parse_uci_move(&text), Ok(m), "{fen} {text}");
                let parsed = Move::from_uci(&text).unwrap();
                assert_eq!((parsed.from, parsed.to, parsed.promotion), (m.from, m.to, m.promotion));
            }
        }
        assert!(seen_castle && seen_en_passant && seen_promotion);
    }
}
