use crate::const_array;

use crate::types::bitboard::Bitboard;
use crate::types::pieces::{Color, PieceName};
use crate::types::square::Square;

use super::magics::Magics;

const FILE_A_U64: u64 = 0x101010101010101;
const FILE_H_U64: u64 = 0x101010101010101 << 7;

const RANK1_U64: u64 = 0b11111111;

/// Vertical
pub const FILES: [Bitboard; 8] = const_array!(|f, 8| Bitboard(FILE_A_U64 << f));
/// Horizontal
pub const RANKS: [Bitboard; 8] = const_array!(|r, 8| Bitboard(RANK1_U64 << (8 * r)));

pub const RANK2: Bitboard = RANKS[1];
pub const RANK3: Bitboard = RANKS[2];
pub const RANK6: Bitboard = RANKS[5];
pub const RANK7: Bitboard = RANKS[6];

/// Every attack set a position needs, computed once and then only read
pub struct AttackTables {
    king_table: [Bitboard; 64],
    knight_table: [Bitboard; 64],
    pawn_table: [[Bitboard; 64]; 2],
    magics: Magics,
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackTables {
    pub fn new() -> Self {
        Self {
            king_table: gen_king_attack_boards(),
            knight_table: gen_knight_attack_boards(),
            pawn_table: gen_pawn_attack_boards(),
            magics: Magics::new(),
        }
    }

    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight_table[sq]
    }

    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king_table[sq]
    }

    /// Squares a pawn of color `attacker` standing on `sq` attacks
    pub fn pawn_attacks(&self, sq: Square, attacker: Color) -> Bitboard {
        self.pawn_table[attacker][sq]
    }

    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.magics.bishop_attacks(sq, occupied)
    }

    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.magics.rook_attacks(sq, occupied)
    }

    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }

    /// Non-pawn attack set of a piece. Pawns need a color, so they go through `pawn_attacks`
    pub(crate) fn piece_attacks(&self, piece: PieceName, sq: Square, occupied: Bitboard) -> Bitboard {
        match piece {
            PieceName::Knight => self.knight_attacks(sq),
            PieceName::Bishop => self.bishop_attacks(sq, occupied),
            PieceName::Rook => self.rook_attacks(sq, occupied),
            PieceName::Queen => self.queen_attacks(sq, occupied),
            PieceName::King => self.king_attacks(sq),
            PieceName::Pawn => unreachable!("pawn attacks depend on color"),
        }
    }
}

pub const fn pawn_set_attacks(pawns: Bitboard, side: Color) -> Bitboard {
    let pawns = pawns.0;
    if side.idx() == Color::White.idx() {
        Bitboard((pawns & !FILE_A_U64) << 7 | (pawns & !FILE_H_U64) << 9)
    } else {
        Bitboard((pawns & !FILE_A_U64) >> 9 | (pawns & !FILE_H_U64) >> 7)
    }
}

const fn gen_king_attack_boards() -> [Bitboard; 64] {
    const_array!(|sq, 64| {
        let sq = 1 << sq;
        // Create a bitboard out of the square
        let mut bb = sq;
        // Put in the bits above and below - These won't have any effect if they are outside of the range
        // of the board
        bb |= sq << 8 | sq >> 8;
        // Then literally shake your column of bits back and forth to get diagonals and horizontal moves
        bb |= (bb & !FILE_A_U64) >> 1 | (bb & !FILE_H_U64) << 1;
        // Remove the square the piece is currently on from possible attacks
        Bitboard(bb ^ sq)
    })
}

const fn gen_knight_attack_boards() -> [Bitboard; 64] {
    const_array!(|sq, 64| {
        let sq = 1 << sq;
        let mut bb = sq;
        // Get squares two rows above and below current occupied square
        let vert = sq << 16 | sq >> 16;
        // Shake those bits back and forth as long as it wouldn't end up in another row
        bb |= (vert & !FILE_A_U64) >> 1 | (vert & !FILE_H_U64) << 1;
        // Get squares two columns to the left and right of current occupied square. Constants ensure you
        // won't go to a different row
        let horizontal = (sq & 0x3f3f3f3f3f3f3f3f) << 2 | (sq & 0xfcfcfcfcfcfcfcfc) >> 2;
        // Shake those bits back and forth - can't go out of bounds vertically
        bb |= horizontal << 8 | horizontal >> 8;
        // Remove current occupied square from final attack board
        Bitboard(bb ^ sq)
    })
}

const fn gen_pawn_attack_boards() -> [[Bitboard; 64]; 2] {
    [
        const_array!(|sq, 64| pawn_set_attacks(Bitboard(1 << sq), Color::White)),
        const_array!(|sq, 64| pawn_set_attacks(Bitboard(1 << sq), Color::Black)),
    ]
}

#[macro_export]
/// Credit for this macro goes to akimbo
macro_rules! const_array {
    (| $i:ident, $size:literal | $($r:tt)+) => {{
        let mut $i = 0;
        let mut res = [{$($r)+}; $size];
        while $i < $size - 1 {
            $i += 1;
            res[$i] = {$($r)+};
        }
        res
    }}
}
