use strum::IntoEnumIterator;

use crate::{
    moves::magics::Rng,
    types::{
        pieces::{Color, PieceName, NUM_COLORS, NUM_PIECES},
        square::{Square, NUM_SQUARES},
    },
};

use super::position::Position;

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random keys for every piece on every square, every castling rights mask, every en passant
/// file and the side to move. Generated from a fixed seed so hashes are stable across runs.
pub struct Zobrist {
    piece_square: [[[u64; NUM_SQUARES]; NUM_PIECES]; NUM_COLORS],
    castling: [u64; 16],
    en_passant: [u64; 8],
    turn: u64,
}

impl Default for Zobrist {
    fn default() -> Self {
        Self::new()
    }
}

impl Zobrist {
    pub fn new() -> Self {
        let mut rng = Rng::with_seed(ZOBRIST_SEED);
        let mut piece_square = [[[0; NUM_SQUARES]; NUM_PIECES]; NUM_COLORS];
        piece_square.iter_mut().flatten().flatten().for_each(|x| *x = rng.next_u64());
        let mut castling = [0; 16];
        castling.iter_mut().for_each(|x| *x = rng.next_u64());
        let mut en_passant = [0; 8];
        en_passant.iter_mut().for_each(|x| *x = rng.next_u64());
        let turn = rng.next_u64();
        Self { piece_square, castling, en_passant, turn }
    }

    #[inline(always)]
    pub fn piece(&self, color: Color, piece: PieceName, sq: Square) -> u64 {
        self.piece_square[color][piece][sq]
    }

    #[inline(always)]
    pub fn castling(&self, rights: u8) -> u64 {
        self.castling[(rights & 0b1111) as usize]
    }

    /// Zero when there is no en passant square, so it can be xored in unconditionally
    #[inline(always)]
    pub fn en_passant(&self, sq: Option<Square>) -> u64 {
        sq.map_or(0, |sq| self.en_passant[sq.file() as usize])
    }

    #[inline(always)]
    pub fn turn(&self) -> u64 {
        self.turn
    }
}

impl Position {
    /// Hash of the position computed from scratch. The incrementally maintained `hash()` must
    /// always equal this.
    pub fn board_hash(&self) -> u64 {
        let z = &self.tables().zobrist;
        let mut hash = 0;

        for color in Color::iter() {
            for piece in PieceName::iter() {
                for sq in self.bitboard(color, piece) {
                    hash ^= z.piece(color, piece, sq);
                }
            }
        }

        hash ^= z.castling(self.castling_rights());
        hash ^= z.en_passant(self.en_passant_square());
        if self.side_to_move() == Color::Black {
            hash ^= z.turn();
        }

        hash
    }
}

#[cfg(test)]
mod hashing_test {
    use crate::board::{fen::STARTING_FEN, position::Position};

    #[test]
    fn test_hashing() {
        let board1 = Position::from_fen(STARTING_FEN).unwrap();
        let board2 = Position::from_fen("4r3/4k3/8/4K3/8/8/8/8 w - - 0 1").unwrap();
        let board3 = Position::new();
        assert_ne!(board1.board_hash(), board2.board_hash());
        assert_eq!(board1.board_hash(), board3.board_hash());
        assert_eq!(board1.hash(), board1.board_hash());
    }

    #[test]
    fn test_state_fields_change_hash() {
        let base = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let no_castle = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        let black = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        assert_ne!(base.hash(), no_castle.hash());
        assert_ne!(base.hash(), black.hash());

        let ep = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let no_ep = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        assert_ne!(ep.hash(), no_ep.hash());
    }

    #[test]
    fn test_transposition_same_hash() {
        let mut a = Position::new();
        let mut b = Position::new();
        for m in ["g1f3", "g8f6", "b1c3", "b8c6"] {
            let m = a.parse_uci_move(m).unwrap();
            assert!(a.make_move(m));
        }
        for m in ["b1c3", "b8c6", "g1f3", "g8f6"] {
            let m = b.parse_uci_move(m).unwrap();
            assert!(b.make_move(m));
        }
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash(), a.board_hash());
    }
}
