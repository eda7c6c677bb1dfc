pub mod bitboard;
pub mod pieces;
pub mod square;
