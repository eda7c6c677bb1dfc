pub mod draw;
pub mod fen;
pub mod position;
pub(crate) mod undo;
pub mod zobrist;
