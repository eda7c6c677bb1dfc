use crate::moves::moves::Move;
use crate::types::pieces::PieceName;
use crate::types::square::Square;

/// Everything `unapply_move` needs to reverse one applied move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MoveState {
    pub m: Move,
    pub moving: PieceName,
    pub captured: Option<PieceName>,
    pub en_passant: Option<Square>,
    pub castling: u8,
    pub halfmove: u16,
    pub fullmove: u16,
    pub hash: u64,
}

/// Returned by `make_null_move`, handed back to `unmake_null_move`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct NullMoveState {
    pub(super) en_passant: Option<Square>,
    pub(super) halfmove: u16,
    pub(super) hash: u64,
}
