use thiserror::Error;

use crate::types::{pieces::Color, square::Square};

/// Problems with a FEN string handed to `Position::from_fen`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 4 to 6 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {0} does not describe exactly 8 squares")]
    RankLength(usize),
    #[error("unknown piece letter '{0}'")]
    BadPiece(char),
    #[error("side to move must be 'w' or 'b', found '{0}'")]
    BadSide(String),
    #[error("bad castling field '{0}'")]
    BadCastling(String),
    #[error("bad en passant field '{0}'")]
    BadEnPassant(String),
    #[error("bad move counter '{0}'")]
    BadCounter(String),
    #[error("{0:?} must have exactly one king")]
    KingCount(Color),
}

/// Rejections of user submitted moves. These never leave the position modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("malformed move text '{0}'")]
    Malformed(String),
    #[error("bad square '{0}'")]
    BadSquare(String),
    #[error("bad promotion piece '{0}'")]
    BadPromotion(char),
    #[error("{0} is not a move in this position")]
    Illegal(String),
    #[error("{0} leaves the king in check")]
    LeavesKingInCheck(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Engine bugs. A caller that respects the move generation contracts can never trigger these,
/// so they are never returned, only raised through `fatal`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("undo requested with no moves applied")]
    EmptyUndoStack,
    #[error("no piece on square {0}")]
    NoPieceOnSquare(Square),
    #[error("{0:?} has no king")]
    MissingKing(Color),
}

/// Logs the violation and aborts the current operation
#[cold]
#[track_caller]
pub fn fatal(violation: InvariantViolation) -> ! {
    log::error!("invariant violated: {violation}");
    panic!("{violation}")
}
