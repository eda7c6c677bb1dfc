use core::fmt;
use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    error::{fatal, InvariantViolation, MoveError},
    init::Tables,
    moves::{
        attack_boards::AttackTables,
        movegenerator::MGT,
        movelist::MoveList,
        moves::{Castle, Move, CASTLING_RIGHTS},
    },
    types::{
        bitboard::Bitboard,
        pieces::{Color, Piece, PieceName, NUM_COLORS, NUM_PIECES},
        square::Square,
    },
};

use super::{
    fen::STARTING_FEN,
    undo::{MoveState, NullMoveState},
};

/// A chess position plus the stack of states needed to take moves back
#[derive(Clone)]
pub struct Position {
    pieces: [[Bitboard; NUM_PIECES]; NUM_COLORS],
    occupancy: [Bitboard; NUM_COLORS],
    all: Bitboard,
    stm: Color,
    castling: u8,
    en_passant: Option<Square>,
    halfmove: u16,
    fullmove: u16,
    hash: u64,
    undo: Vec<MoveState>,
    tables: Arc<Tables>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position
    pub fn new() -> Self {
        Self::with_tables(Tables::shared())
    }

    pub fn with_tables(tables: Arc<Tables>) -> Self {
        match Self::from_fen_with_tables(STARTING_FEN, tables) {
            Ok(pos) => pos,
            Err(e) => unreachable!("starting fen failed to parse: {e}"),
        }
    }

    /// A board with no pieces on it, white to move
    pub(super) fn empty(tables: Arc<Tables>) -> Self {
        Self {
            pieces: [[Bitboard::EMPTY; NUM_PIECES]; NUM_COLORS],
            occupancy: [Bitboard::EMPTY; NUM_COLORS],
            all: Bitboard::EMPTY,
            stm: Color::White,
            castling: 0,
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            hash: 0,
            undo: Vec::new(),
            tables,
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub(crate) fn attacks(&self) -> &AttackTables {
        &self.tables.attacks
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.stm
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline(always)]
    pub fn can_castle(&self, c: Castle) -> bool {
        self.castling & c as u8 != 0
    }

    #[inline(always)]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    pub fn bitboard(&self, side: Color, piece: PieceName) -> Bitboard {
        self.pieces[side][piece]
    }

    #[inline(always)]
    pub fn occupancy(&self, side: Color) -> Bitboard {
        self.occupancy[side]
    }

    #[inline(always)]
    pub fn occupancies(&self) -> Bitboard {
        self.all
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = if self.occupancy[Color::White].occupied(sq) {
            Color::White
        } else if self.occupancy[Color::Black].occupied(sq) {
            Color::Black
        } else {
            return None;
        };
        self.pieces[color]
            .iter()
            .position(|bb| bb.occupied(sq))
            .and_then(|p| PieceName::try_from_u8(p as u8))
            .map(|name| Piece::new(name, color))
    }

    /// Number of moves applied since the position was set up
    pub fn ply_count(&self) -> usize {
        self.undo.len()
    }

    /// Moves applied to reach this position, oldest first
    pub fn played_moves(&self) -> impl DoubleEndedIterator<Item = Move> + '_ {
        self.undo.iter().map(|s| s.m)
    }

    pub(super) fn prior_hashes(&self) -> impl DoubleEndedIterator<Item = u64> + '_ {
        self.undo.iter().map(|s| s.hash)
    }

    /// Flips the bit of a piece in its own board and in the occupancy boards. Placing and
    /// removing are the same operation.
    #[inline(always)]
    fn toggle_piece(&mut self, color: Color, piece: PieceName, sq: Square) {
        let bb = sq.bitboard();
        self.pieces[color][piece] ^= bb;
        self.occupancy[color] ^= bb;
        self.all ^= bb;
    }

    /// Used while building a position. Does not touch the hash
    pub(super) fn place_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(self.all.empty(sq));
        self.toggle_piece(piece.color, piece.name, sq);
    }

    pub(super) fn set_state(
        &mut self,
        stm: Color,
        castling: u8,
        en_passant: Option<Square>,
        halfmove: u16,
        fullmove: u16,
    ) {
        self.stm = stm;
        self.castling = castling;
        self.en_passant = en_passant;
        self.halfmove = halfmove;
        self.fullmove = fullmove;
        self.hash = self.board_hash();
    }

    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.bitboard(color, PieceName::King);
        if kings.is_empty() {
            fatal(InvariantViolation::MissingKing(color));
        }
        kings.lsb()
    }

    /// Every piece of color `attacker` that attacks `sq` given some occupancy
    pub fn attackers_for_side(&self, attacker: Color, sq: Square, occupancy: Bitboard) -> Bitboard {
        let attacks = self.attacks();
        let pawn_attacks = attacks.pawn_attacks(sq, !attacker) & self.bitboard(attacker, PieceName::Pawn);
        let knight_attacks = attacks.knight_attacks(sq) & self.bitboard(attacker, PieceName::Knight);
        let queens = self.bitboard(attacker, PieceName::Queen);
        let diagonal = attacks.bishop_attacks(sq, occupancy) & (self.bitboard(attacker, PieceName::Bishop) | queens);
        let orthogonal = attacks.rook_attacks(sq, occupancy) & (self.bitboard(attacker, PieceName::Rook) | queens);
        let king_attacks = attacks.king_attacks(sq) & self.bitboard(attacker, PieceName::King);
        pawn_attacks | knight_attacks | diagonal | orthogonal | king_attacks
    }

    #[inline(always)]
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_for_side(by, sq, self.all) != Bitboard::EMPTY
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        self.square_attacked(self.king_square(color), !color)
    }

    /// Whether the side to move is in check
    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.is_king_in_check(self.stm)
    }

    pub fn has_non_pawns(&self, side: Color) -> bool {
        self.occupancy(side) ^ self.bitboard(side, PieceName::King) ^ self.bitboard(side, PieceName::Pawn)
            != Bitboard::EMPTY
    }

    /// Square of the pawn removed by an en passant capture landing on `to`
    fn en_passant_victim(to: Square, mover: Color) -> Square {
        match mover {
            Color::White => Square(to.0 - 8),
            Color::Black => Square(to.0 + 8),
        }
    }

    /// Applies a move the generator produced, with no legality check. Pushes the state needed to
    /// reverse it, keeps the hash in step, and hands the move to the other side.
    pub(crate) fn apply_move(&mut self, m: Move) {
        let us = self.stm;
        let moving = match self.piece_at(m.from) {
            Some(p) => p.name,
            None => fatal(InvariantViolation::NoPieceOnSquare(m.from)),
        };
        let captured = if m.is_en_passant() {
            Some(PieceName::Pawn)
        } else {
            self.piece_at(m.to).filter(|p| p.color != us).map(|p| p.name)
        };

        self.undo.push(MoveState {
            m,
            moving,
            captured,
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            hash: self.hash,
        });

        self.hash ^= self.tables.zobrist.castling(self.castling) ^ self.tables.zobrist.en_passant(self.en_passant);

        if let Some(victim) = captured {
            let cap_sq = if m.is_en_passant() { Self::en_passant_victim(m.to, us) } else { m.to };
            self.toggle_piece(!us, victim, cap_sq);
            self.hash ^= self.tables.zobrist.piece(!us, victim, cap_sq);
        }

        self.toggle_piece(us, moving, m.from);
        self.hash ^= self.tables.zobrist.piece(us, moving, m.from);
        let placed = m.promotion.unwrap_or(moving);
        self.toggle_piece(us, placed, m.to);
        self.hash ^= self.tables.zobrist.piece(us, placed, m.to);

        if let Some(castle) = m.castle_type() {
            let (rook_from, rook_to) = castle.rook_squares();
            self.toggle_piece(us, PieceName::Rook, rook_from);
            self.toggle_piece(us, PieceName::Rook, rook_to);
            self.hash ^= self.tables.zobrist.piece(us, PieceName::Rook, rook_from)
                ^ self.tables.zobrist.piece(us, PieceName::Rook, rook_to);
        }

        self.castling &= CASTLING_RIGHTS[m.from] & CASTLING_RIGHTS[m.to];

        self.en_passant = if moving == PieceName::Pawn && m.from.0.abs_diff(m.to.0) == 16 {
            Some(Square((m.from.0 + m.to.0) / 2))
        } else {
            None
        };

        if moving == PieceName::Pawn || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }

        if us == Color::Black {
            self.fullmove += 1;
        }
        self.stm = !us;

        let z = &self.tables.zobrist;
        self.hash ^= z.castling(self.castling) ^ z.en_passant(self.en_passant) ^ z.turn();
    }

    /// Reverses the most recently applied move
    pub fn unapply_move(&mut self) {
        let Some(state) = self.undo.pop() else {
            fatal(InvariantViolation::EmptyUndoStack);
        };
        let m = state.m;
        let us = !self.stm;

        let placed = m.promotion.unwrap_or(state.moving);
        self.toggle_piece(us, placed, m.to);
        self.toggle_piece(us, state.moving, m.from);

        if let Some(castle) = m.castle_type() {
            let (rook_from, rook_to) = castle.rook_squares();
            self.toggle_piece(us, PieceName::Rook, rook_to);
            self.toggle_piece(us, PieceName::Rook, rook_from);
        }

        if let Some(victim) = state.captured {
            let cap_sq = if m.is_en_passant() { Self::en_passant_victim(m.to, us) } else { m.to };
            self.toggle_piece(!us, victim, cap_sq);
        }

        self.stm = us;
        self.en_passant = state.en_passant;
        self.castling = state.castling;
        self.halfmove = state.halfmove;
        self.fullmove = state.fullmove;
        self.hash = state.hash;
    }

    /// Applies a pseudo-legal move and keeps it only if the mover's king is safe afterwards.
    /// Returns false with the position untouched otherwise.
    #[must_use]
    pub(crate) fn apply_if_legal(&mut self, m: Move) -> bool {
        self.apply_move(m);
        if self.is_king_in_check(!self.stm) {
            self.unapply_move();
            return false;
        }
        true
    }

    /// Finds the generator's version of a move, matching on squares and promotion only. This is
    /// where castling and en passant flags come from for externally submitted moves.
    fn resolve(&self, m: Move) -> Result<Move, MoveError> {
        self.generate_moves(MGT::All)
            .into_iter()
            .find(|g| g.from == m.from && g.to == m.to && g.promotion == m.promotion)
            .ok_or_else(|| MoveError::Illegal(m.to_uci()))
    }

    /// Applies `m` if and only if it is legal. On error the position is unchanged
    pub fn try_make_move(&mut self, m: Move) -> Result<(), MoveError> {
        let m = self.resolve(m)?;
        if self.apply_if_legal(m) {
            Ok(())
        } else {
            Err(MoveError::LeavesKingInCheck(m.to_uci()))
        }
    }

    #[must_use]
    pub fn make_move(&mut self, m: Move) -> bool {
        self.try_make_move(m).is_ok()
    }

    /// Parses UCI text against this position, so the returned move carries the flags the
    /// generator assigns
    pub fn parse_uci_move(&mut self, text: &str) -> Result<Move, MoveError> {
        let m = self.resolve(Move::from_uci(text)?)?;
        if self.is_legal(m) {
            Ok(m)
        } else {
            Err(MoveError::LeavesKingInCheck(m.to_uci()))
        }
    }

    /// True if `m` is one of the generator's moves and does not leave the mover in check
    pub fn is_legal(&mut self, m: Move) -> bool {
        match self.resolve(m) {
            Ok(m) if self.apply_if_legal(m) => {
                self.unapply_move();
                true
            }
            _ => false,
        }
    }

    pub fn generate_legal_moves(&mut self) -> MoveList {
        let moves = self.generate_moves(MGT::All);
        moves
            .into_iter()
            .filter(|&m| {
                let legal = self.apply_if_legal(m);
                if legal {
                    self.unapply_move();
                }
                legal
            })
            .collect()
    }

    /// Legal moves of the side to move that start on `sq`
    pub fn generate_moves_for_square(&mut self, sq: Square) -> MoveList {
        let moves = self.generate_moves(MGT::All);
        moves
            .into_iter()
            .filter(|&m| m.from == sq)
            .filter(|&m| {
                let legal = self.apply_if_legal(m);
                if legal {
                    self.unapply_move();
                }
                legal
            })
            .collect()
    }

    /// Whether `color` has at least one legal move, whether or not it is their turn
    pub fn has_legal_moves(&mut self, color: Color) -> bool {
        if color != self.stm {
            let state = self.make_null_move();
            let res = self.has_legal_moves(color);
            self.unmake_null_move(state);
            return res;
        }
        let moves = self.generate_moves(MGT::All);
        moves.into_iter().any(|m| {
            let legal = self.apply_if_legal(m);
            if legal {
                self.unapply_move();
            }
            legal
        })
    }

    /// Passes the turn. Nothing is pushed to the undo stack; the returned state restores it
    pub fn make_null_move(&mut self) -> NullMoveState {
        let state = NullMoveState { en_passant: self.en_passant, halfmove: self.halfmove, hash: self.hash };
        let z = &self.tables.zobrist;
        self.hash ^= z.en_passant(self.en_passant) ^ z.turn();
        self.en_passant = None;
        // Repetitions can't span a null move
        self.halfmove = 0;
        self.stm = !self.stm;
        state
    }

    pub fn unmake_null_move(&mut self, state: NullMoveState) {
        self.stm = !self.stm;
        self.en_passant = state.en_passant;
        self.halfmove = state.halfmove;
        self.hash = state.hash;
    }

    /// Material of one side in centipawns
    pub fn material(&self, c: Color) -> i32 {
        self.pieces[c]
            .iter()
            .zip(PieceName::iter())
            .map(|(bb, p)| bb.count_bits() as i32 * p.value())
            .sum()
    }
}

/// The tables are shared and deterministic, so they take no part in equality
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.occupancy == other.occupancy
            && self.all == other.all
            && self.stm == other.stm
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.hash == other.hash
            && self.undo == other.undo
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut str = String::new();

        for row in (0..8).rev() {
            str.push_str(&(row + 1).to_string());
            str.push_str(" | ");

            for col in 0..8 {
                match self.piece_at(Square::from_coords(col, row)) {
                    Some(p) => str.push(p.to_fen_char()),
                    None => str.push('_'),
                }
                str.push_str(" | ");
            }

            str.push('\n');
        }

        str.push_str("    a   b   c   d   e   f   g   h\n");

        write!(f, "{}", str)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut str = String::new();
        str += match self.stm {
            Color::White => "White to move\n",
            Color::Black => "Black to move\n",
        };
        str += &self.to_string();
        str += "Fen: ";
        str += &self.to_fen();
        str += "\n";
        str += &format!("Hash: {:016x}", self.hash);
        write!(f, "{}", str)
    }
}
