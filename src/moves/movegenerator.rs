use crate::{
    board::position::Position,
    moves::moves::Direction::*,
    types::{
        bitboard::Bitboard,
        pieces::{Color, PieceName},
        square::Square,
    },
};

use super::{
    attack_boards::{RANK2, RANK3, RANK6, RANK7},
    movelist::MoveList,
    moves::{Castle, Direction, Move, MoveFlags},
};

/// Move generation type
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MGT {
    /// Every pseudo-legal move
    All,
    /// Captures, en passant and capturing promotions only, for quiescence search
    CapturesOnly,
}

const PROMOTIONS: [PieceName; 4] = [PieceName::Queen, PieceName::Rook, PieceName::Bishop, PieceName::Knight];

impl Position {
    /// Generates all moves with no respect to legality via leaving itself in check
    pub fn generate_moves(&self, gen_type: MGT) -> MoveList {
        let mut moves = MoveList::default();
        self.generate_pawn_moves(gen_type, &mut moves);
        for piece in [PieceName::Knight, PieceName::Bishop, PieceName::Rook, PieceName::Queen, PieceName::King] {
            self.generate_bitboard_moves(piece, gen_type, &mut moves);
        }
        if gen_type == MGT::All {
            self.generate_castling_moves(&mut moves);
        }
        moves
    }

    /// Pseudo-legal captures, the move source for quiescence search
    pub fn generate_captures(&self) -> MoveList {
        self.generate_moves(MGT::CapturesOnly)
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        let stm = self.side_to_move();
        let corners = match stm {
            Color::White => [Castle::WhiteKing, Castle::WhiteQueen],
            Color::Black => [Castle::BlackKing, Castle::BlackQueen],
        };
        for c in corners {
            if !self.can_castle(c) {
                continue;
            }
            let [king_from, _, king_to] = c.king_path();
            let (rook_from, _) = c.rook_squares();
            if self.bitboard(stm, PieceName::King).empty(king_from)
                || self.bitboard(stm, PieceName::Rook).empty(rook_from)
            {
                continue;
            }
            if c.empty_squares().iter().any(|sq| self.occupancies().occupied(*sq)) {
                continue;
            }
            if c.king_path().iter().any(|sq| self.square_attacked(*sq, !stm)) {
                continue;
            }
            moves.push(Move::new(king_from, king_to, None, MoveFlags::CASTLE));
        }
    }

    fn generate_pawn_moves(&self, gen_type: MGT, moves: &mut MoveList) {
        let stm = self.side_to_move();
        let pawns = self.bitboard(stm, PieceName::Pawn);
        let vacancies = !self.occupancies();
        let enemies = self.occupancy(!stm);
        let (non_promotions, promotions) = match stm {
            Color::White => (pawns & !RANK7, pawns & RANK7),
            Color::Black => (pawns & !RANK2, pawns & RANK2),
        };

        let up = match stm {
            Color::White => North,
            Color::Black => South,
        };
        let down = up.opp();

        let up_left = match stm {
            Color::White => NorthWest,
            Color::Black => SouthEast,
        };
        let down_right = up_left.opp();

        let up_right = match stm {
            Color::White => NorthEast,
            Color::Black => SouthWest,
        };
        let down_left = up_right.opp();

        let rank3_bb = match stm {
            Color::White => RANK3,
            Color::Black => RANK6,
        };

        // Single and double pawn pushes w/o captures
        if gen_type == MGT::All {
            let push_one = vacancies & non_promotions.shift(up);
            let push_two = vacancies & (push_one & rank3_bb).shift(up);
            for dest in push_one {
                let src = dest.shift_unchecked(down);
                moves.push(Move::new(src, dest, None, MoveFlags::NORMAL));
            }
            for dest in push_two {
                let src = dest.shift_unchecked(down).shift_unchecked(down);
                moves.push(Move::new(src, dest, None, MoveFlags::NORMAL));
            }
        }

        // Promotions - captures and straight pushes
        if promotions != Bitboard::EMPTY {
            if gen_type == MGT::All {
                for dest in promotions.shift(up) & vacancies {
                    push_promotions(dest, down, MoveFlags::PROMOTION, moves);
                }
            }
            let capture = MoveFlags::PROMOTION | MoveFlags::CAPTURE;
            for dest in promotions.shift(up_left) & enemies {
                push_promotions(dest, down_right, capture, moves);
            }
            for dest in promotions.shift(up_right) & enemies {
                push_promotions(dest, down_left, capture, moves);
            }
        }

        // Captures that do not lead to promotions
        for dest in non_promotions.shift(up_left) & enemies {
            moves.push(Move::new(dest.shift_unchecked(down_right), dest, None, MoveFlags::CAPTURE));
        }
        for dest in non_promotions.shift(up_right) & enemies {
            moves.push(Move::new(dest.shift_unchecked(down_left), dest, None, MoveFlags::CAPTURE));
        }

        // En Passant
        if let Some(dest) = self.en_passant_square() {
            let victim = dest.shift_unchecked(down);
            if self.bitboard(!stm, PieceName::Pawn).occupied(victim) {
                let attackers = self.attacks().pawn_attacks(dest, !stm) & pawns;
                for src in attackers {
                    moves.push(Move::new(src, dest, None, MoveFlags::CAPTURE | MoveFlags::EN_PASSANT));
                }
            }
        }
    }

    fn generate_bitboard_moves(&self, piece_name: PieceName, gen_type: MGT, moves: &mut MoveList) {
        let stm = self.side_to_move();
        let enemies = self.occupancy(!stm);
        let targets = match gen_type {
            MGT::All => !self.occupancy(stm),
            MGT::CapturesOnly => enemies,
        };
        for sq in self.bitboard(stm, piece_name) {
            let attacks = self.attacks().piece_attacks(piece_name, sq, self.occupancies()) & targets;
            for dest in attacks {
                let flags = if enemies.occupied(dest) { MoveFlags::CAPTURE } else { MoveFlags::NORMAL };
                moves.push(Move::new(sq, dest, None, flags));
            }
        }
    }
}

fn push_promotions(dest: Square, d: Direction, flags: MoveFlags, moves: &mut MoveList) {
    let src = dest.shift_unchecked(d);
    for p in PROMOTIONS {
        moves.push(Move::new(src, dest, Some(p), flags));
    }
}

#[cfg(test)]
mod movegen_tests {
    use crate::board::{fen::STARTING_FEN, position::Position};
    use crate::types::square::Square;

    use super::*;

    #[test]
    fn test_start_moves() {
        let pos = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(pos.generate_moves(MGT::All).len(), 20);
        assert!(pos.generate_captures().is_empty());
    }

    #[test]
    fn test_captures_are_subset() {
        let mut pos =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        let all = pos.generate_moves(MGT::All);
        let captures = pos.generate_captures();
        for m in captures.iter() {
            assert!(m.is_capture());
            assert!(all.contains(m));
        }
        assert_eq!(all.iter().filter(|m| m.is_capture()).count(), captures.len());

        let legal = pos.generate_legal_moves();
        assert_eq!(legal.len(), 48);
        assert_eq!(legal.iter().filter(|m| m.is_capture()).count(), 8);
        assert_eq!(legal.iter().filter(|m| m.is_castle()).count(), 2);
    }

    #[test]
    fn test_promotions_fan_out() {
        let pos = Position::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = pos.generate_moves(MGT::All);
        let promos: Vec<_> = moves.iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), 8);
        let captures = pos.generate_captures();
        assert_eq!(captures.len(), 4);
        assert!(captures.iter().all(|m| m.is_promotion() && m.is_capture() && m.to == Square::A8));
    }

    #[test]
    fn test_en_passant_generation() {
        let pos = Position::from_fen("4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let ep: Vec<_> = pos.generate_captures().iter().filter(|m| m.is_en_passant()).collect();
        assert_eq!(ep.len(), 2);
        assert!(ep.iter().all(|m| m.to == Square(43) && m.is_capture()));
    }

    #[test]
    fn test_castling_blocked_by_attack() {
        // Rook on f8 covers f1, so only the queenside castle is available
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let castles: Vec<String> = pos.generate_moves(MGT::All).iter().filter(|m| m.is_castle()).map(|m| m.to_uci()).collect();
        assert_eq!(castles, vec!["e1c1"]);

        // Castling out of check is not allowed
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1").unwrap();
        assert!(pos.generate_moves(MGT::All).iter().all(|m| !m.is_castle()));

        // The b1 square may be attacked, it only needs to be empty
        let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(pos.generate_moves(MGT::All).iter().any(|m| m.is_castle()));
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").unwrap();
        assert!(pos.generate_moves(MGT::All).iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_no_legal_move_leaves_king_attacked() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            let mut pos = Position::from_fen(fen).unwrap();
            let mover = pos.side_to_move();
            for m in pos.generate_legal_moves() {
                pos.apply_move(m);
                assert!(!pos.is_king_in_check(mover), "{fen} {m}");
                pos.unapply_move();
            }
        }
    }
}
