use crate::types::{
    bitboard::Bitboard,
    pieces::{Color, PieceName},
};

use super::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

/// What a game driver needs to know after every move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl Position {
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock() >= 100
    }

    /// Function checks for the presence of the board in the game. If the board position will have occurred three times,
    /// returns true indicating the position would be a draw due to the threefold repetition rule
    pub fn is_repetition(&self) -> bool {
        // Only positions since the last capture or pawn move can repeat, and only every other
        // one has the same side to move
        let window = self.halfmove_clock() as usize;
        let count = self
            .prior_hashes()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .filter(|&h| h == self.hash())
            .count();
        count >= 2
    }

    pub fn is_material_draw(&self) -> bool {
        let pieces = |p: PieceName| self.bitboard(Color::White, p) | self.bitboard(Color::Black, p);
        // If we have any pawns, rooks or queens checkmate is still possible
        if pieces(PieceName::Pawn) | pieces(PieceName::Rook) | pieces(PieceName::Queen) != Bitboard::EMPTY {
            return false;
        }
        let piece_count = self.occupancies().count_bits();
        let knights = pieces(PieceName::Knight).count_bits();
        let bishops = pieces(PieceName::Bishop).count_bits();
        match piece_count {
            // King vs King can't checkmate
            2 => true,
            // A lone minor piece can't force mate
            3 => knights == 1 || bishops == 1,
            4 => {
                let white = self.occupancy(Color::White).count_bits();
                // No combination of two knights and a king can checkmate
                let two_knights = knights == 2 && (white == 3 || white == 1);
                // If there is one bishop per side, checkmate is impossible
                let bishop_each = bishops == 2 && white == 2;
                two_knights || bishop_each
            }
            _ => false,
        }
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoveRule)
        } else if self.is_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else if self.is_material_draw() {
            Some(DrawReason::InsufficientMaterial)
        } else {
            None
        }
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && !self.has_legal_moves(self.side_to_move())
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && !self.has_legal_moves(self.side_to_move())
    }

    /// Mate and stalemate take priority over the drawing rules
    pub fn status(&mut self) -> GameStatus {
        let stm = self.side_to_move();
        if !self.has_legal_moves(stm) {
            return if self.in_check() { GameStatus::Checkmate { winner: !stm } } else { GameStatus::Stalemate };
        }
        match self.draw_reason() {
            Some(reason) => GameStatus::Draw(reason),
            None => GameStatus::Ongoing,
        }
    }
}

#[cfg(test)]
mod draw_tests {
    use super::*;

    fn play(pos: &mut Position, moves: &[&str]) {
        for m in moves {
            let m = pos.parse_uci_move(m).unwrap();
            assert!(pos.make_move(m), "{m}");
        }
    }

    #[test]
    fn test_fools_mate() {
        let mut pos = Position::new();
        play(&mut pos, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(pos.is_king_in_check(Color::White));
        assert!(!pos.has_legal_moves(Color::White));
        assert!(pos.has_legal_moves(Color::Black));
        assert!(pos.is_checkmate());
        assert!(!pos.is_stalemate());
        assert_eq!(pos.status(), GameStatus::Checkmate { winner: Color::Black });
    }

    #[test]
    fn test_stalemate() {
        let mut pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!pos.in_check());
        assert!(!pos.has_legal_moves(Color::Black));
        assert!(pos.is_stalemate());
        assert!(!pos.is_checkmate());
        assert_eq!(pos.status(), GameStatus::Stalemate);
    }

    #[test]
    fn test_threefold_repetition() {
        let mut pos = Position::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut pos, &shuffle);
        assert!(!pos.is_repetition());
        play(&mut pos, &shuffle);
        assert!(pos.is_repetition());
        assert_eq!(pos.status(), GameStatus::Draw(DrawReason::ThreefoldRepetition));
    }

    #[test]
    fn test_repetition_broken_by_pawn_move() {
        let mut pos = Position::new();
        play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8", "e2e4", "e7e5"]);
        play(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert!(!pos.is_repetition());
    }

    #[test]
    fn test_fifty_moves() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert!(!pos.is_fifty_move_draw());
        play(&mut pos, &["a1a2"]);
        assert!(pos.is_fifty_move_draw());
        assert_eq!(pos.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn test_insufficient_material() {
        let draws = [
            "8/8/4k3/8/8/4K3/8/8 w - - 0 1",
            "8/8/4k3/8/8/4K3/5N2/8 w - - 0 1",
            "8/8/4k3/8/8/4K3/5B2/8 b - - 0 1",
            "8/8/4k3/8/8/4K3/4NN2/8 w - - 0 1",
            "8/3b4/4k3/8/8/4K3/5B2/8 w - - 0 1",
        ];
        for fen in draws {
            let mut pos = Position::from_fen(fen).unwrap();
            assert!(pos.is_material_draw(), "{fen}");
            assert_eq!(pos.status(), GameStatus::Draw(DrawReason::InsufficientMaterial), "{fen}");
        }
        let not_draws = [
            "8/8/4k3/8/8/4K3/4P3/8 w - - 0 1",
            "8/8/4k3/8/8/4K3/4R3/8 w - - 0 1",
            "8/8/4k3/8/8/4K3/4BN2/8 w - - 0 1",
            "8/3n4/4k3/8/8/4K3/5B2/8 w - - 0 1",
        ];
        for fen in not_draws {
            assert!(!Position::from_fen(fen).unwrap().is_material_draw(), "{fen}");
        }
    }
}
