use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    error::FenError,
    init::Tables,
    moves::moves::Castle,
    types::{
        pieces::{Color, Piece, PieceName},
        square::Square,
    },
};

use super::position::Position;

/// Fen string for the starting position of a board
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Takes in a string in fen notation and returns a board state. The halfmove and fullmove
    /// fields may be left off, defaulting to 0 and 1
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with_tables(fen, Tables::shared())
    }

    pub fn from_fen_with_tables(fen: &str, tables: Arc<Tables>) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut board = Position::empty(tables);
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        // Ranks are listed from the eighth down to the first
        for (i, entry) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0;
            for c in entry.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::BadPiece(c))?;
                    if file >= 8 {
                        return Err(FenError::RankLength(rank as usize + 1));
                    }
                    board.place_piece(piece, Square::from_coords(file, rank));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::RankLength(rank as usize + 1));
            }
        }

        for color in Color::iter() {
            if board.bitboard(color, PieceName::King).count_bits() != 1 {
                return Err(FenError::KingCount(color));
            }
        }

        let stm = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            s => return Err(FenError::BadSide(s.to_string())),
        };
        let castling = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3])?;
        let halfmove = parse_counter(fields.get(4).copied(), 0)?;
        let fullmove = parse_counter(fields.get(5).copied(), 1)?;

        board.set_state(stm, castling, en_passant, halfmove, fullmove);
        Ok(board)
    }

    /// Serializes the position in standard six field FEN
    pub fn to_fen(&self) -> String {
        let mut str = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(p) => {
                        if empty > 0 {
                            str += &empty.to_string();
                            empty = 0;
                        }
                        str.push(p.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                str += &empty.to_string();
            }
            if rank > 0 {
                str.push('/');
            }
        }

        str.push(' ');
        str.push(self.side_to_move().to_char());
        str.push(' ');

        let rights: String = Castle::iter().filter(|c| self.can_castle(*c)).map(Castle::fen_char).collect();
        if rights.is_empty() {
            str.push('-');
        } else {
            str += &rights;
        }

        str.push(' ');
        match self.en_passant_square() {
            Some(sq) => str += &sq.to_string(),
            None => str.push('-'),
        }

        str += &format!(" {} {}", self.halfmove_clock(), self.fullmove_number());
        str
    }
}

fn parse_castling(buf: &str) -> Result<u8, FenError> {
    if buf == "-" {
        return Ok(0);
    }
    buf.chars().try_fold(0, |x, ch| {
        let right = match ch {
            'K' => Castle::WhiteKing,
            'Q' => Castle::WhiteQueen,
            'k' => Castle::BlackKing,
            'q' => Castle::BlackQueen,
            _ => return Err(FenError::BadCastling(buf.to_string())),
        };
        Ok(x | right as u8)
    })
}

/// Only the third and sixth ranks can hold an en passant target
fn parse_en_passant(buf: &str) -> Result<Option<Square>, FenError> {
    if buf == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(buf) {
        Some(sq) if sq.rank() == 2 || sq.rank() == 5 => Ok(Some(sq)),
        _ => Err(FenError::BadEnPassant(buf.to_string())),
    }
}

fn parse_counter(buf: Option<&str>, default: u16) -> Result<u16, FenError> {
    match buf {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| FenError::BadCounter(s.to_string())),
    }
}

#[cfg(test)]
mod fen_tests {
    use super::*;

    #[test]
    fn test_en_passant_square() {
        assert_eq!(parse_en_passant("-"), Ok(None));
        assert_eq!(parse_en_passant("c3"), Ok(Some(Square(18))));
        assert_eq!(parse_en_passant("f6"), Ok(Some(Square(45))));
        assert!(parse_en_passant("d4").is_err());
        assert!(parse_en_passant("z6").is_err());
    }

    #[test]
    fn test_parse_castling() {
        assert_eq!(parse_castling("K"), Ok(Castle::WhiteKing as u8));
        assert_eq!(parse_castling("q"), Ok(Castle::BlackQueen as u8));
        assert_eq!(parse_castling("-"), Ok(0));
        assert_eq!(parse_castling("Kk"), Ok(Castle::WhiteKing as u8 | Castle::BlackKing as u8));
        assert_eq!(parse_castling("KQkq"), Ok(0b1111));
        assert!(parse_castling("X").is_err());
    }

    #[test]
    fn test_round_trip() {
        let fens = [
            STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 3",
            "8/8/8/8/8/8/8/k6K b - - 99 120",
        ];
        for fen in fens {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_optional_counters() {
        let pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.to_fen(), "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    }

    #[test]
    fn test_export_after_moves() {
        let mut pos = Position::new();
        for m in ["e2e4", "c7c5", "g1f3"] {
            let m = pos.parse_uci_move(m).unwrap();
            assert!(pos.make_move(m));
        }
        assert_eq!(pos.to_fen(), "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
    }

    #[test]
    fn test_rejects_bad_fens() {
        assert_eq!(Position::from_fen("8/8/8 w - -").unwrap_err(), FenError::RankCount(3));
        assert_eq!(Position::from_fen("rnbqkbnr w KQkq").unwrap_err(), FenError::FieldCount(3));
        assert_eq!(
            Position::from_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap_err(),
            FenError::RankLength(7)
        );
        assert_eq!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1").unwrap_err(),
            FenError::BadPiece('X')
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/7K w - - 0 1").unwrap_err(),
            FenError::KingCount(Color::Black)
        );
        assert!(matches!(Position::from_fen("8/8/8/8/8/8/8/k6K x - - 0 1"), Err(FenError::BadSide(_))));
        assert!(matches!(Position::from_fen("8/8/8/8/8/8/8/k6K w - - a 1"), Err(FenError::BadCounter(_))));
    }
}
