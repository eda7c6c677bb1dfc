use crate::board::position::Position;
use crate::search::history_heuristics::MoveHistory;
use crate::search::killers::NUM_KILLER_MOVES;
use crate::types::pieces::PieceName;

use super::movegenerator::MGT;
use super::movelist::MoveListEntry;
use super::{movelist::MoveList, moves::Move};

const TTMOVE: i32 = i32::MAX - 1000;
const QUEEN_PROMOTION: i32 = 20_000_001;
pub const GOOD_CAPTURE: i32 = 10_000_000;
const KILLER_ONE: i32 = 1_000_000;
const KILLER_TWO: i32 = 900_000;

/// Hands out pseudo-legal moves best first: the hash move, then captures and promotions by
/// victim and attacker value, then killers, then quiets by history
pub struct MovePicker {
    moves: MoveList,
    current: usize,
}

impl MovePicker {
    pub(crate) fn new(
        board: &Position,
        gen_type: MGT,
        tt_move: Option<Move>,
        killers: [Move; NUM_KILLER_MOVES],
        history: &MoveHistory,
    ) -> Self {
        let mut moves = board.generate_moves(gen_type);
        score_moves(board, &mut moves.arr, tt_move, killers, history);
        MovePicker { moves, current: 0 }
    }

    pub(crate) fn next(&mut self) -> Option<MoveListEntry> {
        if self.current >= self.moves.len() {
            return None;
        }
        let entry = self.moves.pick_move(self.current);
        self.current += 1;
        Some(entry)
    }
}

/// Most valuable victim, least valuable attacker
fn mvv_lva(board: &Position, m: Move) -> i32 {
    let victim = if m.is_en_passant() {
        PieceName::Pawn
    } else {
        match board.piece_at(m.to) {
            Some(p) => p.name,
            None => return 0,
        }
    };
    let attacker = board.piece_at(m.from).map_or(PieceName::Pawn, |p| p.name);
    victim.value() * 10 - attacker.value()
}

fn score_moves(
    board: &Position,
    moves: &mut [MoveListEntry],
    tt_move: Option<Move>,
    killers: [Move; NUM_KILLER_MOVES],
    history: &MoveHistory,
) {
    let stm = board.side_to_move();
    for MoveListEntry { m, score } in moves {
        *score = if Some(*m) == tt_move {
            TTMOVE
        } else if let Some(p) = m.promotion {
            match p {
                PieceName::Queen => QUEEN_PROMOTION + mvv_lva(board, *m),
                _ => GOOD_CAPTURE + p.value() + mvv_lva(board, *m),
            }
        } else if m.is_capture() {
            GOOD_CAPTURE + mvv_lva(board, *m)
        } else if *m == killers[0] {
            KILLER_ONE
        } else if *m == killers[1] {
            KILLER_TWO
        } else {
            board.piece_at(m.from).map_or(0, |p| history.get_history(stm, p.name, m.to))
        };
    }
}

#[cfg(test)]
mod picker_tests {
    use super::*;

    fn drain(mut picker: MovePicker) -> Vec<MoveListEntry> {
        std::iter::from_fn(|| picker.next()).collect()
    }

    #[test]
    fn test_tt_move_first_then_captures() {
        let pos = Position::from_fen("4k3/8/2q1r3/8/3N4/8/8/K7 w - - 0 1").unwrap();
        let tt_move = Move::from_uci("a1b1").unwrap();
        let killers = [Move::NULL; NUM_KILLER_MOVES];
        let order = drain(MovePicker::new(&pos, MGT::All, Some(tt_move), killers, &MoveHistory::default()));
        assert_eq!(order[0].m, tt_move);
        assert_eq!(order[0].score, TTMOVE);
        assert_eq!(order[1].m.to_uci(), "d4c6");
        assert_eq!(order[2].m.to_uci(), "d4e6");
        assert!(order[3..].iter().all(|e| !e.m.is_capture()));
    }

    #[test]
    fn test_mvv_lva_prefers_big_victims() {
        let pos = Position::from_fen("4k3/8/8/2q1r3/3P4/8/8/4K3 w - - 0 1").unwrap();
        let killers = [Move::NULL; NUM_KILLER_MOVES];
        let order = drain(MovePicker::new(&pos, MGT::CapturesOnly, None, killers, &MoveHistory::default()));
        let ucis: Vec<String> = order.iter().map(|e| e.m.to_uci()).collect();
        assert_eq!(ucis, vec!["d4c5", "d4e5"]);
        assert!(order.iter().all(|e| e.score > GOOD_CAPTURE));
    }

    #[test]
    fn test_killers_beat_history() {
        let pos = Position::new();
        let k1 = Move::from_uci("b1c3").unwrap();
        let k2 = Move::from_uci("g1f3").unwrap();
        let mut history = MoveHistory::default();
        let e4 = Move::from_uci("e2e4").unwrap();
        history.update_history(pos.side_to_move(), PieceName::Pawn, e4.to, 20);
        let order = drain(MovePicker::new(&pos, MGT::All, None, [k1, k2], &history));
        assert_eq!(order.len(), 20);
        assert_eq!(order[0].m, k1);
        assert_eq!(order[1].m, k2);
        assert_eq!(order[2].m.to_uci(), "e2e4");
        assert_eq!(order[2].score, 400);
    }
}
