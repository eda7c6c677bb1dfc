use crate::{
    board::position::Position,
    moves::{movegenerator::MGT, movepicker::MovePicker},
    search::killers::NUM_KILLER_MOVES,
};

use super::{eval::evaluate, SearchInfo, MAX_SEARCH_DEPTH};
use crate::moves::moves::Move;

/// Resolves captures until the position is quiet so the static evaluation isn't taken in the
/// middle of an exchange
pub(super) fn quiescence(pos: &mut Position, info: &mut SearchInfo, mut alpha: i32, beta: i32, ply: i32) -> i32 {
    if info.visit_node() {
        return 0;
    }

    let stand_pat = evaluate(pos);
    if ply >= MAX_SEARCH_DEPTH {
        return stand_pat;
    }
    // Give the engine the chance to stop capturing here if it results in a better end result than continuing the chain of capturing
    if stand_pat >= beta {
        return stand_pat;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut best_score = stand_pat;
    let mut picker =
        MovePicker::new(pos, MGT::CapturesOnly, None, [Move::NULL; NUM_KILLER_MOVES], &info.history);
    while let Some(entry) = picker.next() {
        if !pos.apply_if_legal(entry.m) {
            continue;
        }
        let eval = -quiescence(pos, info, -beta, -alpha, ply + 1);
        pos.unapply_move();

        if info.stopped {
            return 0;
        }

        if eval > best_score {
            best_score = eval;
            if eval > alpha {
                alpha = eval;
                if alpha >= beta {
                    break;
                }
            }
        }
    }

    best_score
}

#[cfg(test)]
mod quiescence_tests {
    use super::*;
    use crate::{
        engine::{options::EngineOptions, transposition::TranspositionTable},
        search::{game_time::SearchTimer, INFINITY},
    };

    fn qsearch(fen: &str) -> i32 {
        let mut pos = Position::from_fen(fen).unwrap();
        let tt = TranspositionTable::new(1);
        let mut info = SearchInfo::new(&tt, EngineOptions::default(), SearchTimer::new(None));
        quiescence(&mut pos, &mut info, -INFINITY, INFINITY, 0)
    }

    #[test]
    fn test_takes_hanging_queen() {
        assert_eq!(qsearch("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1"), 500);
    }

    #[test]
    fn test_avoids_losing_exchange() {
        // Rxd5 loses the rook to the pawn, so standing pat keeps the rook advantage
        assert_eq!(qsearch("4k3/8/4p3/3n4/8/8/3R4/4K3 w - - 0 1"), 500 - 320 - 100);
    }
}
