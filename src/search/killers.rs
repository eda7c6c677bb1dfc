use crate::moves::moves::Move;

use super::{SearchInfo, MAX_SEARCH_DEPTH};

pub type KillerMoves = [[Move; NUM_KILLER_MOVES]; MAX_SEARCH_DEPTH as usize + 1];

pub const NUM_KILLER_MOVES: usize = 2;

pub fn empty_killers() -> KillerMoves {
    [[Move::NULL; NUM_KILLER_MOVES]; MAX_SEARCH_DEPTH as usize + 1]
}

pub(crate) fn store_killer_move(ply: i32, m: Move, search_info: &mut SearchInfo) {
    let killers = &mut search_info.killer_moves[ply as usize];

    if killers[0] != m {
        for i in (1..NUM_KILLER_MOVES).rev() {
            killers[i] = killers[i - 1];
        }
        killers[0] = m;
    }
}
