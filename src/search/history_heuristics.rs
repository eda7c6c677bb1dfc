use crate::types::{
    pieces::{Color, PieceName, NUM_COLORS, NUM_PIECES},
    square::{Square, NUM_SQUARES},
};

/// History scores stay below the killer move scores so killers are always tried first
pub const MAX_HIST_VAL: i32 = 800_000;

/// Quiet move success counts by side, moving piece and destination square
#[derive(Clone)]
pub struct MoveHistory {
    search_history: Box<[[[i32; NUM_SQUARES]; NUM_PIECES]; NUM_COLORS]>,
}

impl MoveHistory {
    pub fn update_history(&mut self, side: Color, piece: PieceName, to: Square, depth: i32) {
        let i = &mut self.search_history[side][piece][to];
        *i = (*i + depth * depth).min(MAX_HIST_VAL);
    }

    pub fn get_history(&self, side: Color, piece: PieceName, to: Square) -> i32 {
        self.search_history[side][piece][to]
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self { search_history: Box::new([[[0; NUM_SQUARES]; NUM_PIECES]; NUM_COLORS]) }
    }
}

#[cfg(test)]
mod history_tests {
    use super::*;

    #[test]
    fn test_depth_squared_bonus() {
        let mut h = MoveHistory::default();
        h.update_history(Color::White, PieceName::Knight, Square(21), 3);
        h.update_history(Color::White, PieceName::Knight, Square(21), 4);
        assert_eq!(h.get_history(Color::White, PieceName::Knight, Square(21)), 25);
        assert_eq!(h.get_history(Color::Black, PieceName::Knight, Square(21)), 0);
        for _ in 0..10_000 {
            h.update_history(Color::Black, PieceName::Queen, Square(0), 64);
        }
        assert_eq!(h.get_history(Color::Black, PieceName::Queen, Square(0)), MAX_HIST_VAL);
    }
}
