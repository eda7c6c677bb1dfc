use crate::board::position::Position;

/// Material balance from the side to move's point of view
pub fn evaluate(board: &Position) -> i32 {
    let stm = board.side_to_move();
    board.material(stm) - board.material(!stm)
}

#[cfg(test)]
mod eval_tests {
    use super::*;

    #[test]
    fn test_material_eval() {
        assert_eq!(evaluate(&Position::new()), 0);
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), 900);
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), -900);
        let pos = Position::from_fen("rn2k3/8/8/8/8/8/PPP5/4KB2 w - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), 3 * 100 + 330 - 500 - 320);
    }
}
