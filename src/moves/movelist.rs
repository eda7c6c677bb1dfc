use arrayvec::ArrayVec;

use std::ops::Index;

use super::moves::Move;

/// Upper bound on legal moves in any chess position is 218; pseudo-legal lists stay under 256
pub const MAX_LEN: usize = 256;

#[derive(Clone, Debug, Default)]
/// Movelist elements contains a move and an i32 where a score can be stored later to be used in move ordering
/// for efficient search pruning
pub struct MoveList {
    pub arr: ArrayVec<MoveListEntry, MAX_LEN>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveListEntry {
    pub m: Move,
    pub score: i32,
}

impl MoveListEntry {
    fn new(m: Move, score: i32) -> Self {
        MoveListEntry { m, score }
    }
}

impl MoveList {
    pub fn push(&mut self, m: Move) {
        self.arr.push(MoveListEntry::new(m, 0));
    }

    pub fn len(&self) -> usize {
        self.arr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arr.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.arr.iter().map(|e| e.m)
    }

    pub fn contains(&self, m: Move) -> bool {
        self.iter().any(|x| x == m)
    }

    /// Sorts next move into position and then returns the move entry
    pub(crate) fn pick_move(&mut self, idx: usize) -> MoveListEntry {
        self.sort_next_move(idx);
        self.arr[idx]
    }

    fn sort_next_move(&mut self, idx: usize) {
        let mut max_idx = idx;
        for i in (idx + 1)..self.arr.len() {
            if self.arr[i].score > self.arr[max_idx].score {
                max_idx = i;
            }
        }

        self.arr.swap(max_idx, idx);
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.arr[index].m
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut move_list = MoveList::default();
        for m in iter {
            move_list.push(m);
        }
        move_list
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::iter::Map<arrayvec::IntoIter<MoveListEntry, MAX_LEN>, fn(MoveListEntry) -> Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.arr.into_iter().map((|e: MoveListEntry| e.m) as fn(MoveListEntry) -> Move)
    }
}

#[cfg(test)]
mod movelist_tests {
    use super::*;
    use crate::moves::moves::MoveFlags;
    use crate::types::square::Square;

    #[test]
    fn test_pick_move_orders_by_score() {
        let mut list: MoveList = (0..5u8).map(|i| Move::new(Square(i), Square(i + 8), None, MoveFlags::NORMAL)).collect();
        for (i, score) in [3, 50, -2, 50, 7].into_iter().enumerate() {
            list.arr[i].score = score;
        }
        let picked: Vec<i32> = (0..list.len()).map(|i| list.pick_move(i).score).collect();
        assert_eq!(picked, vec![50, 50, 7, 3, -2]);
        assert_eq!(list.len(), 5);
        assert!(list.contains(Move::new(Square(2), Square(10), None, MoveFlags::NORMAL)));
    }
}
