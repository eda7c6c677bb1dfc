use std::time::Instant;

use itertools::Itertools;
use log::{debug, trace};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use rustc_hash::FxHashMap;

use crate::{board::position::Position, moves::movegenerator::MGT};

impl Position {
    /// Counts the leaf nodes of the legal move tree `depth` plies deep
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves(MGT::All);
        let mut count = 0;
        for m in moves {
            if !self.apply_if_legal(m) {
                continue;
            }
            count += if depth == 1 { 1 } else { self.perft(depth - 1) };
            self.unapply_move();
        }
        count
    }

    /// Leaf counts split by root move, keyed by the move's UCI text
    pub fn perft_divide(&mut self, depth: u32) -> FxHashMap<String, u64> {
        let start = Instant::now();
        let mut counts = FxHashMap::default();
        if depth == 0 {
            return counts;
        }
        let moves = self.generate_moves(MGT::All);
        for m in moves {
            if !self.apply_if_legal(m) {
                continue;
            }
            counts.insert(m.to_uci(), self.perft(depth - 1));
            self.unapply_move();
        }

        for (m, count) in counts.iter().sorted() {
            trace!("{m}: {count}");
        }
        debug!("divide {} nodes in {} ms", counts.values().sum::<u64>(), start.elapsed().as_millis());
        counts
    }
}

/// Same count as `Position::perft`, with each root move's subtree on its own rayon task
pub fn parallel_perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut root = position.clone();
    let moves = root.generate_legal_moves();
    moves
        .into_iter()
        .collect_vec()
        .into_par_iter()
        .map(|m| {
            let mut pos = position.clone();
            if pos.make_move(m) {
                pos.perft(depth - 1)
            } else {
                0
            }
        })
        .sum()
}
