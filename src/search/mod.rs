use std::time::{Duration, Instant};

use log::warn;

use crate::{
    board::position::Position,
    engine::{options::EngineOptions, transposition::TranspositionTable},
    error::OptionError,
    moves::moves::Move,
};

use self::{
    alpha_beta::iterative_deepening,
    game_time::SearchTimer,
    history_heuristics::MoveHistory,
    killers::{empty_killers, KillerMoves},
};

pub(crate) mod alpha_beta;
pub(crate) mod eval;
pub mod game_time;
pub(crate) mod history_heuristics;
pub(crate) mod killers;
pub(crate) mod quiescence;

pub const CHECKMATE: i32 = 100_000;
pub const STALEMATE: i32 = 0;
/// Anything beyond this is a forced mate, with the distance encoded in the remainder
pub const NEAR_CHECKMATE: i32 = CHECKMATE - 1000;
pub const INFINITY: i32 = 1_000_000;
pub const MAX_SEARCH_DEPTH: i32 = 64;

/// State owned by one search call
pub(crate) struct SearchInfo<'a> {
    pub tt: &'a TranspositionTable,
    pub options: EngineOptions,
    pub killer_moves: KillerMoves,
    pub history: MoveHistory,
    pub timer: SearchTimer,
    pub nodes: u64,
    pub stopped: bool,
    pub start: Instant,
}

impl<'a> SearchInfo<'a> {
    pub fn new(tt: &'a TranspositionTable, options: EngineOptions, timer: SearchTimer) -> Self {
        Self {
            tt,
            options,
            killer_moves: empty_killers(),
            history: MoveHistory::default(),
            timer,
            nodes: 0,
            stopped: false,
            start: Instant::now(),
        }
    }

    /// Counts a node and, every `poll_interval` nodes, checks the deadline. Returns true once
    /// the search has been told to stop
    #[inline(always)]
    pub fn visit_node(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes & self.options.poll_mask() == 0 && self.timer.expired() {
            self.stopped = true;
        }
        self.stopped
    }
}

/// Outcome of a search: the deepest fully completed iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// None only when the side to move has no legal moves
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Long lived search context. The transposition table survives between searches and is aged at
/// the start of each one
pub struct Engine {
    options: EngineOptions,
    tt: TranspositionTable,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self { tt: TranspositionTable::new(options.hash_mb), options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let old_hash = self.options.hash_mb;
        self.options.set(name, value)?;
        if self.options.hash_mb != old_hash && self.tt.resize(self.options.hash_mb).is_err() {
            warn!("could not allocate a {} MiB transposition table", self.options.hash_mb);
            self.options.hash_mb = old_hash;
            return Err(OptionError::InvalidValue { name: name.to_string(), value: value.to_string() });
        }
        Ok(())
    }

    /// Forgets everything learned in earlier games
    pub fn new_game(&self) {
        self.tt.clear();
    }

    /// Searches a copy of `position` up to `max_depth` plies, or until `budget` runs out once the
    /// first depth is done
    pub fn search(&self, position: &Position, max_depth: i32, budget: Option<Duration>) -> SearchResult {
        self.tt.new_search();
        let mut pos = position.clone();
        let mut info = SearchInfo::new(&self.tt, self.options, SearchTimer::new(budget));
        let max_depth = max_depth.clamp(1, self.options.max_depth);
        iterative_deepening(&mut pos, &mut info, max_depth)
    }
}

/// One-off search with default options and a fresh table
pub fn search(position: &Position, max_depth: i32, budget: Option<Duration>) -> SearchResult {
    Engine::default().search(position, max_depth, budget)
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn test_set_option_resizes_table() {
        let mut engine = Engine::default();
        engine.set_option("Hash", "8").unwrap();
        assert_eq!(engine.options().hash_mb, 8);
        assert_eq!(engine.tt().len(), TranspositionTable::new(8).len());

        let err = engine.set_option("Hash", "65536");
        assert!(matches!(err, Err(OptionError::InvalidValue { .. })));
        assert_eq!(engine.options().hash_mb, 8);
        assert_eq!(engine.tt().len(), TranspositionTable::new(8).len());
    }
}
