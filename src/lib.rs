#![allow(clippy::module_inception)]
pub mod board;
pub mod engine;
pub mod error;
pub mod init;
pub mod moves;
pub mod search;
pub mod types;

pub use board::{
    draw::{DrawReason, GameStatus},
    fen::STARTING_FEN,
    position::Position,
};
pub use engine::{options::EngineOptions, perft::parallel_perft, transposition::TranspositionTable};
pub use error::{FenError, MoveError, OptionError};
pub use init::Tables;
pub use moves::moves::{Move, MoveFlags};
pub use search::{game_time::GameTime, search, Engine, SearchResult};
