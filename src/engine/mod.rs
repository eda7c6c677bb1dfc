pub mod options;
pub mod perft;
pub mod transposition;
