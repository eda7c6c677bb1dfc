pub mod attack_boards;
pub mod magics;
pub mod movegenerator;
pub mod movelist;
pub(crate) mod movepicker;
pub mod moves;
