use std::sync::Arc;

use lazy_static::lazy_static;

use crate::{board::zobrist::Zobrist, moves::attack_boards::AttackTables};

/// Everything that is computed once and then only read: leaper and magic attack tables plus
/// the Zobrist keys. Positions hold an `Arc` to one of these.
pub struct Tables {
    pub attacks: AttackTables,
    pub zobrist: Zobrist,
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref SHARED: Arc<Tables> = Arc::new(Tables::new());
}

impl Tables {
    /// Builds a fresh set of tables. Deterministic, so every instance is identical
    pub fn new() -> Self {
        Self { attacks: AttackTables::new(), zobrist: Zobrist::new() }
    }

    /// The process wide instance, built on first use
    pub fn shared() -> Arc<Tables> {
        Arc::clone(&SHARED)
    }
}
