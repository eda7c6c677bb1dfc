use std::{
    collections::TryReserveError,
    mem,
    sync::{
        atomic::{AtomicU8, Ordering},
        PoisonError, RwLock,
    },
};

use log::debug;

use crate::{
    moves::moves::{Move, PackedMove},
    search::NEAR_CHECKMATE,
};

/// Which side of the true score a stored value sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryFlag {
    Exact,
    /// Search failed high, the true score is at least this value
    LowerBound,
    /// Search failed low, the true score is at most this value
    UpperBound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableEntry {
    key: u64,
    depth: i32,
    flag: EntryFlag,
    score: i32,
    best_move: PackedMove,
    age: u8,
}

impl TableEntry {
    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn flag(&self) -> EntryFlag {
        self.flag
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn best_move(&self) -> Option<Move> {
        if self.best_move.is_null() {
            None
        } else {
            Some(self.best_move.decode())
        }
    }
}

const CLUSTER_SIZE: usize = 4;
type Cluster = [Option<TableEntry>; CLUSTER_SIZE];

pub const DEFAULT_TABLE_SIZE_MB: usize = 16;
pub const MAX_TABLE_SIZE_MB: usize = 32_768;
const BYTES_PER_MB: usize = 1024 * 1024;
const CLUSTER_BYTES: usize = mem::size_of::<Cluster>();

/// Mate scores are stored relative to the node they were found at, so an entry reads the same at
/// any ply
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score > NEAR_CHECKMATE {
        score + ply
    } else if score < -NEAR_CHECKMATE {
        score - ply
    } else {
        score
    }
}

pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score > NEAR_CHECKMATE {
        score - ply
    } else if score < -NEAR_CHECKMATE {
        score + ply
    } else {
        score
    }
}

/// Fixed size hash table of clusters. Every read goes through a shared lock and every
/// read-modify-write through the exclusive lock, so no entry is ever seen half written.
pub struct TranspositionTable {
    clusters: RwLock<Vec<Cluster>>,
    age: AtomicU8,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SIZE_MB)
    }
}

fn cluster_count(mb: usize) -> usize {
    (mb.saturating_mul(BYTES_PER_MB) / CLUSTER_BYTES).max(1)
}

// Seen in virithidas and Alexandria
fn index(hash: u64, len: usize) -> usize {
    ((u128::from(hash) * (len as u128)) >> 64) as usize
}

impl TranspositionTable {
    pub fn new(mb: usize) -> Self {
        Self { clusters: RwLock::new(vec![[None; CLUSTER_SIZE]; cluster_count(mb)]), age: AtomicU8::new(0) }
    }

    pub fn len(&self) -> usize {
        self.clusters.read().unwrap_or_else(PoisonError::into_inner).len() * CLUSTER_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.read().unwrap_or_else(PoisonError::into_inner).iter().flatten().all(Option::is_none)
    }

    /// Throws away every entry and reallocates to hold roughly `mb` mebibytes. If the allocation
    /// fails the old table is kept as it was
    pub fn resize(&self, mb: usize) -> Result<(), TryReserveError> {
        let count = cluster_count(mb);
        let mut table = Vec::new();
        table.try_reserve_exact(count)?;
        table.resize(count, [None; CLUSTER_SIZE]);
        let mut clusters = self.clusters.write().unwrap_or_else(PoisonError::into_inner);
        *clusters = table;
        debug!("transposition table resized to {mb} MiB ({} entries)", clusters.len() * CLUSTER_SIZE);
        Ok(())
    }

    pub fn clear(&self) {
        let mut clusters = self.clusters.write().unwrap_or_else(PoisonError::into_inner);
        clusters.iter_mut().for_each(|c| *c = [None; CLUSTER_SIZE]);
        self.age.store(0, Ordering::Relaxed);
        debug!("transposition table cleared");
    }

    /// Starts a new generation. Entries from earlier generations become the first choice for
    /// eviction
    pub fn new_search(&self) {
        self.age.fetch_add(1, Ordering::Relaxed);
    }

    pub fn age(&self) -> u8 {
        self.age.load(Ordering::Relaxed)
    }

    pub fn store(&self, hash: u64, m: Option<Move>, depth: i32, flag: EntryFlag, score: i32, ply: i32) {
        let age = self.age();
        let mut clusters = self.clusters.write().unwrap_or_else(PoisonError::into_inner);
        let idx = index(hash, clusters.len());
        let cluster = &mut clusters[idx];

        let mut entry = TableEntry {
            key: hash,
            depth,
            flag,
            score: score_to_tt(score, ply),
            best_move: m.map_or(PackedMove::NULL, Move::pack),
            age,
        };

        let slot = if let Some(i) = cluster.iter().position(|e| e.is_some_and(|e| e.key == hash)) {
            let Some(old) = cluster[i] else { unreachable!() };
            if old.age == age && old.depth > depth {
                return;
            }
            // Keep the old move rather than forgetting it
            if entry.best_move.is_null() {
                entry.best_move = old.best_move;
            }
            i
        } else if let Some(i) = cluster.iter().position(Option::is_none) {
            i
        } else {
            replacement_slot(cluster, age)
        };

        cluster[slot] = Some(entry);
    }

    /// Returns a score usable at this node, or None if the entry is missing, too shallow, or its
    /// bound doesn't resolve the window
    pub fn probe(&self, hash: u64, depth: i32, alpha: i32, beta: i32, ply: i32) -> Option<i32> {
        let entry = self.get(hash, ply)?;
        if entry.depth < depth {
            return None;
        }
        let usable = match entry.flag {
            EntryFlag::Exact => true,
            EntryFlag::LowerBound => entry.score >= beta,
            EntryFlag::UpperBound => entry.score <= alpha,
        };
        usable.then_some(entry.score)
    }

    /// Entry for this hash with its score already adjusted to `ply`
    pub fn get(&self, hash: u64, ply: i32) -> Option<TableEntry> {
        let clusters = self.clusters.read().unwrap_or_else(PoisonError::into_inner);
        let cluster = &clusters[index(hash, clusters.len())];
        cluster.iter().flatten().find(|e| e.key == hash).map(|e| TableEntry { score: score_from_tt(e.score, ply), ..*e })
    }

    pub fn best_move(&self, hash: u64) -> Option<Move> {
        self.get(hash, 0).and_then(|e| e.best_move())
    }

    /// Permille of sampled slots holding an entry from the current search
    pub fn hashfull(&self) -> usize {
        let age = self.age();
        let clusters = self.clusters.read().unwrap_or_else(PoisonError::into_inner);
        let sample = clusters.len().min(250);
        let used = clusters.iter().take(sample).flatten().flatten().filter(|e| e.age == age).count();
        used * 1000 / (sample * CLUSTER_SIZE)
    }
}

/// Prefer the shallowest entry left over from an older search, otherwise the shallowest entry
fn replacement_slot(cluster: &Cluster, age: u8) -> usize {
    let depth_of = |i: &usize| cluster[*i].map_or(i32::MIN, |e| e.depth);
    let stale = (0..CLUSTER_SIZE).filter(|&i| cluster[i].is_some_and(|e| e.age != age)).min_by_key(depth_of);
    stale.unwrap_or_else(|| (0..CLUSTER_SIZE).min_by_key(depth_of).unwrap_or(0))
}
