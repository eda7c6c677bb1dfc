use crate::{
    moves::attack_boards::{FILES, RANKS},
    types::{bitboard::Bitboard, square::Square},
};

/// Xorshift64 https://en.wikipedia.org/wiki/Xorshift
#[derive(Copy, Clone)]
pub struct Rng(u64);

impl Default for Rng {
    fn default() -> Self {
        Self(0xE926E6210D9E3487)
    }
}

impl Rng {
    pub const fn with_seed(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Method returns u64s with an average of 8 bits active, the desirable range for magic numbers
    pub fn next_magic(&mut self) -> u64 {
        self.next_u64() & self.next_u64() & self.next_u64()
    }
}

/// Size of the magic rook table.
pub const ROOK_M_SIZE: usize = 102_400;
const R_DELTAS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Size of the magic bishop table.
pub const BISHOP_M_SIZE: usize = 5248;
const B_DELTAS: [(i8, i8); 4] = [(1, -1), (-1, -1), (1, 1), (-1, 1)];

#[derive(Clone, Copy, Default, Debug)]
struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    const fn index(&self, occupied: Bitboard) -> usize {
        let blockers = occupied.0 & self.mask.0;
        let hash = blockers.wrapping_mul(self.magic);
        let index = (hash >> self.shift) as usize;
        self.offset + index
    }
}

/// Flat rook and bishop attack tables. Each square owns a `2^popcount(mask)` slice starting at
/// its entry's offset.
///
/// https://analog-hors.github.io/site/magic-bitboards/
pub struct Magics {
    rook_table: Vec<Bitboard>,
    rook_magics: [MagicEntry; 64],
    bishop_table: Vec<Bitboard>,
    bishop_magics: [MagicEntry; 64],
}

impl Default for Magics {
    fn default() -> Self {
        Self::new()
    }
}

impl Magics {
    /// Searches for a collision free magic for every square. The rng is seeded with a constant,
    /// so the same magics come out on every run.
    pub fn new() -> Self {
        let mut rng = Rng::default();
        let mut rook_table = Vec::with_capacity(ROOK_M_SIZE);
        let mut rook_magics = [MagicEntry::default(); 64];
        let mut bishop_table = Vec::with_capacity(BISHOP_M_SIZE);
        let mut bishop_magics = [MagicEntry::default(); 64];

        for sq in Square::iter() {
            let (mut entry, mut table) = find_magic(relevant_mask(R_DELTAS, sq), sq, R_DELTAS, &mut rng);
            entry.offset = rook_table.len();
            rook_magics[sq] = entry;
            rook_table.append(&mut table);

            let (mut entry, mut table) = find_magic(relevant_mask(B_DELTAS, sq), sq, B_DELTAS, &mut rng);
            entry.offset = bishop_table.len();
            bishop_magics[sq] = entry;
            bishop_table.append(&mut table);
        }

        debug_assert_eq!(ROOK_M_SIZE, rook_table.len());
        debug_assert_eq!(BISHOP_M_SIZE, bishop_table.len());
        Self { rook_table, rook_magics, bishop_table, bishop_magics }
    }

    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let magic = &self.bishop_magics[sq];
        self.bishop_table[magic.index(occupied)]
    }

    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let magic = &self.rook_magics[sq];
        self.rook_table[magic.index(occupied)]
    }
}

/// Squares whose occupancy can change the attack set. The last square of each ray is left out
/// since nothing lies behind it.
fn relevant_mask(deltas: [(i8, i8); 4], sq: Square) -> Bitboard {
    let edges = ((RANKS[0] | RANKS[7]) & !RANKS[sq.rank() as usize])
        | ((FILES[0] | FILES[7]) & !FILES[sq.file() as usize]);
    sliding_attack(deltas, sq, Bitboard::EMPTY) & !edges
}

/// Returns a bitboards of sliding attacks given an array of 4 deltas/
/// Does not include the original position/
/// Includes occupied bits if it runs into them, but stops before going further.
fn sliding_attack(deltas: [(i8, i8); 4], sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attack = Bitboard::EMPTY;
    for (df, dr) in deltas {
        let mut file = sq.file() as i8 + df;
        let mut rank = sq.rank() as i8 + dr;
        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let s = Square::from_coords(file as u8, rank as u8);
            attack.set(s);
            if occupied.occupied(s) {
                break;
            }
            file += df;
            rank += dr;
        }
    }
    attack
}

/// Function finds a magic valid for a given square
fn find_magic(
    mask: Bitboard,
    sq: Square,
    deltas: [(i8, i8); 4],
    rng: &mut Rng,
) -> (MagicEntry, Vec<Bitboard>) {
    loop {
        let mut magic;
        loop {
            magic = rng.next_magic();
            if (magic.wrapping_mul(mask.0)).wrapping_shr(56).count_ones() >= 6 {
                break;
            }
        }

        let shift = 64 - mask.count_bits();
        let magic_entry = MagicEntry { mask, magic, shift, offset: 0 };
        if let Some(table) = make_table(deltas, sq, &magic_entry) {
            return (magic_entry, table);
        }
    }
}

/// Function tries to make a table with a given magic number
fn make_table(
    deltas: [(i8, i8); 4],
    sq: Square,
    magic_entry: &MagicEntry,
) -> Option<Vec<Bitboard>> {
    let idx_bits = 64 - magic_entry.shift;
    let mut table = vec![Bitboard::EMPTY; 1 << idx_bits];
    let mut blockers = Bitboard::EMPTY;
    loop {
        let moves = sliding_attack(deltas, sq, blockers);
        let idx = magic_entry.index(blockers);

        // A sliding attack set is never empty, so empty marks a free slot
        if table[idx] == Bitboard::EMPTY {
            table[idx] = moves;
        } else if table[idx] != moves {
            return None;
        }

        // Carry-Rippler trick to iterate through all subsections of blockers
        blockers.0 = blockers.0.wrapping_sub(magic_entry.mask.0) & magic_entry.mask.0;
        if blockers == Bitboard::EMPTY {
            break;
        }
    }
    Some(table)
}

#[cfg(test)]
mod magic_tests {
    use super::*;

    #[test]
    fn test_masks_exclude_edges() {
        assert_eq!(relevant_mask(R_DELTAS, Square::A1).count_bits(), 12);
        assert_eq!(relevant_mask(R_DELTAS, Square(27)).count_bits(), 10);
        assert_eq!(relevant_mask(B_DELTAS, Square(27)).count_bits(), 9);
        assert_eq!(relevant_mask(B_DELTAS, Square::H8).count_bits(), 6);
    }

    #[test]
    fn test_lookup_matches_ray_cast() {
        let magics = crate::init::Tables::shared();
        let mut rng = Rng::with_seed(0x1234_5678_9ABC_DEF1);
        for sq in Square::iter() {
            for _ in 0..32 {
                let occ = Bitboard(rng.next_u64() & rng.next_u64());
                assert_eq!(magics.attacks.rook_attacks(sq, occ), sliding_attack(R_DELTAS, sq, occ));
                assert_eq!(magics.attacks.bishop_attacks(sq, occ), sliding_attack(B_DELTAS, sq, occ));
            }
        }
    }
}
