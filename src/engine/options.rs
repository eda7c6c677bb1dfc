use crate::{
    engine::transposition::{DEFAULT_TABLE_SIZE_MB, MAX_TABLE_SIZE_MB},
    error::OptionError,
    search::MAX_SEARCH_DEPTH,
};

/// Runtime knobs of the engine. Names match the ones `set` accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Transposition table size in MiB
    pub hash_mb: usize,
    pub null_move_reduction: i32,
    /// Any requested search depth is clamped to this
    pub max_depth: i32,
    /// Nodes searched between deadline checks. Always a power of two
    pub poll_interval: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { hash_mb: DEFAULT_TABLE_SIZE_MB, null_move_reduction: 2, max_depth: MAX_SEARCH_DEPTH, poll_interval: 4096 }
    }
}

impl EngineOptions {
    /// Sets an option by name, case insensitive
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue { name: name.to_string(), value: value.to_string() };
        match name.to_ascii_lowercase().as_str() {
            "hash" => {
                self.hash_mb = value.parse().ok().filter(|mb| (1..=MAX_TABLE_SIZE_MB).contains(mb)).ok_or_else(invalid)?;
            }
            "nullmovereduction" => {
                self.null_move_reduction = value.parse().ok().filter(|r| (1..=4).contains(r)).ok_or_else(invalid)?;
            }
            "maxdepth" => {
                self.max_depth =
                    value.parse().ok().filter(|d| (1..=MAX_SEARCH_DEPTH).contains(d)).ok_or_else(invalid)?;
            }
            "pollinterval" => {
                self.poll_interval =
                    value.parse::<u64>().ok().filter(|n| n.is_power_of_two()).ok_or_else(invalid)?;
            }
            _ => return Err(OptionError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Mask checked against the node counter
    pub(crate) fn poll_mask(&self) -> u64 {
        self.poll_interval - 1
    }
}

#[cfg(test)]
mod option_tests {
    use super::*;

    #[test]
    fn test_set_options() {
        let mut opts = EngineOptions::default();
        assert_eq!(opts.hash_mb, 16);
        assert_eq!(opts.poll_mask(), 4095);
        opts.set("Hash", "64").unwrap();
        opts.set("MaxDepth", "12").unwrap();
        opts.set("pollinterval", "1024").unwrap();
        opts.set("NullMoveReduction", "3").unwrap();
        assert_eq!(opts, EngineOptions { hash_mb: 64, null_move_reduction: 3, max_depth: 12, poll_interval: 1024 });
    }

    #[test]
    fn test_bad_options() {
        let mut opts = EngineOptions::default();
        assert_eq!(opts.set("Threads", "4"), Err(OptionError::UnknownOption("Threads".to_string())));
        assert!(matches!(opts.set("Hash", "lots"), Err(OptionError::InvalidValue { .. })));
        assert!(matches!(opts.set("Hash", "65536"), Err(OptionError::InvalidValue { .. })));
        assert!(matches!(opts.set("Hash", "0"), Err(OptionError::InvalidValue { .. })));
        assert!(matches!(opts.set("PollInterval", "1000"), Err(OptionError::InvalidValue { .. })));
        assert!(matches!(opts.set("MaxDepth", "0"), Err(OptionError::InvalidValue { .. })));
        assert_eq!(opts, EngineOptions::default());
    }
}
