use std::fmt;

/// Tuning knobs for a [`Pather`](crate::Pather).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatherConfig {
    /// How many search nodes are allocated at a time. Also sizes the node
    /// hash table.
    ///
    /// For a small map, pass the number of states: everything then fits in a
    /// single allocation. For a large map, a quarter of the states is a good
    /// start.
    pub nodes_per_block: usize,
    /// Typical number of neighbours of a state (4 on a cardinal grid, 8 with
    /// diagonals). The adjacency cache holds
    /// `nodes_per_block * typical_adjacent` entries.
    pub typical_adjacent: usize,
    /// Remember solved paths and failures between calls.
    pub use_cache: bool,
    /// Slots in the path cache. `None` means `nodes_per_block * 4`.
    pub cache_capacity: Option<usize>,
}

impl Default for PatherConfig {
    fn default() -> Self {
        Self {
            nodes_per_block: 250,
            typical_adjacent: 6,
            use_cache: true,
            cache_capacity: None,
        }
    }
}

impl PatherConfig {
    /// Check that every size is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes_per_block == 0 {
            return Err(ConfigError::ZeroNodesPerBlock);
        }
        if self.nodes_per_block >= u32::MAX as usize {
            return Err(ConfigError::NodesPerBlockTooLarge(self.nodes_per_block));
        }
        if self.typical_adjacent == 0 {
            return Err(ConfigError::ZeroTypicalAdjacent);
        }
        if self.use_cache && self.cache_capacity == Some(0) {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        Ok(())
    }

    /// Slots the path cache will get.
    pub fn effective_cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(self.nodes_per_block * 4)
    }
}

/// Errors reported by [`PatherConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroNodesPerBlock,
    NodesPerBlockTooLarge(usize),
    ZeroTypicalAdjacent,
    ZeroCacheCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodesPerBlock => write!(f, "pather: nodes_per_block must be positive"),
            Self::NodesPerBlockTooLarge(n) => {
                write!(f, "pather: nodes_per_block {n} does not fit a 32-bit node index")
            }
            Self::ZeroTypicalAdjacent => write!(f, "pather: typical_adjacent must be positive"),
            Self::ZeroCacheCapacity => write!(f, "pather: cache_capacity must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = PatherConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.effective_cache_capacity(), 1000);
    }

    #[test]
    fn rejects_zero_sizes() {
        let cfg = PatherConfig {
            nodes_per_block: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroNodesPerBlock));

        let cfg = PatherConfig {
            typical_adjacent: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTypicalAdjacent));

        let cfg = PatherConfig {
            cache_capacity: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCacheCapacity));
    }

    #[test]
    fn zero_cache_is_fine_when_disabled() {
        let cfg = PatherConfig {
            use_cache: false,
            cache_capacity: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::ZeroTypicalAdjacent.to_string(),
            "pather: typical_adjacent must be positive"
        );
    }
}
