//! Engine and batch configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{EfficiencyError, EfficiencyResult};

/// Highest shanten the search can report for a standard hand.
const MAX_SHANTEN: i8 = 8;

/// Tunables for [`crate::TileEfficiencyEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Compute second-level ukeire at all.
    pub second_level: bool,
    /// Lowest candidate shanten that gets the one-ply lookahead.
    pub second_level_min_shanten: i8,
    /// Highest candidate shanten that gets the one-ply lookahead.
    pub second_level_max_shanten: i8,
    pub cache_enabled: bool,
    /// Initial capacity hint for the shanten cache.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            second_level: true,
            second_level_min_shanten: 1,
            second_level_max_shanten: 3,
            cache_enabled: true,
            cache_capacity: 4096,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON object; missing fields take defaults.
    pub fn from_json_str(json: &str) -> EfficiencyResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EfficiencyError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects inverted or out-of-range lookahead bounds.
    ///
    /// The lower bound must be at least 1: a tenpai candidate's waits already
    /// complete the hand, so there is nothing to look ahead to.
    pub fn validate(&self) -> EfficiencyResult<()> {
        let (lo, hi) = (self.second_level_min_shanten, self.second_level_max_shanten);
        if lo < 1 || hi > MAX_SHANTEN {
            return Err(EfficiencyError::InvalidConfig {
                message: format!("second-level bounds {lo}..={hi} outside 1..={MAX_SHANTEN}"),
            });
        }
        if lo > hi {
            return Err(EfficiencyError::InvalidConfig {
                message: format!("second-level bounds inverted: {lo} > {hi}"),
            });
        }
        Ok(())
    }

    /// True when a candidate at `shanten` gets second-level ukeire.
    #[inline]
    pub fn wants_second_level(&self, shanten: i8) -> bool {
        self.second_level
            && (self.second_level_min_shanten..=self.second_level_max_shanten).contains(&shanten)
    }
}

/// Configuration for a parallel batch of independent decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of threads in the rayon pool. None = rayon default (num CPUs).
    pub num_threads: Option<usize>,
    /// Settings for the engine built for each request.
    pub engine: EngineConfig,
}

impl BatchConfig {
    pub fn from_json_str(json: &str) -> EfficiencyResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EfficiencyError::InvalidConfig {
                message: e.to_string(),
            })?;
        if config.num_threads == Some(0) {
            return Err(EfficiencyError::InvalidConfig {
                message: "num_threads must be positive".to_string(),
            });
        }
        config.engine.validate()?;
        Ok(config)
    }
}
