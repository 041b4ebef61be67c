//! Layout rotation: which catalog entry plays next
//!
//! Sequential walks the catalog in order and wraps. Shuffled draws without
//! replacement from a working set and refills it once every layout has played.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Policy for choosing the next layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ProgressionMode {
    /// Catalog order, wrapping at the end
    #[default]
    #[value(alias = "seq")]
    Sequential,
    /// Random order, no repeats until every layout has played
    #[value(alias = "shuffle", alias = "random")]
    Shuffled,
}

impl ProgressionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressionMode::Sequential => "Sequential",
            ProgressionMode::Shuffled => "Shuffled",
        }
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Sequential { index: usize },
    Shuffled { remaining: Vec<usize> },
}

/// Picks catalog indices under a [`ProgressionMode`]
#[derive(Debug, Clone)]
pub struct LayoutRotation {
    catalog_len: usize,
    strategy: Strategy,
    rng: Pcg32,
}

impl LayoutRotation {
    pub fn new(mode: ProgressionMode, catalog_len: usize, seed: u64) -> Self {
        Self {
            catalog_len,
            strategy: Self::fresh_strategy(mode, catalog_len),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn fresh_strategy(mode: ProgressionMode, catalog_len: usize) -> Strategy {
        match mode {
            ProgressionMode::Sequential => Strategy::Sequential { index: 0 },
            ProgressionMode::Shuffled => Strategy::Shuffled {
                remaining: (0..catalog_len).collect(),
            },
        }
    }

    pub fn mode(&self) -> ProgressionMode {
        match self.strategy {
            Strategy::Sequential { .. } => ProgressionMode::Sequential,
            Strategy::Shuffled { .. } => ProgressionMode::Shuffled,
        }
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog_len
    }

    /// Switch policy, starting over from a fresh rotation
    pub fn set_mode(&mut self, mode: ProgressionMode) {
        self.strategy = Self::fresh_strategy(mode, self.catalog_len);
    }

    /// Forget rotation progress (sequential restarts at 0, shuffled refills)
    pub fn reset(&mut self) {
        self.set_mode(self.mode());
    }

    /// Next catalog index, or `None` for an empty catalog
    pub fn next(&mut self) -> Option<usize> {
        if self.catalog_len == 0 {
            return None;
        }

        match &mut self.strategy {
            Strategy::Sequential { index } => {
                let current = *index;
                *index = (current + 1) % self.catalog_len;
                Some(current)
            }
            Strategy::Shuffled { remaining } => {
                if remaining.is_empty() {
                    log::debug!("All {} layouts played, refilling rotation", self.catalog_len);
                    remaining.extend(0..self.catalog_len);
                }
                let pick = self.rng.random_range(0..remaining.len());
                Some(remaining.swap_remove(pick))
            }
        }
    }

    /// Layouts not yet drawn in the current shuffled cycle
    pub fn remaining(&self) -> usize {
        match &self.strategy {
            Strategy::Sequential { .. } => self.catalog_len,
            Strategy::Shuffled { remaining } => remaining.len(),
        }
    }
}
