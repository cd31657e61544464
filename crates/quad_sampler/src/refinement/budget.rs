//! Per-tick work limits for refinement.
//!
//! Keeps a single `tick()` call bounded so the caller can interleave display
//! work between ticks.

use std::time::Duration;

use crate::constants::DEFAULT_TICK_QUANTUM;

/// Work limits for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickBudget {
  /// Maximum subdivisions per tick (0 = unlimited).
  pub max_subdivisions: usize,
  /// Optional wall-clock cap, checked between subdivisions.
  /// The first subdivision of a tick always runs.
  pub max_duration: Option<Duration>,
}

impl TickBudget {
  /// Default quantum, no time cap.
  pub const DEFAULT: Self = Self {
    max_subdivisions: DEFAULT_TICK_QUANTUM,
    max_duration: None,
  };

  /// Run until the generation converges.
  pub const UNLIMITED: Self = Self {
    max_subdivisions: usize::MAX,
    max_duration: None,
  };

  /// Budget with the given quantum and no time cap.
  pub const fn quantum(max_subdivisions: usize) -> Self {
    Self {
      max_subdivisions,
      max_duration: None,
    }
  }

  /// Add a wall-clock cap.
  pub const fn with_max_duration(mut self, max_duration: Duration) -> Self {
    self.max_duration = Some(max_duration);
    self
  }

  /// Check if more subdivisions can be performed.
  #[inline]
  pub fn can_subdivide(&self, performed: usize) -> bool {
    self.max_subdivisions == 0 || performed < self.max_subdivisions
  }

  /// Check if the time cap has been reached.
  #[inline]
  pub fn is_out_of_time(&self, elapsed: Duration) -> bool {
    self.max_duration.is_some_and(|max| elapsed >= max)
  }
}

impl Default for TickBudget {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Statistics from one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
  /// Quads split into four children.
  pub subdivisions_performed: usize,
  /// Kernel evaluations (cache misses).
  pub samples_computed: u64,
  /// Constellation points served from the cache.
  pub cache_hits: u64,
  /// Live quads after the tick.
  pub worklist_len: usize,
  /// No refinable quad remains.
  pub converged: bool,
  /// Wall-clock time spent in the tick, microseconds.
  pub elapsed_us: u64,
}

impl TickStats {
  /// Whether the tick refined anything.
  #[inline]
  pub fn made_progress(&self) -> bool {
    self.subdivisions_performed > 0
  }

  /// Total constellation lookups.
  #[inline]
  pub fn total_lookups(&self) -> u64 {
    self.samples_computed + self.cache_hits
  }
}
