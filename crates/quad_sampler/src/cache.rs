//! Per-generation memoization of kernel evaluations.
//!
//! Neighbouring quads share constellation points along their borders, and a
//! child shares corners with its parent. The cache makes every pixel
//! coordinate cost at most one kernel evaluation per generation.

use std::collections::HashMap;

/// Integer pixel coordinate. May lie one pixel past the raster edge.
pub type PixelCoord = (u32, u32);

/// Sample cache scoped to one generation.
#[derive(Debug, Default)]
pub struct SampleCache {
  samples: HashMap<PixelCoord, f64>,
  generation: u64,
  hits: u64,
  misses: u64,
}

impl SampleCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Drop every entry and start a new generation.
  pub fn clear(&mut self, generation: u64) {
    self.samples.clear();
    self.generation = generation;
    self.hits = 0;
    self.misses = 0;
  }

  /// Return the stored value for `(px, py)`, computing it on first use.
  #[inline]
  pub fn get_or_compute<F>(&mut self, px: u32, py: u32, compute: F) -> f64
  where
    F: FnOnce(u32, u32) -> f64,
  {
    if let Some(&value) = self.samples.get(&(px, py)) {
      self.hits += 1;
      return value;
    }
    self.misses += 1;
    let value = compute(px, py);
    self.samples.insert((px, py), value);
    value
  }

  /// Look up a coordinate without computing it.
  pub fn get(&self, px: u32, py: u32) -> Option<f64> {
    self.samples.get(&(px, py)).copied()
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  /// Lookups served from the cache this generation.
  pub fn hits(&self) -> u64 {
    self.hits
  }

  /// Kernel evaluations performed this generation.
  pub fn misses(&self) -> u64 {
    self.misses
  }
}
