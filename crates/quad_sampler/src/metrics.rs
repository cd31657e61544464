//! Sampler statistics collected across ticks.
//!
//! Feature-gated and runtime-toggled so the tick loop pays nothing when
//! disabled.
//!
//! # Usage
//!
//! ```ignore
//! use quad_sampler::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // AdaptiveSampler records ticks and generations itself, and refreshes
//! // the quad histogram on every flush:
//! sampler.run_to_completion();
//! sampler.flush_incremental();
//! println!("{:.1} us/tick", sampler.metrics().avg_tick_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::quad::Quad;
use crate::refinement::TickStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Distinct quad sizes tracked (`2^0 ..= 2^31`).
pub const SIZE_BUCKETS: usize = 32;

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity history of recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a value, evicting the oldest at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    // ~4 seconds of ticks at 30 frames per second
    Self::new(128)
  }
}

/// Refinement statistics for display or logging.
#[derive(Debug, Clone, Default)]
pub struct SamplerMetrics {
  /// Live quad count per size, index = log2(size).
  pub quads_per_size: [u32; SIZE_BUCKETS],
  /// Terminal quads among the live set.
  pub terminal_quads: u32,

  /// Tick wall-clock times in microseconds.
  pub tick_timings: RollingWindow<u64>,
  /// Subdivisions per tick.
  pub subdivisions: RollingWindow<u64>,
  /// Kernel evaluations per tick.
  pub samples: RollingWindow<u64>,

  pub last_tick_us: u64,
  /// Kernel evaluations since creation, across generations.
  pub total_samples: u64,
  /// `begin()` calls observed.
  pub generations_started: u64,
}

impl SamplerMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset everything except the cumulative counters.
  pub fn reset(&mut self) {
    self.quads_per_size.fill(0);
    self.terminal_quads = 0;
    self.tick_timings.clear();
    self.subdivisions.clear();
    self.samples.clear();
    self.last_tick_us = 0;
  }

  pub fn record_tick(&mut self, stats: &TickStats) {
    if !is_enabled() {
      return;
    }
    self.tick_timings.push(stats.elapsed_us);
    self.subdivisions.push(stats.subdivisions_performed as u64);
    self.samples.push(stats.samples_computed);
    self.last_tick_us = stats.elapsed_us;
    self.total_samples += stats.samples_computed;
  }

  pub fn record_generation(&mut self, seed_samples: u64) {
    if !is_enabled() {
      return;
    }
    self.generations_started += 1;
    self.total_samples += seed_samples;
  }

  /// Rebuild the size histogram from the live quads. Called on every flush.
  pub fn update_from_quads<'a, I>(&mut self, quads: I)
  where
    I: IntoIterator<Item = &'a Quad>,
  {
    if !is_enabled() {
      return;
    }
    self.quads_per_size.fill(0);
    self.terminal_quads = 0;
    for quad in quads {
      let bucket = (quad.size.max(1).trailing_zeros() as usize).min(SIZE_BUCKETS - 1);
      self.quads_per_size[bucket] += 1;
      if quad.is_terminal() {
        self.terminal_quads += 1;
      }
    }
  }

  /// Non-empty histogram buckets as `(size, count)`, smallest size first.
  pub fn size_histogram(&self) -> Vec<(u32, u32)> {
    self
      .quads_per_size
      .iter()
      .enumerate()
      .filter(|&(_, &count)| count > 0)
      .map(|(log2, &count)| (1u32 << log2, count))
      .collect()
  }

  pub fn total_quads(&self) -> u32 {
    self.quads_per_size.iter().sum()
  }

  pub fn avg_tick_us(&self) -> f64 {
    self.tick_timings.average()
  }

  /// Subdivisions per second over the window.
  pub fn subdivision_rate(&self) -> f64 {
    let micros = self.tick_timings.sum();
    if micros == 0 {
      return 0.0;
    }
    self.subdivisions.sum() as f64 * 1_000_000.0 / micros as f64
  }
}
