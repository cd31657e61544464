//! Refinement engine - seeds the raster and splits the most urgent quads.
//!
//! # Scheduling Strategy
//!
//! One generation runs from [`RefinementEngine::begin`] until every live quad
//! is terminal:
//! 1. **Seed**: clear the sample cache and tile the raster with a 4×4 grid of
//!    quads of side `resolution / 4`
//! 2. **Step**: pop the (approximately) highest-priority quad, replace it with
//!    its four children, each sampled through the cache
//! 3. **Tick**: run steps until the [`TickBudget`] is spent or nothing is
//!    refinable
//!
//! Live quads always tile the raster exactly: a subdivision removes one quad
//! and adds four children covering the same footprint.

pub mod budget;
pub mod worklist;

use smallvec::SmallVec;
#[cfg(feature = "tracing")]
use tracing::{debug, trace};
use web_time::Instant;

use crate::cache::SampleCache;
use crate::camera::Camera;
use crate::constants::{MAX_SAMPLES_PER_QUAD, SEED_GRID, SEED_QUADS};
use crate::kernel::FieldKernel;
use crate::quad::{constellation, Quad};

pub use budget::{TickBudget, TickStats};
pub use worklist::Worklist;

/// Kernel evaluated at pixel coordinates through a camera.
#[derive(Clone, Copy)]
pub struct PixelField<'a> {
  kernel: &'a dyn FieldKernel,
  camera: &'a Camera,
  max_iterations: u32,
}

impl<'a> PixelField<'a> {
  pub fn new(kernel: &'a dyn FieldKernel, camera: &'a Camera, max_iterations: u32) -> Self {
    Self {
      kernel,
      camera,
      max_iterations,
    }
  }

  #[inline]
  pub fn sample(&self, px: u32, py: u32) -> f64 {
    let p = self.camera.to_plane(px, py);
    self.kernel.evaluate(p.x, p.y, self.max_iterations)
  }
}

/// Sample a quad's constellation through the cache and build it.
fn sample_quad(
  cache: &mut SampleCache,
  field: &PixelField<'_>,
  x: u32,
  y: u32,
  size: u32,
  samples_per_quad: usize,
) -> Quad {
  let samples: SmallVec<[f64; MAX_SAMPLES_PER_QUAD]> = constellation(x, y, size, samples_per_quad)
    .into_iter()
    .map(|(px, py)| cache.get_or_compute(px, py, |px, py| field.sample(px, py)))
    .collect();
  Quad::from_samples(x, y, size, &samples)
}

/// Owns the worklist and sample cache for one generation at a time.
#[derive(Debug)]
pub struct RefinementEngine {
  worklist: Worklist,
  cache: SampleCache,
  samples_per_quad: usize,
  resolution: u32,
  generation: u64,
  converged: bool,
  /// Quads created this generation, seeds included.
  quads_created: u64,
}

impl RefinementEngine {
  pub fn new(samples_per_quad: usize) -> Self {
    Self {
      worklist: Worklist::new(),
      cache: SampleCache::new(),
      samples_per_quad,
      resolution: 0,
      generation: 0,
      converged: false,
      quads_created: 0,
    }
  }

  /// Change the constellation size used from the next `begin()` on.
  pub fn set_samples_per_quad(&mut self, samples_per_quad: usize) {
    self.samples_per_quad = samples_per_quad;
  }

  /// Discard all state and seed a new generation.
  ///
  /// `resolution` must be a power of two of at least `SEED_GRID`.
  pub fn begin(&mut self, resolution: u32, generation: u64, field: &PixelField<'_>) {
    debug_assert!(resolution.is_power_of_two() && resolution >= SEED_GRID);
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("refinement::begin", generation, resolution).entered();

    self.cache.clear(generation);
    self.resolution = resolution;
    self.generation = generation;
    self.converged = false;

    let size = resolution / SEED_GRID;
    let mut seeds = Vec::with_capacity(SEED_QUADS);
    for gy in 0..SEED_GRID {
      for gx in 0..SEED_GRID {
        seeds.push(sample_quad(
          &mut self.cache,
          field,
          gx * size,
          gy * size,
          size,
          self.samples_per_quad,
        ));
      }
    }
    self.quads_created = seeds.len() as u64;
    self.worklist.reset(seeds);

    #[cfg(feature = "tracing")]
    debug!(
      samples = self.cache.len(),
      "Seeded {} quads of size {}", SEED_QUADS, size
    );
  }

  /// Split the most urgent quad. Returns `false` when nothing is refinable.
  pub fn step(&mut self, field: &PixelField<'_>) -> bool {
    let Some(parent) = self.worklist.pop_refinable() else {
      return false;
    };
    // Non-terminal quads are at least 2 pixels wide
    let Some(children) = parent.child_origins() else {
      self.worklist.push(parent);
      return false;
    };
    #[cfg(feature = "tracing")]
    trace!(x = parent.x, y = parent.y, size = parent.size, priority = parent.priority, "subdivide");
    for (x, y, size) in children {
      let child = sample_quad(&mut self.cache, field, x, y, size, self.samples_per_quad);
      self.worklist.push(child);
    }
    self.quads_created += 4;
    true
  }

  /// Run steps until the budget is spent or the generation converges.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "refinement::tick", level = "trace"))]
  pub fn tick(&mut self, field: &PixelField<'_>, budget: &TickBudget) -> TickStats {
    let start = Instant::now();
    let hits_before = self.cache.hits();
    let misses_before = self.cache.misses();
    let mut stats = TickStats::default();

    while !self.converged && budget.can_subdivide(stats.subdivisions_performed) {
      if stats.subdivisions_performed > 0 && budget.is_out_of_time(start.elapsed()) {
        break;
      }
      if self.step(field) {
        stats.subdivisions_performed += 1;
      } else {
        self.converged = true;
        #[cfg(feature = "tracing")]
        debug!(
          generation = self.generation,
          quads = self.worklist.len(),
          samples = self.cache.len(),
          "Refinement converged"
        );
      }
    }

    stats.samples_computed = self.cache.misses() - misses_before;
    stats.cache_hits = self.cache.hits() - hits_before;
    stats.worklist_len = self.worklist.len();
    stats.converged = self.converged;
    stats.elapsed_us = start.elapsed().as_micros() as u64;
    stats
  }

  /// True once no live quad can be refined.
  pub fn is_converged(&self) -> bool {
    self.converged
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  pub fn quads_created(&self) -> u64 {
    self.quads_created
  }

  pub fn worklist(&self) -> &Worklist {
    &self.worklist
  }

  pub fn worklist_mut(&mut self) -> &mut Worklist {
    &mut self.worklist
  }

  pub fn cache(&self) -> &SampleCache {
    &self.cache
  }
}
