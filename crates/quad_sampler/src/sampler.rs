//! Sampler facade - the surface an external scheduler drives.
//!
//! # Generations
//!
//! Every setter that changes what is being sampled (camera, iteration bound,
//! resolution, kernel, constellation size) bumps the *requested* generation.
//! The next [`AdaptiveSampler::tick`] notices the stale generation and calls
//! [`AdaptiveSampler::begin`] before doing any work, so a driver never has to
//! track invalidation itself.
//!
//! Color settings never invalidate. They only change how stored values are
//! painted, which [`AdaptiveSampler::flush_full`] re-applies.
//!
//! Rejected settings leave the previous valid configuration untouched.

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

use crate::camera::{Camera, CameraView};
use crate::color::{BuiltinRamps, ColorMapper, ColorProfile, RampProvider, Rgb};
use crate::compositor::{self, PixelBuffer};
use crate::constants::{
  DEFAULT_GREYSCALE_SCALE, DEFAULT_MAX_ITERATIONS, DEFAULT_RESOLUTION, GREYSCALE_PROFILE,
  MAX_SAMPLES_PER_QUAD, MIN_RESOLUTION, MIN_SAMPLES_PER_QUAD,
};
use crate::error::{Result, SamplerError};
use crate::full_render;
use crate::kernel::{FieldKernel, FractalKind};
use crate::metrics::SamplerMetrics;
use crate::quad::Quad;
use crate::refinement::{PixelField, RefinementEngine, TickBudget, TickStats};

// =============================================================================
// Configuration
// =============================================================================

/// Initial sampler settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerConfig {
  /// Raster side in pixels, a power of two >= 4.
  pub resolution: u32,
  /// Iteration bound passed to the kernel.
  pub max_iterations: u32,
  /// Constellation points per quad, 3..=9.
  pub samples_per_quad: usize,
  /// Work allowed per `tick()`.
  pub budget: TickBudget,
  /// Color profile name; `"greyscale"` or a ramp known to the provider.
  pub profile: String,
  pub greyscale_scale: f64,
  /// Color of points that never diverged.
  pub background: Rgb,
}

impl Default for SamplerConfig {
  fn default() -> Self {
    Self {
      resolution: DEFAULT_RESOLUTION,
      max_iterations: DEFAULT_MAX_ITERATIONS,
      samples_per_quad: MAX_SAMPLES_PER_QUAD,
      budget: TickBudget::DEFAULT,
      profile: GREYSCALE_PROFILE.to_string(),
      greyscale_scale: DEFAULT_GREYSCALE_SCALE,
      background: Rgb::BLACK,
    }
  }
}

impl SamplerConfig {
  pub fn validate(&self) -> Result<()> {
    validate_resolution(self.resolution)?;
    validate_max_iterations(self.max_iterations)?;
    validate_samples_per_quad(self.samples_per_quad)?;
    Ok(())
  }
}

pub fn validate_resolution(resolution: u32) -> Result<()> {
  if resolution < MIN_RESOLUTION || !resolution.is_power_of_two() {
    return Err(SamplerError::InvalidResolution {
      got: resolution,
      min: MIN_RESOLUTION,
    });
  }
  Ok(())
}

pub fn validate_max_iterations(max_iterations: u32) -> Result<()> {
  if max_iterations == 0 {
    return Err(SamplerError::ZeroIterations);
  }
  Ok(())
}

pub fn validate_samples_per_quad(samples_per_quad: usize) -> Result<()> {
  if !(MIN_SAMPLES_PER_QUAD..=MAX_SAMPLES_PER_QUAD).contains(&samples_per_quad) {
    return Err(SamplerError::InvalidSampleCount {
      got: samples_per_quad,
      min: MIN_SAMPLES_PER_QUAD,
      max: MAX_SAMPLES_PER_QUAD,
    });
  }
  Ok(())
}

/// Log and pass through a rejected setting.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn rejected<T>(setting: &str, err: SamplerError) -> Result<T> {
  #[cfg(feature = "tracing")]
  warn!(setting, "Rejected configuration change: {}", err);
  Err(err)
}

// =============================================================================
// AdaptiveSampler
// =============================================================================

/// Progressive renderer for one scalar field.
pub struct AdaptiveSampler {
  kernel: Box<dyn FieldKernel>,
  ramps: Box<dyn RampProvider>,
  view: CameraView,
  camera: Camera,
  max_iterations: u32,
  resolution: u32,
  samples_per_quad: usize,
  budget: TickBudget,

  engine: RefinementEngine,
  mapper: ColorMapper,
  buffer: PixelBuffer,

  /// Generation the next `begin()` adopts.
  requested_generation: u64,
  last_stats: TickStats,
  metrics: SamplerMetrics,
}

impl AdaptiveSampler {
  /// Sampler over `kernel` with the built-in ramps.
  pub fn new<K: FieldKernel + 'static>(kernel: K, config: SamplerConfig) -> Result<Self> {
    Self::with_ramp_provider(kernel, config, BuiltinRamps::default())
  }

  /// Sampler over a built-in kernel.
  pub fn from_kind(kind: FractalKind, config: SamplerConfig) -> Result<Self> {
    Self::new(kind, config)
  }

  pub fn with_ramp_provider<K, P>(kernel: K, config: SamplerConfig, ramps: P) -> Result<Self>
  where
    K: FieldKernel + 'static,
    P: RampProvider + 'static,
  {
    config.validate()?;
    let profile = ColorProfile::resolve(&config.profile, &ramps)?;
    let view = kernel.default_view();
    view.validate()?;

    let mapper = ColorMapper::new(profile, config.max_iterations)
      .with_greyscale_scale(config.greyscale_scale)
      .with_background(config.background);

    #[cfg(feature = "tracing")]
    info!(
      kernel = kernel.name(),
      resolution = config.resolution,
      max_iterations = config.max_iterations,
      profile = %config.profile,
      "Created adaptive sampler"
    );

    Ok(Self {
      kernel: Box::new(kernel),
      ramps: Box::new(ramps),
      view,
      camera: Camera::new(view, config.resolution),
      max_iterations: config.max_iterations,
      resolution: config.resolution,
      samples_per_quad: config.samples_per_quad,
      budget: config.budget,
      engine: RefinementEngine::new(config.samples_per_quad),
      mapper,
      buffer: PixelBuffer::new(config.resolution),
      requested_generation: 1,
      last_stats: TickStats::default(),
      metrics: SamplerMetrics::new(),
    })
  }

  // ===========================================================================
  // Driving
  // ===========================================================================

  /// Discard all refinement state and reseed from the current settings.
  ///
  /// Clears the sample cache and the pixel buffer.
  pub fn begin(&mut self) {
    self.camera = Camera::new(self.view, self.resolution);
    if self.buffer.width() == self.resolution {
      self.buffer.clear();
    } else {
      self.buffer.resize(self.resolution);
    }
    self.engine.set_samples_per_quad(self.samples_per_quad);

    let field = PixelField::new(self.kernel.as_ref(), &self.camera, self.max_iterations);
    self.engine.begin(self.resolution, self.requested_generation, &field);
    self.last_stats = TickStats::default();
    self.metrics.record_generation(self.engine.cache().misses());

    #[cfg(feature = "tracing")]
    debug!(
      generation = self.requested_generation,
      kernel = self.kernel.name(),
      center_x = self.view.center_x,
      center_y = self.view.center_y,
      zoom = self.view.zoom,
      "Began generation"
    );
  }

  /// Perform one budgeted quantum of refinement.
  ///
  /// Returns `false` once nothing is left to refine. Starts a new generation
  /// first if any setting changed since the last `begin()`.
  pub fn tick(&mut self) -> bool {
    if self.is_stale() {
      self.begin();
    }
    let field = PixelField::new(self.kernel.as_ref(), &self.camera, self.max_iterations);
    let stats = self.engine.tick(&field, &self.budget);
    self.last_stats = stats;
    self.metrics.record_tick(&stats);
    stats.made_progress()
  }

  /// Tick until no progress is made. Returns the number of productive ticks.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "sampler::run_to_completion"))]
  pub fn run_to_completion(&mut self) -> usize {
    let mut ticks = 0;
    while self.tick() {
      ticks += 1;
    }
    #[cfg(feature = "tracing")]
    info!(
      ticks,
      quads = self.engine.worklist().len(),
      samples = self.engine.cache().len(),
      "Sampler converged"
    );
    ticks
  }

  /// Paint quads created since the last flush.
  pub fn flush_incremental(&mut self) -> usize {
    let painted =
      compositor::flush_incremental(self.engine.worklist_mut().iter_mut(), &self.mapper, &mut self.buffer);
    self.metrics.update_from_quads(self.engine.worklist().iter());
    painted
  }

  /// Repaint every live quad under the current color profile.
  pub fn flush_full(&mut self) -> usize {
    let painted = compositor::flush_full(self.engine.worklist_mut().iter_mut(), &self.mapper, &mut self.buffer);
    self.metrics.update_from_quads(self.engine.worklist().iter());
    painted
  }

  /// Render the current view at every pixel, bypassing refinement.
  ///
  /// Uses the sampler's kernel, view and colors. Refinement state and the
  /// sampler's own pixel buffer are left untouched.
  pub fn render_full(&self, aa_samples: usize) -> Result<PixelBuffer> {
    let camera = Camera::new(self.view, self.resolution);
    full_render::render_full(self.kernel.as_ref(), &camera, self.max_iterations, aa_samples, &self.mapper)
  }

  // ===========================================================================
  // Settings that start a new generation
  // ===========================================================================

  pub fn set_camera_view(&mut self, center_x: f64, center_y: f64, zoom: f64) -> Result<()> {
    self.set_view(CameraView::new(center_x, center_y, zoom))
  }

  pub fn set_view(&mut self, view: CameraView) -> Result<()> {
    if let Err(err) = view.validate() {
      return rejected("camera", err);
    }
    self.view = view;
    self.invalidate("camera");
    Ok(())
  }

  pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<()> {
    if let Err(err) = validate_max_iterations(max_iterations) {
      return rejected("max_iterations", err);
    }
    self.max_iterations = max_iterations;
    self.mapper.set_max_iterations(max_iterations);
    self.invalidate("max_iterations");
    Ok(())
  }

  pub fn set_resolution(&mut self, resolution: u32) -> Result<()> {
    if let Err(err) = validate_resolution(resolution) {
      return rejected("resolution", err);
    }
    self.resolution = resolution;
    self.invalidate("resolution");
    Ok(())
  }

  pub fn set_samples_per_quad(&mut self, samples_per_quad: usize) -> Result<()> {
    if let Err(err) = validate_samples_per_quad(samples_per_quad) {
      return rejected("samples_per_quad", err);
    }
    self.samples_per_quad = samples_per_quad;
    self.invalidate("samples_per_quad");
    Ok(())
  }

  /// Swap the kernel and jump to its default view.
  pub fn set_kernel<K: FieldKernel + 'static>(&mut self, kernel: K) {
    let view = kernel.default_view();
    if view.validate().is_ok() {
      self.view = view;
    }
    self.kernel = Box::new(kernel);
    self.invalidate("kernel");
  }

  /// Select a built-in kernel by name.
  pub fn select_kernel(&mut self, name: &str) -> Result<()> {
    match name.parse::<FractalKind>() {
      Ok(kind) => {
        self.set_kernel(kind);
        Ok(())
      }
      Err(err) => rejected("kernel", err),
    }
  }

  #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
  fn invalidate(&mut self, reason: &str) {
    self.requested_generation += 1;
    #[cfg(feature = "tracing")]
    debug!(reason, generation = self.requested_generation, "Invalidated generation");
  }

  // ===========================================================================
  // Settings that only affect painting
  // ===========================================================================

  /// Switch color profile. Call [`Self::flush_full`] to repaint.
  pub fn set_color_profile(&mut self, name: &str) -> Result<()> {
    match ColorProfile::resolve(name, self.ramps.as_ref()) {
      Ok(profile) => {
        #[cfg(feature = "tracing")]
        debug!(profile = name, "Color profile changed");
        self.mapper.set_profile(profile);
        Ok(())
      }
      Err(err) => rejected("color_profile", err),
    }
  }

  pub fn set_background(&mut self, background: Rgb) {
    self.mapper.set_background(background);
  }

  pub fn set_greyscale_scale(&mut self, scale: f64) {
    self.mapper.set_greyscale_scale(scale);
  }

  pub fn set_budget(&mut self, budget: TickBudget) {
    self.budget = budget;
  }

  // ===========================================================================
  // Accessors
  // ===========================================================================

  pub fn pixel_buffer(&self) -> &PixelBuffer {
    &self.buffer
  }

  /// Live quads of the current generation.
  pub fn quads(&self) -> impl Iterator<Item = &Quad> {
    self.engine.worklist().iter()
  }

  /// Requested generation; ahead of the active one until the next tick.
  pub fn generation(&self) -> u64 {
    self.requested_generation
  }

  pub fn is_stale(&self) -> bool {
    self.engine.generation() != self.requested_generation
  }

  /// Nothing left to refine in an up-to-date generation.
  pub fn is_converged(&self) -> bool {
    !self.is_stale() && self.engine.is_converged()
  }

  pub fn last_tick_stats(&self) -> TickStats {
    self.last_stats
  }

  pub fn metrics(&self) -> &SamplerMetrics {
    &self.metrics
  }

  pub fn camera_view(&self) -> CameraView {
    self.view
  }

  pub fn max_iterations(&self) -> u32 {
    self.max_iterations
  }

  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  pub fn samples_per_quad(&self) -> usize {
    self.samples_per_quad
  }

  pub fn budget(&self) -> TickBudget {
    self.budget
  }

  pub fn kernel_name(&self) -> &str {
    self.kernel.name()
  }

  pub fn color_profile(&self) -> &ColorProfile {
    self.mapper.profile()
  }

  pub fn color_mapper(&self) -> &ColorMapper {
    &self.mapper
  }

  /// Ramp names the provider can enumerate.
  pub fn available_profiles(&self) -> Vec<String> {
    let mut names = vec![GREYSCALE_PROFILE.to_string()];
    names.extend(self.ramps.available());
    names
  }
}

#[cfg(test)]
#[path = "sampler_test.rs"]
mod sampler_test;
