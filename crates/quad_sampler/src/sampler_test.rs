use super::*;
use crate::full_render::sample_full;
use crate::kernel::FnKernel;

fn config(resolution: u32) -> SamplerConfig {
  SamplerConfig {
    resolution,
    ..Default::default()
  }
}

fn mandelbrot(resolution: u32) -> AdaptiveSampler {
  AdaptiveSampler::from_kind(FractalKind::Mandelbrot, config(resolution)).unwrap()
}

/// Every raster pixel matches the color of the quad covering it.
fn assert_buffer_matches_quads(sampler: &AdaptiveSampler, mapper: &ColorMapper) {
  for quad in sampler.quads() {
    let expected = mapper.to_color(quad.value);
    for py in quad.y..quad.y + quad.size {
      for px in quad.x..quad.x + quad.size {
        assert_eq!(sampler.pixel_buffer().pixel(px, py), Some(expected));
      }
    }
  }
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_default_config_is_valid() {
  let config = SamplerConfig::default();
  assert!(config.validate().is_ok());
  assert_eq!(config.resolution, DEFAULT_RESOLUTION);
  assert_eq!(config.samples_per_quad, MAX_SAMPLES_PER_QUAD);
  assert_eq!(config.profile, GREYSCALE_PROFILE);
}

#[test]
fn test_invalid_config_is_rejected() {
  let bad_resolution = SamplerConfig {
    resolution: 48,
    ..Default::default()
  };
  assert_eq!(
    AdaptiveSampler::from_kind(FractalKind::Mandelbrot, bad_resolution).err(),
    Some(SamplerError::InvalidResolution { got: 48, min: 4 })
  );

  let bad_profile = SamplerConfig {
    profile: "sepia".into(),
    ..Default::default()
  };
  assert_eq!(
    AdaptiveSampler::from_kind(FractalKind::Mandelbrot, bad_profile).err(),
    Some(SamplerError::UnknownProfile("sepia".into()))
  );

  let too_few = SamplerConfig {
    samples_per_quad: 2,
    ..Default::default()
  };
  assert!(matches!(
    too_few.validate(),
    Err(SamplerError::InvalidSampleCount { got: 2, .. })
  ));
}

#[test]
fn test_kernel_default_view_applied() {
  let sampler = AdaptiveSampler::from_kind(FractalKind::Gradient, config(16)).unwrap();
  assert_eq!(sampler.camera_view(), FractalKind::Gradient.default_view());
  assert_eq!(sampler.kernel_name(), "gradient");
}

// =========================================================================
// Driving
// =========================================================================

#[test]
fn test_first_tick_begins_generation() {
  let mut sampler = mandelbrot(32);
  assert!(sampler.is_stale());
  assert!(!sampler.is_converged());
  assert_eq!(sampler.quads().count(), 0);

  assert!(sampler.tick());
  assert!(!sampler.is_stale());
  assert_eq!(sampler.generation(), 1);
  assert_eq!(sampler.last_tick_stats().subdivisions_performed, TickBudget::DEFAULT.max_subdivisions);
}

/// Resolution 4, constant field: nothing to refine, every pixel painted.
#[test]
fn test_constant_field_end_to_end() {
  let kernel = FnKernel::new(|_, _, _| 1.0);
  let mut sampler = AdaptiveSampler::new(kernel, config(4)).unwrap();

  assert!(!sampler.tick());
  assert!(sampler.is_converged());
  assert_eq!(sampler.quads().count(), 16);

  assert_eq!(sampler.flush_incremental(), 16);
  let expected = sampler.color_mapper().to_color(1.0);
  for y in 0..4 {
    for x in 0..4 {
      assert_eq!(sampler.pixel_buffer().pixel(x, y), Some(expected));
    }
  }
}

#[test]
fn test_run_to_completion() {
  let mut sampler = mandelbrot(64);
  let ticks = sampler.run_to_completion();
  assert!(ticks > 0);
  assert!(sampler.is_converged());
  assert!(sampler.quads().all(Quad::is_terminal));
  assert!(!sampler.tick());
  assert!(sampler.last_tick_stats().converged);
}

#[test]
fn test_budget_controls_quantum() {
  let mut sampler = mandelbrot(128);
  sampler.set_budget(TickBudget::quantum(2));
  sampler.tick();
  assert_eq!(sampler.last_tick_stats().subdivisions_performed, 2);
  assert_eq!(sampler.quads().count(), 16 + 6);
}

#[test]
fn test_begin_clears_buffer() {
  let mut sampler = mandelbrot(32);
  sampler.run_to_completion();
  sampler.flush_incremental();
  assert!(sampler.pixel_buffer().as_bytes().iter().any(|&b| b != 0));

  sampler.begin();
  assert!(sampler.pixel_buffer().as_bytes().iter().all(|&b| b == 0));
  assert_eq!(sampler.quads().count(), 16);
}

// =========================================================================
// Flushing
// =========================================================================

#[test]
fn test_incremental_flush_tracks_new_quads() {
  let mut sampler = mandelbrot(64);
  sampler.tick();
  let first = sampler.flush_incremental();
  // 16 seeds, 10 removed, 40 children
  assert_eq!(first, 16 - 10 + 40);
  assert_eq!(sampler.flush_incremental(), 0);

  sampler.tick();
  assert_eq!(sampler.flush_incremental(), 40);
}

#[test]
fn test_incremental_flush_is_idempotent() {
  let mut sampler = mandelbrot(32);
  sampler.run_to_completion();
  sampler.flush_incremental();
  let snapshot = sampler.pixel_buffer().clone();

  assert_eq!(sampler.flush_incremental(), 0);
  assert_eq!(sampler.pixel_buffer(), &snapshot);
  assert_buffer_matches_quads(&sampler, &ColorMapper::new(ColorProfile::Greyscale, 100));
}

/// After a profile change and full flush, every pixel is a function of its
/// quad's stored value and the new profile only.
#[test]
fn test_profile_change_recolors_without_resampling() {
  let mut sampler = mandelbrot(64);
  sampler.run_to_completion();
  sampler.flush_incremental();
  let generation = sampler.generation();
  let values: Vec<f64> = sampler.quads().map(|q| q.value).collect();

  sampler.set_color_profile("fire").unwrap();
  assert_eq!(sampler.generation(), generation);
  assert!(sampler.is_converged());
  assert_eq!(sampler.flush_incremental(), 0);

  let painted = sampler.flush_full();
  assert_eq!(painted, values.len());

  let fire = ColorProfile::resolve("fire", &BuiltinRamps::default()).unwrap();
  assert_buffer_matches_quads(&sampler, &ColorMapper::new(fire, 100));
  let after: Vec<f64> = sampler.quads().map(|q| q.value).collect();
  assert_eq!(values, after);
}

#[test]
fn test_background_applies_on_full_flush() {
  let kernel = FnKernel::new(|_, _, _| 0.0);
  let mut sampler = AdaptiveSampler::new(kernel, config(8)).unwrap();
  sampler.run_to_completion();
  sampler.flush_incremental();
  assert_eq!(sampler.pixel_buffer().pixel(5, 5), Some(Rgb::BLACK));

  sampler.set_background(Rgb::new(0, 0, 64));
  sampler.flush_full();
  assert_eq!(sampler.pixel_buffer().pixel(5, 5), Some(Rgb::new(0, 0, 64)));
}

// =========================================================================
// Full Render Baseline
// =========================================================================

/// Converged 1-pixel quads hold exactly the per-pixel value, so they paint the
/// same color the full renderer gives that pixel.
#[test]
fn test_unit_quads_match_full_render() {
  let mut sampler = mandelbrot(64);
  sampler.set_camera_view(-0.745, 0.1, 0.05).unwrap();
  sampler.set_color_profile("fire").unwrap();
  sampler.run_to_completion();
  sampler.flush_incremental();

  let full = sampler.render_full(1).unwrap();
  let camera = Camera::new(sampler.camera_view(), 64);
  let raw = sample_full(&FractalKind::Mandelbrot, &camera, DEFAULT_MAX_ITERATIONS, 1).unwrap();

  let mut unit_quads = 0;
  for quad in sampler.quads().filter(|q| q.size == 1) {
    unit_quads += 1;
    assert_eq!(quad.value, raw[(quad.y * 64 + quad.x) as usize]);
    assert_eq!(
      sampler.pixel_buffer().pixel(quad.x, quad.y),
      full.pixel(quad.x, quad.y),
      "Pixel ({}, {}) differs from full render",
      quad.x,
      quad.y
    );
  }
  assert!(unit_quads > 0, "View has no fine detail");
}

#[test]
fn test_render_full_leaves_refinement_alone() {
  let mut sampler = mandelbrot(32);
  sampler.run_to_completion();
  sampler.flush_incremental();
  let snapshot = sampler.pixel_buffer().clone();
  let generation = sampler.generation();

  let full = sampler.render_full(4).unwrap();
  assert_eq!(full.width(), 32);
  assert_eq!(sampler.pixel_buffer(), &snapshot);
  assert_eq!(sampler.generation(), generation);
  assert!(sampler.is_converged());

  assert_eq!(
    sampler.render_full(0),
    Err(SamplerError::InvalidAaSamples { got: 0, max: 8 })
  );
}

// =========================================================================
// Metrics
// =========================================================================

#[cfg(feature = "metrics")]
#[test]
fn test_incremental_flush_refreshes_quad_histogram() {
  let mut sampler = mandelbrot(64);
  sampler.tick();
  sampler.flush_incremental();
  let metrics = sampler.metrics();
  assert_eq!(metrics.generations_started, 1);
  assert_eq!(metrics.tick_timings.len(), 1);
  assert_eq!(metrics.total_quads() as usize, sampler.quads().count());

  sampler.run_to_completion();
  sampler.flush_incremental();
  let metrics = sampler.metrics();
  let live = sampler.quads().count();
  assert_eq!(metrics.total_quads() as usize, live);
  assert_eq!(metrics.terminal_quads as usize, live);
  let histogram_area: u64 = metrics
    .size_histogram()
    .iter()
    .map(|&(size, count)| size as u64 * size as u64 * count as u64)
    .sum();
  assert_eq!(histogram_area, 64 * 64);
}

// =========================================================================
// Invalidation
// =========================================================================

#[test]
fn test_every_sampling_setter_invalidates() {
  let mut sampler = mandelbrot(32);
  sampler.run_to_completion();

  let setters: [&dyn Fn(&mut AdaptiveSampler); 6] = [
    &|s: &mut AdaptiveSampler| s.set_camera_view(-0.7, 0.1, 0.5).unwrap(),
    &|s: &mut AdaptiveSampler| s.set_max_iterations(64).unwrap(),
    &|s: &mut AdaptiveSampler| s.set_resolution(16).unwrap(),
    &|s: &mut AdaptiveSampler| s.set_samples_per_quad(5).unwrap(),
    &|s: &mut AdaptiveSampler| s.select_kernel("julia").unwrap(),
    &|s: &mut AdaptiveSampler| s.set_kernel(FnKernel::new(|x: f64, _, _| x.abs())),
  ];

  for set in setters {
    let before = sampler.generation();
    set(&mut sampler);
    assert_eq!(sampler.generation(), before + 1);
    assert!(sampler.is_stale());
    assert!(!sampler.is_converged());

    sampler.tick();
    assert!(!sampler.is_stale());
    sampler.run_to_completion();
  }
}

#[test]
fn test_resolution_change_resizes_buffer_on_begin() {
  let mut sampler = mandelbrot(32);
  sampler.tick();
  sampler.set_resolution(16).unwrap();
  assert_eq!(sampler.pixel_buffer().width(), 32);

  sampler.tick();
  assert_eq!(sampler.pixel_buffer().width(), 16);
  let area: u64 = sampler.quads().map(Quad::area).sum();
  assert_eq!(area, 16 * 16);
}

#[test]
fn test_select_kernel_jumps_to_default_view() {
  let mut sampler = mandelbrot(16);
  sampler.set_camera_view(1.0, 1.0, 0.01).unwrap();
  sampler.select_kernel("cactus").unwrap();
  assert_eq!(sampler.camera_view(), FractalKind::Cactus.default_view());
  assert_eq!(sampler.kernel_name(), "cactus");
}

// =========================================================================
// Rejection With Retention
// =========================================================================

#[test]
fn test_rejected_settings_keep_prior_state() {
  let mut sampler = mandelbrot(32);
  sampler.run_to_completion();
  let generation = sampler.generation();
  let view = sampler.camera_view();

  assert_eq!(
    sampler.set_resolution(100),
    Err(SamplerError::InvalidResolution { got: 100, min: 4 })
  );
  assert_eq!(sampler.set_resolution(2), Err(SamplerError::InvalidResolution { got: 2, min: 4 }));
  assert_eq!(sampler.set_max_iterations(0), Err(SamplerError::ZeroIterations));
  assert_eq!(sampler.set_camera_view(0.0, 0.0, -1.0), Err(SamplerError::InvalidZoom(-1.0)));
  assert!(matches!(
    sampler.set_samples_per_quad(10),
    Err(SamplerError::InvalidSampleCount { got: 10, .. })
  ));
  assert_eq!(
    sampler.select_kernel("newton"),
    Err(SamplerError::UnknownKernel("newton".into()))
  );
  assert_eq!(
    sampler.set_color_profile("sepia"),
    Err(SamplerError::UnknownProfile("sepia".into()))
  );

  assert_eq!(sampler.generation(), generation);
  assert!(sampler.is_converged());
  assert_eq!(sampler.resolution(), 32);
  assert_eq!(sampler.max_iterations(), DEFAULT_MAX_ITERATIONS);
  assert_eq!(sampler.samples_per_quad(), MAX_SAMPLES_PER_QUAD);
  assert_eq!(sampler.camera_view(), view);
  assert_eq!(sampler.kernel_name(), "mandelbrot");
  assert_eq!(sampler.color_profile(), &ColorProfile::Greyscale);
}

#[test]
fn test_empty_ramp_rejected_with_retention() {
  let ramps = BuiltinRamps::default().with_ramp("blank", Vec::new());
  let mut sampler =
    AdaptiveSampler::with_ramp_provider(FractalKind::Mandelbrot, config(16), ramps).unwrap();
  sampler.set_color_profile("fire").unwrap();

  assert_eq!(
    sampler.set_color_profile("blank"),
    Err(SamplerError::EmptyRamp("blank".into()))
  );
  assert_eq!(sampler.color_profile().name(), "fire");
}

#[test]
fn test_available_profiles() {
  let sampler = mandelbrot(16);
  assert_eq!(
    sampler.available_profiles(),
    vec!["greyscale", "fire", "ocean", "rainbow"]
  );
}
