//! Full renderer - evaluates the kernel at every pixel.
//!
//! No refinement, no cache: `resolution²` kernel calls (times the
//! anti-aliasing sample count). This is the baseline the adaptive sampler is
//! timed and checked against. With one sample per pixel it evaluates exactly
//! the points a converged adaptive render evaluates for its 1-pixel quads.

use smallvec::SmallVec;
use web_time::Instant;

use crate::camera::Camera;
use crate::color::ColorMapper;
use crate::compositor::PixelBuffer;
use crate::constants::{AA_OFFSETS, MAX_AA_SAMPLES};
use crate::error::{Result, SamplerError};
use crate::kernel::FieldKernel;
use crate::quad::aggregate;

pub fn validate_aa_samples(aa_samples: usize) -> Result<()> {
  if !(1..=MAX_AA_SAMPLES).contains(&aa_samples) {
    return Err(SamplerError::InvalidAaSamples {
      got: aa_samples,
      max: MAX_AA_SAMPLES,
    });
  }
  Ok(())
}

/// Raw value of one pixel, averaged over `aa_samples` sub-pixel positions.
#[inline]
fn sample_pixel(
  kernel: &dyn FieldKernel,
  camera: &Camera,
  max_iterations: u32,
  px: u32,
  py: u32,
  aa_samples: usize,
) -> f64 {
  if aa_samples <= 1 {
    let p = camera.to_plane(px, py);
    return kernel.evaluate(p.x, p.y, max_iterations);
  }
  let samples: SmallVec<[f64; MAX_AA_SAMPLES]> = AA_OFFSETS
    .iter()
    .take(aa_samples)
    .map(|&(dx, dy)| {
      let p = camera.to_plane_subpixel(px as f64 + dx, py as f64 + dy);
      kernel.evaluate(p.x, p.y, max_iterations)
    })
    .collect();
  aggregate(&samples)
}

/// Raw values for every pixel of the camera's raster, row-major.
pub fn sample_full(
  kernel: &dyn FieldKernel,
  camera: &Camera,
  max_iterations: u32,
  aa_samples: usize,
) -> Result<Vec<f64>> {
  validate_aa_samples(aa_samples)?;
  let resolution = camera.resolution();
  let mut values = Vec::with_capacity(resolution as usize * resolution as usize);
  for py in 0..resolution {
    for px in 0..resolution {
      values.push(sample_pixel(kernel, camera, max_iterations, px, py, aa_samples));
    }
  }
  Ok(values)
}

/// Render every pixel and color it with `mapper`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "full_render::render_full"))]
pub fn render_full(
  kernel: &dyn FieldKernel,
  camera: &Camera,
  max_iterations: u32,
  aa_samples: usize,
  mapper: &ColorMapper,
) -> Result<PixelBuffer> {
  let start = Instant::now();
  let values = sample_full(kernel, camera, max_iterations, aa_samples)?;

  let resolution = camera.resolution();
  let mut buffer = PixelBuffer::new(resolution);
  for (i, &value) in values.iter().enumerate() {
    let x = (i % resolution as usize) as u32;
    let y = (i / resolution as usize) as u32;
    buffer.fill_square(x, y, 1, mapper.to_color(value));
  }

  #[cfg(feature = "tracing")]
  tracing::info!(
    resolution,
    aa_samples,
    evaluations = values.len() * aa_samples,
    elapsed_ms = start.elapsed().as_millis() as u64,
    "Full render finished"
  );
  #[cfg(not(feature = "tracing"))]
  let _ = start;
  Ok(buffer)
}
