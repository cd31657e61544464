//! Quad - square raster region carrying an aggregated sample and a refinement
//! priority.
//!
//! Quads are identified by their pixel-space top-left corner and side length.
//! Children are computed on demand via coordinate math; no tree is stored, the
//! live quads in the worklist ARE the state.

pub mod constellation;

use smallvec::SmallVec;

pub use constellation::{aggregate, constellation, is_uniform, Constellation};

/// Axis-aligned square region of the raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
  /// Pixel-space left edge.
  pub x: u32,
  /// Pixel-space top edge.
  pub y: u32,
  /// Side length in pixels, always a power of two.
  pub size: u32,
  /// Mean of the constellation samples.
  pub value: f64,
  /// Refinement urgency; `0.0` means terminal.
  pub priority: f64,
  /// Whether this quad's color is in the pixel buffer.
  pub flushed: bool,
}

impl Quad {
  /// Build a quad from its constellation samples.
  pub fn from_samples(x: u32, y: u32, size: u32, samples: &[f64]) -> Self {
    let value = aggregate(samples);
    let priority = priority(size, value, is_uniform(samples));
    Self {
      x,
      y,
      size,
      value,
      priority,
      flushed: false,
    }
  }

  /// A quad with priority 0 is never subdivided.
  #[inline]
  pub fn is_terminal(&self) -> bool {
    self.priority == 0.0
  }

  /// Pixel area covered by this quad.
  #[inline]
  pub fn area(&self) -> u64 {
    self.size as u64 * self.size as u64
  }

  /// Top-left corners of the four children, or `None` at size 1.
  ///
  /// Quadrant bits: bit 0 = +X half, bit 1 = +Y half.
  pub fn child_origins(&self) -> Option<SmallVec<[(u32, u32, u32); 4]>> {
    if self.size <= 1 {
      return None;
    }
    let half = self.size / 2;
    Some(
      (0..4u32)
        .map(|quadrant| {
          (
            self.x + (quadrant & 1) * half,
            self.y + ((quadrant >> 1) & 1) * half,
            half,
          )
        })
        .collect(),
    )
  }

  /// Whether the pixel `(px, py)` lies inside this quad's footprint.
  #[inline]
  pub fn contains(&self, px: u32, py: u32) -> bool {
    px >= self.x && px < self.x + self.size && py >= self.y && py < self.y + self.size
  }
}

/// `value × size²`, or zero when the quad cannot or need not be refined.
#[inline]
pub fn priority(size: u32, value: f64, uniform: bool) -> f64 {
  if size <= 1 || uniform {
    return 0.0;
  }
  value * (size as f64) * (size as f64)
}
