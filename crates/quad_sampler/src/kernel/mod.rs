//! Field kernels - the per-point scalar functions being sampled.
//!
//! The refinement engine only sees [`FieldKernel`]. Built-in fractals are
//! selected through the tagged [`FractalKind`] enum; anything else can be
//! injected as a boxed trait object or wrapped in [`FnKernel`].

pub mod fractals;

use std::fmt;
use std::str::FromStr;

use crate::camera::CameraView;
use crate::error::SamplerError;

/// Pure, deterministic scalar field over the plane.
///
/// Must return a non-negative scalar, `0.0` meaning "did not diverge", and
/// must terminate within `max_iterations` internal steps.
pub trait FieldKernel {
  fn evaluate(&self, x: f64, y: f64, max_iterations: u32) -> f64;

  /// View the sampler switches to when this kernel is selected.
  fn default_view(&self) -> CameraView {
    CameraView::default()
  }

  fn name(&self) -> &str {
    "custom"
  }
}

impl<K: FieldKernel + ?Sized> FieldKernel for Box<K> {
  fn evaluate(&self, x: f64, y: f64, max_iterations: u32) -> f64 {
    (**self).evaluate(x, y, max_iterations)
  }

  fn default_view(&self) -> CameraView {
    (**self).default_view()
  }

  fn name(&self) -> &str {
    (**self).name()
  }
}

/// Adapts a closure into a [`FieldKernel`] with the default view.
#[derive(Clone)]
pub struct FnKernel<F> {
  func: F,
  view: CameraView,
}

impl<F> FnKernel<F>
where
  F: Fn(f64, f64, u32) -> f64,
{
  pub fn new(func: F) -> Self {
    Self {
      func,
      view: CameraView::default(),
    }
  }

  pub fn with_view(mut self, view: CameraView) -> Self {
    self.view = view;
    self
  }
}

impl<F> FieldKernel for FnKernel<F>
where
  F: Fn(f64, f64, u32) -> f64,
{
  #[inline]
  fn evaluate(&self, x: f64, y: f64, max_iterations: u32) -> f64 {
    (self.func)(x, y, max_iterations)
  }

  fn default_view(&self) -> CameraView {
    self.view
  }
}

/// Built-in kernels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FractalKind {
  Mandelbrot,
  /// Mandelbrot with a Manhattan-norm escape test.
  MandelbrotSquare,
  Julia { c_re: f64, c_im: f64 },
  Cactus,
  /// Debug ramp along the x axis.
  Gradient,
}

impl FractalKind {
  /// Julia parameter used when none is given.
  pub const DEFAULT_JULIA: Self = Self::Julia {
    c_re: 0.3,
    c_im: 0.5,
  };

  /// Selector names accepted by [`FromStr`].
  pub const NAMES: [&'static str; 5] = ["mandelbrot", "mandelbrot_square", "julia", "cactus", "gradient"];
}

impl FieldKernel for FractalKind {
  #[inline]
  fn evaluate(&self, x: f64, y: f64, max_iterations: u32) -> f64 {
    match *self {
      Self::Mandelbrot => fractals::mandelbrot(x, y, max_iterations),
      Self::MandelbrotSquare => fractals::mandelbrot_square(x, y, max_iterations),
      Self::Julia { c_re, c_im } => fractals::julia(x, y, c_re, c_im, max_iterations),
      Self::Cactus => fractals::cactus(x, y, max_iterations),
      Self::Gradient => fractals::gradient(x, y, max_iterations),
    }
  }

  fn default_view(&self) -> CameraView {
    match self {
      Self::Mandelbrot | Self::MandelbrotSquare => CameraView::new(-0.5, 0.0, 2.0),
      Self::Julia { .. } | Self::Cactus => CameraView::new(0.0, 0.0, 2.0),
      Self::Gradient => CameraView::new(0.5, 0.0, 1.0),
    }
  }

  fn name(&self) -> &str {
    match self {
      Self::Mandelbrot => "mandelbrot",
      Self::MandelbrotSquare => "mandelbrot_square",
      Self::Julia { .. } => "julia",
      Self::Cactus => "cactus",
      Self::Gradient => "gradient",
    }
  }
}

impl fmt::Display for FractalKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for FractalKind {
  type Err = SamplerError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "mandelbrot" => Ok(Self::Mandelbrot),
      "mandelbrot_square" | "square" => Ok(Self::MandelbrotSquare),
      "julia" => Ok(Self::DEFAULT_JULIA),
      "cactus" => Ok(Self::Cactus),
      "gradient" => Ok(Self::Gradient),
      _ => Err(SamplerError::UnknownKernel(s.to_string())),
    }
  }
}
