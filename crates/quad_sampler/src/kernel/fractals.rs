//! Escape-time kernels.
//!
//! All kernels return the 1-based iteration at which the orbit escaped, or
//! `0.0` when it stayed bounded for `max_iterations` steps.

/// Classic Mandelbrot: `z ← z² + c`, escape when `|z|² > 4`.
#[inline]
pub fn mandelbrot(cx: f64, cy: f64, max_iterations: u32) -> f64 {
  let (mut x, mut y) = (cx, cy);
  for n in 1..=max_iterations {
    // Square before the divergence check, then finish the step
    let x2 = x * x;
    let y2 = y * y;
    if x2 + y2 > 4.0 {
      return n as f64;
    }
    y = 2.0 * x * y + cy;
    x = x2 - y2 + cx;
  }
  0.0
}

/// Mandelbrot with a Manhattan-norm escape test (`|x| + |y| > 2`).
#[inline]
pub fn mandelbrot_square(cx: f64, cy: f64, max_iterations: u32) -> f64 {
  let (mut x, mut y) = (cx, cy);
  for n in 1..=max_iterations {
    if x.abs() + y.abs() > 2.0 {
      return n as f64;
    }
    let x2 = x * x;
    let y2 = y * y;
    y = 2.0 * x * y + cy;
    x = x2 - y2 + cx;
  }
  0.0
}

/// Julia set for parameter `c`: `z ← z² + c` starting at the plane point.
#[inline]
pub fn julia(zx: f64, zy: f64, c_re: f64, c_im: f64, max_iterations: u32) -> f64 {
  let (mut x, mut y) = (zx, zy);
  for n in 1..=max_iterations {
    let x2 = x * x;
    let y2 = y * y;
    if x2 + y2 > 4.0 {
      return n as f64;
    }
    y = 2.0 * x * y + c_im;
    x = x2 - y2 + c_re;
  }
  0.0
}

/// Cactus fractal: `z ← z³ + (c - 1)z - c`.
#[inline]
pub fn cactus(cx: f64, cy: f64, max_iterations: u32) -> f64 {
  let (mut x, mut y) = (cx, cy);
  for n in 1..=max_iterations {
    let x2 = x * x;
    let y2 = y * y;
    if x2 + y2 > 4.0 {
      return n as f64;
    }
    let nx = (x2 - 3.0 * y2 + cx - 1.0) * x - y * cy - cx;
    let ny = (3.0 * x2 - y2 + cx - 1.0) * y + x * cy - cy;
    x = nx;
    y = ny;
  }
  0.0
}

/// Horizontal ramp for checking the camera mapping: `clamp(x, 0, 1)` scaled
/// to the iteration range.
#[inline]
pub fn gradient(x: f64, _y: f64, max_iterations: u32) -> f64 {
  x.clamp(0.0, 1.0) * max_iterations as f64
}
