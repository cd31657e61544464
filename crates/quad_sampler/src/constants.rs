//! Sampling and coloring constants.
//!
//! # Seed Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  res × res raster, seeded as a 4×4 grid      │
//! │                                             │
//! │   ┌────┬────┬────┬────┐                      │
//! │   │ q0 │ q1 │ q2 │ q3 │   size = res / 4     │
//! │   ├────┼────┼────┼────┤                      │
//! │   │ q4 │ q5 │ q6 │ q7 │                      │
//! │   ├────┼────┼────┼────┤                      │
//! │   │ q8 │ q9 │q10 │q11 │                      │
//! │   ├────┼────┼────┼────┤                      │
//! │   │q12 │q13 │q14 │q15 │                      │
//! │   └────┴────┴────┴────┘                      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Sample Constellation
//!
//! ```text
//!   0 ─── 5 ─── 2        0: (x,   y)      5: (x+h, y)
//!   │           │        1: (x+s, y+s)    6: (x,   y+h)
//!   6     4     8        2: (x+s, y)      7: (x+h, y+s)
//!   │           │        3: (x,   y+s)    8: (x+s, y+h)
//!   3 ─── 7 ─── 1        4: (x+h, y+h)
//! ```
//!
//! Points are taken in index order; the first `samples_per_quad` are used.

/// Seed grid side length (the raster starts as `SEED_GRID × SEED_GRID` quads).
pub const SEED_GRID: u32 = 4;

/// Number of quads in the seed grid.
pub const SEED_QUADS: usize = (SEED_GRID * SEED_GRID) as usize;

/// Smallest supported raster side (one pixel per seed quad).
pub const MIN_RESOLUTION: u32 = SEED_GRID;

/// Default raster side length.
pub const DEFAULT_RESOLUTION: u32 = 512;

/// Default iteration bound handed to the field kernel.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Full constellation size: four corners, center, four edge midpoints.
pub const MAX_SAMPLES_PER_QUAD: usize = 9;

/// Smallest constellation: three corners.
pub const MIN_SAMPLES_PER_QUAD: usize = 3;

/// Constellation offsets in units of half the quad size, `(dx, dy)`.
pub const CONSTELLATION_OFFSETS: [(u32, u32); MAX_SAMPLES_PER_QUAD] = [
  (0, 0),
  (2, 2),
  (2, 0),
  (0, 2),
  (1, 1),
  (1, 0),
  (0, 1),
  (1, 2),
  (2, 1),
];

/// Default subdivision steps per tick.
pub const DEFAULT_TICK_QUANTUM: usize = 10;

/// Greyscale gain applied to `raw / max_iterations` before saturating to u8.
pub const DEFAULT_GREYSCALE_SCALE: f64 = 16384.0;

/// Ramp lookup wraps this many times over `[0, 1)`.
pub const RAMP_REPEATS: f64 = 3.0;

/// Ramp lookup exponent, compresses high iteration counts.
pub const RAMP_EXPONENT: f64 = 0.25;

/// Ramp divisor is `max_iterations / RAMP_DIVISOR_FRACTION`.
pub const RAMP_DIVISOR_FRACTION: f64 = 3.0;

/// Profile name that always selects the greyscale mapping.
pub const GREYSCALE_PROFILE: &str = "greyscale";

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;

/// Most sub-pixel positions averaged per pixel by the full renderer.
pub const MAX_AA_SAMPLES: usize = 8;

/// Sub-pixel positions for anti-aliased full renders, in pixel units.
///
/// A single-sample render uses the pixel origin instead, the same point the
/// adaptive sampler evaluates for a 1-pixel quad.
pub const AA_OFFSETS: [(f64, f64); MAX_AA_SAMPLES] = [
  (0.25, 0.25),
  (0.75, 0.75),
  (0.25, 0.75),
  (0.75, 0.25),
  (0.5, 0.1),
  (0.5, 0.9),
  (0.1, 0.5),
  (0.9, 0.5),
];
