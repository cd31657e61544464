//! Sample constellation of a quad and aggregation of its samples.

use smallvec::SmallVec;

use crate::constants::{CONSTELLATION_OFFSETS, MAX_SAMPLES_PER_QUAD};

/// Ordered sample points of one quad.
pub type Constellation = SmallVec<[(u32, u32); MAX_SAMPLES_PER_QUAD]>;

/// Sample points for the quad at `(x, y)` of side `size`.
///
/// A 1-pixel quad samples only its own pixel. Larger quads take the first
/// `count` points of the corner/center/midpoint constellation, which reaches
/// one pixel past the quad's far edges.
pub fn constellation(x: u32, y: u32, size: u32, count: usize) -> Constellation {
  if size <= 1 {
    let mut points = Constellation::new();
    points.push((x, y));
    return points;
  }
  let half = size / 2;
  CONSTELLATION_OFFSETS
    .iter()
    .take(count.clamp(1, MAX_SAMPLES_PER_QUAD))
    .map(|&(dx, dy)| (x + dx * half, y + dy * half))
    .collect()
}

/// Mean of the samples (`0.0` for none).
#[inline]
pub fn aggregate(samples: &[f64]) -> f64 {
  if samples.is_empty() {
    return 0.0;
  }
  samples.iter().sum::<f64>() / samples.len() as f64
}

/// True when every sample is bit-identical to the first.
#[inline]
pub fn is_uniform(samples: &[f64]) -> bool {
  match samples.split_first() {
    Some((first, rest)) => rest.iter().all(|s| s.to_bits() == first.to_bits()),
    None => true,
  }
}
