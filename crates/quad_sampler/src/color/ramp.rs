//! Ramp table providers.
//!
//! Where ramp tables come from is the caller's business; the library only
//! needs a name → table lookup. [`BuiltinRamps`] keeps a few procedural ramps
//! in memory so the sampler works without any files on disk.

use std::collections::BTreeMap;

use super::Rgb;
use crate::error::{Result, SamplerError};

/// Entries per built-in ramp table.
pub const BUILTIN_RAMP_LEN: usize = 256;

/// Source of named color ramp tables.
pub trait RampProvider {
  /// Ordered colors of the ramp called `name`.
  ///
  /// Unknown names fail with [`SamplerError::UnknownProfile`].
  fn load_ramp(&self, name: &str) -> Result<Vec<Rgb>>;

  /// Names this provider can load, if it can enumerate them.
  fn available(&self) -> Vec<String> {
    Vec::new()
  }
}

impl<P: RampProvider + ?Sized> RampProvider for Box<P> {
  fn load_ramp(&self, name: &str) -> Result<Vec<Rgb>> {
    (**self).load_ramp(name)
  }

  fn available(&self) -> Vec<String> {
    (**self).available()
  }
}

/// In-memory ramps keyed by name.
#[derive(Clone, Debug)]
pub struct BuiltinRamps {
  ramps: BTreeMap<String, Vec<Rgb>>,
}

impl BuiltinRamps {
  /// Provider with no ramps at all.
  pub fn empty() -> Self {
    Self {
      ramps: BTreeMap::new(),
    }
  }

  /// Register (or replace) a ramp.
  pub fn insert(&mut self, name: impl Into<String>, table: Vec<Rgb>) {
    self.ramps.insert(name.into(), table);
  }

  pub fn with_ramp(mut self, name: impl Into<String>, table: Vec<Rgb>) -> Self {
    self.insert(name, table);
    self
  }
}

impl Default for BuiltinRamps {
  fn default() -> Self {
    let fire = [
      Rgb::new(0, 0, 0),
      Rgb::new(128, 0, 0),
      Rgb::new(255, 96, 0),
      Rgb::new(255, 224, 64),
      Rgb::new(255, 255, 255),
    ];
    let ocean = [
      Rgb::new(0, 7, 100),
      Rgb::new(32, 107, 203),
      Rgb::new(237, 255, 255),
      Rgb::new(255, 170, 0),
      Rgb::new(0, 2, 0),
    ];
    let bands = [
      Rgb::new(255, 0, 0),
      Rgb::new(255, 255, 0),
      Rgb::new(0, 255, 0),
      Rgb::new(0, 255, 255),
      Rgb::new(0, 0, 255),
      Rgb::new(255, 0, 255),
      Rgb::new(255, 0, 0),
    ];
    Self::empty()
      .with_ramp("fire", gradient(&fire, BUILTIN_RAMP_LEN))
      .with_ramp("ocean", gradient(&ocean, BUILTIN_RAMP_LEN))
      .with_ramp("rainbow", gradient(&bands, BUILTIN_RAMP_LEN))
  }
}

impl RampProvider for BuiltinRamps {
  fn load_ramp(&self, name: &str) -> Result<Vec<Rgb>> {
    self
      .ramps
      .get(name)
      .cloned()
      .ok_or_else(|| SamplerError::UnknownProfile(name.to_string()))
  }

  fn available(&self) -> Vec<String> {
    self.ramps.keys().cloned().collect()
  }
}

/// Linear interpolation across evenly spaced color stops.
///
/// The first and last entries equal the first and last stops.
pub fn gradient(stops: &[Rgb], len: usize) -> Vec<Rgb> {
  match stops {
    [] => Vec::new(),
    [only] => vec![*only; len],
    _ => {
      let segments = (stops.len() - 1) as f64;
      (0..len)
        .map(|i| {
          let t = if len > 1 { i as f64 / (len - 1) as f64 } else { 0.0 };
          let pos = t * segments;
          let seg = (pos.floor() as usize).min(stops.len() - 2);
          let local = pos - seg as f64;
          lerp(stops[seg], stops[seg + 1], local)
        })
        .collect()
    }
  }
}

#[inline]
fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
  let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
  Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
}
