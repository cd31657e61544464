//! Color mapping - raw aggregated scalars to RGB.
//!
//! Colors are never stored alongside samples. Changing the profile only
//! requires re-walking the stored quad values, never resampling.

pub mod ramp;

use std::fmt;
use std::sync::Arc;

use crate::constants::{
  DEFAULT_GREYSCALE_SCALE, DEFAULT_MAX_ITERATIONS, GREYSCALE_PROFILE, RAMP_DIVISOR_FRACTION,
  RAMP_EXPONENT, RAMP_REPEATS,
};
use crate::error::{Result, SamplerError};

pub use ramp::{BuiltinRamps, RampProvider};

/// 8-bit RGB triplet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const BLACK: Self = Self::new(0, 0, 0);
  pub const WHITE: Self = Self::new(255, 255, 255);

  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }

  pub const fn grey(v: u8) -> Self {
    Self::new(v, v, v)
  }

  #[inline]
  pub const fn to_array(self) -> [u8; 3] {
    [self.r, self.g, self.b]
  }
}

impl From<[u8; 3]> for Rgb {
  fn from([r, g, b]: [u8; 3]) -> Self {
    Self::new(r, g, b)
  }
}

/// Named, non-empty color table.
#[derive(Clone, Debug, PartialEq)]
pub struct Ramp {
  name: String,
  table: Arc<[Rgb]>,
}

impl Ramp {
  /// Rejects an empty table.
  pub fn new(name: impl Into<String>, table: Vec<Rgb>) -> Result<Self> {
    let name = name.into();
    if table.is_empty() {
      return Err(SamplerError::EmptyRamp(name));
    }
    Ok(Self {
      name,
      table: table.into(),
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Entries in lookup order; never empty.
  pub fn table(&self) -> &[Rgb] {
    &self.table
  }
}

/// Visual encoding of raw values.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorProfile {
  Greyscale,
  Ramp(Ramp),
}

impl ColorProfile {
  /// Ramp profile; rejects an empty table.
  pub fn ramp(name: impl Into<String>, table: Vec<Rgb>) -> Result<Self> {
    Ramp::new(name, table).map(Self::Ramp)
  }

  /// Resolve a profile name, loading ramp tables through `provider`.
  pub fn resolve(name: &str, provider: &dyn RampProvider) -> Result<Self> {
    if name == GREYSCALE_PROFILE {
      return Ok(Self::Greyscale);
    }
    Self::ramp(name, provider.load_ramp(name)?)
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Greyscale => GREYSCALE_PROFILE,
      Self::Ramp(ramp) => ramp.name(),
    }
  }
}

impl Default for ColorProfile {
  fn default() -> Self {
    Self::Greyscale
  }
}

impl fmt::Display for ColorProfile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Maps raw kernel values to colors under the active profile.
#[derive(Clone, Debug)]
pub struct ColorMapper {
  profile: ColorProfile,
  max_iterations: u32,
  greyscale_scale: f64,
  background: Rgb,
}

impl ColorMapper {
  pub fn new(profile: ColorProfile, max_iterations: u32) -> Self {
    Self {
      profile,
      max_iterations,
      greyscale_scale: DEFAULT_GREYSCALE_SCALE,
      background: Rgb::BLACK,
    }
  }

  pub fn with_greyscale_scale(mut self, scale: f64) -> Self {
    self.greyscale_scale = scale;
    self
  }

  pub fn with_background(mut self, background: Rgb) -> Self {
    self.background = background;
    self
  }

  pub fn profile(&self) -> &ColorProfile {
    &self.profile
  }

  pub fn set_profile(&mut self, profile: ColorProfile) {
    self.profile = profile;
  }

  pub fn max_iterations(&self) -> u32 {
    self.max_iterations
  }

  pub fn set_max_iterations(&mut self, max_iterations: u32) {
    self.max_iterations = max_iterations;
  }

  pub fn background(&self) -> Rgb {
    self.background
  }

  pub fn set_background(&mut self, background: Rgb) {
    self.background = background;
  }

  pub fn greyscale_scale(&self) -> f64 {
    self.greyscale_scale
  }

  pub fn set_greyscale_scale(&mut self, scale: f64) {
    self.greyscale_scale = scale;
  }

  /// Color for a raw value. `0.0` (did not diverge) is always the background.
  pub fn to_color(&self, raw: f64) -> Rgb {
    if raw == 0.0 {
      return self.background;
    }
    match &self.profile {
      ColorProfile::Greyscale => Rgb::grey(self.grey_level(raw)),
      ColorProfile::Ramp(ramp) => {
        let table = ramp.table();
        table[self.ramp_index(raw, table.len())]
      }
    }
  }

  /// `raw / max_iterations × scale`, saturated into a byte.
  #[inline]
  fn grey_level(&self, raw: f64) -> u8 {
    let level = raw / self.max_iterations.max(1) as f64 * self.greyscale_scale;
    level.clamp(0.0, 255.0) as u8
  }

  /// `floor(((raw / divisor) mod 1)^0.25 × len × 3) mod len`
  #[inline]
  fn ramp_index(&self, raw: f64, len: usize) -> usize {
    let divisor = self.max_iterations.max(1) as f64 / RAMP_DIVISOR_FRACTION;
    let t = (raw / divisor).rem_euclid(1.0);
    let scaled = (t.powf(RAMP_EXPONENT) * len as f64 * RAMP_REPEATS).floor();
    if !scaled.is_finite() || scaled < 0.0 {
      return 0;
    }
    scaled as usize % len
  }
}

impl Default for ColorMapper {
  fn default() -> Self {
    Self::new(ColorProfile::Greyscale, DEFAULT_MAX_ITERATIONS)
  }
}

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;
