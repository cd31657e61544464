//! Configuration errors.
//!
//! Every fallible setter rejects bad input and leaves the previous valid
//! configuration in place.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
  #[error("Unknown field kernel: {0}")]
  UnknownKernel(String),
  #[error("Unknown color profile: {0}")]
  UnknownProfile(String),
  #[error("Color profile {0} has an empty ramp table")]
  EmptyRamp(String),
  #[error("Failed to load ramp {name}: {reason}")]
  RampLoad { name: String, reason: String },
  #[error("Resolution must be a power of two >= {min}, got {got}")]
  InvalidResolution { got: u32, min: u32 },
  #[error("Samples per quad must be within {min}..={max}, got {got}")]
  InvalidSampleCount { got: usize, min: usize, max: usize },
  #[error("Iteration bound must be at least 1")]
  ZeroIterations,
  #[error("Anti-aliasing samples must be within 1..={max}, got {got}")]
  InvalidAaSamples { got: usize, max: usize },
  #[error("Zoom must be finite and positive, got {0}")]
  InvalidZoom(f64),
}

pub type Result<T> = std::result::Result<T, SamplerError>;
