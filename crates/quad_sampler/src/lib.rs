//! quad_sampler - Incremental adaptive-resolution sampling of 2D scalar fields
//!
//! Renders expensive per-point fields (escape-time fractals and the like)
//! progressively: the raster starts as a coarse 4×4 grid of square regions and
//! the region with the highest refinement priority is split into four, a few
//! splits per `tick()`, until every region is either one pixel or uniform.
//!
//! # Features
//!
//! - **Budgeted ticks**: each `tick()` performs a bounded quantum of work, so a
//!   display loop can interleave rendering with refinement
//! - **Shared sample cache**: neighbouring regions and parent/child corners
//!   never evaluate the kernel twice in one generation
//! - **Decoupled coloring**: raw values are stored, colors are derived on
//!   flush, so switching palettes never resamples
//! - **Pluggable kernels**: anything implementing [`FieldKernel`], plus the
//!   built-in [`FractalKind`]s
//! - **Full-render baseline**: [`render_full`] evaluates every pixel, for
//!   timing comparisons and as a correctness reference
//!
//! # Example
//!
//! ```ignore
//! use quad_sampler::{AdaptiveSampler, FractalKind, SamplerConfig};
//!
//! let mut sampler = AdaptiveSampler::from_kind(FractalKind::Mandelbrot, SamplerConfig::default())?;
//! while sampler.tick() {
//!   sampler.flush_incremental();
//!   // upload sampler.pixel_buffer().as_bytes() to the display
//! }
//!
//! sampler.set_color_profile("fire")?;
//! sampler.flush_full();
//! ```

pub mod cache;
pub mod camera;
pub mod color;
pub mod compositor;
pub mod constants;
pub mod error;
pub mod full_render;
pub mod kernel;
pub mod metrics;
pub mod quad;
pub mod refinement;
pub mod sampler;

// Re-export commonly used items
pub use cache::SampleCache;
pub use camera::{Camera, CameraView};
pub use color::{BuiltinRamps, ColorMapper, ColorProfile, Ramp, RampProvider, Rgb};
pub use compositor::PixelBuffer;
pub use error::{Result, SamplerError};
pub use full_render::{render_full, sample_full};
pub use kernel::{FieldKernel, FnKernel, FractalKind};
pub use quad::Quad;
pub use refinement::{PixelField, RefinementEngine, TickBudget, TickStats};
pub use sampler::{AdaptiveSampler, SamplerConfig};
