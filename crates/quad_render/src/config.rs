//! Render configuration parsing.

use anyhow::{Context, Result};
use quad_sampler::constants::{DEFAULT_GREYSCALE_SCALE, DEFAULT_MAX_ITERATIONS, DEFAULT_TICK_QUANTUM, MAX_SAMPLES_PER_QUAD};
use quad_sampler::full_render::validate_aa_samples;
use quad_sampler::sampler::{validate_max_iterations, validate_resolution, validate_samples_per_quad};
use quad_sampler::{CameraView, FractalKind, Rgb, SamplerConfig, TickBudget};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the raster is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
	/// Progressive quadtree refinement.
	#[default]
	Adaptive,
	/// Every pixel evaluated, optionally anti-aliased.
	Full,
}

/// Root configuration for one render.
///
/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
	/// PNG (or BMP) file written when rendering finishes.
	pub output: PathBuf,
	pub mode: RenderMode,
	/// Sub-pixel samples per pixel in full mode (1..=8).
	pub aa_samples: usize,
	/// Built-in kernel name.
	pub kernel: String,
	/// Julia parameter `[re, im]`, only used by the julia kernel.
	pub julia_c: Option<[f64; 2]>,
	/// `"greyscale"` or a ramp name.
	pub profile: String,
	/// Directory searched for `<profile>.png` / `<profile>.bmp` ramp files.
	pub ramp_dir: Option<PathBuf>,
	/// Raster side in pixels (power of two >= 4).
	pub resolution: u32,
	pub max_iterations: u32,
	/// Constellation points per quad (3..=9).
	pub samples_per_quad: usize,
	/// Subdivisions per tick (0 = unlimited).
	pub quantum: usize,
	/// Optional per-tick wall-clock cap in milliseconds.
	pub tick_ms: Option<u64>,
	/// View center `[x, y]`; kernel default when absent.
	pub center: Option<[f64; 2]>,
	/// View zoom; kernel default when absent.
	pub zoom: Option<f64>,
	/// Stop after this many ticks even if not converged.
	pub max_ticks: Option<usize>,
	/// Incremental flush cadence in ticks.
	pub flush_every: usize,
	pub greyscale_scale: f64,
	/// Color of points that never diverged, `[r, g, b]`.
	pub background: [u8; 3],
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			output: PathBuf::from("render.png"),
			mode: RenderMode::Adaptive,
			aa_samples: 1,
			kernel: "mandelbrot".to_string(),
			julia_c: None,
			profile: "greyscale".to_string(),
			ramp_dir: None,
			resolution: 512,
			max_iterations: DEFAULT_MAX_ITERATIONS,
			samples_per_quad: MAX_SAMPLES_PER_QUAD,
			quantum: DEFAULT_TICK_QUANTUM,
			tick_ms: None,
			center: None,
			zoom: None,
			max_ticks: None,
			flush_every: 1,
			greyscale_scale: DEFAULT_GREYSCALE_SCALE,
			background: [0, 0, 0],
		}
	}
}

impl RenderConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse configuration from TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: RenderConfig =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
		Ok(config)
	}

	/// Reject settings the sampler would refuse, before any work starts.
	pub fn validate(&self) -> Result<()> {
		validate_resolution(self.resolution)?;
		validate_max_iterations(self.max_iterations)?;
		validate_samples_per_quad(self.samples_per_quad)?;
		validate_aa_samples(self.aa_samples)?;
		self.kernel_kind()?;

		if self.flush_every == 0 {
			anyhow::bail!("flush_every must be at least 1");
		}
		if let Some(zoom) = self.zoom {
			CameraView::new(0.0, 0.0, zoom).validate()?;
		}
		if let Some([x, y]) = self.center {
			if !x.is_finite() || !y.is_finite() {
				anyhow::bail!("center must be finite, got [{}, {}]", x, y);
			}
		}
		if !(self.greyscale_scale.is_finite() && self.greyscale_scale > 0.0) {
			anyhow::bail!("greyscale_scale must be positive, got {}", self.greyscale_scale);
		}
		Ok(())
	}

	/// Selected kernel, with the Julia parameter applied.
	pub fn kernel_kind(&self) -> Result<FractalKind> {
		let kind: FractalKind = self
			.kernel
			.parse()
			.with_context(|| format!("Invalid kernel in config: {}", self.kernel))?;
		Ok(match (kind, self.julia_c) {
			(FractalKind::Julia { .. }, Some([c_re, c_im])) => FractalKind::Julia { c_re, c_im },
			(kind, _) => kind,
		})
	}

	/// Explicit view, filling missing parts from `default`.
	pub fn view(&self, default: CameraView) -> Option<CameraView> {
		if self.center.is_none() && self.zoom.is_none() {
			return None;
		}
		let [x, y] = self.center.unwrap_or([default.center_x, default.center_y]);
		Some(CameraView::new(x, y, self.zoom.unwrap_or(default.zoom)))
	}

	pub fn budget(&self) -> TickBudget {
		let budget = TickBudget::quantum(self.quantum);
		match self.tick_ms {
			Some(ms) => budget.with_max_duration(Duration::from_millis(ms)),
			None => budget,
		}
	}

	pub fn sampler_config(&self) -> SamplerConfig {
		SamplerConfig {
			resolution: self.resolution,
			max_iterations: self.max_iterations,
			samples_per_quad: self.samples_per_quad,
			budget: self.budget(),
			profile: self.profile.clone(),
			greyscale_scale: self.greyscale_scale,
			background: Rgb::from(self.background),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_file_is_default() {
		let config = RenderConfig::parse("").unwrap();
		assert_eq!(config, RenderConfig::default());
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_parse_full_config() {
		let config = RenderConfig::parse(
			r#"
			output = "out/julia.png"
			mode = "full"
			aa_samples = 8
			kernel = "julia"
			julia_c = [-0.8, 0.156]
			profile = "fire"
			ramp_dir = "ramps"
			resolution = 256
			max_iterations = 300
			samples_per_quad = 5
			quantum = 0
			tick_ms = 16
			center = [0.1, -0.2]
			zoom = 0.5
			max_ticks = 1000
			flush_every = 4
			background = [0, 0, 32]
			"#,
		)
		.unwrap();

		assert!(config.validate().is_ok());
		assert_eq!(config.output, PathBuf::from("out/julia.png"));
		assert_eq!(config.mode, RenderMode::Full);
		assert_eq!(config.aa_samples, 8);
		assert_eq!(
			config.kernel_kind().unwrap(),
			FractalKind::Julia {
				c_re: -0.8,
				c_im: 0.156
			}
		);
		assert_eq!(config.budget(), TickBudget::quantum(0).with_max_duration(Duration::from_millis(16)));

		let sampler = config.sampler_config();
		assert_eq!(sampler.resolution, 256);
		assert_eq!(sampler.samples_per_quad, 5);
		assert_eq!(sampler.background, Rgb::new(0, 0, 32));
		assert_eq!(sampler.profile, "fire");
	}

	#[test]
	fn test_unknown_mode_rejected() {
		assert!(RenderConfig::parse("mode = \"fast\"").is_err());
	}

	#[test]
	fn test_unknown_field_rejected() {
		assert!(RenderConfig::parse("resolutoin = 64").is_err());
	}

	#[test]
	fn test_validation_failures() {
		let cases = [
			RenderConfig {
				resolution: 100,
				..Default::default()
			},
			RenderConfig {
				max_iterations: 0,
				..Default::default()
			},
			RenderConfig {
				samples_per_quad: 12,
				..Default::default()
			},
			RenderConfig {
				kernel: "newton".into(),
				..Default::default()
			},
			RenderConfig {
				flush_every: 0,
				..Default::default()
			},
			RenderConfig {
				zoom: Some(0.0),
				..Default::default()
			},
			RenderConfig {
				greyscale_scale: -1.0,
				..Default::default()
			},
			RenderConfig {
				aa_samples: 9,
				..Default::default()
			},
			RenderConfig {
				center: Some([f64::NAN, 0.5]),
				..Default::default()
			},
		];
		for config in cases {
			assert!(config.validate().is_err(), "Accepted {:?}", config);
		}
	}

	#[test]
	fn test_view_fills_from_default() {
		let default = CameraView::new(-0.5, 0.0, 2.0);
		assert_eq!(RenderConfig::default().view(default), None);

		let zoom_only = RenderConfig {
			zoom: Some(0.25),
			..Default::default()
		};
		assert_eq!(zoom_only.view(default), Some(CameraView::new(-0.5, 0.0, 0.25)));

		let center_only = RenderConfig {
			center: Some([1.0, 2.0]),
			..Default::default()
		};
		assert_eq!(center_only.view(default), Some(CameraView::new(1.0, 2.0, 2.0)));
	}

	#[test]
	fn test_julia_c_ignored_for_other_kernels() {
		let config = RenderConfig {
			kernel: "cactus".into(),
			julia_c: Some([1.0, 1.0]),
			..Default::default()
		};
		assert_eq!(config.kernel_kind().unwrap(), FractalKind::Cactus);
	}
}
