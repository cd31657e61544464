//! Headless progressive renderer.
//!
//! Drives an [`AdaptiveSampler`] the way a display loop would: begin, tick,
//! flush every few ticks, and finally write the pixel buffer to an image file.
//! Settings come from an optional TOML file, overridden by command-line flags.

mod config;
mod ramps;

use anyhow::{Context, Result};
use clap::Parser;
use quad_sampler::{AdaptiveSampler, FieldKernel, PixelBuffer};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{RenderConfig, RenderMode};
use ramps::DirectoryRamps;

/// Progressive adaptive-resolution fractal renderer.
#[derive(Parser, Debug, Default)]
#[command(name = "quad_render")]
#[command(about = "Renders a scalar field by priority-driven quadtree refinement")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Output image path (.png or .bmp).
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Kernel: mandelbrot, mandelbrot_square, julia, cactus, gradient.
	#[arg(short, long)]
	kernel: Option<String>,

	/// Color profile: greyscale or a ramp name.
	#[arg(short, long)]
	profile: Option<String>,

	/// Directory containing <name>.png / <name>.bmp ramp files.
	#[arg(long)]
	ramp_dir: Option<PathBuf>,

	/// Raster side in pixels (power of two).
	#[arg(short, long)]
	resolution: Option<u32>,

	/// Kernel iteration bound.
	#[arg(short = 'i', long)]
	max_iterations: Option<u32>,

	#[arg(long, allow_negative_numbers = true)]
	center_x: Option<f64>,

	#[arg(long, allow_negative_numbers = true)]
	center_y: Option<f64>,

	#[arg(short, long)]
	zoom: Option<f64>,

	/// Stop after this many ticks.
	#[arg(long)]
	max_ticks: Option<usize>,

	/// Incremental flush every N ticks.
	#[arg(long)]
	flush_every: Option<usize>,

	/// Subdivisions per tick (0 = unlimited).
	#[arg(short, long)]
	quantum: Option<usize>,

	/// Constellation points per quad (3-9).
	#[arg(short, long)]
	samples: Option<usize>,

	/// Refine adaptively, or evaluate every pixel as a baseline.
	#[arg(short, long, value_enum)]
	mode: Option<RenderMode>,

	/// Sub-pixel samples averaged per pixel in full mode (1-8).
	#[arg(long)]
	aa: Option<usize>,

	/// Print available color profiles and exit.
	#[arg(long)]
	list_profiles: bool,
}

impl Args {
	/// Apply command-line overrides on top of the file configuration.
	///
	/// A lone `--center-x` or `--center-y` keeps the other axis from the file,
	/// or from the selected kernel's default view.
	fn apply(&self, config: &mut RenderConfig) -> Result<()> {
		if let Some(output) = &self.output {
			config.output = output.clone();
		}
		if let Some(kernel) = &self.kernel {
			config.kernel = kernel.clone();
		}
		if let Some(profile) = &self.profile {
			config.profile = profile.clone();
		}
		if let Some(dir) = &self.ramp_dir {
			config.ramp_dir = Some(dir.clone());
		}
		if let Some(resolution) = self.resolution {
			config.resolution = resolution;
		}
		if let Some(max_iterations) = self.max_iterations {
			config.max_iterations = max_iterations;
		}
		if self.center_x.is_some() || self.center_y.is_some() {
			let [x, y] = match config.center {
				Some(center) => center,
				None => {
					let default = config.kernel_kind()?.default_view();
					[default.center_x, default.center_y]
				}
			};
			config.center = Some([self.center_x.unwrap_or(x), self.center_y.unwrap_or(y)]);
		}
		if let Some(zoom) = self.zoom {
			config.zoom = Some(zoom);
		}
		if let Some(max_ticks) = self.max_ticks {
			config.max_ticks = Some(max_ticks);
		}
		if let Some(flush_every) = self.flush_every {
			config.flush_every = flush_every;
		}
		if let Some(quantum) = self.quantum {
			config.quantum = quantum;
		}
		if let Some(samples) = self.samples {
			config.samples_per_quad = samples;
		}
		if let Some(mode) = self.mode {
			config.mode = mode;
		}
		if let Some(aa) = self.aa {
			config.aa_samples = aa;
		}
		Ok(())
	}
}

fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info,quad_sampler=info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => {
			info!("Loading config from: {}", path.display());
			RenderConfig::load(path)?
		}
		None => RenderConfig::default(),
	};
	args.apply(&mut config)?;
	config.validate()?;

	let mut sampler = build_sampler(&config)?;

	if args.list_profiles {
		for name in sampler.available_profiles() {
			println!("{}", name);
		}
		return Ok(());
	}

	match config.mode {
		RenderMode::Adaptive => {
			let ticks = render(&mut sampler, &config);
			info!(
				ticks,
				quads = sampler.quads().count(),
				converged = sampler.is_converged(),
				"Render finished"
			);
			#[cfg(feature = "metrics")]
			log_metrics(&sampler);
			write_image(sampler.pixel_buffer(), &config.output)?;
		}
		RenderMode::Full => {
			let buffer = sampler
				.render_full(config.aa_samples)
				.context("Full render failed")?;
			write_image(&buffer, &config.output)?;
		}
	}
	info!("Output written to: {}", config.output.display());
	Ok(())
}

/// Log refinement statistics collected during the render.
#[cfg(feature = "metrics")]
fn log_metrics(sampler: &AdaptiveSampler) {
	let metrics = sampler.metrics();
	let (min_tick_us, max_tick_us) = metrics.tick_timings.min_max().unwrap_or_default();
	let histogram = metrics
		.size_histogram()
		.iter()
		.map(|(size, count)| format!("{}:{}", size, count))
		.collect::<Vec<_>>()
		.join(" ");
	info!(
		avg_tick_us = metrics.avg_tick_us(),
		min_tick_us,
		max_tick_us,
		subdivisions_per_sec = metrics.subdivision_rate(),
		total_samples = metrics.total_samples,
		terminal_quads = metrics.terminal_quads,
		quads_per_size = %histogram,
		"Sampler metrics"
	);
}

/// Sampler for a validated configuration.
pub fn build_sampler(config: &RenderConfig) -> Result<AdaptiveSampler> {
	let kind = config.kernel_kind()?;
	let mut sampler = match &config.ramp_dir {
		Some(dir) => AdaptiveSampler::with_ramp_provider(kind, config.sampler_config(), DirectoryRamps::new(dir)),
		None => AdaptiveSampler::from_kind(kind, config.sampler_config()),
	}
	.context("Failed to create sampler")?;

	if let Some(view) = config.view(sampler.camera_view()) {
		sampler.set_view(view)?;
	}
	Ok(sampler)
}

/// Tick until converged or out of ticks, flushing on the configured cadence.
///
/// Returns the number of ticks run.
pub fn render(sampler: &mut AdaptiveSampler, config: &RenderConfig) -> usize {
	sampler.begin();
	let mut ticks = 0;
	loop {
		let progressed = sampler.tick();
		ticks += 1;
		if ticks % config.flush_every == 0 {
			sampler.flush_incremental();
		}
		if !progressed || config.max_ticks.is_some_and(|max| ticks >= max) {
			break;
		}
		if ticks % 1000 == 0 {
			tracing::debug!(ticks, quads = sampler.quads().count(), "Still refining");
		}
	}
	sampler.flush_incremental();
	ticks
}

/// Save the buffer; format follows the file extension.
pub fn write_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
	}
	let image = image::RgbImage::from_raw(buffer.width(), buffer.width(), buffer.as_bytes().to_vec())
		.context("Pixel buffer size does not match its width")?;
	image
		.save(path)
		.with_context(|| format!("Failed to write image: {}", path.display()))?;
	Ok(())
}
