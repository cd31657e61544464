//! Ramp files on disk.
//!
//! A ramp named `fire` is the first pixel row of `fire.png` (or `fire.bmp`) in
//! the ramp directory, read left to right. Names not found on disk fall back
//! to the library's built-in ramps.

use quad_sampler::{BuiltinRamps, RampProvider, Rgb, SamplerError};
use std::path::{Path, PathBuf};

/// File extensions searched, in order.
const RAMP_EXTENSIONS: [&str; 2] = ["png", "bmp"];

/// Ramp provider backed by a directory of images.
#[derive(Debug, Clone)]
pub struct DirectoryRamps {
	dir: PathBuf,
	fallback: BuiltinRamps,
}

impl DirectoryRamps {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self {
			dir: dir.into(),
			fallback: BuiltinRamps::default(),
		}
	}

	/// First existing `<dir>/<name>.<ext>`.
	fn find(&self, name: &str) -> Option<PathBuf> {
		RAMP_EXTENSIONS
			.iter()
			.map(|ext| self.dir.join(format!("{}.{}", name, ext)))
			.find(|path| path.is_file())
	}
}

/// Read the first pixel row of an image as a ramp table.
pub fn load_ramp_image(path: &Path) -> Result<Vec<Rgb>, image::ImageError> {
	let image = image::open(path)?.to_rgb8();
	if image.height() == 0 {
		return Ok(Vec::new());
	}
	Ok((0..image.width()).map(|x| Rgb::from(image.get_pixel(x, 0).0)).collect())
}

impl RampProvider for DirectoryRamps {
	fn load_ramp(&self, name: &str) -> quad_sampler::Result<Vec<Rgb>> {
		// Names are file stems, never paths
		if name.contains(['/', '\\']) || name == ".." {
			return Err(SamplerError::UnknownProfile(name.to_string()));
		}
		let Some(path) = self.find(name) else {
			return self.fallback.load_ramp(name);
		};
		tracing::debug!(path = %path.display(), "Loading ramp file");
		load_ramp_image(&path).map_err(|err| SamplerError::RampLoad {
			name: name.to_string(),
			reason: err.to_string(),
		})
	}

	fn available(&self) -> Vec<String> {
		let mut names = self.fallback.available();
		if let Ok(entries) = std::fs::read_dir(&self.dir) {
			for entry in entries.flatten() {
				let path = entry.path();
				let is_ramp = path
					.extension()
					.and_then(|ext| ext.to_str())
					.is_some_and(|ext| RAMP_EXTENSIONS.contains(&ext));
				if let (true, Some(stem)) = (is_ramp, path.file_stem().and_then(|s| s.to_str())) {
					names.push(stem.to_string());
				}
			}
		}
		names.sort();
		names.dedup();
		names
	}
}
