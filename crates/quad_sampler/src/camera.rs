//! Camera - pixel space to plane coordinate mapping.
//!
//! ```text
//! plane_x = px * zoom / resolution + offset_x     offset_x = center_x - zoom / 2
//! plane_y = py * zoom / resolution - offset_y     offset_y = zoom / 2 - center_y
//! ```
//!
//! The raster spans `zoom` plane units on each axis and pixel
//! `(resolution / 2, resolution / 2)` lands exactly on the view center.

use glam::DVec2;

use crate::error::{Result, SamplerError};

/// Center and zoom of the visible window in plane space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
  pub center_x: f64,
  pub center_y: f64,
  /// Plane units covered by the full raster width.
  pub zoom: f64,
}

impl CameraView {
  pub const fn new(center_x: f64, center_y: f64, zoom: f64) -> Self {
    Self {
      center_x,
      center_y,
      zoom,
    }
  }

  /// Reject views that would produce non-finite plane coordinates.
  pub fn validate(&self) -> Result<()> {
    if !self.zoom.is_finite() || self.zoom <= 0.0 {
      return Err(SamplerError::InvalidZoom(self.zoom));
    }
    Ok(())
  }

  pub fn center(&self) -> DVec2 {
    DVec2::new(self.center_x, self.center_y)
  }

  /// Same center, zoom multiplied by `factor` (< 1 zooms in).
  pub fn zoomed(&self, factor: f64) -> Self {
    Self {
      zoom: self.zoom * factor,
      ..*self
    }
  }

  /// Center moved by a plane-space delta.
  pub fn panned(&self, dx: f64, dy: f64) -> Self {
    Self {
      center_x: self.center_x + dx,
      center_y: self.center_y + dy,
      ..*self
    }
  }
}

impl Default for CameraView {
  fn default() -> Self {
    Self::new(0.0, 0.0, 2.0)
  }
}

/// Pure pixel → plane converter for one view and raster resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
  view: CameraView,
  resolution: u32,
  /// Plane units per pixel.
  scale: f64,
  offset: DVec2,
}

impl Camera {
  pub fn new(view: CameraView, resolution: u32) -> Self {
    let scale = view.zoom / resolution as f64;
    let offset = DVec2::new(
      view.center_x - view.zoom * 0.5,
      view.zoom * 0.5 - view.center_y,
    );
    Self {
      view,
      resolution,
      scale,
      offset,
    }
  }

  #[inline]
  pub fn view(&self) -> CameraView {
    self.view
  }

  #[inline]
  pub fn resolution(&self) -> u32 {
    self.resolution
  }

  /// Convert a pixel coordinate to plane space.
  #[inline]
  pub fn to_plane(&self, px: u32, py: u32) -> DVec2 {
    DVec2::new(
      px as f64 * self.scale + self.offset.x,
      py as f64 * self.scale - self.offset.y,
    )
  }

  /// Convert a fractional pixel coordinate to plane space.
  #[inline]
  pub fn to_plane_subpixel(&self, px: f64, py: f64) -> DVec2 {
    DVec2::new(px * self.scale + self.offset.x, py * self.scale - self.offset.y)
  }

  /// Inverse of [`Camera::to_plane`], fractional pixel coordinates.
  #[inline]
  pub fn to_pixel(&self, plane: DVec2) -> DVec2 {
    DVec2::new(
      (plane.x - self.offset.x) / self.scale,
      (plane.y + self.offset.y) / self.scale,
    )
  }

  /// Plane-space rectangle covered by the raster, `(min, max)`.
  pub fn plane_extent(&self) -> (DVec2, DVec2) {
    let min = self.to_plane(0, 0);
    let max = self.to_plane(self.resolution, self.resolution);
    (min, max)
  }
}

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;
