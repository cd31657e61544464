//! Image compositor - writes quad colors into a packed RGB8 raster.
//!
//! The compositor is the only writer of the pixel buffer. Incremental flushes
//! only touch quads that appeared since the last flush; a full flush repaints
//! everything after a color profile change.

use crate::color::{ColorMapper, Rgb};
use crate::quad::Quad;

/// Bytes per pixel.
pub const CHANNELS: usize = 3;

/// Square RGB8 raster, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
  width: u32,
  data: Vec<u8>,
}

impl PixelBuffer {
  /// Black `width × width` raster.
  pub fn new(width: u32) -> Self {
    Self {
      width,
      data: vec![0; width as usize * width as usize * CHANNELS],
    }
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Packed `R G B` bytes, row-major.
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    &self.data
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.data
  }

  /// Color at `(x, y)`, or `None` outside the raster.
  pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
    if x >= self.width || y >= self.width {
      return None;
    }
    let i = self.index(x, y);
    Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
  }

  /// Reset every pixel to black.
  pub fn clear(&mut self) {
    self.data.fill(0);
  }

  /// Reallocate for a new width; contents become black.
  pub fn resize(&mut self, width: u32) {
    self.width = width;
    self.data.clear();
    self.data.resize(width as usize * width as usize * CHANNELS, 0);
  }

  /// Fill the square at `(x, y)` of side `size`, clipped to the raster.
  pub fn fill_square(&mut self, x: u32, y: u32, size: u32, color: Rgb) {
    let x_end = x.saturating_add(size).min(self.width);
    let y_end = y.saturating_add(size).min(self.width);
    if x >= x_end || y >= y_end {
      return;
    }
    let rgb = color.to_array();
    for row in y..y_end {
      let start = self.index(x, row);
      let end = self.index(x_end - 1, row) + CHANNELS;
      for px in self.data[start..end].chunks_exact_mut(CHANNELS) {
        px.copy_from_slice(&rgb);
      }
    }
  }

  #[inline]
  fn index(&self, x: u32, y: u32) -> usize {
    (y as usize * self.width as usize + x as usize) * CHANNELS
  }
}

/// Paint every quad not yet flushed and mark it. Returns the number painted.
pub fn flush_incremental<'a, I>(quads: I, mapper: &ColorMapper, buffer: &mut PixelBuffer) -> usize
where
  I: IntoIterator<Item = &'a mut Quad>,
{
  let mut painted = 0;
  for quad in quads {
    if quad.flushed {
      continue;
    }
    buffer.fill_square(quad.x, quad.y, quad.size, mapper.to_color(quad.value));
    quad.flushed = true;
    painted += 1;
  }
  painted
}

/// Recolor and repaint every quad. Returns the number painted.
pub fn flush_full<'a, I>(quads: I, mapper: &ColorMapper, buffer: &mut PixelBuffer) -> usize
where
  I: IntoIterator<Item = &'a mut Quad>,
{
  let mut painted = 0;
  for quad in quads {
    buffer.fill_square(quad.x, quad.y, quad.size, mapper.to_color(quad.value));
    quad.flushed = true;
    painted += 1;
  }
  painted
}
