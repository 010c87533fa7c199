//! Pixel surfaces and decoded bitmaps.
//!
//! The compositor renders every output frame into a [`Surface`]; decoded
//! panel artwork is held as an immutable [`Bitmap`]. Both are packed
//! RGBA8 with tight rows so a surface can be handed to the stream encoder
//! as a raw frame without repacking.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A mutable RGBA8 pixel surface the compositor draws into.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Create a new surface cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Create a surface of the given size.
    pub fn with_size(size: PixelSize) -> Self {
        Self::new(size.width, size.height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Raw RGBA8 bytes, row-major, tightly packed.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.width as usize * 4;
        &self.data[start..start + self.width as usize * 4]
    }

    /// Rows as parallel-iterable mutable chunks.
    #[inline]
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let row_len = self.width as usize * 4;
        self.data.chunks_mut(row_len)
    }

    /// Fill the whole surface with a color.
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Read one pixel. Out-of-bounds reads return transparent black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Write one pixel. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Alpha-blend one pixel over the existing value.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.data[idx..idx + 4];
        blend_rgba(dst, rgba);
    }
}

/// Source-over blend of `src` onto `dst`, both straight-alpha RGBA8.
#[inline]
pub fn blend_rgba(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        dst[..4].copy_from_slice(&src);
        return;
    }
    let ia = 255 - sa;
    for c in 0..3 {
        dst[c] = ((src[c] as u32 * sa + dst[c] as u32 * ia + 127) / 255) as u8;
    }
    let da = dst[3] as u32;
    dst[3] = (sa + (da * ia + 127) / 255).min(255) as u8;
}

/// An immutable decoded panel image, shared between cache and compositor.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap raw RGBA8 bytes. Length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data: Arc::new(data),
        }
    }

    /// Snapshot of a rendered surface, for panels supplied as surfaces
    /// instead of URLs.
    pub fn from_surface(surface: &Surface) -> Self {
        Self::from_rgba8(surface.width(), surface.height(), surface.data().to_vec())
    }

    /// Solid-color bitmap, handy in tests.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let rgba = color.to_rgba8();
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Self::from_rgba8(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel, clamping coordinates to the image edge.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Bilinear sample at fractional pixel coordinates.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> [u8; 4] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let p00 = self.pixel_clamped(x0, y0);
        let p10 = self.pixel_clamped(x0 + 1, y0);
        let p01 = self.pixel_clamped(x0, y0 + 1);
        let p11 = self.pixel_clamped(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
            let bot = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
            out[c] = (top * (1.0 - fy) + bot * fy).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Memory footprint in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_fill_and_pixel() {
        let mut s = Surface::new(4, 4);
        s.fill(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(s.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(s.pixel(10, 10), [0, 0, 0, 0]);
    }

    #[test]
    fn blend_opaque_replaces() {
        let mut dst = [10, 20, 30, 255];
        blend_rgba(&mut dst, [200, 100, 50, 255]);
        assert_eq!(dst, [200, 100, 50, 255]);
    }

    #[test]
    fn blend_half_alpha_mixes() {
        let mut dst = [0, 0, 0, 255];
        blend_rgba(&mut dst, [255, 255, 255, 128]);
        assert!((dst[0] as i32 - 128).abs() <= 1);
        assert_eq!(dst[3], 255);
    }

    #[test]
    fn bitmap_bilinear_between_pixels() {
        let mut data = vec![0u8; 2 * 1 * 4];
        data[0..4].copy_from_slice(&[0, 0, 0, 255]);
        data[4..8].copy_from_slice(&[255, 255, 255, 255]);
        let bmp = Bitmap::from_rgba8(2, 1, data);
        let mid = bmp.sample_bilinear(0.5, 0.0);
        assert!((mid[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn bitmap_from_surface_roundtrip() {
        let mut s = Surface::new(3, 2);
        s.put_pixel(1, 1, [9, 8, 7, 255]);
        let bmp = Bitmap::from_surface(&s);
        assert_eq!(bmp.pixel_clamped(1, 1), [9, 8, 7, 255]);
        assert_eq!(bmp.memory_size(), 3 * 2 * 4);
    }
}
