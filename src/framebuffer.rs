//! Core framebuffer for pixel rendering.
//!
//! A tightly packed RGBA buffer in row-major order. Reductions over the
//! whole image go through trueno's SIMD vectors.

use trueno::Vector;

use crate::color::Rgba;
use crate::error::{Error, Result};

/// RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// Four bytes per pixel: [R, G, B, A].
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use spring_viz::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, pixels: vec![0; width as usize * height as usize * 4] })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major, no padding.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangle; coordinates are clamped to the buffer.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        if x >= x2 || y >= y2 {
            return;
        }

        let rgba = color.to_array();
        for row in y..y2 {
            let start = self.index(x, row);
            let end = self.index(x2, row);
            for chunk in self.pixels[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    /// Color at a pixel, or `None` out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]))
    }

    /// Overwrite a pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// Composite a color over a pixel ("over" operator).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let i = self.index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[i + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let mix = |src: u8, dst: u8| {
            let v = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[i] = mix(color.r, self.pixels[i]);
        self.pixels[i + 1] = mix(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = mix(color.b, self.pixels[i + 2]);
        self.pixels[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Number of pixels for which `predicate` holds.
    pub fn count_pixels(&self, mut predicate: impl FnMut(Rgba) -> bool) -> usize {
        self.pixels.chunks_exact(4).filter(|c| predicate(Rgba::new(c[0], c[1], c[2], c[3]))).count()
    }

    /// (min, max, mean) BT.709 luminance over all pixels.
    #[must_use]
    pub fn luminance_stats(&self) -> (f32, f32, f32) {
        let luminances: Vec<f32> = self
            .pixels
            .chunks_exact(4)
            .map(|c| 0.2126 * f32::from(c[0]) + 0.7152 * f32::from(c[1]) + 0.0722 * f32::from(c[2]))
            .collect();

        let vec = Vector::from_vec(luminances);
        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(255.0);
        let mean = vec.mean().unwrap_or(127.5);
        (min, max, mean)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!((fb.width(), fb.height()), (100, 50));
        assert_eq!(fb.pixels().len(), 100 * 50 * 4);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear_and_get() {
        let mut fb = Framebuffer::new(7, 3).unwrap();
        fb.clear(Rgba::RED);
        assert_eq!(fb.get_pixel(6, 2), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(7, 0), None);
    }

    #[test]
    fn test_fill_rect_clamped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(8, 8, 5, 5, Rgba::BLUE);
        assert_eq!(fb.count_pixels(|c| c == Rgba::BLUE), 4);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_ignored() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.set_pixel(5, 5, Rgba::RED);
        assert_eq!(fb.count_pixels(|c| c == Rgba::RED), 0);
    }

    #[test]
    fn test_blend_pixel() {
        let mut fb = Framebuffer::new(1, 1).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(0, 0, Rgba::BLACK.with_alpha(128));
        let p = fb.get_pixel(0, 0).unwrap();
        assert_eq!(p.a, 255);
        assert!((126..=128).contains(&p.r));
    }

    #[test]
    fn test_blend_opaque_replaces() {
        let mut fb = Framebuffer::new(1, 1).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(0, 0, Rgba::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::BLUE));
    }

    #[test]
    fn test_luminance_stats() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.set_pixel(0, 0, Rgba::BLACK);
        fb.set_pixel(1, 0, Rgba::WHITE);
        let (min, max, mean) = fb.luminance_stats();
        assert!(min.abs() < 1e-3);
        assert!((max - 255.0).abs() < 1e-2);
        assert!((mean - 127.5).abs() < 1e-2);
    }
}
