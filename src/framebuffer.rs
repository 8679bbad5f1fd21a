//! Row-major HDR pixel storage handed to the image sinks.

use image::{ImageBuffer, Rgb};
use rayon::prelude::*;

use crate::camera::Resolution;
use crate::shading::Color;

/// Linear f32 RGB image, the format every sink accepts.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Finished render: one linear, unclamped color per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    image: HdrImage,
}

impl FrameBuffer {
    /// Fill a buffer in parallel, calling `shade(col, row)` exactly once per
    /// pixel. Each call writes only its own cell.
    pub fn par_fill<F>(res: Resolution, shade: F) -> Self
    where
        F: Fn(u32, u32) -> Color + Sync + Send,
    {
        let mut image = HdrImage::new(res.width, res.height);
        image.enumerate_pixels_mut().par_bridge().for_each(|(col, row, pixel)| {
            let c = shade(col, row);
            *pixel = Rgb([c.x, c.y, c.z]);
        });
        Self { image }
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Buffer dimensions.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Color at (`col`, `row`); row 0 is the top of the image.
    ///
    /// Panics when the coordinates are out of bounds.
    pub fn pixel(&self, col: u32, row: u32) -> Color {
        let Rgb([r, g, b]) = *self.image.get_pixel(col, row);
        Color::new(r, g, b)
    }

    /// All colors in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.image.pixels().map(|&Rgb([r, g, b])| Color::new(r, g, b))
    }

    /// True when no channel is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.image.as_raw().iter().all(|c| c.is_finite())
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &HdrImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn every_cell_is_written_once() {
        let res = Resolution::new(7, 5).unwrap();
        let calls = AtomicUsize::new(0);
        let frame = FrameBuffer::par_fill(res, |col, row| {
            calls.fetch_add(1, Ordering::Relaxed);
            Color::new(col as f32, row as f32, 1.0)
        });

        assert_eq!(calls.load(Ordering::Relaxed), 35);
        assert_eq!(frame.resolution(), res);
        assert_eq!(frame.pixel(6, 4), Color::new(6.0, 4.0, 1.0));
    }

    #[test]
    fn pixels_are_row_major() {
        let res = Resolution::new(3, 2).unwrap();
        let frame = FrameBuffer::par_fill(res, |col, row| Color::splat((row * 3 + col) as f32));
        let order: Vec<f32> = frame.pixels().map(|c| c.x).collect();
        assert_eq!(order, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn detects_non_finite_values() {
        let res = Resolution::new(2, 2).unwrap();
        let bad = FrameBuffer::par_fill(res, |col, _| {
            if col == 1 {
                Color::splat(f32::NAN)
            } else {
                Color::ONE
            }
        });
        assert!(!bad.is_finite());
        assert!(FrameBuffer::par_fill(res, |_, _| Color::splat(2.5)).is_finite());
    }
}
