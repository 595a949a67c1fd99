//! Canny edge maps for the deskew and line-counting stages.
//!
//! Detection is delegated to `imageproc`: Gaussian smoothing (σ = 1.4),
//! Sobel gradients, non-maximum suppression and hysteresis. The outermost
//! 1-pixel frame never carries an edge. A clean step can come out two pixels
//! wide, since equal neighbours both survive suppression.
use crate::image::{BinaryMask, GrayscaleImage};
use serde::Deserialize;

/// Hysteresis thresholds in Sobel magnitude units of an 8-bit image. A full
/// 0 to 255 step peaks near 540 after smoothing.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CannyOptions {
    /// Responses below `low` are never edges.
    pub low: f32,
    /// Responses at or above `high` seed edge chains.
    pub high: f32,
}

impl Default for CannyOptions {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 250.0,
        }
    }
}

/// Thin edge map of `image`.
pub fn canny(image: &GrayscaleImage, options: &CannyOptions) -> BinaryMask {
    let edges = imageproc::edges::canny(&image.to_gray_image(), options.low, options.high);
    BinaryMask::from_gray_image(&edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(width: usize, height: usize, split_x: usize, low: u8, high: u8) -> GrayscaleImage {
        let mut img = GrayscaleImage::filled(width, height, low);
        for y in 0..height {
            for x in split_x..width {
                img.set(x, y, high);
            }
        }
        img
    }

    #[test]
    fn vertical_step_stays_at_the_transition() {
        let edges = canny(&step(32, 24, 16, 0, 255), &CannyOptions::default());
        for y in 3..21 {
            let hits: Vec<usize> = (0..32).filter(|&x| edges.get(x, y)).collect();
            assert!(!hits.is_empty() && hits.len() <= 2, "row {y} hits {hits:?}");
            assert!(hits.iter().all(|x| (15..=16).contains(x)), "row {y} hits {hits:?}");
        }
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = GrayscaleImage::filled(16, 16, 128);
        assert!(!canny(&img, &CannyOptions::default()).has_foreground());
    }

    #[test]
    fn faint_step_is_below_threshold() {
        // A 20-level step peaks around 40, well under `low`.
        let edges = canny(&step(32, 24, 16, 100, 120), &CannyOptions::default());
        assert!(!edges.has_foreground());
    }

    #[test]
    fn frame_never_carries_edges() {
        // Foreground touching the left border: the step sits on column 0.
        let edges = canny(&step(20, 20, 1, 0, 255), &CannyOptions::default());
        assert!((0..20).all(|y| !edges.get(0, y) && !edges.get(19, y)));
        assert!((0..20).all(|x| !edges.get(x, 0) && !edges.get(x, 19)));
    }
}
