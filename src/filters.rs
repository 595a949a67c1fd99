//! Summed-area tables for clipped box windows.
use crate::image::{GrayscaleImage, ImageView};

/// Summed-area table with one row/column of zero padding.
///
/// `sum(x0, y0, x1, y1)` covers the half-open rectangle `[x0, x1) × [y0, y1)`
/// in O(1), which keeps large clipped windows cheap.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    w: usize,
    h: usize,
    table: Vec<u64>,
}

impl IntegralImage {
    pub fn from_gray(image: &GrayscaleImage) -> Self {
        let (w, h) = (image.width(), image.height());
        let stride = w + 1;
        let mut table = vec![0u64; stride * (h + 1)];
        for (y, row) in image.rows().enumerate() {
            let mut row_sum = 0u64;
            for (x, &v) in row.iter().enumerate() {
                row_sum += v as u64;
                table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
            }
        }
        Self { w, h, table }
    }

    #[inline]
    pub fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let stride = self.w + 1;
        self.table[y1 * stride + x1] + self.table[y0 * stride + x0]
            - self.table[y0 * stride + x1]
            - self.table[y1 * stride + x0]
    }

    /// Sum and pixel count of the square window of `radius` around (x, y),
    /// truncated at the image border.
    #[inline]
    pub fn window(&self, x: usize, y: usize, radius: usize) -> (u64, u64) {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(self.w);
        let y1 = (y + radius + 1).min(self.h);
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        (self.sum(x0, y0, x1, y1), count)
    }
}
