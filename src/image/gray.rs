//! Owned 8-bit grayscale raster, the input of the extraction pipeline.
use super::traits::impl_packed_view;
use crate::error::PipelineError;
use crate::types::BoundingBox;
use image::{GrayImage, Luma};

/// Row-major 8-bit grayscale image with origin at the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayscaleImage {
    w: usize,
    h: usize,
    data: Vec<u8>,
}

impl GrayscaleImage {
    /// Wrap a tightly packed buffer. Fails if the image would be empty or the
    /// buffer length is not `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, PipelineError> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidImage {
                reason: format!("zero-sized image {width}x{height}"),
            });
        }
        if data.len() != width * height {
            return Err(PipelineError::InvalidImage {
                reason: format!(
                    "buffer holds {} samples, expected {}x{}={}",
                    data.len(),
                    width,
                    height,
                    width * height
                ),
            });
        }
        Ok(Self {
            w: width,
            h: height,
            data,
        })
    }

    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            w: width,
            h: height,
            data,
        }
    }

    /// Image of the given size with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            w: width,
            h: height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.w + x] = v;
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Swap rows and columns; `out(x, y) == self(y, x)`.
    pub fn transpose(&self) -> GrayscaleImage {
        let mut out = GrayscaleImage::filled(self.h, self.w, 0);
        for y in 0..self.h {
            let row = &self.data[y * self.w..(y + 1) * self.w];
            for (x, &v) in row.iter().enumerate() {
                out.data[x * self.h + y] = v;
            }
        }
        out
    }

    /// Copy out the pixels covered by `bbox`, which must lie inside the image.
    pub fn crop(&self, bbox: &BoundingBox) -> GrayscaleImage {
        assert!(
            bbox.right() <= self.w && bbox.bottom() <= self.h,
            "crop box {bbox:?} exceeds image {}x{}",
            self.w,
            self.h
        );
        let mut data = Vec::with_capacity(bbox.width * bbox.height);
        for y in bbox.top..bbox.bottom() {
            let start = y * self.w + bbox.left;
            data.extend_from_slice(&self.data[start..start + bbox.width]);
        }
        GrayscaleImage {
            w: bbox.width,
            h: bbox.height,
            data,
        }
    }

    /// Mean intensity over the clipped square window of radius `radius`
    /// centred at (x, y).
    pub fn window_mean(&self, x: usize, y: usize, radius: usize) -> f32 {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(self.w);
        let y1 = (y + radius + 1).min(self.h);
        let mut sum = 0u64;
        for yy in y0..y1 {
            let row = &self.data[yy * self.w..(yy + 1) * self.w];
            sum += row[x0..x1].iter().map(|&v| v as u64).sum::<u64>();
        }
        let count = ((x1 - x0) * (y1 - y0)).max(1);
        sum as f32 / count as f32
    }

    /// Copy into an `image` buffer for the `imageproc` operators.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            Luma([self.get(x as usize, y as usize)])
        })
    }

    pub fn from_gray_image(image: GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        Self::from_parts(w, h, image.into_raw())
    }
}

impl_packed_view!(GrayscaleImage, u8);

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> GrayscaleImage {
        let data = (0..w * h).map(|i| (i % 251) as u8).collect();
        GrayscaleImage::from_raw(w, h, data).unwrap()
    }

    #[test]
    fn from_raw_rejects_bad_lengths() {
        assert!(GrayscaleImage::from_raw(3, 3, vec![0; 8]).is_err());
        assert!(GrayscaleImage::from_raw(0, 3, Vec::new()).is_err());
        assert!(GrayscaleImage::from_raw(3, 3, vec![0; 9]).is_ok());
    }

    #[test]
    fn transpose_swaps_axes() {
        let img = ramp(5, 3);
        let t = img.transpose();
        assert_eq!((t.width(), t.height()), (3, 5));
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(img.get(x, y), t.get(y, x));
            }
        }
        assert_eq!(t.transpose(), img);
    }

    #[test]
    fn crop_copies_the_box() {
        let img = ramp(10, 8);
        let bbox = BoundingBox::new(2, 3, 4, 2);
        let c = img.crop(&bbox);
        assert_eq!((c.width(), c.height()), (4, 2));
        assert_eq!(c.get(0, 0), img.get(2, 3));
        assert_eq!(c.get(3, 1), img.get(5, 4));
    }

    #[test]
    fn gray_image_conversion_keeps_layout() {
        let img = ramp(7, 4);
        let buffer = img.to_gray_image();
        assert_eq!(buffer.dimensions(), (7, 4));
        assert_eq!(buffer.get_pixel(5, 2)[0], img.get(5, 2));
        assert_eq!(GrayscaleImage::from_gray_image(buffer), img);
    }

    #[test]
    fn window_mean_clips_at_border() {
        let mut img = GrayscaleImage::filled(4, 4, 0);
        img.set(0, 0, 200);
        // Window radius 1 at the corner covers 2x2 = 4 pixels.
        assert!((img.window_mean(0, 0, 1) - 50.0).abs() < 1e-6);
    }
}
