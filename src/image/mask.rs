//! Owned boolean raster: `true` is foreground (paper / inside the grid).
use super::traits::impl_packed_view;
use super::GrayscaleImage;
use crate::types::BoundingBox;
use image::GrayImage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    w: usize,
    h: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    /// All-background mask of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            w: width,
            h: height,
            data: vec![false; width * height],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            w: width,
            h: height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.data[y * self.w + x] = v;
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn has_foreground(&self) -> bool {
        self.data.iter().any(|&v| v)
    }

    /// Smallest box enclosing every foreground pixel, `None` for an empty mask.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut left = usize::MAX;
        let mut top = usize::MAX;
        let mut right = 0usize;
        let mut bottom = 0usize;
        for y in 0..self.h {
            let row = &self.data[y * self.w..(y + 1) * self.w];
            let Some(first) = row.iter().position(|&v| v) else {
                continue;
            };
            let last = row.iter().rposition(|&v| v).unwrap_or(first);
            left = left.min(first);
            right = right.max(last);
            top = top.min(y);
            bottom = y;
        }
        (left != usize::MAX)
            .then(|| BoundingBox::new(left, top, right - left + 1, bottom - top + 1))
    }

    pub fn crop(&self, bbox: &BoundingBox) -> BinaryMask {
        assert!(
            bbox.right() <= self.w && bbox.bottom() <= self.h,
            "crop box {bbox:?} exceeds mask {}x{}",
            self.w,
            self.h
        );
        let mut data = Vec::with_capacity(bbox.width * bbox.height);
        for y in bbox.top..bbox.bottom() {
            let start = y * self.w + bbox.left;
            data.extend_from_slice(&self.data[start..start + bbox.width]);
        }
        BinaryMask {
            w: bbox.width,
            h: bbox.height,
            data,
        }
    }

    /// Foreground as 255, background as 0.
    pub fn to_grayscale(&self) -> GrayscaleImage {
        let data = self.data.iter().map(|&v| if v { 255 } else { 0 }).collect();
        GrayscaleImage::from_parts(self.w, self.h, data)
    }

    /// Foreground as 255 in an `image` buffer.
    pub fn to_gray_image(&self) -> GrayImage {
        self.to_grayscale().to_gray_image()
    }

    /// Any non-zero sample is foreground.
    pub fn from_gray_image(image: &GrayImage) -> Self {
        let w = image.width() as usize;
        let h = image.height() as usize;
        Self {
            w,
            h,
            data: image.as_raw().iter().map(|&v| v != 0).collect(),
        }
    }
}

impl_packed_view!(BinaryMask, bool);
