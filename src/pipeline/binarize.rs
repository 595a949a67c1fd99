//! Local mean thresholding.
//!
//! Each pixel is compared against the mean of a square window around it,
//! which tolerates the uneven lighting typical of hand-held photographs.
//! Windows are truncated at the image border; the mean is taken over the
//! pixels that actually exist.
use crate::filters::IntegralImage;
use crate::image::{traits::ImageViewMut, BinaryMask, GrayscaleImage};
use crate::params::BinarizeOptions;

/// Paper (bright) pixels become foreground.
///
/// A pixel is foreground when `value > local_mean - offset`: it may sit up to
/// `offset` levels *below* the mean of its window and still count as paper.
/// Only ink that is darker than its surroundings by more than `offset`
/// becomes background. With a positive offset, flat regions are foreground
/// regardless of their brightness.
pub fn binarize(image: &GrayscaleImage, options: &BinarizeOptions) -> BinaryMask {
    let (w, h) = (image.width(), image.height());
    let integral = IntegralImage::from_gray(image);
    let mut mask = BinaryMask::new(w, h);
    if w == 0 {
        return mask;
    }

    let classify_row = |y: usize, row: &mut [bool]| {
        for (x, out) in row.iter_mut().enumerate() {
            let (sum, count) = integral.window(x, y, options.window_radius);
            let mean = sum as f32 / count as f32;
            *out = image.get(x, y) as f32 > mean - options.offset;
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        mask.as_mut_slice()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| classify_row(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        mask.as_mut_slice()
            .chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| classify_row(y, row));
    }
    mask
}
