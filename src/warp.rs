//! Rotation of rasters about their centre.
//!
//! Positive angles turn content clockwise on screen (y grows downwards).
//! Grayscale images are resampled bilinearly; masks use nearest-neighbour
//! sampling so they stay binary. A zero angle returns an exact copy.
use crate::image::{BinaryMask, GrayscaleImage};
use image::Luma;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Rotate a grayscale image; samples falling outside the source take `fill`.
pub fn rotate_gray(src: &GrayscaleImage, angle: f32, fill: u8) -> GrayscaleImage {
    if angle == 0.0 {
        return src.clone();
    }
    let rotated = rotate_about_center(
        &src.to_gray_image(),
        angle,
        Interpolation::Bilinear,
        Luma([fill]),
    );
    GrayscaleImage::from_gray_image(rotated)
}

/// Rotate a mask; outside samples are background.
pub fn rotate_mask(src: &BinaryMask, angle: f32) -> BinaryMask {
    if angle == 0.0 {
        return src.clone();
    }
    let rotated = rotate_about_center(
        &src.to_gray_image(),
        angle,
        Interpolation::Nearest,
        Luma([0u8]),
    );
    BinaryMask::from_gray_image(&rotated)
}

/// Rotate a registered mask/image pair with identical parameters.
pub fn rotate_pair(
    mask: &BinaryMask,
    image: &GrayscaleImage,
    angle: f32,
    image_fill: u8,
) -> (BinaryMask, GrayscaleImage) {
    assert_eq!(
        (mask.width(), mask.height()),
        (image.width(), image.height()),
        "mask and image must be pixel-registered"
    );
    (rotate_mask(mask, angle), rotate_gray(image, angle, image_fill))
}
