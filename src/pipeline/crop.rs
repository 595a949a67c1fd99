//! Tight crop of the deskewed image to the mask's bounding box.
use crate::error::PipelineError;
use crate::image::{BinaryMask, GrayscaleImage};
use crate::types::BoundingBox;
use log::debug;

/// Mask and image cropped to the same box, plus the box itself in the
/// coordinates of the uncropped pair.
#[derive(Clone, Debug)]
pub struct CroppedPair {
    pub mask: BinaryMask,
    pub image: GrayscaleImage,
    pub bbox: BoundingBox,
}

/// Crop `image` to the bounding box of `mask`'s foreground.
pub fn crop_to_mask(mask: &BinaryMask, image: &GrayscaleImage) -> Result<GrayscaleImage, PipelineError> {
    crop_pair(mask, image).map(|pair| pair.image)
}

/// Crop both rasters to the mask's bounding box, keeping them registered.
pub fn crop_pair(mask: &BinaryMask, image: &GrayscaleImage) -> Result<CroppedPair, PipelineError> {
    assert_eq!(
        (mask.width(), mask.height()),
        (image.width(), image.height()),
        "mask and image must be pixel-registered"
    );
    let bbox = mask
        .bounding_box()
        .ok_or(PipelineError::InputPreconditionViolation { stage: "crop" })?;
    debug!(
        "crop: bbox left={} top={} {}x{}",
        bbox.left, bbox.top, bbox.width, bbox.height
    );
    Ok(CroppedPair {
        mask: mask.crop(&bbox),
        image: image.crop(&bbox),
        bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> (BinaryMask, GrayscaleImage) {
        let mask = BinaryMask::from_fn(50, 40, |x, y| {
            // Irregular region: a rectangle plus a single stray pixel row.
            ((12..31).contains(&x) && (9..27).contains(&y)) || (y == 30 && (20..22).contains(&x))
        });
        let image = GrayscaleImage::from_raw(50, 40, (0..50 * 40).map(|i| (i % 200) as u8).collect())
            .unwrap();
        (mask, image)
    }

    #[test]
    fn crops_image_to_mask_extent() {
        let (mask, image) = blob();
        let cropped = crop_to_mask(&mask, &image).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (19, 22));
        assert_eq!(cropped.get(0, 0), image.get(12, 9));
        assert_eq!(cropped.get(18, 21), image.get(30, 30));
    }

    #[test]
    fn second_crop_is_a_fixed_point() {
        let (mask, image) = blob();
        let first = crop_pair(&mask, &image).unwrap();
        let second = crop_pair(&first.mask, &first.image).unwrap();
        assert_eq!(
            second.bbox,
            BoundingBox::new(0, 0, first.image.width(), first.image.height())
        );
        assert_eq!(second.image, first.image);
    }

    #[test]
    fn empty_mask_is_rejected() {
        let mask = BinaryMask::new(10, 10);
        let image = GrayscaleImage::filled(10, 10, 0);
        assert_eq!(
            crop_to_mask(&mask, &image).unwrap_err(),
            PipelineError::InputPreconditionViolation { stage: "crop" }
        );
    }
}
