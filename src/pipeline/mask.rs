//! Isolation of the crossword region from a binarized photograph.
//!
//! Stages
//! - Corner fills: flood the paper reachable from each image corner to
//!   background. The thick outer border keeps the cells out of reach. A
//!   corner covered by dark ink is left alone and the other three still
//!   clear the page.
//! - Centroid: mean position of what remains, used as the interior seed.
//! - Healing: square closing that bridges the inner grid lines and small
//!   gaps in the border.
//! - Isolation: keep only the 4-connected component holding the seed.
use super::stage;
use crate::error::PipelineError;
use crate::fill::{flood_fill, foreground_centroid, nearest_foreground, select_component};
use crate::image::BinaryMask;
use crate::params::MaskOptions;
use crate::sink::{NoopSink, StageImage, StageSink};
use crate::types::Point2D;
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use log::{debug, warn};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskReport {
    /// Paper pixels removed by the four corner fills.
    pub background_removed: usize,
    pub centroid: Point2D,
    /// Seed of the isolating fill; differs from `centroid` when the centroid
    /// fell on background after healing.
    pub seed: Point2D,
    pub seed_relocated: bool,
    /// Foreground pixels in the final mask.
    pub area: usize,
}

/// Single connected crossword region of `binary`, same dimensions.
pub fn extract_crossword_mask(
    binary: &BinaryMask,
    options: &MaskOptions,
) -> Result<BinaryMask, PipelineError> {
    extract_with_report(binary, options, &mut NoopSink).map(|(mask, _)| mask)
}

pub(crate) fn extract_with_report(
    binary: &BinaryMask,
    options: &MaskOptions,
    sink: &mut dyn StageSink,
) -> Result<(BinaryMask, MaskReport), PipelineError> {
    let (w, h) = (binary.width(), binary.height());
    let mut working = binary.clone();
    let mut background_removed = 0usize;
    if w > 0 && h > 0 {
        for corner in [
            Point2D::new(0, 0),
            Point2D::new(w - 1, 0),
            Point2D::new(0, h - 1),
            Point2D::new(w - 1, h - 1),
        ] {
            background_removed += flood_fill(&mut working, corner, false);
        }
    }
    sink.on_stage(stage::BACKGROUND_REMOVED, StageImage::Mask(&working));

    let centroid = foreground_centroid(&working).ok_or(PipelineError::InputPreconditionViolation {
        stage: "mask extraction",
    })?;
    debug!(
        "mask: corner fills removed {} px, centroid=({}, {})",
        background_removed, centroid.x, centroid.y
    );

    let healed = heal_gaps(&working, options.heal_radius);
    sink.on_stage(stage::HEALED, StageImage::Mask(&healed));

    let seed = nearest_foreground(&healed, centroid).ok_or(
        PipelineError::InputPreconditionViolation {
            stage: "mask extraction",
        },
    )?;
    let seed_relocated = seed != centroid;
    if seed_relocated {
        warn!(
            "mask centroid ({}, {}) is background after healing; seeding from ({}, {})",
            centroid.x, centroid.y, seed.x, seed.y
        );
    }

    let mask = select_component(&healed, seed);
    let area = mask.count_foreground();
    sink.on_stage(stage::MASK, StageImage::Mask(&mask));
    debug!("mask: isolated component of {} px", area);

    Ok((
        mask,
        MaskReport {
            background_removed,
            centroid,
            seed,
            seed_relocated,
            area,
        },
    ))
}

/// Morphological closing with a `(2r+1)²` square (Chebyshev radius `r`).
/// Pixels outside the image count as neither foreground nor background, so
/// the region is not eroded from the border. Gaps narrower than about `2r`
/// inside the region are filled; the result always contains the input.
/// Radii above 255 are clamped.
pub fn heal_gaps(mask: &BinaryMask, radius: usize) -> BinaryMask {
    if radius == 0 {
        return mask.clone();
    }
    let k = u8::try_from(radius).unwrap_or(u8::MAX);
    let closed = morphology::close(&mask.to_gray_image(), Norm::LInf, k);
    BinaryMask::from_gray_image(&closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paper everywhere, a dark square frame enclosing `inner` foreground.
    fn framed(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize, t: usize) -> BinaryMask {
        BinaryMask::from_fn(w, h, |x, y| {
            let in_outer = x >= x0 && x < x1 && y >= y0 && y < y1;
            let in_inner = x >= x0 + t && x < x1 - t && y >= y0 + t && y < y1 - t;
            !in_outer || in_inner
        })
    }

    #[test]
    fn closing_bridges_thin_gaps_only() {
        // Two blocks separated by a 3 px gap, a third one 20 px away.
        let mask = BinaryMask::from_fn(60, 20, |x, _| x < 10 || (13..23).contains(&x) || x >= 43);
        let healed = heal_gaps(&mask, 2);
        assert!((10..13).all(|x| healed.get(x, 10)));
        assert!(!healed.get(33, 10));
        assert!((0..60).all(|x| !mask.get(x, 10) || healed.get(x, 10)));
    }

    #[test]
    fn closing_keeps_regions_touching_the_border() {
        let mask = BinaryMask::from_fn(30, 20, |x, y| x < 12 && y != 6);
        let healed = heal_gaps(&mask, 3);
        assert!((0..20).all(|y| (0..12).all(|x| healed.get(x, y))));
        assert!((0..20).all(|y| !healed.get(20, y)));
    }

    #[test]
    fn isolates_framed_region() {
        let binary = framed(60, 50, 10, 8, 50, 42, 3);
        let mask = extract_crossword_mask(&binary, &MaskOptions { heal_radius: 2 }).unwrap();
        assert_eq!(mask.bounding_box(), Some(crate::types::BoundingBox::new(13, 11, 34, 28)));
        assert_eq!(mask.count_foreground(), 34 * 28);
    }

    #[test]
    fn border_at_one_corner_still_isolates_grid() {
        // The frame's dark border covers pixel (0, 0), so that corner fill is
        // a no-op; the other corners clear the paper. A separate framed
        // speck survives the corner fills but not the final isolation.
        let mut binary = framed(80, 80, 0, 0, 50, 50, 3);
        for y in 62..74 {
            for x in 62..74 {
                let ring = x < 64 || x >= 72 || y < 64 || y >= 72;
                binary.set(x, y, !ring);
            }
        }
        assert!(!binary.get(0, 0));
        let mask = extract_crossword_mask(&binary, &MaskOptions { heal_radius: 2 }).unwrap();
        assert_eq!(mask.bounding_box(), Some(crate::types::BoundingBox::new(3, 3, 44, 44)));
        assert_eq!(mask.count_foreground(), 44 * 44);
        assert!(!mask.get(68, 68));
        assert!(!mask.get(79, 0));
    }

    #[test]
    fn healing_rejoins_cells_after_border_leak() {
        // Frame with 1 px inner lines splitting it into 3x3 cells. A 1 px
        // break in the top border lets the corner fill eat the top-left
        // cell; the closing still merges the remaining eight.
        let mut binary = framed(60, 60, 10, 10, 50, 50, 3);
        for i in 13..47 {
            for line in [23, 35] {
                binary.set(line, i, false);
                binary.set(i, line, false);
            }
        }
        for y in 10..13 {
            binary.set(18, y, true);
        }
        let mask = extract_crossword_mask(&binary, &MaskOptions { heal_radius: 3 }).unwrap();
        let bbox = mask.bounding_box().unwrap();
        assert_eq!((bbox.left, bbox.top), (13, 13));
        assert_eq!((bbox.right(), bbox.bottom()), (47, 47));
        assert!(!mask.get(16, 16));
        assert!(mask.get(35, 40));

        let unhealed = extract_crossword_mask(&binary, &MaskOptions { heal_radius: 0 }).unwrap();
        assert!(unhealed.count_foreground() < mask.count_foreground() / 4);
    }

    #[test]
    fn blank_input_is_a_precondition_violation() {
        let binary = BinaryMask::from_fn(40, 30, |_, _| true);
        let err = extract_crossword_mask(&binary, &MaskOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InputPreconditionViolation { .. }));

        let dark = BinaryMask::new(40, 30);
        assert!(extract_crossword_mask(&dark, &MaskOptions::default()).is_err());
    }

    #[test]
    fn stages_are_reported_in_order() {
        let binary = framed(60, 50, 10, 8, 50, 42, 3);
        let mut seen = Vec::new();
        let mut sink = |name: &str, _img: StageImage<'_>| seen.push(name.to_string());
        extract_with_report(&binary, &MaskOptions { heal_radius: 2 }, &mut sink).unwrap();
        assert_eq!(seen, ["background_removed", "healed", "mask"]);
    }
}
