//! Rotation correction from the dominant outline lines of the mask.
//!
//! Canny edges of the mask vote into a Hough accumulator; the vote threshold
//! is raised until only a handful of lines remain. Both grid orientations
//! fold onto the same skew angle modulo a quarter turn, and the mean folded
//! angle is undone by rotating the mask and the image together.
use super::stage;
use crate::angle::{fold_quarter_turn, is_unambiguous_fold};
use crate::edges::{canny, CannyOptions};
use crate::hough::{search_threshold, HoughAccumulator, HoughSearchReport};
use crate::image::{BinaryMask, GrayscaleImage};
use crate::params::DeskewOptions;
use crate::sink::{NoopSink, StageImage, StageSink};
use crate::types::PolarLine;
use crate::warp::rotate_pair;
use log::{debug, warn};
use serde::Serialize;

/// Skew derived from a set of Hough lines.
#[derive(Clone, Debug, PartialEq)]
pub enum SkewEstimate {
    /// Mean folded angle (radians) over `lines_used` unambiguous lines.
    Estimated { angle: f32, lines_used: usize },
    /// Too few unambiguous lines; no rotation is applied.
    Degenerate { lines_used: usize },
}

impl SkewEstimate {
    /// Angle to undo, zero for the degenerate branch.
    pub fn angle(&self) -> f32 {
        match *self {
            SkewEstimate::Estimated { angle, .. } => angle,
            SkewEstimate::Degenerate { .. } => 0.0,
        }
    }

    pub fn lines_used(&self) -> usize {
        match *self {
            SkewEstimate::Estimated { lines_used, .. } | SkewEstimate::Degenerate { lines_used } => {
                lines_used
            }
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, SkewEstimate::Degenerate { .. })
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskewReport {
    pub angle_deg: f32,
    pub lines_used: usize,
    /// Folded angles (degrees) of the lines that entered the mean.
    pub folded_angles_deg: Vec<f32>,
    pub search: HoughSearchReport,
    /// True when the zero-rotation fallback was taken.
    pub fallback: bool,
}

/// Fold every line onto `(-π/4, π/4]` and average the unambiguous ones.
pub fn skew_from_lines(lines: &[PolarLine], min_lines: usize) -> SkewEstimate {
    let folded = folded_angles(lines);
    let lines_used = folded.len();
    if lines_used == 0 || lines_used < min_lines {
        return SkewEstimate::Degenerate { lines_used };
    }
    let angle = folded.iter().sum::<f32>() / lines_used as f32;
    SkewEstimate::Estimated { angle, lines_used }
}

fn folded_angles(lines: &[PolarLine]) -> Vec<f32> {
    lines
        .iter()
        .map(|l| fold_quarter_turn(l.theta))
        .filter(|&f| is_unambiguous_fold(f))
        .collect()
}

/// Axis-align `mask` and `image` with one shared rotation.
pub fn deskew(
    mask: &BinaryMask,
    image: &GrayscaleImage,
    options: &DeskewOptions,
    canny_options: &CannyOptions,
) -> (BinaryMask, GrayscaleImage) {
    let (mask, image, _) = deskew_with_report(mask, image, options, canny_options, &mut NoopSink);
    (mask, image)
}

pub(crate) fn deskew_with_report(
    mask: &BinaryMask,
    image: &GrayscaleImage,
    options: &DeskewOptions,
    canny_options: &CannyOptions,
    sink: &mut dyn StageSink,
) -> (BinaryMask, GrayscaleImage, DeskewReport) {
    let edges = canny(&mask.to_grayscale(), canny_options);
    let acc = HoughAccumulator::from_edges(&edges, &options.hough);
    let search = search_threshold(&acc, &options.search);
    if !search.converged {
        warn!("deskew: line search did not converge, using the last estimate");
    }

    let estimate = skew_from_lines(&search.lines, options.min_lines);
    let angle = estimate.angle();
    match estimate {
        SkewEstimate::Estimated { lines_used, .. } => debug!(
            "deskew: {:.3} deg from {} of {} lines (threshold {})",
            angle.to_degrees(),
            lines_used,
            search.lines.len(),
            search.threshold
        ),
        SkewEstimate::Degenerate { lines_used } => warn!(
            "deskew: only {} unambiguous lines (need {}), skipping rotation",
            lines_used, options.min_lines
        ),
    }

    let (rotated_mask, rotated_image) = rotate_pair(mask, image, -angle, options.image_fill);
    sink.on_stage(stage::DESKEWED_MASK, StageImage::Mask(&rotated_mask));
    sink.on_stage(stage::DESKEWED_IMAGE, StageImage::Gray(&rotated_image));

    let report = DeskewReport {
        angle_deg: angle.to_degrees(),
        lines_used: estimate.lines_used(),
        folded_angles_deg: folded_angles(&search.lines)
            .into_iter()
            .map(f32::to_degrees)
            .collect(),
        search: search.report(),
        fallback: estimate.is_degenerate(),
    };
    (rotated_mask, rotated_image, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warp::rotate_mask;

    fn line(theta_deg: f32) -> PolarLine {
        PolarLine {
            rho: 10.0,
            theta: theta_deg.to_radians(),
            votes: 100,
        }
    }

    #[test]
    fn both_orientations_fold_onto_one_skew() {
        let est = skew_from_lines(&[line(3.0), line(93.0), line(4.0), line(94.0)], 2);
        match est {
            SkewEstimate::Estimated { angle, lines_used } => {
                assert_eq!(lines_used, 4);
                assert!((angle.to_degrees() - 3.5).abs() < 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ambiguous_diagonals_are_ignored() {
        let est = skew_from_lines(&[line(45.0), line(135.0), line(2.0), line(92.0)], 2);
        assert_eq!(est.lines_used(), 2);
        assert!((est.angle().to_degrees() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn near_vertical_normals_fold_to_negative_skew() {
        // theta just below π: a vertical line tilted the other way.
        let est = skew_from_lines(&[line(178.0), line(88.0)], 2);
        assert!((est.angle().to_degrees() + 2.0).abs() < 1e-3);
    }

    #[test]
    fn too_few_lines_is_degenerate() {
        assert_eq!(skew_from_lines(&[], 2), SkewEstimate::Degenerate { lines_used: 0 });
        let one = skew_from_lines(&[line(5.0)], 2);
        assert!(one.is_degenerate());
        assert_eq!(one.angle(), 0.0);
        // min_lines = 0 still refuses to average nothing.
        assert!(skew_from_lines(&[line(45.0)], 0).is_degenerate());
    }

    #[test]
    fn empty_mask_is_left_unrotated() {
        let mask = BinaryMask::new(64, 48);
        let image = GrayscaleImage::from_raw(64, 48, (0..64 * 48).map(|i| (i % 251) as u8).collect())
            .unwrap();
        let (m, i, report) = deskew_with_report(
            &mask,
            &image,
            &DeskewOptions::default(),
            &CannyOptions::default(),
            &mut NoopSink,
        );
        assert!(report.fallback);
        assert_eq!(report.angle_deg, 0.0);
        assert_eq!(m, mask);
        assert_eq!(i, image);
    }

    #[test]
    fn single_edge_is_left_unrotated() {
        // A half-plane mask has one straight outline. Its two-pixel-wide
        // edge and the one-degree side lobe collapse into a single peak.
        let mask = BinaryMask::from_fn(60, 100, |_, y| y < 50);
        let image = mask.to_grayscale();
        let (m, i, report) = deskew_with_report(
            &mask,
            &image,
            &DeskewOptions::default(),
            &CannyOptions::default(),
            &mut NoopSink,
        );
        assert!(report.fallback, "report: {report:?}");
        assert!(report.lines_used < 2);
        assert_eq!(m, mask);
        assert_eq!(i, image);
    }

    #[test]
    fn tilted_square_is_straightened() {
        let square = BinaryMask::from_fn(200, 200, |x, y| (60..140).contains(&x) && (60..140).contains(&y));
        let tilted = rotate_mask(&square, 5f32.to_radians());
        let image = tilted.to_grayscale();
        let before = tilted.bounding_box().unwrap();
        assert!(before.width > 84);

        let (m, i, report) = deskew_with_report(
            &tilted,
            &image,
            &DeskewOptions::default(),
            &CannyOptions::default(),
            &mut NoopSink,
        );
        assert!(!report.fallback);
        assert!((report.angle_deg - 5.0).abs() <= 1.0, "angle {}", report.angle_deg);
        assert_eq!((m.width(), m.height()), (i.width(), i.height()));
        let after = m.bounding_box().unwrap();
        assert!(after.width <= 83 && after.height <= 83, "{after:?}");
    }
}
