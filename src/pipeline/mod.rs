//! Crossword extraction pipeline.
//!
//! The [`CrosswordExtractor`] runs five stages in fixed order on a grayscale
//! photograph and returns the recovered [`GridResult`]:
//!
//! - [`binarize`]: local mean thresholding, paper becomes foreground.
//! - [`mask`]: corner fills, healing closure and seeded isolation of the
//!   crossword region.
//! - [`deskew`]: Hough-based skew estimate, mask and image rotated together.
//! - [`crop`]: tight crop to the mask's bounding box.
//! - [`sampler`]: row/column counts from the spectrum of line intercepts,
//!   then per-cell classification.
//!
//! Each stage hands an owned value to the next; nothing is shared between
//! runs, so one extractor can serve several threads.
//!
//! ```no_run
//! use crossword_grid::{CrosswordExtractor, ExtractorParams, GrayscaleImage};
//!
//! # fn example(photo: GrayscaleImage) {
//! let extractor = CrosswordExtractor::new(ExtractorParams::default());
//! match extractor.process(&photo) {
//!     Ok(grid) => println!("{}", grid.encode()),
//!     Err(err) => eprintln!("extraction failed: {err}"),
//! }
//! # }
//! ```

pub mod binarize;
pub mod crop;
pub mod deskew;
pub mod mask;
pub mod sampler;

pub use binarize::binarize;
pub use crop::{crop_pair, crop_to_mask, CroppedPair};
pub use deskew::{deskew, skew_from_lines, DeskewReport, SkewEstimate};
pub use mask::{extract_crossword_mask, heal_gaps, MaskReport};
pub use sampler::{classify_cells, estimate_line_count, sample_grid, LineCountReport};

use crate::diagnostics::{ExtractionReport, InputDescriptor, PipelineTrace};
use crate::error::PipelineError;
use crate::image::GrayscaleImage;
use crate::params::ExtractorParams;
use crate::sink::{NoopSink, StageImage, StageSink};
use crate::types::GridResult;
use log::debug;

/// Names passed to [`StageSink::on_stage`], in emission order.
pub mod stage {
    pub const BINARIZED: &str = "binarized";
    pub const BACKGROUND_REMOVED: &str = "background_removed";
    pub const HEALED: &str = "healed";
    pub const MASK: &str = "mask";
    pub const DESKEWED_MASK: &str = "deskewed_mask";
    pub const DESKEWED_IMAGE: &str = "deskewed_image";
    pub const CROPPED: &str = "cropped";

    pub const ALL: [&str; 7] = [
        BINARIZED,
        BACKGROUND_REMOVED,
        HEALED,
        MASK,
        DESKEWED_MASK,
        DESKEWED_IMAGE,
        CROPPED,
    ];
}

/// Runs the extraction stages with a fixed parameter set.
#[derive(Clone, Debug, Default)]
pub struct CrosswordExtractor {
    params: ExtractorParams,
}

impl CrosswordExtractor {
    pub fn new(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Replace the parameters used by later runs.
    pub fn set_params(&mut self, params: ExtractorParams) {
        self.params = params;
    }

    /// Extract the grid without diagnostics or debug images.
    pub fn process(&self, image: &GrayscaleImage) -> Result<GridResult, PipelineError> {
        self.process_with_report(image, &mut NoopSink).result().cloned()
    }

    /// Extract the grid, feeding intermediate rasters to `sink` and recording
    /// a trace of every stage that ran.
    pub fn process_with_report(
        &self,
        image: &GrayscaleImage,
        sink: &mut dyn StageSink,
    ) -> ExtractionReport {
        let mut trace = PipelineTrace::new(InputDescriptor {
            width: image.width(),
            height: image.height(),
        });
        let outcome = self.run_stages(image, sink, &mut trace);
        debug!("extraction finished in {:.3} ms", trace.timings.total_ms);
        match outcome {
            Ok(grid) => ExtractionReport {
                grid: Some(grid),
                error: None,
                trace,
            },
            Err(err) => ExtractionReport {
                grid: None,
                error: Some(err),
                trace,
            },
        }
    }

    fn run_stages(
        &self,
        image: &GrayscaleImage,
        sink: &mut dyn StageSink,
        trace: &mut PipelineTrace,
    ) -> Result<GridResult, PipelineError> {
        let p = &self.params;
        if image.width() == 0 || image.height() == 0 {
            return Err(PipelineError::InvalidImage {
                reason: "empty raster".to_string(),
            });
        }

        let binary = trace
            .timings
            .time("binarize", || binarize(image, &p.binarize));
        trace.foreground_ratio =
            Some(binary.count_foreground() as f32 / (image.width() * image.height()) as f32);
        sink.on_stage(stage::BINARIZED, StageImage::Mask(&binary));

        let (mask, mask_report) = trace
            .timings
            .time("mask", || mask::extract_with_report(&binary, &p.mask, sink))?;
        trace.mask = Some(mask_report);

        let (rotated_mask, rotated_image, deskew_report) = trace.timings.time("deskew", || {
            deskew::deskew_with_report(&mask, image, &p.deskew, &p.canny, sink)
        });
        trace.deskew = Some(deskew_report);

        let cropped = trace
            .timings
            .time("crop", || crop_pair(&rotated_mask, &rotated_image))?;
        trace.crop = Some(cropped.bbox);
        sink.on_stage(stage::CROPPED, StageImage::Gray(&cropped.image));

        let (grid, sampler_report) = trace.timings.time("sample", || {
            sampler::sample_grid_with_report(&cropped.image, &p.sampler, &p.canny)
        });
        trace.rows = Some(sampler_report.rows);
        trace.cols = Some(sampler_report.cols);
        grid
    }
}

/// Run every stage with default parameters.
pub fn run_pipeline(image: &GrayscaleImage) -> Result<GridResult, PipelineError> {
    CrosswordExtractor::default().process(image)
}
