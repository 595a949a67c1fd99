#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod params;
pub mod pipeline;
pub mod sink;
pub mod types;

// Building blocks used by the stages. Public for tools and tests, but their
// signatures may still move.
pub mod angle;
pub mod config;
pub mod edges;
pub mod fill;
pub mod filters;
pub mod hough;
pub mod spectrum;
pub mod warp;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::PipelineError;
pub use crate::image::{BinaryMask, GrayscaleImage};
pub use crate::params::ExtractorParams;
pub use crate::pipeline::{run_pipeline, CrosswordExtractor};
pub use crate::types::{BoundingBox, GridResult, Point2D};

pub use crate::diagnostics::{ExtractionReport, PipelineTrace};
pub use crate::sink::{NoopSink, StageImage, StageSink};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use crossword_grid::prelude::*;
///
/// # fn main() -> Result<(), PipelineError> {
/// let photo = GrayscaleImage::from_raw(4, 4, vec![255; 16])?;
/// let grid = run_pipeline(&photo)?;
/// println!("{}x{} with {} black cells", grid.width, grid.height, grid.black_cells());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::params::ExtractorParams;
    pub use crate::{
        run_pipeline, CrosswordExtractor, GrayscaleImage, GridResult, PipelineError, StageImage,
        StageSink,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::pipeline::{
        binarize, classify_cells, crop_pair, crop_to_mask, deskew, estimate_line_count,
        extract_crossword_mask, heal_gaps, sample_grid, skew_from_lines, CroppedPair,
        DeskewReport, LineCountReport, MaskReport, SkewEstimate,
    };
    pub use crate::spectrum::{dominant_frequency, FrequencyPeak};
}
