//! Failure exits of the extraction pipeline.
use thiserror::Error;

/// Errors surfaced by [`run_pipeline`](crate::run_pipeline).
///
/// Threshold searches that hit their iteration cap and degenerate rotation
/// estimates are recovered inside their stage and never show up here; see
/// [`HoughSearch::converged`](crate::hough::HoughSearch) and
/// [`SkewEstimate`](crate::pipeline::deskew::SkewEstimate).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The photograph holds no bright region the mask extractor could isolate
    /// (for example a blank or fully dark frame).
    #[error("input precondition violated at {stage}: no foreground region left")]
    InputPreconditionViolation { stage: &'static str },

    /// Row or column estimation produced fewer than two lines of cells.
    #[error("invalid grid estimate {cols}x{rows}: both dimensions must be at least 2")]
    InvalidGridEstimate { rows: usize, cols: usize },

    /// The raster handed to the pipeline cannot be processed at all.
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },
}
