use super::TimingBreakdown;
use crate::error::PipelineError;
use crate::pipeline::deskew::DeskewReport;
use crate::pipeline::mask::MaskReport;
use crate::pipeline::sampler::LineCountReport;
use crate::types::{BoundingBox, GridResult};
use serde::{Serialize, Serializer};

/// Result produced by
/// [`CrosswordExtractor::process_with_report`](crate::CrosswordExtractor::process_with_report).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    /// `None` when the pipeline stopped with an error; the trace then covers
    /// the stages that did run.
    pub grid: Option<GridResult>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<PipelineError>,
    pub trace: PipelineTrace,
}

impl ExtractionReport {
    /// The grid, or the error that stopped the run.
    pub fn result(&self) -> Result<&GridResult, PipelineError> {
        match (&self.grid, &self.error) {
            (Some(grid), _) => Ok(grid),
            (None, Some(err)) => Err(err.clone()),
            (None, None) => unreachable!("extraction report without grid or error"),
        }
    }
}

fn serialize_error<S: Serializer>(err: &Option<PipelineError>, s: S) -> Result<S::Ok, S::Error> {
    match err {
        Some(e) => s.serialize_str(&e.to_string()),
        None => s.serialize_none(),
    }
}

/// What each stage of one extraction computed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    /// Foreground share of the binarized image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deskew: Option<DeskewReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<LineCountReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<LineCountReport>,
}

impl PipelineTrace {
    pub fn new(input: InputDescriptor) -> Self {
        Self {
            input,
            timings: TimingBreakdown::default(),
            foreground_ratio: None,
            mask: None,
            deskew: None,
            crop: None,
            rows: None,
            cols: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}
