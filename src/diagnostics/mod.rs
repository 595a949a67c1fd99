//! Diagnostics data model returned next to the extracted grid.
//!
//! `ExtractionReport` is the entry point: the grid (or the error that
//! stopped the run) plus a `PipelineTrace` with per-stage timings and the
//! intermediate estimates each stage settled on. Everything serializes with
//! camelCase keys so the CLI can dump it as JSON.

pub mod pipeline;
pub mod timing;

pub use pipeline::{ExtractionReport, InputDescriptor, PipelineTrace};
pub use timing::{StageTiming, TimingBreakdown};
