//! Optional hook receiving intermediate stage images.
//!
//! The extractor calls [`StageSink::on_stage`] in stage order with the stage
//! name and a borrowed view of the raster at that point. Sinks are passed in
//! explicitly, so concurrent extractions never share debug state.
use crate::image::{BinaryMask, GrayscaleImage};

/// Borrowed intermediate raster.
#[derive(Clone, Copy, Debug)]
pub enum StageImage<'a> {
    Gray(&'a GrayscaleImage),
    Mask(&'a BinaryMask),
}

impl StageImage<'_> {
    pub fn width(&self) -> usize {
        match self {
            StageImage::Gray(img) => img.width(),
            StageImage::Mask(mask) => mask.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            StageImage::Gray(img) => img.height(),
            StageImage::Mask(mask) => mask.height(),
        }
    }

    /// Materialise as grayscale (masks map to 255/0).
    pub fn to_grayscale(&self) -> GrayscaleImage {
        match self {
            StageImage::Gray(img) => (*img).clone(),
            StageImage::Mask(mask) => mask.to_grayscale(),
        }
    }
}

pub trait StageSink {
    fn on_stage(&mut self, stage: &str, image: StageImage<'_>);
}

/// Discards every stage image.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl StageSink for NoopSink {
    fn on_stage(&mut self, _stage: &str, _image: StageImage<'_>) {}
}

impl<F> StageSink for F
where
    F: FnMut(&str, StageImage<'_>),
{
    fn on_stage(&mut self, stage: &str, image: StageImage<'_>) {
        self(stage, image)
    }
}
