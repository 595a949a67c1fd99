//! Parameter types configuring the extraction stages.
//!
//! Every tuning constant of the pipeline lives here as a named field. The
//! defaults are calibrated for phone photographs of a printed puzzle at a
//! few hundred pixels across the grid; expect to recalibrate window sizes and
//! vote thresholds for much smaller or larger inputs.
//!
//! All structs deserialize with `#[serde(default)]`, so a configuration file
//! only needs to name the knobs it changes. The Hough threshold searches of
//! the deskew and sampling stages have different defaults; a partial
//! `search` object is filled from the defaults of the stage it belongs to.

use crate::edges::CannyOptions;
use crate::hough::{HoughOptions, ThresholdSearchOptions};
use serde::{Deserialize, Deserializer};

/// Field-wise override of a [`ThresholdSearchOptions`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchOverride {
    initial: Option<u32>,
    step: Option<u32>,
    max_lines: Option<usize>,
    max_iterations: Option<usize>,
}

impl SearchOverride {
    fn apply(self, base: ThresholdSearchOptions) -> ThresholdSearchOptions {
        ThresholdSearchOptions {
            initial: self.initial.unwrap_or(base.initial),
            step: self.step.unwrap_or(base.step),
            max_lines: self.max_lines.unwrap_or(base.max_lines),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
        }
    }
}

fn deskew_search<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdSearchOptions, D::Error> {
    SearchOverride::deserialize(d).map(|o| o.apply(DeskewOptions::default_search()))
}

fn sampler_search<'de, D: Deserializer<'de>>(d: D) -> Result<ThresholdSearchOptions, D::Error> {
    SearchOverride::deserialize(d).map(|o| o.apply(SamplerOptions::default_search()))
}

/// Pipeline-wide parameters, one group per stage.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    pub binarize: BinarizeOptions,
    pub mask: MaskOptions,
    pub deskew: DeskewOptions,
    pub sampler: SamplerOptions,
    /// Edge detector shared by the deskew and sampling stages.
    pub canny: CannyOptions,
}

/// Local mean thresholding.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BinarizeOptions {
    /// Half-size of the square averaging window (radius 50 → 101×101).
    pub window_radius: usize,
    /// A pixel is paper when it is brighter than `local_mean - offset`.
    pub offset: f32,
}

impl Default for BinarizeOptions {
    fn default() -> Self {
        Self {
            window_radius: 50,
            offset: 20.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Radius of the square closing that heals gaps in the outer border.
    /// Must exceed half the widest gap and half the ink width inside the grid.
    pub heal_radius: usize,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self { heal_radius: 25 }
    }
}

/// Rotation estimate from the dominant mask outline lines.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DeskewOptions {
    pub hough: HoughOptions,
    /// Settles at no more than ten outline lines.
    #[serde(deserialize_with = "deskew_search")]
    pub search: ThresholdSearchOptions,
    /// Fewer surviving folded angles than this fall back to zero rotation.
    pub min_lines: usize,
    /// Grayscale value written where the rotated image samples outside the
    /// source.
    pub image_fill: u8,
}

impl DeskewOptions {
    fn default_search() -> ThresholdSearchOptions {
        ThresholdSearchOptions {
            initial: 50,
            step: 5,
            max_lines: 10,
            max_iterations: 200,
        }
    }
}

impl Default for DeskewOptions {
    fn default() -> Self {
        Self {
            hough: HoughOptions::default(),
            search: Self::default_search(),
            min_lines: 2,
            image_fill: 255,
        }
    }
}

/// Row/column counting and per-cell classification.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SamplerOptions {
    pub hough: HoughOptions,
    /// Looser bound than deskew: every grid line is wanted.
    #[serde(deserialize_with = "sampler_search")]
    pub search: ThresholdSearchOptions,
    /// Lines with `|cos(theta)|` at or above this are not horizontal.
    pub max_abs_cos: f32,
    /// Lowest spectrum index considered a plausible line count.
    pub min_frequency: usize,
    /// Relative magnitude a subharmonic needs to replace the raw peak.
    pub subharmonic_ratio: f32,
    /// Added to the picked frequency to obtain the count.
    pub count_offset: i32,
    /// Sampling window radius as a fraction of the smaller cell side.
    pub sample_fraction: f32,
    /// Cells whose window mean is below this are black.
    pub black_threshold: f32,
}

impl SamplerOptions {
    fn default_search() -> ThresholdSearchOptions {
        ThresholdSearchOptions {
            initial: 40,
            step: 5,
            max_lines: 100,
            max_iterations: 200,
        }
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            hough: HoughOptions::default(),
            search: Self::default_search(),
            max_abs_cos: 0.1,
            min_frequency: 3,
            subharmonic_ratio: 0.5,
            count_offset: 0,
            sample_fraction: 0.2,
            black_threshold: 128.0,
        }
    }
}
