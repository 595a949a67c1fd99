//! Row/column counting and per-cell classification on the cropped grid.
//!
//! Line counting works on horizontal lines only: edges vote into a Hough
//! accumulator, near-horizontal lines are intersected with the vertical
//! through the image centre, and the intercepts form a per-row histogram.
//! That histogram repeats with the row pitch, so the dominant frequency of
//! its spectrum is the number of rows. Columns reuse the same estimator on
//! the transposed image.
use crate::angle::is_near_horizontal;
use crate::edges::{canny, CannyOptions};
use crate::error::PipelineError;
use crate::hough::{search_threshold, HoughAccumulator, HoughSearchReport};
use crate::image::GrayscaleImage;
use crate::params::SamplerOptions;
use crate::spectrum::{dominant_frequency, FrequencyPeak};
use crate::types::{GridResult, PolarLine};
use log::{debug, warn};
use serde::Serialize;

/// Everything the line-count estimator saw along one axis.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountReport {
    pub search: HoughSearchReport,
    /// Lines that passed the horizontal filter.
    pub horizontal_lines: usize,
    /// Intercepts that landed inside the image.
    pub histogram_hits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<FrequencyPeak>,
    pub count: usize,
}

/// Per-row histogram of where near-horizontal lines cross `x = x_mid`.
pub fn intercept_histogram(
    lines: &[PolarLine],
    height: usize,
    x_mid: f32,
    max_abs_cos: f32,
) -> (Vec<f32>, usize) {
    let mut hist = vec![0.0f32; height];
    let mut horizontal = 0usize;
    for l in lines.iter().filter(|l| is_near_horizontal(l.theta, max_abs_cos)) {
        horizontal += 1;
        let (sin_t, cos_t) = l.theta.sin_cos();
        let y = (l.rho - cos_t * x_mid) / sin_t;
        if y >= 0.0 && y < height as f32 {
            hist[y as usize] += 1.0;
        }
    }
    (hist, horizontal)
}

/// Estimated number of grid rows in `image`.
pub fn estimate_line_count(
    image: &GrayscaleImage,
    options: &SamplerOptions,
    canny_options: &CannyOptions,
) -> usize {
    line_count_with_report(image, options, canny_options).count
}

pub fn line_count_with_report(
    image: &GrayscaleImage,
    options: &SamplerOptions,
    canny_options: &CannyOptions,
) -> LineCountReport {
    let edges = canny(image, canny_options);
    let acc = HoughAccumulator::from_edges(&edges, &options.hough);
    let search = search_threshold(&acc, &options.search);
    if !search.converged {
        warn!("line count: search did not converge, using the last estimate");
    }

    let x_mid = image.width() as f32 * 0.5;
    let (hist, horizontal_lines) =
        intercept_histogram(&search.lines, image.height(), x_mid, options.max_abs_cos);
    let histogram_hits = hist.iter().sum::<f32>() as usize;

    let peak = dominant_frequency(&hist, options.min_frequency, options.subharmonic_ratio);
    let count = peak
        .as_ref()
        .map(|p| (p.frequency as i64 + options.count_offset as i64).max(0) as usize)
        .unwrap_or(0);
    debug!(
        "line count: {} lines ({} horizontal, {} hits) -> {:?} -> {}",
        search.lines.len(),
        horizontal_lines,
        histogram_hits,
        peak.as_ref().map(|p| p.frequency),
        count
    );

    LineCountReport {
        search: search.report(),
        horizontal_lines,
        histogram_hits,
        peak,
        count,
    }
}

/// Black/white state of each cell of a `rows × cols` partition of `image`.
pub fn classify_cells(
    image: &GrayscaleImage,
    rows: usize,
    cols: usize,
    options: &SamplerOptions,
) -> Vec<Vec<bool>> {
    let (w, h) = (image.width(), image.height());
    if rows == 0 || cols == 0 || w == 0 || h == 0 {
        return vec![vec![false; cols]; rows];
    }
    let cell_w = w as f32 / cols as f32;
    let cell_h = h as f32 / rows as f32;
    let radius = ((options.sample_fraction * cell_w.min(cell_h)).round() as usize).max(1);

    let classify_row = |r: usize| -> Vec<bool> {
        let cy = (((r as f32 + 0.5) * cell_h) as usize).min(h - 1);
        (0..cols)
            .map(|c| {
                let cx = (((c as f32 + 0.5) * cell_w) as usize).min(w - 1);
                image.window_mean(cx, cy, radius) < options.black_threshold
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..rows).into_par_iter().map(classify_row).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..rows).map(classify_row).collect()
    }
}

/// Per-axis reports of [`sample_grid_with_report`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerReport {
    pub rows: LineCountReport,
    pub cols: LineCountReport,
}

/// Count rows and columns, then classify every cell.
pub fn sample_grid(
    image: &GrayscaleImage,
    options: &SamplerOptions,
    canny_options: &CannyOptions,
) -> Result<GridResult, PipelineError> {
    sample_grid_with_report(image, options, canny_options).0
}

pub fn sample_grid_with_report(
    image: &GrayscaleImage,
    options: &SamplerOptions,
    canny_options: &CannyOptions,
) -> (Result<GridResult, PipelineError>, SamplerReport) {
    let rows = line_count_with_report(image, options, canny_options);
    let cols = line_count_with_report(&image.transpose(), options, canny_options);
    let (r, c) = (rows.count, cols.count);
    let report = SamplerReport { rows, cols };
    if r < 2 || c < 2 {
        warn!("sampler: unusable grid estimate {}x{}", c, r);
        return (Err(PipelineError::InvalidGridEstimate { rows: r, cols: c }), report);
    }
    debug!("sampler: grid {}x{}", c, r);
    let cells = classify_cells(image, r, c, options);
    (
        Ok(GridResult {
            width: c,
            height: r,
            cells,
        }),
        report,
    )
}
