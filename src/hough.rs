//! Standard Hough line transform over a binary edge map.
//!
//! Votes are accumulated once per edge map into a `(theta, rho)` grid;
//! peaks are then read off for any vote threshold without re-voting. This
//! keeps the adaptive threshold searches in the pipeline cheap: raising the
//! threshold only rescans the accumulator.
//!
//! Conventions follow the usual image-space normal form
//! `x·cos(theta) + y·sin(theta) = rho` with `theta ∈ [0, π)` and the origin at
//! the top-left pixel. A peak is a cell with at least `threshold` votes that
//! no cell within `suppression_radius` bins (in both rho and theta) beats.
//! Ties go to the cell scanned first, so a plateau yields a single line.
//! Edge maps carrying two-pixel-wide steps otherwise produce a twin line
//! one bin away.
use crate::image::BinaryMask;
use crate::types::PolarLine;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Accumulator resolution and peak suppression.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    /// Distance resolution in pixels.
    pub rho_resolution: f32,
    /// Angle resolution in degrees.
    pub theta_resolution_deg: f32,
    /// Half-size, in bins, of the window a peak must dominate.
    pub suppression_radius: usize,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta_resolution_deg: 1.0,
            suppression_radius: 2,
        }
    }
}

/// Bounded threshold relaxation: start at `initial` votes and raise by `step`
/// until at most `max_lines` peaks remain or `max_iterations` passes ran.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThresholdSearchOptions {
    pub initial: u32,
    pub step: u32,
    pub max_lines: usize,
    pub max_iterations: usize,
}

impl Default for ThresholdSearchOptions {
    fn default() -> Self {
        Self {
            initial: 50,
            step: 5,
            max_lines: 10,
            max_iterations: 200,
        }
    }
}

/// Outcome of [`search_threshold`].
#[derive(Clone, Debug)]
pub struct HoughSearch {
    /// Lines found at the final threshold, strongest first.
    pub lines: Vec<PolarLine>,
    pub threshold: u32,
    pub iterations: usize,
    /// False when the iteration cap was hit before the line count dropped to
    /// `max_lines`; `lines` then holds the last estimate.
    pub converged: bool,
}

/// Serializable summary of a [`HoughSearch`] for diagnostics.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughSearchReport {
    pub threshold: u32,
    pub iterations: usize,
    pub line_count: usize,
    pub converged: bool,
}

impl HoughSearch {
    pub fn report(&self) -> HoughSearchReport {
        HoughSearchReport {
            threshold: self.threshold,
            iterations: self.iterations,
            line_count: self.lines.len(),
            converged: self.converged,
        }
    }
}

/// Vote grid indexed by `theta_index * num_rho + rho_index`.
pub struct HoughAccumulator {
    votes: Vec<u32>,
    num_theta: usize,
    num_rho: usize,
    rho_offset: isize,
    rho_resolution: f32,
    theta_resolution: f32,
    suppression_radius: isize,
}

impl HoughAccumulator {
    /// Vote every foreground pixel of `edges` into the accumulator.
    pub fn from_edges(edges: &BinaryMask, options: &HoughOptions) -> Self {
        let rho_resolution = options.rho_resolution.max(1e-3);
        let theta_resolution = options.theta_resolution_deg.max(1e-3).to_radians();
        let num_theta = ((PI / theta_resolution).round() as usize).max(1);
        let diag = ((edges.width().pow(2) + edges.height().pow(2)) as f32).sqrt();
        let max_rho_bins = (diag / rho_resolution).ceil() as isize;
        let num_rho = (2 * max_rho_bins + 1) as usize;

        let (cos_t, sin_t): (Vec<f32>, Vec<f32>) = (0..num_theta)
            .map(|t| {
                let theta = t as f32 * theta_resolution;
                (theta.cos() / rho_resolution, theta.sin() / rho_resolution)
            })
            .unzip();

        let mut votes = vec![0u32; num_theta * num_rho];
        for y in 0..edges.height() {
            for x in 0..edges.width() {
                if !edges.get(x, y) {
                    continue;
                }
                let (fx, fy) = (x as f32, y as f32);
                for t in 0..num_theta {
                    let r = (fx * cos_t[t] + fy * sin_t[t]).round() as isize + max_rho_bins;
                    votes[t * num_rho + r as usize] += 1;
                }
            }
        }

        Self {
            votes,
            num_theta,
            num_rho,
            rho_offset: max_rho_bins,
            rho_resolution,
            theta_resolution,
            suppression_radius: options.suppression_radius as isize,
        }
    }

    #[inline]
    fn at(&self, t: isize, r: isize) -> u32 {
        if t < 0 || r < 0 || t as usize >= self.num_theta || r as usize >= self.num_rho {
            0
        } else {
            self.votes[t as usize * self.num_rho + r as usize]
        }
    }

    /// True when no cell within the suppression window beats `v`. Equal
    /// cells scanned earlier (lower theta, then lower rho) win the tie.
    fn dominates_window(&self, t: isize, r: isize, v: u32) -> bool {
        let radius = self.suppression_radius;
        for dt in -radius..=radius {
            for dr in -radius..=radius {
                if dt == 0 && dr == 0 {
                    continue;
                }
                let n = self.at(t + dt, r + dr);
                let earlier = dt < 0 || (dt == 0 && dr < 0);
                if n > v || (earlier && n == v) {
                    return false;
                }
            }
        }
        true
    }

    /// Peaks with at least `threshold` votes, strongest first.
    pub fn lines(&self, threshold: u32) -> Vec<PolarLine> {
        let threshold = threshold.max(1);
        let mut peaks: Vec<(u32, usize, usize)> = Vec::new();
        for t in 0..self.num_theta {
            let row = &self.votes[t * self.num_rho..(t + 1) * self.num_rho];
            for (r, &v) in row.iter().enumerate() {
                if v >= threshold && self.dominates_window(t as isize, r as isize, v) {
                    peaks.push((v, t, r));
                }
            }
        }
        peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        peaks
            .into_iter()
            .map(|(votes, t, r)| PolarLine {
                rho: (r as isize - self.rho_offset) as f32 * self.rho_resolution,
                theta: t as f32 * self.theta_resolution,
                votes,
            })
            .collect()
    }
}

/// Raise the vote threshold until the detector returns few enough lines.
///
/// An empty result is a valid outcome (the threshold is never lowered); the
/// caller decides what "no lines" means for its stage.
pub fn search_threshold(acc: &HoughAccumulator, options: &ThresholdSearchOptions) -> HoughSearch {
    let step = options.step.max(1);
    let max_iterations = options.max_iterations.max(1);
    let mut threshold = options.initial;
    let mut iterations = 0usize;
    loop {
        let lines = acc.lines(threshold);
        iterations += 1;
        if lines.len() <= options.max_lines {
            debug!(
                "hough search settled: threshold={} lines={} iterations={}",
                threshold,
                lines.len(),
                iterations
            );
            return HoughSearch {
                lines,
                threshold,
                iterations,
                converged: true,
            };
        }
        if iterations >= max_iterations {
            warn!(
                "hough search hit iteration cap {}: threshold={} still yields {} lines (> {})",
                max_iterations,
                threshold,
                lines.len(),
                options.max_lines
            );
            return HoughSearch {
                lines,
                threshold,
                iterations,
                converged: false,
            };
        }
        threshold = threshold.saturating_add(step);
    }
}
