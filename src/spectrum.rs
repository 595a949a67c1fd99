//! Periodicity analysis of 1D signals through the DFT magnitude spectrum.
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

/// Relative tolerance under which two spectral magnitudes count as equal.
/// An ideal impulse train has identical magnitudes at every harmonic; the
/// fundamental (lowest index) must win such ties.
const TIE_TOLERANCE: f32 = 1e-4;

/// Magnitudes `|X_k|` of the forward DFT of `signal`, `k = 0..signal.len()`.
pub fn magnitude_spectrum(signal: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(signal.len());

    let mut spectrum = Vec::with_capacity(signal.len());
    spectrum.extend(signal.iter().map(|&s| Complex::new(s, 0.0)));

    fft.process(&mut spectrum);

    spectrum.iter().map(|c| c.norm()).collect()
}

/// Dominant repetition count of a signal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPeak {
    /// Index of the strongest component in the searched band.
    pub argmax: usize,
    /// Fundamental chosen after the subharmonic check (≤ `argmax`).
    pub frequency: usize,
    pub magnitude: f32,
}

/// Find the dominant frequency index of `signal` in `[min_frequency, N/2]`.
///
/// The strongest component is located first (ties resolved towards the
/// lowest index). When the period does not divide the signal length the
/// strongest component can be a harmonic; integer fractions `argmax / m` are
/// then checked and the lowest one that is a local spectral peak with at
/// least `subharmonic_ratio` of the maximum magnitude is taken as the
/// fundamental. A `subharmonic_ratio` above 1 disables the check.
///
/// Returns `None` when the band is empty or the signal carries no energy in it.
pub fn dominant_frequency(
    signal: &[f32],
    min_frequency: usize,
    subharmonic_ratio: f32,
) -> Option<FrequencyPeak> {
    let mags = magnitude_spectrum(signal);
    let n = mags.len();
    let lo = min_frequency.max(1);
    let hi = n / 2;
    if lo > hi {
        return None;
    }

    let max_mag = mags[lo..=hi].iter().copied().fold(0.0f32, f32::max);
    assert!(max_mag.is_finite(), "non-finite spectrum magnitude");
    if max_mag <= f32::EPSILON {
        return None;
    }
    let argmax = (lo..=hi).find(|&k| mags[k] >= max_mag * (1.0 - TIE_TOLERANCE))?;

    let is_local_peak = |k: usize| {
        let left = if k > 0 { mags[k - 1] } else { 0.0 };
        let right = if k + 1 < n { mags[k + 1] } else { 0.0 };
        mags[k] >= left && mags[k] >= right
    };

    let mut frequency = argmax;
    let mut m = 2usize;
    loop {
        let ratio = argmax as f32 / m as f32;
        if ratio < lo as f32 {
            break;
        }
        let candidate = (ratio.round() as usize).max(lo);
        if candidate < frequency
            && mags[candidate] >= subharmonic_ratio * max_mag
            && is_local_peak(candidate)
        {
            frequency = candidate;
        }
        m += 1;
    }

    Some(FrequencyPeak {
        argmax,
        frequency,
        magnitude: mags[frequency],
    })
}
