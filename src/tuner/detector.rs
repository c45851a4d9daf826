//! Autocorrelation pitch detector
//!
//! The estimator looks for the first positive correlation lobe after the
//! initial dip below zero, takes its peak, and refines that peak to a
//! fractional lag with a parabola through the three surrounding points.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiffboxError};

/// Lowest `min_frequency` a configuration may ask for (Hz)
const MIN_DETECTABLE_HZ: f64 = 1.0;

/// Pitch detector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Sample rate of the analysed blocks (Hz)
    pub sample_rate: u32,
    /// Peak level below which a block counts as silence
    pub min_amplitude: f32,
    /// Lowest detectable frequency (Hz); sets the longest lag searched
    pub min_frequency: f64,
    /// Highest detectable frequency (Hz); sets the shortest lag searched
    pub max_frequency: f64,
    /// Normalised correlation the peak must reach to count as pitched
    pub confidence_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            min_amplitude: 0.01,
            min_frequency: 27.0,
            max_frequency: 1200.0,
            confidence_threshold: 0.3,
        }
    }
}

impl DetectorConfig {
    /// Check that the search range is usable
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(RiffboxError::InvalidConfig {
                reason: "detector sample_rate must be positive".to_string(),
            });
        }
        if !(self.min_frequency >= MIN_DETECTABLE_HZ && self.min_frequency.is_finite()) {
            return Err(RiffboxError::InvalidConfig {
                reason: format!(
                    "min_frequency must be at least {} Hz, got {}",
                    MIN_DETECTABLE_HZ, self.min_frequency
                ),
            });
        }
        if !(self.max_frequency > self.min_frequency && self.max_frequency.is_finite()) {
            return Err(RiffboxError::InvalidConfig {
                reason: format!(
                    "max_frequency ({}) must exceed min_frequency ({})",
                    self.max_frequency, self.min_frequency
                ),
            });
        }
        if self.min_amplitude < 0.0 {
            return Err(RiffboxError::InvalidConfig {
                reason: "min_amplitude must not be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Shortest lag searched, in samples
    pub fn min_lag(&self) -> usize {
        (self.sample_rate as f64 / self.max_frequency) as usize
    }

    /// Longest lag searched for an unbounded block, in samples
    pub fn max_lag(&self) -> usize {
        (self.sample_rate as f64 / self.min_frequency) as usize
    }
}

/// Result of analysing one block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchEstimate {
    /// Estimated fundamental in Hz, 0.0 when nothing was detected
    pub frequency: f64,
    pub detected: bool,
}

impl PitchEstimate {
    /// The "no pitch" sentinel
    pub const NONE: PitchEstimate = PitchEstimate {
        frequency: 0.0,
        detected: false,
    };

    fn at(frequency: f64) -> Self {
        Self {
            frequency,
            detected: true,
        }
    }
}

/// Autocorrelation pitch detector with a preallocated correlation buffer
#[derive(Debug, Clone)]
pub struct PitchDetector {
    config: DetectorConfig,
    /// Normalised autocorrelation for lags `0..=max_lag`
    scratch: Vec<f64>,
}

impl PitchDetector {
    /// Create a detector, sizing its scratch buffer for the longest lag
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let scratch = vec![0.0; config.max_lag() + 1];
        Ok(Self { config, scratch })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Replace the configuration, reallocating the scratch buffer
    pub fn set_config(&mut self, config: DetectorConfig) -> Result<()> {
        config.validate()?;
        log::debug!(
            "pitch detector: lags {}..{} at {} Hz",
            config.min_lag(),
            config.max_lag(),
            config.sample_rate
        );
        self.scratch = vec![0.0; config.max_lag() + 1];
        self.config = config;
        Ok(())
    }

    /// Estimate the fundamental frequency of a block
    ///
    /// Silence, blocks too short for the lag range, and weakly periodic
    /// signals all return [`PitchEstimate::NONE`].
    pub fn detect(&mut self, block: &[f32]) -> PitchEstimate {
        let n = block.len();
        let peak = block.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        if n == 0 || peak < self.config.min_amplitude {
            return PitchEstimate::NONE;
        }

        let min_lag = self.config.min_lag();
        let max_lag = self.config.max_lag().min(n - 1);
        if min_lag >= max_lag {
            return PitchEstimate::NONE;
        }

        let corr = &mut self.scratch[..=max_lag];
        autocorrelate(block, corr);

        let search = &corr[min_lag..max_lag];
        let peak_idx = match first_positive_lobe_peak(search) {
            Some(idx) => idx,
            None => return PitchEstimate::NONE,
        };
        let peak_lag = refine_peak(corr, peak_idx + min_lag);
        if !(peak_lag >= min_lag as f64 && peak_lag <= max_lag as f64) {
            return PitchEstimate::NONE;
        }

        let nearest = peak_lag.round() as usize;
        if corr[nearest] < self.config.confidence_threshold {
            return PitchEstimate::NONE;
        }

        PitchEstimate::at(self.config.sample_rate as f64 / peak_lag)
    }
}

impl Default for PitchDetector {
    fn default() -> Self {
        let config = DetectorConfig::default();
        let scratch = vec![0.0; config.max_lag() + 1];
        Self { config, scratch }
    }
}

/// Fill `corr[k]` with the overlap-normalised autocorrelation of `block`
/// at lag `k`, scaled so `corr[0] == 1`.
fn autocorrelate(block: &[f32], corr: &mut [f64]) {
    let n = block.len();
    for (lag, slot) in corr.iter_mut().enumerate() {
        let sum: f64 = block[..n - lag]
            .iter()
            .zip(&block[lag..])
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();
        *slot = sum / (n - lag) as f64;
    }

    let energy = corr[0];
    if energy > 0.0 {
        for value in corr.iter_mut() {
            *value /= energy;
        }
    }
}

/// Index of the highest point of the first positive lobe that follows a
/// negative region. Ties resolve to the earliest index.
fn first_positive_lobe_peak(search: &[f64]) -> Option<usize> {
    let dip = search.iter().position(|&c| c < 0.0)?;
    let lobe_start = dip + search[dip..].iter().position(|&c| c > 0.0)?;
    let lobe_end = search[lobe_start..]
        .iter()
        .position(|&c| c < 0.0)
        .map_or(search.len(), |offset| lobe_start + offset);

    let mut best = lobe_start;
    for idx in lobe_start + 1..lobe_end {
        if search[idx] > search[best] {
            best = idx;
        }
    }
    Some(best)
}

/// Parabolic interpolation of a peak at integer lag `p`
///
/// A shift of more than one sample means the three points are not around
/// a maximum (e.g. a peak cut off by the search window); `p` is kept.
fn refine_peak(corr: &[f64], p: usize) -> f64 {
    if p == 0 || p + 1 >= corr.len() {
        return p as f64;
    }
    let (s0, s1, s2) = (corr[p - 1], corr[p], corr[p + 1]);
    let denom = s0 - 2.0 * s1 + s2;
    if denom == 0.0 {
        return p as f64;
    }
    let shift = (s0 - s2) / (2.0 * denom);
    if shift.abs() > 1.0 {
        return p as f64;
    }
    p as f64 + shift
}
