//! Saturation Effects
//!
//! Overdrive (tanh soft clipping) and Fuzz (asymmetric hard clipping).
//! Both finish with the same one-pole tone filter and an output level.

use crate::dsp::effect::{Effect, EffectKind};
use crate::dsp::filters::{tone_coefficient, OnePoleHighPass, OnePoleLowPass};
use crate::error::Result;
use crate::impl_effect_common;

// ============================================================================
// Constants
// ============================================================================

/// Maximum overdrive gain
const MAX_OVERDRIVE_GAIN: f32 = 100.0;

/// Maximum fuzz gain
const MAX_FUZZ_GAIN: f32 = 200.0;

/// Maximum output level for both effects
const MAX_LEVEL: f32 = 2.0;

/// Clipping threshold range for fuzz
const MIN_THRESHOLD: f32 = 0.01;
const MAX_THRESHOLD: f32 = 1.0;

/// Negative excursions clip this much later than positive ones
const NEGATIVE_THRESHOLD_RATIO: f32 = 1.5;

/// High-pass pre-filter coefficient (~35 Hz at 44.1 kHz)
const FUZZ_HIGHPASS_ALPHA: f32 = 0.995;

// ============================================================================
// Waveshaping Functions
// ============================================================================

/// Soft clip: bounded to (-1, 1) and continuous everywhere
#[inline]
fn waveshape_soft(x: f32) -> f32 {
    x.tanh()
}

/// Asymmetric hard clip, normalised so the larger threshold maps to 1.0
#[inline]
fn waveshape_asymmetric(x: f32, threshold: f32) -> f32 {
    let negative = threshold * NEGATIVE_THRESHOLD_RATIO;
    let clipped = x.clamp(-negative, threshold);
    let max_threshold = threshold.max(negative);
    if max_threshold > 0.0 {
        clipped / max_threshold
    } else {
        clipped
    }
}

// ============================================================================
// Overdrive
// ============================================================================

/// Soft-clipping distortion with tone control
///
/// # Parameters
/// - `gain`: Input drive multiplier (0 to 100)
/// - `tone`: Tone filter brightness (0 = dark, 1 = bypass)
/// - `level`: Output level (0 to 2)
#[derive(Debug, Clone)]
pub struct Overdrive {
    enabled: bool,
    gain: f32,
    tone: f32,
    level: f32,
    tone_filter: OnePoleLowPass,
}

impl Overdrive {
    /// Create an overdrive with default settings (gain 5, tone 0.6, level 0.7)
    pub fn new() -> Self {
        Self::with_params(5.0, 0.6, 0.7)
    }

    /// Create an overdrive with the given settings (clamped)
    pub fn with_params(gain: f32, tone: f32, level: f32) -> Self {
        let mut od = Self {
            enabled: true,
            gain: 0.0,
            tone: 0.0,
            level: 0.0,
            tone_filter: OnePoleLowPass::new(),
        };
        od.set_gain(gain);
        od.set_tone(tone);
        od.set_level(level);
        od
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, MAX_OVERDRIVE_GAIN);
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone.clamp(0.0, 1.0);
    }

    pub fn tone(&self) -> f32 {
        self.tone
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, MAX_LEVEL);
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Overdrive {
    impl_effect_common!(EffectKind::Overdrive);

    fn process(&mut self, block: &mut [f32]) {
        if !self.enabled {
            return;
        }

        let gain = self.gain;
        let level = self.level;
        let coeff = tone_coefficient(self.tone);

        for sample in block.iter_mut() {
            let shaped = waveshape_soft(*sample * gain);
            *sample = self.tone_filter.process(shaped, coeff) * level;
        }
    }

    fn prepare(&mut self, _sample_rate: u32) {
        // Coefficients are sample-rate independent
    }

    fn reset(&mut self) {
        self.tone_filter.reset();
    }

    fn get_param(&self, name: &str) -> Option<f32> {
        match name {
            "gain" => Some(self.gain),
            "tone" => Some(self.tone),
            "level" => Some(self.level),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        match name {
            "gain" => self.set_gain(value),
            "tone" => self.set_tone(value),
            "level" => self.set_level(value),
            _ => return Err(self.kind().unknown_param(name)),
        }
        Ok(())
    }
}

// ============================================================================
// Fuzz
// ============================================================================

/// Hard-clipping fuzz with a sub-bass high-pass pre-filter
///
/// Signal path: high-pass (~35 Hz) -> gain -> asymmetric clip (positive at
/// `threshold`, negative at 1.5 x `threshold`) -> normalise -> tone -> level.
///
/// # Parameters
/// - `gain`: Pre-clip gain (0 to 200)
/// - `threshold`: Positive clipping threshold (0.01 to 1)
/// - `tone`: Tone filter brightness (0 = dark, 1 = bypass)
/// - `level`: Output level (0 to 2)
#[derive(Debug, Clone)]
pub struct Fuzz {
    enabled: bool,
    gain: f32,
    threshold: f32,
    tone: f32,
    level: f32,
    highpass: OnePoleHighPass,
    tone_filter: OnePoleLowPass,
}

impl Fuzz {
    /// Create a fuzz with default settings (gain 15, threshold 0.3, tone 0.5, level 0.6)
    pub fn new() -> Self {
        Self::with_params(15.0, 0.3, 0.5, 0.6)
    }

    /// Create a fuzz with the given settings (clamped)
    pub fn with_params(gain: f32, threshold: f32, tone: f32, level: f32) -> Self {
        let mut fuzz = Self {
            enabled: true,
            gain: 0.0,
            threshold: MIN_THRESHOLD,
            tone: 0.0,
            level: 0.0,
            highpass: OnePoleHighPass::new(FUZZ_HIGHPASS_ALPHA),
            tone_filter: OnePoleLowPass::new(),
        };
        fuzz.set_gain(gain);
        fuzz.set_threshold(threshold);
        fuzz.set_tone(tone);
        fuzz.set_level(level);
        fuzz
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, MAX_FUZZ_GAIN);
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone.clamp(0.0, 1.0);
    }

    pub fn tone(&self) -> f32 {
        self.tone
    }

    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, MAX_LEVEL);
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for Fuzz {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Fuzz {
    impl_effect_common!(EffectKind::Fuzz);

    fn process(&mut self, block: &mut [f32]) {
        if !self.enabled {
            return;
        }

        let gain = self.gain;
        let threshold = self.threshold;
        let level = self.level;
        let coeff = tone_coefficient(self.tone);

        for sample in block.iter_mut() {
            let filtered = self.highpass.process(*sample);
            let clipped = waveshape_asymmetric(filtered * gain, threshold);
            *sample = self.tone_filter.process(clipped, coeff) * level;
        }
    }

    fn prepare(&mut self, _sample_rate: u32) {
        // The pre-filter coefficient is fixed
    }

    fn reset(&mut self) {
        self.highpass.reset();
        self.tone_filter.reset();
    }

    fn get_param(&self, name: &str) -> Option<f32> {
        match name {
            "gain" => Some(self.gain),
            "threshold" => Some(self.threshold),
            "tone" => Some(self.tone),
            "level" => Some(self.level),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        match name {
            "gain" => self.set_gain(value),
            "threshold" => self.set_threshold(value),
            "tone" => self.set_tone(value),
            "level" => self.set_level(value),
            _ => return Err(self.kind().unknown_param(name)),
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(frequency: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / 44100.0;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    // ========================================================================
    // Waveshaping Function Tests
    // ========================================================================

    #[test]
    fn test_waveshape_soft_bounded() {
        assert!(waveshape_soft(100.0) <= 1.0);
        assert!(waveshape_soft(-100.0) >= -1.0);
        assert_eq!(waveshape_soft(0.0), 0.0);
    }

    #[test]
    fn test_waveshape_asymmetric_thresholds() {
        // Positive side clips at threshold, normalised by 1.5 * threshold
        assert_relative_eq!(waveshape_asymmetric(10.0, 0.3), 1.0 / 1.5, epsilon = 1e-6);
        // Negative side clips at -1.5 * threshold -> exactly -1.0
        assert_relative_eq!(waveshape_asymmetric(-10.0, 0.3), -1.0, epsilon = 1e-6);
        // Inside the linear region
        assert_relative_eq!(waveshape_asymmetric(0.15, 0.3), 1.0 / 3.0, epsilon = 1e-6);
    }

    // ========================================================================
    // Overdrive Tests
    // ========================================================================

    #[test]
    fn test_overdrive_defaults() {
        let od = Overdrive::new();
        assert_eq!(od.gain(), 5.0);
        assert_eq!(od.tone(), 0.6);
        assert_eq!(od.level(), 0.7);
        assert!(od.is_enabled());
        assert_eq!(od.effect_type(), "overdrive");
        assert_eq!(od.display_name(), "Overdrive");
    }

    #[test]
    fn test_overdrive_clamping() {
        let mut od = Overdrive::new();
        od.set_gain(-1.0);
        assert_eq!(od.gain(), 0.0);
        od.set_tone(1.5);
        assert_eq!(od.tone(), 1.0);
        od.set_level(10.0);
        assert_eq!(od.level(), MAX_LEVEL);
    }

    #[test]
    fn test_overdrive_output_bounded_by_level() {
        let mut od = Overdrive::with_params(50.0, 1.0, 0.7);
        let mut block = sine(220.0, 1.0, 2048);
        od.process(&mut block);
        for &s in &block {
            assert!(s.is_finite());
            assert!(s.abs() <= 0.7 + 1e-6);
        }
    }

    #[test]
    fn test_overdrive_bright_tone_matches_tanh() {
        let mut od = Overdrive::with_params(2.0, 1.0, 1.0);
        let mut block = vec![0.1, -0.3, 0.5];
        od.process(&mut block);
        assert_relative_eq!(block[0], (0.2f32).tanh(), epsilon = 1e-6);
        assert_relative_eq!(block[1], (-0.6f32).tanh(), epsilon = 1e-6);
        assert_relative_eq!(block[2], (1.0f32).tanh(), epsilon = 1e-6);
    }

    #[test]
    fn test_overdrive_filter_state_persists_across_blocks() {
        let input = sine(440.0, 0.5, 1024);

        let mut whole = Overdrive::new();
        let mut expected = input.clone();
        whole.process(&mut expected);

        let mut split = Overdrive::new();
        let mut first = input[..300].to_vec();
        let mut second = input[300..].to_vec();
        split.process(&mut first);
        split.process(&mut second);
        first.extend(second);

        assert_eq!(expected, first);
    }

    #[test]
    fn test_overdrive_disabled_is_passthrough() {
        let mut od = Overdrive::new();
        od.set_enabled(false);
        let original = sine(440.0, 0.5, 256);
        let mut block = original.clone();
        od.process(&mut block);
        assert_eq!(block, original);
    }

    #[test]
    fn test_overdrive_reset_clears_filter() {
        let mut od = Overdrive::with_params(5.0, 0.0, 1.0);
        let mut block = vec![1.0; 64];
        od.process(&mut block);
        od.reset();
        let mut silent = vec![0.0; 4];
        od.process(&mut silent);
        assert!(silent.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_overdrive_params() {
        let mut od = Overdrive::new();
        od.set_param("gain", 12.0).unwrap();
        od.set_param("tone", 0.9).unwrap();
        od.set_param("level", 0.4).unwrap();
        assert_eq!(od.get_param("gain"), Some(12.0));
        assert_eq!(od.get_param("tone"), Some(0.9));
        assert_eq!(od.get_param("level"), Some(0.4));
        assert!(od.set_param("drive", 1.0).is_err());
        assert_eq!(od.get_param("drive"), None);

        let params = od.get_params();
        assert_eq!(params["enabled"], true);
        assert!((params["gain"].as_f64().unwrap() - 12.0).abs() < 1e-6);
    }

    // ========================================================================
    // Fuzz Tests
    // ========================================================================

    #[test]
    fn test_fuzz_defaults() {
        let fuzz = Fuzz::new();
        assert_eq!(fuzz.gain(), 15.0);
        assert_eq!(fuzz.threshold(), 0.3);
        assert_eq!(fuzz.tone(), 0.5);
        assert_eq!(fuzz.level(), 0.6);
        assert_eq!(fuzz.kind(), EffectKind::Fuzz);
    }

    #[test]
    fn test_fuzz_threshold_clamped_positive() {
        let mut fuzz = Fuzz::new();
        fuzz.set_threshold(0.0);
        assert_eq!(fuzz.threshold(), MIN_THRESHOLD);
        fuzz.set_threshold(-3.0);
        assert_eq!(fuzz.threshold(), MIN_THRESHOLD);
    }

    #[test]
    fn test_fuzz_output_within_level() {
        let mut fuzz = Fuzz::with_params(30.0, 0.2, 1.0, 0.8);
        let mut block = sine(110.0, 0.9, 4096);
        fuzz.process(&mut block);
        for &s in &block {
            assert!(s.is_finite());
            assert!(s.abs() <= 0.8 + 1e-6);
        }
    }

    #[test]
    fn test_fuzz_is_asymmetric() {
        let mut fuzz = Fuzz::with_params(50.0, 0.3, 1.0, 1.0);
        let mut block = sine(220.0, 0.9, 8192);
        fuzz.process(&mut block);

        let steady = &block[4096..];
        let max = steady.iter().copied().fold(f32::MIN, f32::max);
        let min = steady.iter().copied().fold(f32::MAX, f32::min);
        // Positive peaks stop at 1/1.5 of the negative peaks
        assert_relative_eq!(max, 1.0 / 1.5, epsilon = 1e-3);
        assert_relative_eq!(min, -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_fuzz_highpass_blocks_dc() {
        let mut fuzz = Fuzz::with_params(15.0, 0.3, 1.0, 1.0);
        let mut block = vec![0.5; 20000];
        fuzz.process(&mut block);
        assert!(block[19999].abs() < 1e-3);
    }

    #[test]
    fn test_fuzz_state_persists_across_blocks() {
        let input = sine(196.0, 0.6, 2000);

        let mut whole = Fuzz::new();
        let mut expected = input.clone();
        whole.process(&mut expected);

        let mut split = Fuzz::new();
        let mut first = input[..777].to_vec();
        let mut second = input[777..].to_vec();
        split.process(&mut first);
        split.process(&mut second);
        first.extend(second);

        assert_eq!(expected, first);
    }

    #[test]
    fn test_fuzz_params() {
        let mut fuzz = Fuzz::new();
        fuzz.set_param("threshold", 0.4).unwrap();
        assert_eq!(fuzz.get_param("threshold"), Some(0.4));
        let err = fuzz.set_param("mix", 0.5).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_PARAMETER");
    }
}
