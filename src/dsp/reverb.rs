//! Reverb effect implementation
//!
//! Implements the Schroeder topology:
//! - 4 parallel damped comb filters for the decay tail
//! - 2 series allpass filters for diffusion

use super::delay_line::DelayLine;
use super::effect::{Effect, EffectKind};
use crate::error::Result;
use crate::impl_effect_common;

// ============================================================================
// Schroeder Constants
// ============================================================================

/// Comb filter lengths before room scaling
const COMB_DELAYS: [usize; 4] = [1116, 1188, 1277, 1356];

/// Allpass filter lengths (fixed)
const ALLPASS_DELAYS: [usize; 2] = [225, 556];

/// Comb feedback gain
const COMB_FEEDBACK: f32 = 0.84;

/// Allpass gain
const ALLPASS_GAIN: f32 = 0.5;

/// Room size bounds
const MIN_ROOM_SIZE: f32 = 0.05;
const MAX_ROOM_SIZE: f32 = 2.0;

// ============================================================================
// Filter Components
// ============================================================================

/// Feedback comb filter with a one-pole low-pass in the loop
#[derive(Debug, Clone)]
struct CombFilter {
    line: DelayLine,
    /// Damping low-pass state
    filter_state: f32,
    damping: f32,
}

impl CombFilter {
    fn new(length: usize, damping: f32) -> Self {
        Self {
            line: DelayLine::new(length),
            filter_state: 0.0,
            damping,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.line.oldest();
        self.filter_state = output * (1.0 - self.damping) + self.filter_state * self.damping;
        self.line.write(input + self.filter_state * COMB_FEEDBACK);
        self.line.advance();
        output
    }

    fn len(&self) -> usize {
        self.line.capacity()
    }

    fn clear(&mut self) {
        self.line.clear();
        self.filter_state = 0.0;
    }
}

/// Schroeder allpass diffuser
#[derive(Debug, Clone)]
struct AllpassFilter {
    line: DelayLine,
}

impl AllpassFilter {
    fn new(length: usize) -> Self {
        Self {
            line: DelayLine::new(length),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.oldest();
        let output = -input * ALLPASS_GAIN + delayed;
        self.line.write(input + delayed * ALLPASS_GAIN);
        self.line.advance();
        output
    }

    fn clear(&mut self) {
        self.line.clear();
    }
}

// ============================================================================
// Reverb Effect
// ============================================================================

/// Schroeder reverb
///
/// # Parameters
/// - `room_size`: Scales the comb lengths (0.05 to 2)
/// - `damping`: High-frequency loss in the tail (0 = bright, 1 = dark)
/// - `mix`: Wet/dry balance (0 = dry, 1 = wet only)
#[derive(Debug, Clone)]
pub struct Reverb {
    enabled: bool,
    room_size: f32,
    damping: f32,
    mix: f32,
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
}

impl Reverb {
    /// Create a reverb with default settings (room 0.7, damping 0.5, mix 0.3)
    pub fn new() -> Self {
        Self::with_params(0.7, 0.5, 0.3)
    }

    /// Create a reverb with the given settings (clamped)
    pub fn with_params(room_size: f32, damping: f32, mix: f32) -> Self {
        let room_size = room_size.clamp(MIN_ROOM_SIZE, MAX_ROOM_SIZE);
        let damping = damping.clamp(0.0, 1.0);
        Self {
            enabled: true,
            room_size,
            damping,
            mix: mix.clamp(0.0, 1.0),
            combs: Self::build_combs(room_size, damping),
            allpasses: ALLPASS_DELAYS.map(AllpassFilter::new),
        }
    }

    fn comb_length(base: usize, room_size: f32) -> usize {
        ((base as f32 * room_size).round() as usize).max(1)
    }

    fn build_combs(room_size: f32, damping: f32) -> [CombFilter; 4] {
        COMB_DELAYS.map(|base| CombFilter::new(Self::comb_length(base, room_size), damping))
    }

    /// Change the room size.
    ///
    /// Reallocates and clears the comb buffers; call between blocks only.
    pub fn set_room_size(&mut self, room_size: f32) {
        let room_size = room_size.clamp(MIN_ROOM_SIZE, MAX_ROOM_SIZE);
        if room_size == self.room_size {
            return;
        }
        self.room_size = room_size;
        self.combs = Self::build_combs(room_size, self.damping);
        log::debug!(
            "reverb: comb lengths now {:?}",
            self.combs.iter().map(CombFilter::len).collect::<Vec<_>>()
        );
    }

    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Change damping in place; the tail already in the combs is kept
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        for comb in &mut self.combs {
            comb.damping = self.damping;
        }
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Current comb buffer lengths
    pub fn comb_lengths(&self) -> [usize; 4] {
        [
            self.combs[0].len(),
            self.combs[1].len(),
            self.combs[2].len(),
            self.combs[3].len(),
        ]
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Reverb {
    impl_effect_common!(EffectKind::Reverb);

    fn process(&mut self, block: &mut [f32]) {
        if !self.enabled {
            return;
        }

        let mix = self.mix;
        let comb_scale = 1.0 / self.combs.len() as f32;

        for sample in block.iter_mut() {
            let input = *sample;

            let comb_sum: f32 = self.combs.iter_mut().map(|c| c.process(input)).sum();
            let mut wet = comb_sum * comb_scale;
            for allpass in &mut self.allpasses {
                wet = allpass.process(wet);
            }

            *sample = input * (1.0 - mix) + wet * mix;
        }
    }

    fn prepare(&mut self, _sample_rate: u32) {
        // Tap lengths are in samples and do not scale with the rate
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }

    fn get_param(&self, name: &str) -> Option<f32> {
        match name {
            "room_size" => Some(self.room_size),
            "damping" => Some(self.damping),
            "mix" => Some(self.mix),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        match name {
            "room_size" => self.set_room_size(value),
            "damping" => self.set_damping(value),
            "mix" => self.set_mix(value),
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

    fn impulse(len: usize) -> Vec<f32> {
        let mut block = vec![0.0; len];
        block[0] = 1.0;
        block
    }

    #[test]
    fn test_reverb_defaults() {
        let reverb = Reverb::new();
        assert_eq!(reverb.room_size(), 0.7);
        assert_eq!(reverb.damping(), 0.5);
        assert_eq!(reverb.mix(), 0.3);
        assert_eq!(reverb.comb_lengths(), [781, 832, 894, 949]);
    }

    #[test]
    fn test_reverb_room_size_reallocates() {
        let mut reverb = Reverb::new();
        reverb.set_room_size(1.0);
        assert_eq!(reverb.comb_lengths(), COMB_DELAYS);
        reverb.set_room_size(0.0);
        assert_eq!(reverb.room_size(), MIN_ROOM_SIZE);
        assert!(reverb.comb_lengths().iter().all(|&len| len >= 1));
    }

    #[test]
    fn test_reverb_impulse_has_tail() {
        let mut reverb = Reverb::with_params(0.7, 0.5, 1.0);
        let mut block = impulse(8192);
        reverb.process(&mut block);

        let tail_energy: f32 = block[100..].iter().map(|s| s * s).sum();
        assert!(tail_energy > 0.01, "tail energy {}", tail_energy);
        assert!(block.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_reverb_tail_decays() {
        let mut reverb = Reverb::with_params(0.7, 0.5, 1.0);
        let mut block = impulse(44100 * 4);
        reverb.process(&mut block);

        let early: f32 = block[1000..5000].iter().map(|s| s.abs()).sum();
        let late: f32 = block[170000..174000].iter().map(|s| s.abs()).sum();
        assert!(late < early * 0.01);
    }

    #[test]
    fn test_reverb_dry_mix_is_identity() {
        let mut reverb = Reverb::with_params(1.2, 0.3, 0.0);
        let input: Vec<f32> = (0..4096).map(|i| ((i * 31) % 17) as f32 / 17.0 - 0.5).collect();
        let mut block = input.clone();
        reverb.process(&mut block);
        for (a, b) in block.iter().zip(&input) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_reverb_damping_keeps_tail() {
        let mut reverb = Reverb::with_params(0.7, 0.2, 1.0);
        let mut block = impulse(2000);
        reverb.process(&mut block);

        reverb.set_damping(0.9);
        let mut silence = vec![0.0; 2000];
        reverb.process(&mut silence);
        assert!(silence.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_reverb_reset_silences_tail() {
        let mut reverb = Reverb::with_params(0.7, 0.5, 1.0);
        let mut block = impulse(2000);
        reverb.process(&mut block);

        reverb.reset();
        let mut silence = vec![0.0; 2000];
        reverb.process(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_reverb_params() {
        let mut reverb = Reverb::new();
        reverb.set_param("mix", 0.6).unwrap();
        assert_eq!(reverb.get_param("mix"), Some(0.6));
        assert!(reverb.set_param("width", 1.0).is_err());
    }
}
