//! Chorus Effect
//!
//! A short delay line whose length is swept by a sine LFO. The modulated
//! read position falls between samples, so taps are linearly interpolated.

use std::f64::consts::TAU;

use crate::dsp::delay_line::DelayLine;
use crate::dsp::effect::{Effect, EffectKind};
use crate::error::Result;
use crate::impl_effect_common;

/// Fixed part of the delay, in seconds
const BASE_DELAY_SECONDS: f64 = 0.007;

/// Largest accepted modulation depth, in seconds
pub const MAX_DEPTH_SECONDS: f32 = 0.05;

/// LFO rate bounds in Hz
const MIN_RATE: f32 = 0.01;
const MAX_RATE: f32 = 20.0;

/// Modulated delay chorus
///
/// # Parameters
/// - `rate`: LFO frequency (0.01 to 20 Hz)
/// - `depth`: Modulation depth (0 to 0.05 s)
/// - `mix`: Wet/dry balance (0 = dry, 1 = wet only)
#[derive(Debug, Clone)]
pub struct Chorus {
    enabled: bool,
    rate: f32,
    depth: f32,
    mix: f32,
    sample_rate: u32,
    /// Base delay in whole samples
    base_delay: usize,
    /// LFO phase in radians, kept in [0, 2*pi) between blocks
    phase: f64,
    line: DelayLine,
}

impl Chorus {
    /// Create a chorus with default settings (1.5 Hz, 5 ms depth, mix 0.5)
    pub fn new(sample_rate: u32) -> Self {
        Self::with_params(1.5, 0.005, 0.5, sample_rate)
    }

    /// Create a chorus with the given settings (clamped)
    pub fn with_params(rate: f32, depth: f32, mix: f32, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        let (base_delay, line) = Self::allocate(sample_rate);
        let mut chorus = Self {
            enabled: true,
            rate: MIN_RATE,
            depth: 0.0,
            mix: 0.0,
            sample_rate,
            base_delay,
            phase: 0.0,
            line,
        };
        chorus.set_rate(rate);
        chorus.set_depth(depth);
        chorus.set_mix(mix);
        chorus
    }

    /// Size the buffer for the deepest sweep plus one second of headroom
    fn allocate(sample_rate: u32) -> (usize, DelayLine) {
        let sr = sample_rate as f64;
        let base = (BASE_DELAY_SECONDS * sr) as usize;
        let sweep = (MAX_DEPTH_SECONDS as f64 * sr) as usize;
        let capacity = base + sweep + 2 + sample_rate as usize;
        (base, DelayLine::new(capacity))
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, MAX_DEPTH_SECONDS);
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Current LFO phase in radians
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn base_delay(&self) -> usize {
        self.base_delay
    }

    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }
}

impl Effect for Chorus {
    impl_effect_common!(EffectKind::Chorus);

    fn process(&mut self, block: &mut [f32]) {
        if !self.enabled {
            return;
        }

        let sr = self.sample_rate as f64;
        let phase_inc = TAU * self.rate as f64 / sr;
        let depth_samples = self.depth as f64 * sr;
        let base = self.base_delay as f64;
        let mix = self.mix;
        let mut phase = self.phase;

        for sample in block.iter_mut() {
            let input = *sample;
            self.line.write(input);

            let delay = base + phase.sin() * depth_samples;
            let wet = self.line.read_interpolated(delay);

            *sample = input * (1.0 - mix) + wet * mix;

            self.line.advance();
            phase += phase_inc;
        }

        self.phase = phase.rem_euclid(TAU);
    }

    fn prepare(&mut self, sample_rate: u32) {
        let sample_rate = sample_rate.max(1);
        if sample_rate != self.sample_rate {
            log::debug!("chorus: reallocating buffer for {} Hz", sample_rate);
            let (base_delay, line) = Self::allocate(sample_rate);
            self.sample_rate = sample_rate;
            self.base_delay = base_delay;
            self.line = line;
            self.phase = 0.0;
        }
    }

    fn reset(&mut self) {
        self.line.clear();
        self.phase = 0.0;
    }

    fn get_param(&self, name: &str) -> Option<f32> {
        match name {
            "rate" => Some(self.rate),
            "depth" => Some(self.depth),
            "mix" => Some(self.mix),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        match name {
            "rate" => self.set_rate(value),
            "depth" => self.set_depth(value),
            "mix" => self.set_mix(value),
            _ => return Err(self.kind().unknown_param(name)),
        }
        Ok(())
    }
}
