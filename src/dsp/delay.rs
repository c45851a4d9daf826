//! Delay Effect
//!
//! Mono echo with feedback over a circular buffer two seconds long.

use crate::dsp::delay_line::DelayLine;
use crate::dsp::effect::{Effect, EffectKind};
use crate::error::Result;
use crate::impl_effect_common;

/// Longest delay the buffer holds, in milliseconds
pub const MAX_DELAY_MS: f32 = 2000.0;

/// Feedback ceiling; 1.0 would never decay
const MAX_FEEDBACK: f32 = 0.99;

/// Echo effect with feedback
///
/// # Parameters
/// - `delay_ms`: Delay time (0 to 2000 ms)
/// - `feedback`: Amount of the delayed signal fed back (0 to 0.99)
/// - `mix`: Wet/dry balance (0 = dry, 1 = wet only)
#[derive(Debug, Clone)]
pub struct Delay {
    enabled: bool,
    delay_ms: f32,
    feedback: f32,
    mix: f32,
    sample_rate: u32,
    line: DelayLine,
}

impl Delay {
    /// Create a delay with default settings (350 ms, feedback 0.4, mix 0.5)
    pub fn new(sample_rate: u32) -> Self {
        Self::with_params(350.0, 0.4, 0.5, sample_rate)
    }

    /// Create a delay with the given settings (clamped)
    pub fn with_params(delay_ms: f32, feedback: f32, mix: f32, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        let mut delay = Self {
            enabled: true,
            delay_ms: 0.0,
            feedback: 0.0,
            mix: 0.0,
            sample_rate,
            line: DelayLine::new(Self::capacity_for(sample_rate)),
        };
        delay.set_delay_ms(delay_ms);
        delay.set_feedback(feedback);
        delay.set_mix(mix);
        delay
    }

    fn capacity_for(sample_rate: u32) -> usize {
        (MAX_DELAY_MS / 1000.0 * sample_rate as f32) as usize
    }

    pub fn set_delay_ms(&mut self, ms: f32) {
        self.delay_ms = ms.clamp(0.0, MAX_DELAY_MS);
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Buffer length in samples
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Current delay in whole samples
    fn delay_samples(&self) -> usize {
        (self.delay_ms / 1000.0 * self.sample_rate as f32) as usize
    }
}

impl Effect for Delay {
    impl_effect_common!(EffectKind::Delay);

    fn process(&mut self, block: &mut [f32]) {
        if !self.enabled {
            return;
        }

        // Parameters are sampled once so a block never mixes two settings
        let delay_samples = self.delay_samples();
        let feedback = self.feedback;
        let mix = self.mix;

        for sample in block.iter_mut() {
            let input = *sample;
            let delayed = self.line.read(delay_samples);

            *sample = input * (1.0 - mix) + delayed * mix;

            self.line.write(input + delayed * feedback);
            self.line.advance();
        }
    }

    fn prepare(&mut self, sample_rate: u32) {
        let sample_rate = sample_rate.max(1);
        if sample_rate != self.sample_rate {
            log::debug!("delay: reallocating buffer for {} Hz", sample_rate);
            self.sample_rate = sample_rate;
            self.line = DelayLine::new(Self::capacity_for(sample_rate));
        }
    }

    fn reset(&mut self) {
        self.line.clear();
    }

    fn get_param(&self, name: &str) -> Option<f32> {
        match name {
            "delay_ms" => Some(self.delay_ms),
            "feedback" => Some(self.feedback),
            "mix" => Some(self.mix),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        match name {
            "delay_ms" => self.set_delay_ms(value),
            "feedback" => self.set_feedback(value),
            "mix" => self.set_mix(value),
            _ => return Err(self.kind().unknown_param(name)),
        }
        Ok(())
    }
}
