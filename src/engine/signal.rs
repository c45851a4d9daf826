//! Signal sources
//!
//! Anything that can fill blocks of samples for the engine: a generated
//! test tone or a buffer loaded from disk.

use std::f64::consts::TAU;

/// Produces consecutive blocks of samples in [-1, 1]
pub trait SignalSource: Send {
    /// Overwrite `block` with the next `block.len()` samples
    fn fill(&mut self, block: &mut [f32]);

    fn sample_rate(&self) -> u32;
}

/// Phase-continuous sine generator
///
/// Each sample is computed from its index since the last retune, so the
/// output does not depend on how a stream is split into blocks.
#[derive(Debug, Clone)]
pub struct SineSource {
    frequency: f64,
    sample_rate: u32,
    amplitude: f32,
    /// Phase at `position == 0`, in radians
    phase_offset: f64,
    /// Index of the next sample since the last frequency change
    position: u64,
}

impl SineSource {
    pub fn new(frequency: f64, sample_rate: u32, amplitude: f32) -> Self {
        Self {
            frequency,
            sample_rate: sample_rate.max(1),
            amplitude: amplitude.clamp(0.0, 1.0),
            phase_offset: 0.0,
            position: 0,
        }
    }

    /// Concert A at full scale
    pub fn a440(sample_rate: u32) -> Self {
        Self::new(440.0, sample_rate, 1.0)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Phase of the next sample, in radians within [0, 2*pi)
    pub fn phase(&self) -> f64 {
        (self.phase_offset + self.step() * self.position as f64).rem_euclid(TAU)
    }

    /// Change pitch without a phase jump
    pub fn set_frequency(&mut self, frequency: f64) {
        self.phase_offset = self.phase();
        self.position = 0;
        self.frequency = frequency;
    }

    fn step(&self) -> f64 {
        TAU * self.frequency / self.sample_rate as f64
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn reset(&mut self) {
        self.phase_offset = 0.0;
        self.position = 0;
    }
}

impl SignalSource for SineSource {
    fn fill(&mut self, block: &mut [f32]) {
        let step = self.step();
        for sample in block.iter_mut() {
            let phase = self.phase_offset + step * self.position as f64;
            *sample = (phase.sin() as f32) * self.amplitude;
            self.position += 1;
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Plays back a fixed buffer, then silence
#[derive(Debug, Clone)]
pub struct BufferSource {
    samples: Vec<f32>,
    sample_rate: u32,
    position: usize,
}

impl BufferSource {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            position: 0,
        }
    }

    /// Samples not yet played
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }
}

impl SignalSource for BufferSource {
    fn fill(&mut self, block: &mut [f32]) {
        let take = block.len().min(self.remaining());
        block[..take].copy_from_slice(&self.samples[self.position..self.position + take]);
        block[take..].fill(0.0);
        self.position += take;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
