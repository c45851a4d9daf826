//! Fixed-capacity circular sample buffer
//!
//! The backing storage is allocated once in [`DelayLine::new`] and never
//! grows. Every read and write index is reduced modulo the capacity, so no
//! delay value can address memory outside the buffer.

/// Circular buffer used by the delay, chorus and reverb effects
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Sample storage, zero-initialised
    buffer: Vec<f32>,
    /// Position the next sample will be written to
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line holding `capacity` samples (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Number of samples the line can hold
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write position
    #[inline]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Read the sample written `delay` samples ago.
    ///
    /// A delay equal to the capacity (or zero) reads the slot under the
    /// write head, which still holds the oldest sample until it is
    /// overwritten.
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let offset = delay % len;
        self.buffer[(self.write_pos + len - offset) % len]
    }

    /// Read a fractional delay with linear interpolation.
    ///
    /// The floor and floor+1 taps are wrapped independently, so a delay
    /// larger than the capacity or a negative delay still stays in bounds.
    #[inline]
    pub fn read_interpolated(&self, delay: f64) -> f32 {
        let len = self.buffer.len() as i64;
        let read_pos = self.write_pos as f64 - delay;
        let floor = read_pos.floor();
        let frac = (read_pos - floor) as f32;
        let idx = floor as i64;

        let a = self.buffer[idx.rem_euclid(len) as usize];
        let b = self.buffer[(idx + 1).rem_euclid(len) as usize];
        a * (1.0 - frac) + b * frac
    }

    /// The sample under the write head (the oldest one stored)
    #[inline]
    pub fn oldest(&self) -> f32 {
        self.buffer[self.write_pos]
    }

    /// Overwrite the slot under the write head. Does not advance.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
    }

    /// Move the write head forward by one sample
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the contents and rewind the write head
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
