//! Reading smoother for a tuner display
//!
//! Averages the last few voiced estimates so the displayed note does not
//! jitter between blocks. Any unvoiced block clears the history.

use serde::Serialize;

use super::detector::{PitchDetector, PitchEstimate};
use super::note::{note_of, NoteReading};

/// Number of voiced estimates averaged
pub const HISTORY_SIZE: usize = 5;

/// Smoothed tuner output for one block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchReading {
    /// Smoothed frequency in Hz, 0.0 when nothing was detected
    pub frequency: f64,
    pub detected: bool,
    pub note: NoteReading,
}

impl PitchReading {
    /// Reading shown while there is no pitch
    pub fn silent() -> Self {
        Self {
            frequency: 0.0,
            detected: false,
            note: NoteReading::NONE,
        }
    }
}

/// Rolling mean over the last [`HISTORY_SIZE`] detected frequencies
#[derive(Debug, Clone, Default)]
pub struct PitchTracker {
    history: [f64; HISTORY_SIZE],
    /// Next slot to overwrite
    next: usize,
    /// Number of valid entries (at most `HISTORY_SIZE`)
    len: usize,
}

impl PitchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one block's estimate into the history
    pub fn update(&mut self, estimate: PitchEstimate) -> PitchReading {
        if !estimate.detected || estimate.frequency <= 0.0 {
            self.clear();
            return PitchReading::silent();
        }

        self.history[self.next] = estimate.frequency;
        self.next = (self.next + 1) % HISTORY_SIZE;
        self.len = (self.len + 1).min(HISTORY_SIZE);

        let frequency = self.history[..self.len].iter().sum::<f64>() / self.len as f64;
        PitchReading {
            frequency,
            detected: true,
            note: note_of(frequency),
        }
    }

    /// Detect and smooth in one step
    pub fn process(&mut self, detector: &mut PitchDetector, block: &[f32]) -> PitchReading {
        let estimate = detector.detect(block);
        self.update(estimate)
    }

    /// Number of readings currently averaged
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.next = 0;
        self.len = 0;
    }
}
