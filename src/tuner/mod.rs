//! Chromatic tuner
//!
//! Autocorrelation pitch detection, frequency to note mapping, and the
//! rolling-mean smoothing a tuner display applies between blocks.

mod detector;
mod note;
mod tracker;

pub use detector::{DetectorConfig, PitchDetector, PitchEstimate};
pub use note::{note_of, Note, NoteReading, TuningAccuracy, A4_HZ, NOTE_NAMES};
pub use tracker::{PitchReading, PitchTracker, HISTORY_SIZE};

/// Samples analysed per tuner reading
pub const TUNER_BLOCK_SIZE: usize = 4096;
