//! Frequency to chromatic note mapping (A4 = 440 Hz, equal temperament)

use std::fmt;

use serde::Serialize;

/// Reference pitch for MIDI note 69
pub const A4_HZ: f64 = 440.0;

const A4_MIDI: i32 = 69;

/// Chromatic pitch classes starting at C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A named note, e.g. `A4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub pitch_class: &'static str,
    pub octave: i32,
}

impl Note {
    /// Note for a MIDI note number (60 = C4)
    pub fn from_midi(midi: i32) -> Self {
        Self {
            pitch_class: NOTE_NAMES[midi.rem_euclid(12) as usize],
            octave: midi.div_euclid(12) - 1,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

/// How close a reading is to its target note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TuningAccuracy {
    /// Within 5 cents
    InTune,
    /// Within 15 cents
    Close,
    Off,
}

impl TuningAccuracy {
    pub fn from_cents(cents: f64) -> Self {
        let cents = cents.abs();
        if cents < 5.0 {
            TuningAccuracy::InTune
        } else if cents < 15.0 {
            TuningAccuracy::Close
        } else {
            TuningAccuracy::Off
        }
    }
}

/// Nearest note to a frequency and the offset from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteReading {
    /// `None` when the frequency was not a valid pitch
    pub note: Option<Note>,
    /// Offset from `target_hz`; positive is sharp
    pub cents: f64,
    /// Equal-tempered frequency of `note`
    pub target_hz: f64,
}

impl NoteReading {
    /// The `--` reading
    pub const NONE: NoteReading = NoteReading {
        note: None,
        cents: 0.0,
        target_hz: 0.0,
    };

    /// Note name, or `--`
    pub fn name(&self) -> String {
        match self.note {
            Some(note) => note.to_string(),
            None => "--".to_string(),
        }
    }

    pub fn accuracy(&self) -> TuningAccuracy {
        TuningAccuracy::from_cents(self.cents)
    }

    /// Cents formatted as a signed whole number, e.g. `+3` or `-12`
    pub fn cents_label(&self) -> String {
        if self.cents >= 0.0 {
            format!("+{:.0}", self.cents)
        } else {
            format!("{:.0}", self.cents)
        }
    }
}

impl fmt::Display for NoteReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note {
            Some(note) => write!(f, "{} {} cents", note, self.cents_label()),
            None => f.write_str("--"),
        }
    }
}

/// Map a frequency to its nearest equal-tempered note
pub fn note_of(frequency: f64) -> NoteReading {
    if !(frequency > 0.0 && frequency.is_finite()) {
        return NoteReading::NONE;
    }

    let midi = (A4_MIDI as f64 + 12.0 * (frequency / A4_HZ).log2()).round() as i32;
    let target_hz = A4_HZ * 2f64.powf((midi - A4_MIDI) as f64 / 12.0);
    let cents = 1200.0 * (frequency / target_hz).log2();

    NoteReading {
        note: Some(Note::from_midi(midi)),
        cents,
        target_hz,
    }
}
