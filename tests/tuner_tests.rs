//! Tuner Tests
//!
//! Pitch detection on generated and processed guitar-range signals.

use approx::assert_abs_diff_eq;
use test_case::test_case;

use riffbox::engine::{default_chain, SignalSource, SineSource};
use riffbox::tuner::{
    note_of, DetectorConfig, PitchDetector, PitchTracker, TuningAccuracy, TUNER_BLOCK_SIZE,
};

fn sine(frequency: f64, sample_rate: u32, len: usize) -> Vec<f32> {
    let mut source = SineSource::new(frequency, sample_rate, 0.8);
    let mut block = vec![0.0; len];
    source.fill(&mut block);
    block
}

#[test_case(440.0, 4410, 5.0 ; "a4 over 100 ms")]
#[test_case(82.41, 6615, 3.0 ; "low e over 150 ms")]
#[test_case(196.0, TUNER_BLOCK_SIZE, 3.0 ; "g3 over one tuner block")]
#[test_case(329.63, TUNER_BLOCK_SIZE, 3.0 ; "high e over one tuner block")]
fn test_detects_guitar_strings(frequency: f64, len: usize, tolerance: f64) {
    let mut detector = PitchDetector::default();
    let estimate = detector.detect(&sine(frequency, 44100, len));
    assert!(estimate.detected);
    assert_abs_diff_eq!(estimate.frequency, frequency, epsilon = tolerance);
}

#[test]
fn test_silence_is_not_pitched() {
    let mut detector = PitchDetector::default();
    let estimate = detector.detect(&vec![0.0; TUNER_BLOCK_SIZE]);
    assert!(!estimate.detected);
    assert_eq!(estimate.frequency, 0.0);
}

#[test]
fn test_other_sample_rate() {
    let config = DetectorConfig {
        sample_rate: 48000,
        ..DetectorConfig::default()
    };
    let mut detector = PitchDetector::new(config).unwrap();
    let estimate = detector.detect(&sine(110.0, 48000, TUNER_BLOCK_SIZE));
    assert!(estimate.detected);
    assert_abs_diff_eq!(estimate.frequency, 110.0, epsilon = 2.0);
}

#[test]
fn test_tracker_over_stream() {
    let mut source = SineSource::new(440.0, 44100, 0.8);
    let mut detector = PitchDetector::default();
    let mut tracker = PitchTracker::new();
    let mut block = vec![0.0; TUNER_BLOCK_SIZE];

    let mut reading = None;
    for _ in 0..6 {
        source.fill(&mut block);
        reading = Some(tracker.process(&mut detector, &block));
    }
    let reading = reading.unwrap();
    assert!(reading.detected);
    assert_eq!(reading.note.name(), "A4");
    assert_eq!(reading.note.accuracy(), TuningAccuracy::InTune);
    assert_eq!(tracker.len(), 5);

    let silent = tracker.process(&mut detector, &vec![0.0; TUNER_BLOCK_SIZE]);
    assert!(!silent.detected);
    assert_eq!(silent.note.to_string(), "--");
    assert!(tracker.is_empty());
}

#[test]
fn test_note_of_reference_points() {
    let a4 = note_of(440.0);
    assert_eq!(a4.name(), "A4");
    assert_abs_diff_eq!(a4.cents, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(a4.target_hz, 440.0, epsilon = 1e-9);

    assert!(note_of(442.0).cents > 0.0);
    assert!(note_of(438.0).cents < 0.0);
    assert_eq!(note_of(0.0).name(), "--");
    assert_eq!(note_of(-100.0).name(), "--");
}

#[test]
fn test_tuning_through_clean_chain() {
    // A chain with everything bypassed must not disturb the tuner
    let mut chain = default_chain(44100);
    for index in 0..chain.len() {
        chain.set_enabled(index, false).unwrap();
    }
    let mut block = sine(146.83, 44100, TUNER_BLOCK_SIZE);
    chain.process(&mut block);

    let mut detector = PitchDetector::default();
    let estimate = detector.detect(&block);
    assert_eq!(note_of(estimate.frequency).name(), "D3");
}
