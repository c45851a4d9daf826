//! Riffbox - Guitar Effects and Tuner Engine
//!
//! Riffbox processes blocks of guitar signal through a reorderable chain of
//! stateful effects and estimates the pitch being played.
//!
//! # Architecture
//!
//! - `dsp`: the five effects (Overdrive, Fuzz, Chorus, Delay, Reverb), their
//!   shared delay-line and filter building blocks, and the `EffectChain`
//! - `tuner`: autocorrelation pitch detection, note mapping and smoothing
//! - `presets`: named parameter snapshots for the whole chain
//! - `engine`: the audio-thread owner of the chain, the control queue that
//!   feeds it, signal sources and WAV I/O

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod presets;
pub mod tuner;

pub use error::{Result, RiffboxError};

/// Sample rate used when none is configured (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
