//! CLI Module
//!
//! Command-line interface for offline rendering and inspection.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Riffbox - guitar effects chain and tuner
#[derive(Parser, Debug)]
#[command(name = "riffbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured sample rate (Hz)
    #[arg(long, global = true)]
    pub sample_rate: Option<u32>,

    /// Override the configured block size (samples)
    #[arg(long, global = true)]
    pub block_size: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a WAV file through the effect chain
    #[command(name = "render")]
    Render {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Factory preset to apply first
        #[arg(short, long)]
        preset: Option<String>,

        /// Output bit depth (16, 24 or 32)
        #[arg(short, long, default_value_t = 16)]
        bits: u16,
    },

    /// Run a generated sine through the chain and report its level
    #[command(name = "tone")]
    Tone {
        /// Tone frequency (Hz)
        #[arg(short, long, default_value_t = 440.0)]
        frequency: f64,

        /// Length of the render (seconds)
        #[arg(short, long, default_value_t = 2.0)]
        seconds: f64,

        /// Peak amplitude of the tone
        #[arg(short, long, default_value_t = 0.5)]
        amplitude: f32,

        /// Factory preset to apply first
        #[arg(short, long)]
        preset: Option<String>,

        /// Also write the result to a WAV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the tuner over a generated tone or a WAV file
    #[command(name = "tune")]
    Tune {
        /// Tone frequency (Hz); ignored with --input
        #[arg(short, long, default_value_t = 440.0)]
        frequency: f64,

        /// Number of tuner blocks to analyse
        #[arg(short, long, default_value_t = 8)]
        blocks: usize,

        /// Analyse a WAV file instead of a generated tone
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print factory presets as JSON
    #[command(name = "presets")]
    Presets {
        /// Only print the named preset
        name: Option<String>,
    },

    /// Print the default chain and its parameter ranges
    #[command(name = "params")]
    Params {
        /// Only print this effect (e.g. "delay")
        effect: Option<String>,
    },
}
