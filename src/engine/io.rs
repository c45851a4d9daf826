//! Audio file I/O for Riffbox
//!
//! Offline rendering reads WAV files into a mono `f32` buffer (multi-channel
//! files are averaged down) and writes the processed result back out at
//! the source sample rate.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{Result, RiffboxError};

/// A mono signal loaded from or bound for a WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square level
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| s as f64 * s as f64).sum();
        (sum / self.samples.len() as f64).sqrt() as f32
    }
}

/// Output sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Int16,
    Int24,
    Float32,
}

impl BitDepth {
    /// Parse 16, 24 or 32 (float)
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            16 => Ok(BitDepth::Int16),
            24 => Ok(BitDepth::Int24),
            32 => Ok(BitDepth::Float32),
            _ => Err(RiffboxError::UnsupportedFormat {
                format: format!("{}-bit audio (only 16, 24, 32 supported)", bits),
            }),
        }
    }

    fn spec(&self, sample_rate: u32) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            BitDepth::Int16 => (16, SampleFormat::Int),
            BitDepth::Int24 => (24, SampleFormat::Int),
            BitDepth::Float32 => (32, SampleFormat::Float),
        };
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Read a WAV file and downmix it to mono
pub fn read_wav_mono(path: &Path) -> Result<MonoAudio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved = decode_interleaved(reader, spec.bits_per_sample, spec.sample_format)?;
    let samples = downmix(&interleaved, channels);

    log::debug!(
        "read {} ({} ch, {} Hz, {} frames)",
        path.display(),
        channels,
        spec.sample_rate,
        samples.len()
    );

    Ok(MonoAudio::new(samples, spec.sample_rate))
}

/// Write a mono buffer to a WAV file
pub fn write_wav_mono(path: &Path, audio: &MonoAudio, depth: BitDepth) -> Result<()> {
    let mut writer = WavWriter::create(path, depth.spec(audio.sample_rate))?;

    match depth {
        BitDepth::Int16 => {
            for &sample in &audio.samples {
                let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
                writer.write_sample(scaled)?;
            }
        }
        BitDepth::Int24 => {
            for &sample in &audio.samples {
                // hound carries 24-bit samples in an i32
                let scaled = (sample * 8388607.0).clamp(-8388608.0, 8388607.0) as i32;
                writer.write_sample(scaled)?;
            }
        }
        BitDepth::Float32 => {
            for &sample in &audio.samples {
                writer.write_sample(sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Decode every interleaved sample to f32 in [-1, 1)
fn decode_interleaved<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let samples: Vec<f32> = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        (SampleFormat::Int, bits) => {
            return Err(RiffboxError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            })
        }
    };
    Ok(samples)
}

/// Average interleaved frames down to one channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        assert_eq!(downmix(&[0.2, 0.4, 0.6], 2), vec![0.3]);
    }

    #[test]
    fn test_bit_depth_parse() {
        assert_eq!(BitDepth::from_bits(24).unwrap(), BitDepth::Int24);
        let err = BitDepth::from_bits(12).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_float_roundtrip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let audio = MonoAudio::new(vec![0.0, 0.25, -0.5, 0.999], 48000);

        write_wav_mono(&path, &audio, BitDepth::Float32).unwrap();
        let loaded = read_wav_mono(&path).unwrap();
        assert_eq!(loaded, audio);
    }

    #[test]
    fn test_int16_roundtrip_is_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("int16.wav");
        let audio = MonoAudio::new(vec![0.0, 0.5, -0.5, 0.9], 44100);

        write_wav_mono(&path, &audio, BitDepth::Int16).unwrap();
        let loaded = read_wav_mono(&path).unwrap();
        assert_eq!(loaded.sample_rate, 44100);
        for (a, b) in loaded.samples.iter().zip(&audio.samples) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_stereo_file_is_downmixed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [0.5f32, -0.5, 1.0, 0.0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = read_wav_mono(&path).unwrap();
        assert_eq!(loaded.samples, vec![0.0, 0.5]);
        assert_eq!(loaded.sample_rate, 22050);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = read_wav_mono(Path::new("/nonexistent/riffbox.wav")).unwrap_err();
        assert_eq!(err.error_code(), "WAV_ERROR");
    }

    #[test]
    fn test_levels() {
        let audio = MonoAudio::new(vec![0.5, -0.5, 0.5, -0.5], 4);
        assert_eq!(audio.peak(), 0.5);
        assert!((audio.rms() - 0.5).abs() < 1e-6);
        assert_eq!(audio.duration_secs(), 1.0);
    }
}
