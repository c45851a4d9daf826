//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use crate::dsp::EffectKind;
use crate::engine::{
    read_wav_mono, write_wav_mono, AudioEngine, BitDepth, BufferSource, EngineConfig, MonoAudio,
    SignalSource, SineSource,
};
use crate::presets::{factory_presets, find_factory, snapshot_chain, Preset};
use crate::tuner::{PitchDetector, PitchReading, PitchTracker, TUNER_BLOCK_SIZE};

/// Load the engine config (or defaults) and apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    sample_rate: Option<u32>,
    block_size: Option<usize>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(rate) = sample_rate {
        config = config.with_sample_rate(rate);
    }
    if let Some(size) = block_size {
        config.block_size = size;
    }
    config.validate()?;
    Ok(config)
}

fn lookup_preset(name: &str) -> Result<Preset> {
    find_factory(name).ok_or_else(|| {
        let known: Vec<String> = factory_presets().into_iter().map(|p| p.name).collect();
        anyhow!("unknown preset '{}' (available: {})", name, known.join(", "))
    })
}

/// Build an engine for `config`, with an optional factory preset queued.
fn build_engine(config: &EngineConfig, preset: Option<&str>) -> Result<AudioEngine> {
    let (engine, controller) = AudioEngine::from_config(config);
    if let Some(name) = preset {
        let preset = lookup_preset(name)?;
        info!("Applying preset: {}", preset.name);
        controller.apply_preset(preset)?;
    }
    Ok(engine)
}

/// Render a WAV file through the chain.
pub fn render(
    config: &EngineConfig,
    input: &Path,
    output: &Path,
    preset: Option<&str>,
    bits: u16,
) -> Result<()> {
    let depth = BitDepth::from_bits(bits)?;
    let audio = read_wav_mono(input).with_context(|| format!("failed to read {}", input.display()))?;

    if audio.sample_rate != config.sample_rate {
        info!(
            "Input is {} Hz; running the chain at that rate",
            audio.sample_rate
        );
    }
    let config = config.clone().with_sample_rate(audio.sample_rate);
    let mut engine = build_engine(&config, preset)?;

    let mut samples = audio.samples;
    engine.process_buffer(&mut samples);
    let rendered = MonoAudio::new(samples, audio.sample_rate);

    write_wav_mono(output, &rendered, depth)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Rendered {} ({:.2}s) -> {}",
        input.display(),
        rendered.duration_secs(),
        output.display()
    );
    println!("Peak: {:.4}  RMS: {:.4}", rendered.peak(), rendered.rms());
    Ok(())
}

/// Render a sine tone through the chain and report its level.
pub fn tone(
    config: &EngineConfig,
    frequency: f64,
    seconds: f64,
    amplitude: f32,
    preset: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    if !(seconds > 0.0 && seconds.is_finite()) {
        return Err(anyhow!("seconds must be positive, got {}", seconds));
    }

    let mut engine = build_engine(config, preset)?;
    let mut source = SineSource::new(frequency, config.sample_rate, amplitude);
    let num_samples = (seconds * config.sample_rate as f64).round() as usize;

    let rendered = MonoAudio::new(engine.render(&mut source, num_samples), config.sample_rate);

    println!(
        "{:.2} Hz sine, {:.2}s at {} Hz through {} effects",
        frequency,
        rendered.duration_secs(),
        config.sample_rate,
        engine.chain().len()
    );
    println!("Peak: {:.4}  RMS: {:.4}", rendered.peak(), rendered.rms());

    if let Some(path) = output {
        write_wav_mono(path, &rendered, BitDepth::default())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Run the tuner over consecutive blocks and print each reading.
pub fn tune(config: &EngineConfig, frequency: f64, blocks: usize, input: Option<&Path>) -> Result<()> {
    let mut source: Box<dyn SignalSource> = match input {
        Some(path) => {
            let audio =
                read_wav_mono(path).with_context(|| format!("failed to read {}", path.display()))?;
            Box::new(BufferSource::new(audio.samples, audio.sample_rate))
        }
        None => Box::new(SineSource::new(frequency, config.sample_rate, 0.8)),
    };

    let mut detector_config = config.detector.clone();
    detector_config.sample_rate = source.sample_rate();
    let mut detector = PitchDetector::new(detector_config)?;
    let mut tracker = PitchTracker::new();

    let mut block = vec![0.0f32; TUNER_BLOCK_SIZE];
    let mut last = PitchReading::silent();
    for index in 0..blocks {
        source.fill(&mut block);
        last = tracker.process(&mut detector, &block);
        if last.detected {
            println!(
                "block {:>3}: {:>8.2} Hz  {}  ({:?})",
                index,
                last.frequency,
                last.note,
                last.note.accuracy()
            );
        } else {
            println!("block {:>3}: no pitch", index);
        }
    }

    if !last.detected {
        warn!("No pitch detected in the final block");
    }
    Ok(())
}

/// Print factory presets as JSON.
pub fn presets(name: Option<&str>) -> Result<()> {
    let json = match name {
        Some(name) => serde_json::to_string_pretty(&lookup_preset(name)?)?,
        None => serde_json::to_string_pretty(&factory_presets())?,
    };
    println!("{}", json);
    Ok(())
}

/// Print the default chain, its current settings and each slider range.
///
/// With `filter`, only that effect is listed.
pub fn params(config: &EngineConfig, filter: Option<&str>) -> Result<()> {
    let only = filter.map(str::parse::<EffectKind>).transpose()?;
    let (engine, _controller) = AudioEngine::from_config(config);
    let chain = engine.chain();

    for (slot, effect) in chain.iter().enumerate() {
        if only.is_some_and(|kind| kind != effect.kind()) {
            continue;
        }
        let state = if effect.is_enabled() { "on" } else { "off" };
        println!("[{}] {} ({})", slot, effect.display_name(), state);
        for spec in effect.kind().param_specs() {
            let value = effect.get_param(spec.name).unwrap_or(spec.min);
            println!(
                "    {:<10} {:>8}   range {} .. {}",
                spec.name,
                spec.format(value),
                spec.format(spec.min),
                spec.format(spec.max)
            );
        }
    }

    if only.is_none() {
        let snapshot = snapshot_chain(chain, "Current");
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
