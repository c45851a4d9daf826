//! Audio Engine Module
//!
//! Wires the effect chain to its inputs and outputs:
//! - Block-at-a-time processing with control messages applied between blocks
//! - Engine configuration
//! - Signal sources and WAV file I/O

pub mod config;
pub mod control;
pub mod io;
pub mod signal;

pub use config::{EngineConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CONTROL_CAPACITY};
pub use control::{ChainController, ControlMessage};
pub use io::{read_wav_mono, write_wav_mono, BitDepth, MonoAudio};
pub use signal::{BufferSource, SignalSource, SineSource};

use crossbeam::channel::Receiver;

use crate::dsp::{create_effect, EffectChain, EffectKind};

/// The five effects in startup order, all enabled with default settings
pub fn default_chain(sample_rate: u32) -> EffectChain {
    let mut chain = EffectChain::new(sample_rate);
    for kind in EffectKind::ALL {
        chain.push(create_effect(kind, sample_rate));
    }
    chain
}

/// Owns the chain on the audio thread and applies queued control messages
pub struct AudioEngine {
    chain: EffectChain,
    receiver: Receiver<ControlMessage>,
    block_size: usize,
}

impl AudioEngine {
    /// Wrap a chain; the returned controller feeds it from other threads
    pub fn new(chain: EffectChain, block_size: usize, control_capacity: usize) -> (Self, ChainController) {
        let (controller, receiver) = ChainController::channel(control_capacity);
        let engine = Self {
            chain,
            receiver,
            block_size: block_size.max(1),
        };
        (engine, controller)
    }

    /// Build the default chain from a configuration
    pub fn from_config(config: &EngineConfig) -> (Self, ChainController) {
        log::debug!(
            "engine: {} Hz, {}-sample blocks, queue of {}",
            config.sample_rate,
            config.block_size,
            config.control_capacity
        );
        Self::new(
            default_chain(config.sample_rate),
            config.block_size,
            config.control_capacity,
        )
    }

    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    /// Direct access for single-threaded setup; not for use while a
    /// controller is active on another thread
    pub fn chain_mut(&mut self) -> &mut EffectChain {
        &mut self.chain
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.chain.sample_rate()
    }

    /// Apply every queued control message; returns how many were applied
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.receiver.try_recv() {
            message.apply(&mut self.chain);
            applied += 1;
        }
        applied
    }

    /// Apply pending control messages, then run the chain over one block
    pub fn process_block(&mut self, block: &mut [f32]) {
        self.apply_pending();
        self.chain.process(block);
    }

    /// Process a whole buffer in `block_size` pieces
    pub fn process_buffer(&mut self, samples: &mut [f32]) {
        for block in samples.chunks_mut(self.block_size) {
            self.process_block(block);
        }
    }

    /// Pull `num_samples` from a source through the chain
    pub fn render(&mut self, source: &mut dyn SignalSource, num_samples: usize) -> Vec<f32> {
        let mut output = vec![0.0; num_samples];
        for block in output.chunks_mut(self.block_size) {
            source.fill(block);
            self.process_block(block);
        }
        output
    }
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("chain", &self.chain)
            .field("block_size", &self.block_size)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
