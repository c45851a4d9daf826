//! Control-thread to audio-thread handoff
//!
//! The audio thread owns the [`EffectChain`](crate::dsp::EffectChain).
//! Other threads never touch it directly: they send [`ControlMessage`]s
//! through a bounded channel, and the engine applies everything pending at
//! the start of the next block. A block therefore always runs with one
//! consistent set of parameters.

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};

use crate::dsp::{EffectChain, EffectKind};
use crate::error::{Result, RiffboxError};
use crate::presets::{apply_preset, Preset};

/// A single change to the chain, applied between blocks
#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Set a table parameter on the effect at `slot`
    SetParam {
        slot: usize,
        param: &'static str,
        value: f32,
    },
    /// Enable or bypass the effect at `slot`
    SetEnabled { slot: usize, enabled: bool },
    /// Swap the effects at `index` and `index + 1`
    Swap { index: usize },
    /// Apply a whole preset
    ApplyPreset(Box<Preset>),
}

impl ControlMessage {
    /// Apply this message to the chain.
    ///
    /// Requests that no longer make sense (a slot that moved or vanished)
    /// are dropped with a debug log; the audio thread never fails.
    pub fn apply(self, chain: &mut EffectChain) {
        let outcome = match self {
            ControlMessage::SetParam { slot, param, value } => match chain.get_mut(slot) {
                Some(effect) => effect.set_param(param, value),
                None => Err(RiffboxError::IndexOutOfRange {
                    index: slot,
                    len: chain.len(),
                }),
            },
            ControlMessage::SetEnabled { slot, enabled } => chain.set_enabled(slot, enabled),
            ControlMessage::Swap { index } => chain.swap(index),
            ControlMessage::ApplyPreset(preset) => {
                apply_preset(chain, &preset);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            log::debug!("dropped control message: {}", e);
        }
    }
}

/// Resolve a parameter name against every effect's table
fn resolve_param(name: &str) -> Option<&'static str> {
    EffectKind::ALL.iter().find_map(|kind| kind.param(name))
}

/// Sending half of the control queue
///
/// Cheap to clone; every clone feeds the same engine.
#[derive(Debug, Clone)]
pub struct ChainController {
    sender: Sender<ControlMessage>,
}

impl ChainController {
    /// Create a controller and the receiver the engine drains
    pub fn channel(capacity: usize) -> (Self, Receiver<ControlMessage>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queue a parameter change.
    ///
    /// The name must appear in some effect's parameter table; whether the
    /// effect at `slot` accepts it is checked when the message is applied.
    pub fn set_param(&self, slot: usize, param: &str, value: f32) -> Result<()> {
        let param = resolve_param(param).ok_or_else(|| RiffboxError::UnknownParameter {
            effect: "any effect",
            param: param.to_string(),
        })?;
        self.send(ControlMessage::SetParam { slot, param, value })
    }

    /// Queue a parameter change checked against a specific effect kind
    pub fn set_param_for(
        &self,
        slot: usize,
        kind: EffectKind,
        param: &str,
        value: f32,
    ) -> Result<()> {
        let param = kind.param(param).ok_or_else(|| kind.unknown_param(param))?;
        self.send(ControlMessage::SetParam { slot, param, value })
    }

    pub fn set_enabled(&self, slot: usize, enabled: bool) -> Result<()> {
        self.send(ControlMessage::SetEnabled { slot, enabled })
    }

    pub fn swap(&self, index: usize) -> Result<()> {
        self.send(ControlMessage::Swap { index })
    }

    pub fn apply_preset(&self, preset: Preset) -> Result<()> {
        self.send(ControlMessage::ApplyPreset(Box::new(preset)))
    }

    /// Messages waiting for the next block
    pub fn pending(&self) -> usize {
        self.sender.len()
    }

    /// Queue a raw message
    pub fn send(&self, message: ControlMessage) -> Result<()> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => RiffboxError::ControlQueueFull,
            TrySendError::Disconnected(_) => RiffboxError::EngineDisconnected,
        })
    }
}
