//! Effect Chain management
//!
//! Effects are processed in chain order (index 0 first). The startup order
//! follows [`EffectKind::ALL`]:
//! 1. Overdrive
//! 2. Fuzz
//! 3. Chorus
//! 4. Delay
//! 5. Reverb (time-based effects last)
//!
//! Reordering and toggling never touch an effect's internal state, so a
//! delay tail or LFO phase survives both.

use serde_json::{json, Value};

use super::{Effect, EffectKind};
use crate::error::{Result, RiffboxError};

/// Ordered chain of effects with a final hard clamp to [-1, 1]
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
    sample_rate: u32,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new(sample_rate: u32) -> Self {
        Self {
            effects: Vec::new(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Reconfigure every effect for a new sample rate
    pub fn prepare(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        for effect in &mut self.effects {
            effect.prepare(sample_rate);
        }
    }

    /// Clear the state of every effect
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Append an effect at the end of the chain
    pub fn push(&mut self, mut effect: Box<dyn Effect>) {
        effect.prepare(self.sample_rate);
        self.effects.push(effect);
    }

    /// Add an effect at its default position for its kind
    pub fn add(&mut self, mut effect: Box<dyn Effect>) {
        let position = self.recommended_position(effect.kind());
        effect.prepare(self.sample_rate);
        self.effects.insert(position, effect);
    }

    /// Insert an effect at `index` (at most `len`)
    pub fn insert(&mut self, index: usize, mut effect: Box<dyn Effect>) -> Result<()> {
        if index > self.effects.len() {
            return Err(self.out_of_range(index));
        }
        effect.prepare(self.sample_rate);
        self.effects.insert(index, effect);
        Ok(())
    }

    /// Remove and return the effect at `index`
    pub fn remove(&mut self, index: usize) -> Result<Box<dyn Effect>> {
        if index >= self.effects.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.effects.remove(index))
    }

    /// Get a reference to the effect at `index`
    pub fn get(&self, index: usize) -> Option<&dyn Effect> {
        self.effects.get(index).map(|e| e.as_ref())
    }

    /// Get a mutable reference to the effect at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Effect + 'static)> {
        self.effects.get_mut(index).map(|e| e.as_mut())
    }

    /// Index of the first effect of the given kind
    pub fn position_of(&self, kind: EffectKind) -> Option<usize> {
        self.effects.iter().position(|e| e.kind() == kind)
    }

    /// Swap the effects at `index` and `index + 1`
    pub fn swap(&mut self, index: usize) -> Result<()> {
        if index >= self.effects.len().saturating_sub(1) {
            return Err(self.out_of_range(index));
        }
        self.effects.swap(index, index + 1);
        Ok(())
    }

    /// Enable or disable the effect at `index`; state is left untouched
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let len = self.effects.len();
        let effect = self
            .effects
            .get_mut(index)
            .ok_or(RiffboxError::IndexOutOfRange { index, len })?;
        effect.set_enabled(enabled);
        Ok(())
    }

    /// Process the entire chain in place, then clamp to [-1, 1]
    pub fn process(&mut self, block: &mut [f32]) {
        for effect in &mut self.effects {
            if effect.is_enabled() {
                effect.process(block);
            }
        }
        for sample in block.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    /// Get the number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over effects
    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|e| e.as_ref())
    }

    /// Iterate mutably over effects
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Effect + 'static)> {
        self.effects.iter_mut().map(|e| e.as_mut())
    }

    /// Kinds in chain order
    pub fn order(&self) -> Vec<EffectKind> {
        self.effects.iter().map(|e| e.kind()).collect()
    }

    /// Dump chain order and parameters to JSON
    pub fn to_json(&self) -> Value {
        let effects: Vec<Value> = self
            .effects
            .iter()
            .map(|e| {
                json!({
                    "type": e.effect_type(),
                    "name": e.display_name(),
                    "params": e.get_params(),
                })
            })
            .collect();

        json!({
            "effects": effects,
            "sample_rate": self.sample_rate,
        })
    }

    /// First index whose kind sorts after `kind`
    fn recommended_position(&self, kind: EffectKind) -> usize {
        self.effects
            .iter()
            .position(|e| e.kind() > kind)
            .unwrap_or(self.effects.len())
    }

    fn out_of_range(&self, index: usize) -> RiffboxError {
        RiffboxError::IndexOutOfRange {
            index,
            len: self.effects.len(),
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("order", &self.order())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
