//! Presets
//!
//! A preset is a named snapshot of every effect's `enabled` flag and its
//! table parameters (see [`EffectKind::param_names`]). Applying a preset is
//! lenient: effects, keys or values it does not understand are skipped so
//! that presets saved by older or newer builds still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dsp::{EffectChain, EffectKind};

/// Per-effect parameter map: `enabled` is a bool, everything else a number
pub type EffectSettings = BTreeMap<String, Value>;

/// A named set of effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    /// Factory presets are built in and cannot be deleted
    #[serde(default)]
    pub factory: bool,
    /// Keyed by effect name (e.g. `"Delay"`)
    #[serde(default)]
    pub effects: BTreeMap<String, EffectSettings>,
}

impl Preset {
    /// Settings stored for one effect kind.
    ///
    /// Keys match the way [`EffectKind::from_name`] parses them: an exact
    /// key wins, otherwise the first case-insensitive match is used.
    pub fn settings(&self, kind: EffectKind) -> Option<&EffectSettings> {
        self.effects.get(kind.name()).or_else(|| {
            self.effects
                .iter()
                .find(|(key, _)| EffectKind::from_name(key) == Some(kind))
                .map(|(_, settings)| settings)
        })
    }
}

// ============================================================================
// Factory Presets
// ============================================================================

fn settings(enabled: bool, params: &[(&str, f64)]) -> EffectSettings {
    let mut map = BTreeMap::new();
    map.insert("enabled".to_string(), Value::Bool(enabled));
    for (name, value) in params {
        map.insert((*name).to_string(), json!(value));
    }
    map
}

fn factory(name: &str, effects: [(EffectKind, EffectSettings); 5]) -> Preset {
    Preset {
        name: name.to_string(),
        factory: true,
        effects: effects
            .into_iter()
            .map(|(kind, settings)| (kind.name().to_string(), settings))
            .collect(),
    }
}

/// The built-in presets: Rock, Metal and Hip-Hop
pub fn factory_presets() -> Vec<Preset> {
    use EffectKind::*;

    vec![
        factory(
            "Rock",
            [
                (Overdrive, settings(true, &[("gain", 8.0), ("tone", 0.6), ("level", 0.7)])),
                (Fuzz, settings(false, &[])),
                (Chorus, settings(false, &[])),
                (
                    Delay,
                    settings(true, &[("delay_ms", 320.0), ("feedback", 0.25), ("mix", 0.25)]),
                ),
                (
                    Reverb,
                    settings(true, &[("room_size", 0.55), ("damping", 0.4), ("mix", 0.3)]),
                ),
            ],
        ),
        factory(
            "Metal",
            [
                (Overdrive, settings(true, &[("gain", 16.0), ("tone", 0.45), ("level", 0.8)])),
                (
                    Fuzz,
                    settings(
                        true,
                        &[("gain", 22.0), ("threshold", 0.2), ("tone", 0.4), ("level", 0.7)],
                    ),
                ),
                (Chorus, settings(false, &[])),
                (Delay, settings(false, &[])),
                (
                    Reverb,
                    settings(true, &[("room_size", 0.35), ("damping", 0.7), ("mix", 0.15)]),
                ),
            ],
        ),
        factory(
            "Hip-Hop",
            [
                (Overdrive, settings(false, &[])),
                (Fuzz, settings(false, &[])),
                (Chorus, settings(true, &[("rate", 0.8), ("depth", 0.008), ("mix", 0.35)])),
                (
                    Delay,
                    settings(true, &[("delay_ms", 450.0), ("feedback", 0.45), ("mix", 0.4)]),
                ),
                (
                    Reverb,
                    settings(true, &[("room_size", 0.8), ("damping", 0.3), ("mix", 0.45)]),
                ),
            ],
        ),
    ]
}

/// Look up a factory preset by name (case-insensitive)
pub fn find_factory(name: &str) -> Option<Preset> {
    factory_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

// ============================================================================
// Snapshot / Apply
// ============================================================================

/// Capture the chain's current settings as a user preset
pub fn snapshot_chain(chain: &EffectChain, name: &str) -> Preset {
    let mut effects = BTreeMap::new();
    for effect in chain.iter() {
        let kind = effect.kind();
        let mut entry = EffectSettings::new();
        entry.insert("enabled".to_string(), Value::Bool(effect.is_enabled()));
        for param in kind.param_names() {
            if let Some(value) = effect.get_param(param) {
                entry.insert((*param).to_string(), json!(value));
            }
        }
        effects.insert(kind.name().to_string(), entry);
    }

    Preset {
        name: name.to_string(),
        factory: false,
        effects,
    }
}

/// Write a preset's settings onto the matching effects in the chain.
///
/// Returns the number of parameters (including `enabled` flags) applied.
pub fn apply_preset(chain: &mut EffectChain, preset: &Preset) -> usize {
    for name in preset.effects.keys() {
        if EffectKind::from_name(name).is_none() {
            log::debug!("preset '{}': ignoring unknown effect '{}'", preset.name, name);
        }
    }

    let mut applied = 0;
    for effect in chain.iter_mut() {
        let kind = effect.kind();
        let Some(data) = preset.settings(kind) else {
            continue;
        };

        for (key, value) in data {
            if key == "enabled" {
                match value.as_bool() {
                    Some(enabled) => {
                        effect.set_enabled(enabled);
                        applied += 1;
                    }
                    None => log::debug!(
                        "preset '{}': {}.enabled is not a bool: {}",
                        preset.name,
                        kind,
                        value
                    ),
                }
                continue;
            }

            let Some(param) = kind.param(key) else {
                log::debug!("preset '{}': ignoring unknown key {}.{}", preset.name, kind, key);
                continue;
            };
            match value.as_f64() {
                Some(number) => {
                    if effect.set_param(param, number as f32).is_ok() {
                        applied += 1;
                    }
                }
                None => log::debug!(
                    "preset '{}': {}.{} is not a number: {}",
                    preset.name,
                    kind,
                    key,
                    value
                ),
            }
        }
    }

    log::debug!("applied preset '{}' ({} values)", preset.name, applied);
    applied
}
