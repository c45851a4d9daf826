//! Effect trait definition
//!
//! Every effect in the pedalboard implements [`Effect`]. The set of concrete
//! effects is closed: [`EffectKind`] enumerates them together with the fixed
//! parameter-name table the preset layer reads and writes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, RiffboxError};

/// The five effect types a chain can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    Overdrive,
    Fuzz,
    Chorus,
    Delay,
    Reverb,
}

impl EffectKind {
    /// All effect kinds in default signal-flow order
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Overdrive,
        EffectKind::Fuzz,
        EffectKind::Chorus,
        EffectKind::Delay,
        EffectKind::Reverb,
    ];

    /// Name used as the preset key for this effect
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Overdrive => "Overdrive",
            EffectKind::Fuzz => "Fuzz",
            EffectKind::Chorus => "Chorus",
            EffectKind::Delay => "Delay",
            EffectKind::Reverb => "Reverb",
        }
    }

    /// Lowercase identifier used in logs and JSON dumps
    pub fn id(&self) -> &'static str {
        match self {
            EffectKind::Overdrive => "overdrive",
            EffectKind::Fuzz => "fuzz",
            EffectKind::Chorus => "chorus",
            EffectKind::Delay => "delay",
            EffectKind::Reverb => "reverb",
        }
    }

    /// Parameters captured by presets, in display order.
    ///
    /// `enabled` is not listed; every effect carries it.
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            EffectKind::Overdrive => &["gain", "tone", "level"],
            EffectKind::Fuzz => &["gain", "threshold", "tone", "level"],
            EffectKind::Chorus => &["rate", "depth", "mix"],
            EffectKind::Delay => &["delay_ms", "feedback", "mix"],
            EffectKind::Reverb => &["room_size", "damping", "mix"],
        }
    }

    /// Parse an effect name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a parameter name to its `'static` table entry
    pub fn param(&self, name: &str) -> Option<&'static str> {
        self.param_names().iter().copied().find(|p| *p == name)
    }

    /// Error for a parameter name outside this effect's table
    pub fn unknown_param(&self, name: &str) -> RiffboxError {
        RiffboxError::UnknownParameter {
            effect: self.name(),
            param: name.to_string(),
        }
    }
}

/// Control-surface description of one parameter
///
/// The range is what a slider sweeps; setters accept a wider range and
/// clamp on their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    /// Decimal places shown in a value readout
    pub precision: usize,
}

impl ParamSpec {
    const fn new(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        precision: usize,
    ) -> Self {
        Self {
            name,
            label,
            min,
            max,
            precision,
        }
    }

    /// Map a slider position in [0, 1] onto the range
    pub fn from_normalized(&self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }

    /// Inverse of [`ParamSpec::from_normalized`], clamped to [0, 1]
    pub fn to_normalized(&self, value: f32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Value formatted with this parameter's precision
    pub fn format(&self, value: f32) -> String {
        format!("{:.*}", self.precision, value)
    }
}

const OVERDRIVE_SPECS: [ParamSpec; 3] = [
    ParamSpec::new("gain", "Gain", 0.0, 20.0, 1),
    ParamSpec::new("tone", "Tone", 0.0, 1.0, 2),
    ParamSpec::new("level", "Level", 0.0, 1.0, 2),
];

const FUZZ_SPECS: [ParamSpec; 4] = [
    ParamSpec::new("gain", "Gain", 0.0, 30.0, 1),
    ParamSpec::new("threshold", "Threshold", 0.0, 1.0, 2),
    ParamSpec::new("tone", "Tone", 0.0, 1.0, 2),
    ParamSpec::new("level", "Level", 0.0, 1.0, 2),
];

const CHORUS_SPECS: [ParamSpec; 3] = [
    ParamSpec::new("rate", "Rate", 0.1, 5.0, 2),
    ParamSpec::new("depth", "Depth", 0.0, 0.02, 4),
    ParamSpec::new("mix", "Mix", 0.0, 1.0, 2),
];

const DELAY_SPECS: [ParamSpec; 3] = [
    ParamSpec::new("delay_ms", "Delay ms", 0.0, 1000.0, 0),
    ParamSpec::new("feedback", "Feedback", 0.0, 1.0, 2),
    ParamSpec::new("mix", "Mix", 0.0, 1.0, 2),
];

const REVERB_SPECS: [ParamSpec; 3] = [
    ParamSpec::new("room_size", "Room Size", 0.0, 1.0, 2),
    ParamSpec::new("damping", "Damping", 0.0, 1.0, 2),
    ParamSpec::new("mix", "Mix", 0.0, 1.0, 2),
];

impl EffectKind {
    /// Slider ranges for every table parameter, in display order
    pub fn param_specs(&self) -> &'static [ParamSpec] {
        match self {
            EffectKind::Overdrive => &OVERDRIVE_SPECS,
            EffectKind::Fuzz => &FUZZ_SPECS,
            EffectKind::Chorus => &CHORUS_SPECS,
            EffectKind::Delay => &DELAY_SPECS,
            EffectKind::Reverb => &REVERB_SPECS,
        }
    }

    /// Slider range for one parameter
    pub fn param_spec(&self, name: &str) -> Option<&'static ParamSpec> {
        self.param_specs().iter().find(|spec| spec.name == name)
    }
}

impl std::str::FromStr for EffectKind {
    type Err = RiffboxError;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| RiffboxError::UnknownEffect {
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Base trait for all guitar effects
///
/// Effects process a mono block in place. `process` must not allocate:
/// buffers are sized in the constructor or in `prepare`, and parameter
/// setters clamp values so indices stay in range.
pub trait Effect: Send + Sync {
    /// Process a block of samples in place
    fn process(&mut self, block: &mut [f32]);

    /// Reconfigure for a new sample rate
    ///
    /// May reallocate internal buffers; never called from `process`.
    fn prepare(&mut self, sample_rate: u32);

    /// Clear internal state (delay lines, filter history, LFO phase)
    fn reset(&mut self);

    /// Which of the closed set of effects this is
    fn kind(&self) -> EffectKind;

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Enable or disable the effect without touching its state
    fn set_enabled(&mut self, enabled: bool);

    /// Read a parameter by its table name
    fn get_param(&self, name: &str) -> Option<f32>;

    /// Set a parameter by its table name, clamping to the valid range
    fn set_param(&mut self, name: &str, value: f32) -> Result<()>;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str {
        self.kind().id()
    }

    /// Get a human-readable name
    fn display_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Get `enabled` plus every table parameter as JSON (for UI/inspection)
    fn get_params(&self) -> Value {
        let mut params = Map::new();
        params.insert("enabled".to_string(), json!(self.is_enabled()));
        for name in self.kind().param_names() {
            if let Some(value) = self.get_param(name) {
                params.insert((*name).to_string(), json!(value));
            }
        }
        Value::Object(params)
    }
}

/// Helper macro to implement common Effect trait methods
#[macro_export]
macro_rules! impl_effect_common {
    ($kind:expr) => {
        fn kind(&self) -> $crate::dsp::EffectKind {
            $kind
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
    };
}
