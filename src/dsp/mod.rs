//! DSP Effects Library
//!
//! Block-based guitar effects. All effects implement the `Effect` trait and
//! process mono `f32` blocks in place.

mod chain;
mod chorus;
mod delay;
pub mod delay_line;
mod effect;
pub mod filters;
mod reverb;
mod saturation;

pub use chain::EffectChain;
pub use chorus::{Chorus, MAX_DEPTH_SECONDS};
pub use delay::{Delay, MAX_DELAY_MS};
pub use delay_line::DelayLine;
pub use effect::{Effect, EffectKind, ParamSpec};
pub use filters::{OnePoleHighPass, OnePoleLowPass};
pub use reverb::Reverb;
pub use saturation::{Fuzz, Overdrive};

/// Build a boxed effect of the given kind with default parameters
pub fn create_effect(kind: EffectKind, sample_rate: u32) -> Box<dyn Effect> {
    match kind {
        EffectKind::Overdrive => Box::new(Overdrive::new()),
        EffectKind::Fuzz => Box::new(Fuzz::new()),
        EffectKind::Chorus => Box::new(Chorus::new(sample_rate)),
        EffectKind::Delay => Box::new(Delay::new(sample_rate)),
        EffectKind::Reverb => Box::new(Reverb::new()),
    }
}
