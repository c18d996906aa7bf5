//! Wavetable synthesis core
//!
//! Contains the precomputed wavetable bank, the phase-accumulator
//! oscillator, the shared parameter store, and the buffer render engine.

mod oscillator;
mod params;
mod ramp;
mod render;
mod wavetable;

pub use oscillator::WavetableOscillator;
pub use params::{db_to_gain, ParameterStore, Parameters, MIN_VOLUME_DB};
pub use ramp::Ramp;
pub use render::{RenderEngine, RAMP_SECONDS};
pub use wavetable::{Waveform, WavetableBank, TABLE_LENGTH};
