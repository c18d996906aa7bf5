//! Tabletone - real-time wavetable synthesis
//!
//! A single-voice wavetable synthesizer core: precomputed waveform tables,
//! a phase-accumulator oscillator, and a render engine that absorbs
//! asynchronous control changes (play/stop, frequency, volume, waveform)
//! without clicks or unbounded blocking on the audio thread.

pub mod config;
pub mod engine;
pub mod error;
pub mod synth;

pub use config::ToneConfig;
pub use engine::{Handle, Player, SynthController, SynthRegistry, Synthesizer};
pub use error::SynthError;
pub use synth::{ParameterStore, Parameters, RenderEngine, Waveform, WavetableBank};
