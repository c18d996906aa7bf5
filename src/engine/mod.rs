//! Engine runtime
//!
//! Owns the synthesis core at runtime: the lifecycle state machine and
//! control API, the handle registry, the cpal output adapter, and the
//! async control facade.

mod controller;
mod player;
mod registry;
mod synthesizer;

pub use controller::SynthController;
pub use player::{default_device_name, default_output_rate, list_output_devices, Player};
pub use registry::{Handle, SynthRegistry};
pub use synthesizer::Synthesizer;
