//! Configuration schema definitions

use crate::synth::{Parameters, Waveform};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for Tabletone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Audio output settings
    pub audio: AudioConfig,

    /// Initial synthesizer parameters
    #[serde(default)]
    pub synth: SynthConfig,
}

impl ToneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        let nyquist = self.audio.sample_rate as f32 / 2.0;
        if !self.synth.frequency_hz.is_finite() || self.synth.frequency_hz <= 0.0 {
            bail!("Frequency must be finite and positive");
        }
        if self.synth.frequency_hz >= nyquist {
            bail!("Frequency must be below the Nyquist limit ({nyquist} Hz)");
        }
        if !self.synth.volume_db.is_finite() {
            bail!("Volume must be a finite dB value");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 48000)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in frames (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    pub device: Option<String>,
}

fn default_sample_rate() -> u32 { 48000 }
fn default_buffer_size() -> usize { 512 }

/// Initial synthesizer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Oscillator frequency in Hz (default: 440)
    #[serde(default = "default_frequency")]
    pub frequency_hz: f32,

    /// Volume in dB (default: -6)
    #[serde(default = "default_volume")]
    pub volume_db: f32,

    /// Waveform (default: sine)
    #[serde(default = "default_wavetable")]
    pub wavetable: Waveform,
}

fn default_frequency() -> f32 { 440.0 }
fn default_volume() -> f32 { -6.0 }
fn default_wavetable() -> Waveform { Waveform::Sine }

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            frequency_hz: default_frequency(),
            volume_db: default_volume(),
            wavetable: default_wavetable(),
        }
    }
}

impl SynthConfig {
    /// The parameter set a fresh synthesizer starts with. Playback always
    /// starts stopped.
    pub fn initial_parameters(&self) -> Parameters {
        Parameters {
            playing: false,
            frequency_hz: self.frequency_hz,
            volume_db: self.volume_db,
            wavetable: self.wavetable,
        }
    }
}
