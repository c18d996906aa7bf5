//! Shared control parameters
//!
//! The store is the only steady-state contact point between the control
//! role and the render role: writes happen under a short mutex, and the
//! render path takes one consistent copy per buffer.

use super::wavetable::Waveform;
use crate::error::SynthError;
use std::sync::Mutex;

/// Volume floor in dB. Anything at or below this maps to zero gain.
pub const MIN_VOLUME_DB: f32 = -100.0;

/// Convert a dB volume to linear gain (`10^(dB/20)`), with the floor
/// mapping to silence.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    if db <= MIN_VOLUME_DB {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// The mutable control surface of one synthesizer instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Whether the engine should produce audio
    pub playing: bool,
    /// Target oscillator frequency in Hz (finite, > 0)
    pub frequency_hz: f32,
    /// Target volume in dB, floored at [`MIN_VOLUME_DB`]
    pub volume_db: f32,
    /// Target waveform table
    pub wavetable: Waveform,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            playing: false,
            frequency_hz: 440.0,
            volume_db: -6.0,
            wavetable: Waveform::Sine,
        }
    }
}

/// Thread-safe holder of the latest control intent.
///
/// Each setter validates its argument and publishes the whole parameter set
/// atomically, so the render path can never observe a torn combination
/// (e.g. a new frequency paired with a stale wavetable from another call).
pub struct ParameterStore {
    inner: Mutex<Parameters>,
}

impl ParameterStore {
    /// Create a store with the given initial values
    pub fn new(initial: Parameters) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    /// Set the target frequency. Non-finite or non-positive values are
    /// rejected and the previous value is retained.
    pub fn set_frequency(&self, hz: f32) -> Result<(), SynthError> {
        if !hz.is_finite() || hz <= 0.0 {
            log::warn!("rejecting frequency {hz}: must be finite and > 0");
            return Err(SynthError::InvalidParameter {
                name: "frequency_hz",
                value: hz as f64,
            });
        }
        self.lock().frequency_hz = hz;
        Ok(())
    }

    /// Set the target volume in dB. Non-finite values are rejected; values
    /// below the floor are clamped to it.
    pub fn set_volume(&self, db: f32) -> Result<(), SynthError> {
        if !db.is_finite() {
            log::warn!("rejecting volume {db}: must be finite");
            return Err(SynthError::InvalidParameter {
                name: "volume_db",
                value: db as f64,
            });
        }
        self.lock().volume_db = db.max(MIN_VOLUME_DB);
        Ok(())
    }

    /// Set the target waveform
    pub fn set_wavetable(&self, waveform: Waveform) {
        self.lock().wavetable = waveform;
    }

    /// Set whether the engine should produce audio
    pub fn set_playing(&self, playing: bool) {
        self.lock().playing = playing;
    }

    /// Take one consistent copy of the parameters.
    ///
    /// Called once per render buffer, not per sample. The critical section
    /// covers only the copy, so the render role is never blocked for more
    /// than a bounded, short time.
    pub fn snapshot(&self) -> Parameters {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Parameters> {
        // A poisoned lock only means another thread panicked mid-write of a
        // Copy struct; the data is still a valid parameter set
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
