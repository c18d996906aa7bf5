//! Phase-accumulator oscillator with interpolated table lookup

use super::wavetable::TABLE_LENGTH;

/// Advances a phase accumulator through a wavetable and reads linearly
/// interpolated samples.
///
/// The phase lives in `[0, TABLE_LENGTH)` and is never reset by a table
/// switch, so changing waveforms mid-note keeps the signal continuous.
pub struct WavetableOscillator {
    phase: f32,
}

impl WavetableOscillator {
    /// Create an oscillator at phase zero
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Get the current phase
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Set the phase directly. Wraps into `[0, TABLE_LENGTH)`.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(TABLE_LENGTH as f32);
    }

    /// Reset the phase to zero
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Read the sample at the current phase from `table`.
    ///
    /// Linear interpolation between the two entries bracketing the
    /// fractional phase. Does not advance the phase, so the same position
    /// can be read from two tables during a crossfade.
    #[inline]
    pub fn sample(&self, table: &[f32]) -> f32 {
        let index = self.phase as usize;
        let frac = self.phase - index as f32;
        // TABLE_LENGTH is a power of two, so wrap with a mask
        let next = (index + 1) & (table.len() - 1);
        table[index] + frac * (table[next] - table[index])
    }

    /// Advance the phase by `increment` samples, wrapping at the table
    /// length. The result is always non-negative.
    #[inline]
    pub fn advance(&mut self, increment: f32) {
        self.phase = (self.phase + increment).rem_euclid(TABLE_LENGTH as f32);
    }

    /// Read a sample and advance in one step
    #[inline]
    pub fn tick(&mut self, increment: f32, table: &[f32]) -> f32 {
        let sample = self.sample(table);
        self.advance(increment);
        sample
    }
}

impl Default for WavetableOscillator {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase increment for a target frequency:
/// `frequency_hz * TABLE_LENGTH / sample_rate_hz`.
#[inline]
pub fn phase_increment(frequency_hz: f32, sample_rate_hz: f32) -> f32 {
    frequency_hz * TABLE_LENGTH as f32 / sample_rate_hz
}
