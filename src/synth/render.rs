//! Buffer rendering with click-free parameter transitions
//!
//! Fills one output buffer per callback: takes a single parameter snapshot,
//! ramps gain and phase increment toward their targets, and crossfades
//! wavetable switches. Rendering never fails; anything unexpected degrades
//! to a silent buffer because the render path has nowhere to report errors.

use super::oscillator::{phase_increment, WavetableOscillator};
use super::params::{db_to_gain, ParameterStore, Parameters};
use super::ramp::Ramp;
use super::wavetable::{Waveform, WavetableBank};
use std::sync::Arc;

/// Length of every parameter ramp. A few milliseconds is long enough to be
/// inaudible as a step and short enough to feel immediate.
pub const RAMP_SECONDS: f32 = 0.005;

/// Drives the oscillator across output buffers.
///
/// Owned exclusively by the render path; the control role only ever touches
/// it indirectly through the [`ParameterStore`]. All state is pre-sized at
/// creation so rendering performs no heap allocation.
pub struct RenderEngine {
    bank: Arc<WavetableBank>,
    params: Arc<ParameterStore>,
    oscillator: WavetableOscillator,
    sample_rate: f32,
    gain: Ramp,
    increment: Ramp,
    /// Table the engine is fading toward (or sitting on)
    current: Waveform,
    /// Table being faded out during a crossfade
    previous: Waveform,
    /// Crossfade position: 0 = previous table, 1 = current table
    table_mix: Ramp,
}

impl RenderEngine {
    /// Create a render engine for a fixed sample rate.
    ///
    /// Gain starts at zero so the first `play()` fades in instead of
    /// starting with a step.
    pub fn new(bank: Arc<WavetableBank>, params: Arc<ParameterStore>, sample_rate: f32) -> Self {
        let initial = params.snapshot();
        let ramp_samples = (RAMP_SECONDS * sample_rate).max(1.0) as u32;

        Self {
            bank,
            params,
            oscillator: WavetableOscillator::new(),
            sample_rate,
            gain: Ramp::new(0.0, ramp_samples),
            increment: Ramp::new(
                phase_increment(initial.frequency_hz, sample_rate),
                ramp_samples,
            ),
            current: initial.wavetable,
            previous: initial.wavetable,
            table_mix: Ramp::new(1.0, ramp_samples),
        }
    }

    /// The sample rate this engine was built for
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The ramp length in samples
    pub fn ramp_samples(&self) -> u32 {
        self.gain.length()
    }

    /// Fill `out` with exactly `out.len()` samples.
    ///
    /// Takes one parameter snapshot for the whole buffer. A `playing=false`
    /// snapshot retargets the gain to zero, so a stop fades out over the
    /// ramp instead of cutting; once the fade lands, buffers are plain
    /// silence and transient state is reset for a clean next start.
    pub fn render(&mut self, out: &mut [f32]) {
        let params = self.params.snapshot();
        let target_gain = if params.playing {
            db_to_gain(params.volume_db)
        } else {
            0.0
        };

        if !params.playing && self.is_silent() {
            out.fill(0.0);
            self.reset_transients(&params);
            return;
        }

        self.gain.retarget(target_gain);
        self.increment
            .retarget(phase_increment(params.frequency_hz, self.sample_rate));

        // Start a crossfade only once the previous one has landed; a change
        // that arrives mid-fade is picked up on a following buffer. This
        // keeps every sample-to-sample step bounded by a single ramp.
        if params.wavetable != self.current && !self.table_mix.is_ramping() {
            self.previous = self.current;
            self.current = params.wavetable;
            self.table_mix.snap_to(0.0);
            self.table_mix.retarget(1.0);
        }

        let bank = Arc::clone(&self.bank);
        let current_table = bank.get(self.current);
        let previous_table = bank.get(self.previous);

        for out_sample in out.iter_mut() {
            let increment = self.increment.next();
            let mix = self.table_mix.next();

            let value = if mix >= 1.0 {
                self.oscillator.sample(current_table)
            } else {
                let old = self.oscillator.sample(previous_table);
                let new = self.oscillator.sample(current_table);
                old + mix * (new - old)
            };

            *out_sample = value * self.gain.next();
            self.oscillator.advance(increment);
        }
    }

    /// True once the gain has fully landed on zero
    fn is_silent(&self) -> bool {
        self.gain.current() == 0.0 && !self.gain.is_ramping()
    }

    /// Clear in-progress ramp state while silent so a subsequent play
    /// starts cleanly. Phase is not advanced while silent.
    fn reset_transients(&mut self, params: &Parameters) {
        self.oscillator.reset();
        self.gain.snap_to(0.0);
        self.increment
            .snap_to(phase_increment(params.frequency_hz, self.sample_rate));
        self.current = params.wavetable;
        self.previous = params.wavetable;
        self.table_mix.snap_to(1.0);
    }
}
