//! Synthesizer lifecycle and control API
//!
//! One mutex guards the lifecycle state and serializes every control entry
//! point. The render state is shared with the audio output through its own
//! lock, which the destroy path acquires to quiesce the render role before
//! teardown completes.

use crate::error::SynthError;
use crate::synth::{ParameterStore, Parameters, RenderEngine, Waveform, WavetableBank};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle states. `Uninitialized` is represented by the absence of a
/// handle in the registry; `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Created,
    Playing,
    Stopped,
    Destroyed,
}

/// One live synthesizer instance: parameter store, render state, and the
/// lifecycle state machine
pub struct Synthesizer {
    state: Mutex<EngineState>,
    params: Arc<ParameterStore>,
    render: Arc<Mutex<RenderEngine>>,
}

impl Synthesizer {
    /// Create a synthesizer in the `Created` state
    pub fn new(bank: Arc<WavetableBank>, sample_rate: f32, initial: Parameters) -> Self {
        let params = Arc::new(ParameterStore::new(initial));
        let render = RenderEngine::new(bank, Arc::clone(&params), sample_rate);

        Self {
            state: Mutex::new(EngineState::Created),
            params,
            render: Arc::new(Mutex::new(render)),
        }
    }

    /// Start producing audio. The change takes effect at the start of the
    /// next render buffer, fading in over the ramp.
    pub fn play(&self) -> Result<(), SynthError> {
        let mut state = self.lock_state();
        Self::check_alive(*state)?;
        self.params.set_playing(true);
        *state = EngineState::Playing;
        Ok(())
    }

    /// Stop producing audio. The next buffer fades out over the ramp
    /// rather than cutting.
    pub fn stop(&self) -> Result<(), SynthError> {
        let mut state = self.lock_state();
        Self::check_alive(*state)?;
        self.params.set_playing(false);
        *state = EngineState::Stopped;
        Ok(())
    }

    /// Whether the synthesizer is in the `Playing` state
    pub fn is_playing(&self) -> Result<bool, SynthError> {
        let state = self.lock_state();
        Self::check_alive(*state)?;
        Ok(*state == EngineState::Playing)
    }

    /// Set the target frequency. Legal in any non-destroyed state,
    /// including before the first `play()`.
    pub fn set_frequency(&self, hz: f32) -> Result<(), SynthError> {
        let state = self.lock_state();
        Self::check_alive(*state)?;
        self.params.set_frequency(hz)
    }

    /// Set the target volume in dB
    pub fn set_volume(&self, db: f32) -> Result<(), SynthError> {
        let state = self.lock_state();
        Self::check_alive(*state)?;
        self.params.set_volume(db)
    }

    /// Set the target waveform
    pub fn set_wavetable(&self, waveform: Waveform) -> Result<(), SynthError> {
        let state = self.lock_state();
        Self::check_alive(*state)?;
        self.params.set_wavetable(waveform);
        Ok(())
    }

    /// Set the waveform from an external enum index, rejecting values
    /// outside the closed set
    pub fn set_wavetable_index(&self, index: usize) -> Result<(), SynthError> {
        let waveform = Waveform::from_index(index).ok_or_else(|| {
            log::warn!("rejecting wavetable index {index}: out of range");
            SynthError::InvalidParameter {
                name: "wavetable",
                value: index as f64,
            }
        })?;
        self.set_wavetable(waveform)
    }

    /// The render state to hand to the audio output adapter.
    ///
    /// The output callback takes this lock with `try_lock` and falls back
    /// to silence, so the render role never blocks on the control role.
    pub fn render_state(&self) -> Arc<Mutex<RenderEngine>> {
        Arc::clone(&self.render)
    }

    /// Tear down the instance. Waits on the render lock so no render call
    /// is mid-buffer when destruction completes; the audio output must
    /// already have stopped invoking the callback for this instance.
    ///
    /// Destroying twice is a logged, recoverable error.
    pub fn destroy(&self) -> Result<(), SynthError> {
        let mut state = self.lock_state();
        if *state == EngineState::Destroyed {
            log::warn!("destroy called on an already-destroyed synthesizer");
            return Err(SynthError::DoubleDestroy);
        }

        self.params.set_playing(false);
        // Quiesce: an in-flight render holds this lock until its buffer is
        // done
        let _render = self.render.lock().unwrap_or_else(|e| e.into_inner());
        *state = EngineState::Destroyed;
        Ok(())
    }

    fn check_alive(state: EngineState) -> Result<(), SynthError> {
        if state == EngineState::Destroyed {
            log::warn!("control call on a destroyed synthesizer");
            return Err(SynthError::NotInitialized);
        }
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_synth() -> Synthesizer {
        let bank = Arc::new(WavetableBank::build());
        Synthesizer::new(bank, 48000.0, Parameters::default())
    }

    #[test]
    fn test_starts_stopped() {
        let synth = make_synth();
        assert!(!synth.is_playing().unwrap());
    }

    #[test]
    fn test_play_then_stop() {
        let synth = make_synth();

        synth.play().unwrap();
        assert!(synth.is_playing().unwrap());

        synth.stop().unwrap();
        assert!(!synth.is_playing().unwrap());
    }

    #[test]
    fn test_stop_reflects_immediately_in_state() {
        // The fade is a render-path concern; the state machine answer is
        // immediate
        let synth = make_synth();
        synth.play().unwrap();
        synth.stop().unwrap();
        assert!(!synth.is_playing().unwrap());
    }

    #[test]
    fn test_parameters_legal_before_play() {
        let synth = make_synth();
        synth.set_frequency(220.0).unwrap();
        synth.set_volume(-12.0).unwrap();
        synth.set_wavetable(Waveform::Square).unwrap();
    }

    #[test]
    fn test_wavetable_index_bounds() {
        let synth = make_synth();
        synth.set_wavetable_index(3).unwrap();
        assert!(matches!(
            synth.set_wavetable_index(4),
            Err(SynthError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_destroy_is_terminal() {
        let synth = make_synth();
        synth.destroy().unwrap();

        assert_eq!(synth.play(), Err(SynthError::NotInitialized));
        assert_eq!(synth.set_frequency(440.0), Err(SynthError::NotInitialized));
        assert_eq!(synth.is_playing(), Err(SynthError::NotInitialized));
    }

    #[test]
    fn test_double_destroy_is_recoverable() {
        let synth = make_synth();
        synth.destroy().unwrap();
        assert_eq!(synth.destroy(), Err(SynthError::DoubleDestroy));
    }

    #[test]
    fn test_destroy_waits_for_render_in_flight() {
        use std::time::Duration;

        let synth = Arc::new(make_synth());
        synth.play().unwrap();

        let render = synth.render_state();
        let guard = render.lock().unwrap();

        let destroyer = {
            let synth = Arc::clone(&synth);
            std::thread::spawn(move || synth.destroy())
        };

        // Destroy cannot complete while a render is mid-buffer
        std::thread::sleep(Duration::from_millis(20));
        assert!(!destroyer.is_finished());

        drop(guard);
        destroyer.join().unwrap().unwrap();
    }
}
