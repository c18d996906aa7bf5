//! Async control facade
//!
//! Control calls arrive from UI or lifecycle code that must never touch the
//! audio thread directly. Each call is dispatched onto the tokio blocking
//! pool, mirrors the create-if-not-exists contract, and completes quickly:
//! there is no cancellation because every operation is short and the
//! relevant ones are idempotent.

use crate::error::SynthError;
use crate::synth::{Parameters, Waveform, WavetableBank};
use std::sync::{Arc, Mutex};
use tokio::task;

use super::registry::{Handle, SynthRegistry};
use super::synthesizer::Synthesizer;

/// Everything a dispatched control task needs, cheap to clone into the
/// blocking closure
#[derive(Clone)]
struct ControlShared {
    registry: Arc<SynthRegistry>,
    bank: Arc<WavetableBank>,
    sample_rate: f32,
    initial: Parameters,
    handle: Arc<Mutex<Option<Handle>>>,
}

impl ControlShared {
    /// Resolve the current handle, creating the instance if none is live.
    /// Every control call runs through this guard, so create is idempotent
    /// and calls made before the first explicit create still work.
    fn ensure_created(&self) -> Result<(Handle, Arc<Synthesizer>), SynthError> {
        let mut slot = self.handle.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(handle) = *slot {
            if let Ok(synth) = self.registry.get(handle) {
                return Ok((handle, synth));
            }
            // Stale id (destroyed behind our back): fall through and
            // recreate
        }

        let handle = self.registry.create(
            Arc::clone(&self.bank),
            self.sample_rate,
            self.initial,
        );
        *slot = Some(handle);
        let synth = self.registry.get(handle)?;
        Ok((handle, synth))
    }
}

/// Owns one create-to-destroy lifetime at a time and exposes the control
/// API as async calls running off the real-time path
pub struct SynthController {
    shared: ControlShared,
}

impl SynthController {
    pub fn new(
        registry: Arc<SynthRegistry>,
        bank: Arc<WavetableBank>,
        sample_rate: f32,
        initial: Parameters,
    ) -> Self {
        Self {
            shared: ControlShared {
                registry,
                bank,
                sample_rate,
                initial,
                handle: Arc::new(Mutex::new(None)),
            },
        }
    }

    /// Create the synthesizer if it does not exist. Calling it again
    /// returns the existing handle rather than erroring.
    pub async fn create(&self) -> Result<Handle, SynthError> {
        self.dispatch(|shared| shared.ensure_created().map(|(handle, _)| handle))
            .await
    }

    /// Foreground lifecycle signal: same as [`create`](Self::create)
    pub async fn foreground(&self) -> Result<Handle, SynthError> {
        log::debug!("foreground signal");
        self.create().await
    }

    /// Background lifecycle signal: destroy the live instance.
    ///
    /// With no live instance this logs and returns, matching the
    /// recoverable no-op contract for double destroys.
    pub async fn background(&self) -> Result<(), SynthError> {
        log::debug!("background signal");
        self.dispatch(|shared| {
            let taken = shared
                .handle
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .take();
            match taken {
                Some(handle) => shared.registry.destroy(handle),
                None => {
                    log::warn!("attempting to destroy a null synthesizer");
                    Ok(())
                }
            }
        })
        .await
    }

    pub async fn play(&self) -> Result<(), SynthError> {
        self.dispatch(|shared| shared.ensure_created()?.1.play()).await
    }

    pub async fn stop(&self) -> Result<(), SynthError> {
        self.dispatch(|shared| shared.ensure_created()?.1.stop()).await
    }

    pub async fn is_playing(&self) -> Result<bool, SynthError> {
        self.dispatch(|shared| shared.ensure_created()?.1.is_playing())
            .await
    }

    pub async fn set_frequency(&self, hz: f32) -> Result<(), SynthError> {
        self.dispatch(move |shared| shared.ensure_created()?.1.set_frequency(hz))
            .await
    }

    pub async fn set_volume(&self, db: f32) -> Result<(), SynthError> {
        self.dispatch(move |shared| shared.ensure_created()?.1.set_volume(db))
            .await
    }

    pub async fn set_wavetable(&self, waveform: Waveform) -> Result<(), SynthError> {
        self.dispatch(move |shared| shared.ensure_created()?.1.set_wavetable(waveform))
            .await
    }

    /// Set the waveform from an external enum index
    pub async fn set_wavetable_index(&self, index: usize) -> Result<(), SynthError> {
        self.dispatch(move |shared| shared.ensure_created()?.1.set_wavetable_index(index))
            .await
    }

    /// The current handle, if an instance is live
    pub fn handle(&self) -> Option<Handle> {
        *self
            .shared
            .handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Run a control operation on the blocking pool
    async fn dispatch<T, F>(&self, op: F) -> Result<T, SynthError>
    where
        F: FnOnce(ControlShared) -> Result<T, SynthError> + Send + 'static,
        T: Send + 'static,
    {
        let shared = self.shared.clone();
        match task::spawn_blocking(move || op(shared)).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("control task failed to complete: {e}");
                Err(SynthError::NotInitialized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_controller() -> (Arc<SynthRegistry>, SynthController) {
        let registry = Arc::new(SynthRegistry::new());
        let bank = Arc::new(WavetableBank::build());
        let controller = SynthController::new(
            Arc::clone(&registry),
            bank,
            48000.0,
            Parameters::default(),
        );
        (registry, controller)
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (registry, controller) = make_controller();

        let first = controller.create().await.unwrap();
        let second = controller.create().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_single_destroy_releases() {
        let (registry, controller) = make_controller();

        controller.create().await.unwrap();
        controller.create().await.unwrap();
        controller.background().await.unwrap();

        assert!(registry.is_empty());
        assert_eq!(controller.handle(), None);
    }

    #[tokio::test]
    async fn test_calls_auto_create() {
        let (registry, controller) = make_controller();

        controller.set_frequency(220.0).await.unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!controller.is_playing().await.unwrap());
    }

    #[tokio::test]
    async fn test_play_stop_roundtrip() {
        let (_registry, controller) = make_controller();

        controller.play().await.unwrap();
        assert!(controller.is_playing().await.unwrap());

        controller.stop().await.unwrap();
        assert!(!controller.is_playing().await.unwrap());
    }

    #[tokio::test]
    async fn test_background_without_create_is_noop() {
        let (registry, controller) = make_controller();

        controller.background().await.unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_foreground_background_cycle() {
        let (registry, controller) = make_controller();

        let handle = controller.foreground().await.unwrap();
        assert_eq!(registry.len(), 1);

        controller.background().await.unwrap();
        assert!(registry.is_empty());

        // A new foreground creates a fresh instance with a fresh handle
        let next = controller.foreground().await.unwrap();
        assert_ne!(handle, next);
    }

    #[tokio::test]
    async fn test_invalid_parameter_propagates() {
        let (_registry, controller) = make_controller();

        let result = controller.set_frequency(-1.0).await;
        assert!(matches!(
            result,
            Err(SynthError::InvalidParameter { .. })
        ));

        let result = controller.set_wavetable_index(9).await;
        assert!(matches!(
            result,
            Err(SynthError::InvalidParameter { .. })
        ));
    }
}
