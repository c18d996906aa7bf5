//! Handle registry
//!
//! An arena mapping opaque ids to live synthesizer instances. Callers hold
//! a [`Handle`] instead of a pointer; the registry resolves it and detects
//! stale or never-created ids cheaply.

use crate::error::SynthError;
use crate::synth::{Parameters, WavetableBank};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::synthesizer::Synthesizer;

/// Opaque identity of one live synthesizer instance.
///
/// Valid only between the `create` that produced it and the matching
/// `destroy`; ids are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// The raw id, e.g. for crossing a binding boundary
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Arena of live synthesizer instances keyed by stable ids
pub struct SynthRegistry {
    synths: Mutex<HashMap<u64, Arc<Synthesizer>>>,
    next_id: AtomicU64,
}

impl SynthRegistry {
    pub fn new() -> Self {
        Self {
            synths: Mutex::new(HashMap::new()),
            // 0 is reserved as the null handle
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new instance and return its handle
    pub fn create(
        &self,
        bank: Arc<WavetableBank>,
        sample_rate: f32,
        initial: Parameters,
    ) -> Handle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let synth = Arc::new(Synthesizer::new(bank, sample_rate, initial));
        self.lock().insert(id, synth);
        Handle(id)
    }

    /// Resolve a handle to its instance
    pub fn get(&self, handle: Handle) -> Result<Arc<Synthesizer>, SynthError> {
        self.lock()
            .get(&handle.0)
            .cloned()
            .ok_or(SynthError::NotInitialized)
    }

    /// Destroy the instance behind a handle.
    ///
    /// Destroying a stale or never-created handle is a logged, recoverable
    /// error.
    pub fn destroy(&self, handle: Handle) -> Result<(), SynthError> {
        let removed = self.lock().remove(&handle.0);
        match removed {
            Some(synth) => synth.destroy(),
            None => {
                log::warn!("destroy called on unknown handle {}", handle.0);
                Err(SynthError::DoubleDestroy)
            }
        }
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Arc<Synthesizer>>> {
        self.synths.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SynthRegistry {
    fn default() -> Self {
        Self::new()
    }
}
