//! Precomputed waveform tables

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Number of samples in each wavetable. Power of two so phase wraparound
/// and index masking stay cheap.
pub const TABLE_LENGTH: usize = 1024;

/// The closed set of waveforms the synthesizer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

impl Waveform {
    /// All variants, in wire-index order
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Saw,
    ];

    /// Resolve an external enum index (e.g. from a binding layer)
    pub fn from_index(index: usize) -> Option<Waveform> {
        Waveform::ALL.get(index).copied()
    }

    /// The wire index of this variant
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Owns one immutable sample table per waveform variant.
///
/// Built once at startup and shared read-only by every consumer, so lookups
/// need no locking.
pub struct WavetableBank {
    tables: [Vec<f32>; 4],
}

impl WavetableBank {
    /// Precompute every waveform at [`TABLE_LENGTH`] samples.
    ///
    /// Deterministic and side-effect free. Samples are normalized to
    /// [-1.0, 1.0].
    pub fn build() -> Self {
        Self {
            tables: [
                Self::generate(Waveform::Sine),
                Self::generate(Waveform::Triangle),
                Self::generate(Waveform::Square),
                Self::generate(Waveform::Saw),
            ],
        }
    }

    /// Get the table for a waveform. Infallible for any enum member.
    #[inline]
    pub fn get(&self, waveform: Waveform) -> &[f32] {
        &self.tables[waveform.index()]
    }

    fn generate(waveform: Waveform) -> Vec<f32> {
        (0..TABLE_LENGTH)
            .map(|i| {
                let phase = i as f32 / TABLE_LENGTH as f32;
                match waveform {
                    Waveform::Sine => (phase * 2.0 * PI).sin(),
                    Waveform::Triangle => {
                        if phase < 0.25 {
                            4.0 * phase
                        } else if phase < 0.75 {
                            2.0 - 4.0 * phase
                        } else {
                            4.0 * phase - 4.0
                        }
                    }
                    Waveform::Square => {
                        if phase < 0.5 {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                    Waveform::Saw => 2.0 * phase - 1.0,
                }
            })
            .collect()
    }
}
