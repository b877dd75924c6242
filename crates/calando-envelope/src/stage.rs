//! Envelope stages and their per-stage configuration.
//!
//! The stage cycle is `Off → Attack → Decay → Sustain → Release → Off`.
//! Transitions are spelled out in [`EnvelopeStage::next`] rather than derived
//! from variant ordinals, so adding or reordering variants cannot silently
//! change the cycle.

use core::fmt;
use core::ops::Index;

/// Default attack duration in seconds.
pub const DEFAULT_ATTACK_SECONDS: f64 = 0.01;
/// Default decay duration in seconds.
pub const DEFAULT_DECAY_SECONDS: f64 = 0.5;
/// Default sustain level.
pub const DEFAULT_SUSTAIN_LEVEL: f64 = 0.1;
/// Default release duration in seconds.
pub const DEFAULT_RELEASE_SECONDS: f64 = 1.0;

/// Position of the envelope state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EnvelopeStage {
    /// Idle. Output is exactly zero.
    #[default]
    Off,
    /// Exponential rise from the silence floor to 1.0.
    Attack,
    /// Exponential fall from 1.0 to the sustain level.
    Decay,
    /// Flat hold at the sustain level. Never expires on its own.
    Sustain,
    /// Exponential fall from the current level to the silence floor.
    Release,
}

impl EnvelopeStage {
    /// Every stage, in cycle order.
    pub const ALL: [EnvelopeStage; 5] = [
        EnvelopeStage::Off,
        EnvelopeStage::Attack,
        EnvelopeStage::Decay,
        EnvelopeStage::Sustain,
        EnvelopeStage::Release,
    ];

    /// Stage entered when this one completes.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            EnvelopeStage::Off => EnvelopeStage::Attack,
            EnvelopeStage::Attack => EnvelopeStage::Decay,
            EnvelopeStage::Decay => EnvelopeStage::Sustain,
            EnvelopeStage::Sustain => EnvelopeStage::Release,
            EnvelopeStage::Release => EnvelopeStage::Off,
        }
    }

    /// True for the stages whose configured value is a duration and which
    /// advance on their own.
    #[inline]
    pub const fn is_timed(self) -> bool {
        matches!(
            self,
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Release
        )
    }

    /// True for the stages that hold their level flat.
    #[inline]
    pub const fn is_flat(self) -> bool {
        !self.is_timed()
    }

    /// Lowercase display name.
    pub const fn name(self) -> &'static str {
        match self {
            EnvelopeStage::Off => "off",
            EnvelopeStage::Attack => "attack",
            EnvelopeStage::Decay => "decay",
            EnvelopeStage::Sustain => "sustain",
            EnvelopeStage::Release => "release",
        }
    }

    const fn slot(self) -> usize {
        match self {
            EnvelopeStage::Off => 0,
            EnvelopeStage::Attack => 1,
            EnvelopeStage::Decay => 2,
            EnvelopeStage::Sustain => 3,
            EnvelopeStage::Release => 4,
        }
    }
}

impl fmt::Display for EnvelopeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Configured value for each stage.
///
/// Attack, decay and release hold a duration in seconds; sustain holds a
/// level in `[0, 1]`. The `Off` slot exists so the table can be indexed by
/// any stage, and always reads `0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageValues {
    values: [f64; 5],
}

impl StageValues {
    /// Build from attack/decay/release seconds and a sustain level.
    ///
    /// No validation happens here; see [`EnvelopeConfig::validate`](crate::EnvelopeConfig::validate).
    pub const fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            values: [0.0, attack, decay, sustain, release],
        }
    }

    /// Value configured for `stage`.
    #[inline]
    pub fn get(&self, stage: EnvelopeStage) -> f64 {
        self.values[stage.slot()]
    }

    /// Overwrite the value for `stage`. Writes to `Off` are ignored.
    #[inline]
    pub fn set(&mut self, stage: EnvelopeStage, value: f64) {
        if stage != EnvelopeStage::Off {
            self.values[stage.slot()] = value;
        }
    }
}

impl Default for StageValues {
    fn default() -> Self {
        Self::new(
            DEFAULT_ATTACK_SECONDS,
            DEFAULT_DECAY_SECONDS,
            DEFAULT_SUSTAIN_LEVEL,
            DEFAULT_RELEASE_SECONDS,
        )
    }
}

impl Index<EnvelopeStage> for StageValues {
    type Output = f64;

    fn index(&self, stage: EnvelopeStage) -> &f64 {
        &self.values[stage.slot()]
    }
}
