//! Envelope construction parameters and their validation.
//!
//! [`EnvelopeConfig`] gathers everything needed to build an
//! [`Envelope`](crate::Envelope). It is plain data: hosts can keep one per
//! patch, tweak it with the `with_*` methods, and hand it to
//! [`Envelope::from_config`](crate::Envelope::from_config), which validates it
//! first.
//!
//! ```rust
//! use calando_envelope::{Envelope, EnvelopeConfig};
//!
//! let config = EnvelopeConfig::new(48000.0)
//!     .with_attack(0.005)
//!     .with_decay(0.2)
//!     .with_sustain(0.6)
//!     .with_release(0.8);
//!
//! let env = Envelope::from_config(&config).expect("valid config");
//! assert_eq!(env.sample_rate(), 48000.0);
//! ```

use crate::error::{EnvelopeError, Result};
use crate::segment::SegmentCurve;
use crate::stage::{
    DEFAULT_ATTACK_SECONDS, DEFAULT_DECAY_SECONDS, DEFAULT_RELEASE_SECONDS, DEFAULT_SUSTAIN_LEVEL,
    EnvelopeStage, StageValues,
};

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Default silence floor.
///
/// Every segment is computed in the log domain, so the envelope never drops
/// to exactly zero outside the `Off` stage; it bottoms out here instead.
pub const DEFAULT_MINIMUM_LEVEL: f64 = 0.0001;

/// Parameters for building an [`Envelope`](crate::Envelope).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvelopeConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Attack duration in seconds.
    pub attack: f64,
    /// Decay duration in seconds.
    pub decay: f64,
    /// Sustain level in `[0, 1]`.
    pub sustain: f64,
    /// Release duration in seconds.
    pub release: f64,
    /// Silence floor in `(0, 1)`.
    pub minimum_level: f64,
    /// Segment step derivation.
    pub curve: SegmentCurve,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl EnvelopeConfig {
    /// Default stage values at the given sample rate.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            attack: DEFAULT_ATTACK_SECONDS,
            decay: DEFAULT_DECAY_SECONDS,
            sustain: DEFAULT_SUSTAIN_LEVEL,
            release: DEFAULT_RELEASE_SECONDS,
            minimum_level: DEFAULT_MINIMUM_LEVEL,
            curve: SegmentCurve::Linearized,
        }
    }

    /// Set the attack duration in seconds.
    pub fn with_attack(mut self, seconds: f64) -> Self {
        self.attack = seconds;
        self
    }

    /// Set the decay duration in seconds.
    pub fn with_decay(mut self, seconds: f64) -> Self {
        self.decay = seconds;
        self
    }

    /// Set the sustain level.
    pub fn with_sustain(mut self, level: f64) -> Self {
        self.sustain = level;
        self
    }

    /// Set the release duration in seconds.
    pub fn with_release(mut self, seconds: f64) -> Self {
        self.release = seconds;
        self
    }

    /// Set the silence floor.
    pub fn with_minimum_level(mut self, level: f64) -> Self {
        self.minimum_level = level;
        self
    }

    /// Set the segment curve.
    pub fn with_curve(mut self, curve: SegmentCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Per-stage value table.
    pub fn stage_values(&self) -> StageValues {
        StageValues::new(self.attack, self.decay, self.sustain, self.release)
    }

    /// Check every field. Reports the first invalid one.
    pub fn validate(&self) -> Result<()> {
        validate_sample_rate(self.sample_rate)?;
        if !(self.minimum_level.is_finite() && self.minimum_level > 0.0 && self.minimum_level < 1.0)
        {
            return Err(EnvelopeError::InvalidMinimumLevel(self.minimum_level));
        }
        for stage in [
            EnvelopeStage::Attack,
            EnvelopeStage::Decay,
            EnvelopeStage::Sustain,
            EnvelopeStage::Release,
        ] {
            validate_stage_value(stage, self.stage_values().get(stage))?;
        }
        Ok(())
    }
}

/// Sample rate must be finite and positive.
pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(EnvelopeError::InvalidSampleRate(sample_rate))
    }
}

/// Durations must be finite and positive; the sustain level must lie in
/// `[0, 1]`; `Off` takes no value.
pub fn validate_stage_value(stage: EnvelopeStage, value: f64) -> Result<()> {
    match stage {
        EnvelopeStage::Off => Err(EnvelopeError::NotConfigurable(stage)),
        EnvelopeStage::Sustain => {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EnvelopeError::InvalidLevel {
                    stage,
                    level: value,
                })
            }
        }
        EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Release => {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EnvelopeError::InvalidDuration {
                    stage,
                    seconds: value,
                })
            }
        }
    }
}
