//! Error types for envelope configuration.
//!
//! Only the configuration calls can fail. The per-sample path is infallible.

use thiserror::Error;

use crate::stage::EnvelopeStage;

/// Errors returned when a configuration value would make the envelope math
/// undefined.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EnvelopeError {
    /// Sample rate is zero, negative, or not finite.
    #[error("invalid sample rate {0}: must be finite and greater than zero")]
    InvalidSampleRate(f64),

    /// Stage duration is zero, negative, or not finite.
    #[error("invalid duration {seconds}s for {stage} stage: must be finite and greater than zero")]
    InvalidDuration {
        /// Stage the duration was meant for.
        stage: EnvelopeStage,
        /// The rejected duration in seconds.
        seconds: f64,
    },

    /// Level is outside `[0, 1]` or not finite.
    #[error("invalid level {level} for {stage} stage: must be within [0, 1]")]
    InvalidLevel {
        /// Stage the level was meant for.
        stage: EnvelopeStage,
        /// The rejected level.
        level: f64,
    },

    /// Silence floor is outside `(0, 1)` or not finite.
    #[error("invalid minimum level {0}: must be within (0, 1)")]
    InvalidMinimumLevel(f64),

    /// The stage has no configurable value.
    #[error("{0} stage has no configurable value")]
    NotConfigurable(EnvelopeStage),
}

/// Result type for envelope configuration.
pub type Result<T> = core::result::Result<T, EnvelopeError>;
