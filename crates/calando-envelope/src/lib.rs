//! Calando Envelope - exponential ADSR amplitude envelope
//!
//! A per-voice gain generator for software synthesizers. Each call to
//! [`Envelope::advance`] returns the next sample of an
//! Attack-Decay-Sustain-Release shape whose timed stages are exponential
//! segments (straight lines in the log domain) rather than linear ramps.
//!
//! # Core Components
//!
//! - [`Envelope`] - The stage machine. O(1), allocation-free per sample
//! - [`EnvelopeStage`] - Off, Attack, Decay, Sustain, Release
//! - [`EnvelopeConfig`] - Validated construction parameters
//! - [`segment`] - Pure segment math, including mid-stage re-timing
//! - [`EnvelopeError`] - Rejected configuration values
//!
//! ```rust
//! use calando_envelope::{Envelope, EnvelopeConfig, EnvelopeStage};
//!
//! let mut env = Envelope::from_config(&EnvelopeConfig::new(48000.0))?;
//!
//! // Note on
//! env.note_on();
//! let mut block = [0.0; 256];
//! env.process_block(&mut block);
//!
//! // Lengthen the attack while it is playing; no click.
//! env.set_stage_value(EnvelopeStage::Attack, 0.05)?;
//!
//! // Note off
//! env.note_off();
//! # Ok::<(), calando_envelope::EnvelopeError>(())
//! ```
//!
//! # Threading
//!
//! An envelope belongs to exactly one voice. It does no locking and no I/O;
//! callers serialize configuration calls with the audio thread.
//!
//! # Features
//!
//! - `std` (default) - link the standard library. Without it the crate is
//!   `no_std` and uses `libm` for its math
//! - `tracing` - log configuration changes through `tracing`. The per-sample
//!   path never logs
//! - `serde` - derive `Serialize`/`Deserialize` for [`EnvelopeConfig`],
//!   [`EnvelopeStage`] and [`SegmentCurve`]

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod segment;
pub mod stage;

// Re-export main types at crate root
pub use config::{DEFAULT_MINIMUM_LEVEL, DEFAULT_SAMPLE_RATE, EnvelopeConfig};
pub use envelope::Envelope;
pub use error::{EnvelopeError, Result};
pub use segment::{SegmentCurve, Trajectory, segment_multiplier};
pub use stage::{EnvelopeStage, StageValues};
