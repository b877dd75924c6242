//! Exponential ADSR envelope generator.
//!
//! The envelope produces one gain value per call to [`Envelope::advance`].
//! Timed stages (attack, decay, release) multiply the level by a constant
//! factor each sample, which traces a straight line in the log domain. The
//! flat stages (off, sustain) hold their level.
//!
//! ```text
//!   level
//!    1.0 ┤   ╭╮
//!        │  ╭╯╰╮
//!      S ┤ ╭╯  ╰──────────╮
//!        │╭╯              ╰╮
//!  floor ┼╯                ╰──
//!        └─A──D─────S──────R───→ t
//! ```
//!
//! # Changing a stage while it runs
//!
//! [`Envelope::set_stage_value`] may target the stage that is currently
//! playing. The level already emitted is kept and only the remaining
//! trajectory changes:
//!
//! - a new attack/decay/release duration keeps the elapsed fraction of the
//!   stage and spreads the rest of the segment over the remaining fraction of
//!   the new duration;
//! - a new sustain level during decay re-aims the decay at it without moving
//!   its end;
//! - a new sustain level during sustain is applied at once.
//!
//! # Real-time use
//!
//! `advance` and `process_block` never allocate, log, or fail. All validation
//! happens in the configuration calls, which return [`EnvelopeError`] and
//! leave the envelope unchanged when a value is rejected.
//!
//! [`EnvelopeError`]: crate::EnvelopeError

use crate::config::{EnvelopeConfig, validate_sample_rate, validate_stage_value};
use crate::error::Result;
use crate::segment::{self, SegmentCurve, duration_to_samples};
use crate::stage::{EnvelopeStage, StageValues};

/// Per-voice exponential ADSR envelope.
///
/// # Example
///
/// ```rust
/// use calando_envelope::{Envelope, EnvelopeConfig, EnvelopeStage};
///
/// let config = EnvelopeConfig::new(1000.0)
///     .with_attack(0.01)
///     .with_decay(0.02)
///     .with_sustain(0.3);
/// let mut env = Envelope::from_config(&config)?;
///
/// env.note_on();
/// for _ in 0..100 {
///     env.advance();
/// }
/// assert_eq!(env.stage(), EnvelopeStage::Sustain);
/// assert_eq!(env.advance(), 0.3);
///
/// env.note_off();
/// assert_eq!(env.stage(), EnvelopeStage::Release);
/// # Ok::<(), calando_envelope::EnvelopeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    values: StageValues,
    sample_rate: f64,
    minimum_level: f64,
    curve: SegmentCurve,

    level: f64,
    multiplier: f64,
    sample_index: u64,
    stage_end_index: u64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    /// Envelope with the default configuration, idle.
    pub fn new() -> Self {
        Self::build(&EnvelopeConfig::default())
    }

    /// Validate `config` and build an idle envelope from it.
    pub fn from_config(config: &EnvelopeConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!("envelope_config: rejected: {err}");
            return Err(err);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = config.sample_rate,
            attack = config.attack,
            decay = config.decay,
            sustain = config.sustain,
            release = config.release,
            "envelope_config: accepted"
        );
        Ok(Self::build(config))
    }

    fn build(config: &EnvelopeConfig) -> Self {
        Self {
            stage: EnvelopeStage::Off,
            values: config.stage_values(),
            sample_rate: config.sample_rate,
            minimum_level: config.minimum_level,
            curve: config.curve,
            level: 0.0,
            multiplier: 1.0,
            sample_index: 0,
            stage_end_index: 0,
        }
    }

    /// Advance by one sample and return the new level.
    ///
    /// A stage that has run its full length hands over to the next one
    /// before this sample's step is applied. Zero-length stages are passed
    /// through within the same call.
    #[inline]
    pub fn advance(&mut self) -> f64 {
        if self.stage.is_flat() {
            return self.level;
        }
        while self.sample_index >= self.stage_end_index {
            self.begin(self.stage.next());
            if self.stage.is_flat() {
                return self.level;
            }
        }
        self.level *= self.multiplier;
        self.sample_index += 1;
        self.level
    }

    /// Fill `out` with consecutive envelope levels.
    pub fn process_block(&mut self, out: &mut [f64]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
    }

    /// Jump to `stage`, running its entry procedure.
    ///
    /// Used by voice logic to trigger notes: [`note_on`](Self::note_on) and
    /// [`note_off`](Self::note_off) are shorthands.
    pub fn enter_stage(&mut self, stage: EnvelopeStage) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            from = %self.stage,
            to = %stage,
            level = self.level,
            "envelope_enter_stage"
        );
        self.begin(stage);
    }

    /// Start the attack from the silence floor.
    pub fn note_on(&mut self) {
        self.enter_stage(EnvelopeStage::Attack);
    }

    /// Release from the current level. Ignored while off.
    pub fn note_off(&mut self) {
        if self.stage != EnvelopeStage::Off {
            self.enter_stage(EnvelopeStage::Release);
        }
    }

    /// Silence immediately.
    pub fn reset(&mut self) {
        self.enter_stage(EnvelopeStage::Off);
    }

    /// Set the sample rate used for stages entered from now on.
    ///
    /// A segment already in flight keeps its sample count.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        if let Err(err) = validate_sample_rate(sample_rate) {
            #[cfg(feature = "tracing")]
            tracing::warn!("envelope_sample_rate: rejected: {err}");
            return Err(err);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "envelope_sample_rate");
        self.sample_rate = sample_rate;
        Ok(())
    }

    /// Configure a stage: seconds for attack/decay/release, level for
    /// sustain.
    ///
    /// If `stage` is playing, its remaining trajectory is adjusted without a
    /// jump in output (see the [module docs](crate::envelope)). Setting a
    /// stage to the value it already holds changes nothing.
    pub fn set_stage_value(&mut self, stage: EnvelopeStage, value: f64) -> Result<()> {
        if let Err(err) = validate_stage_value(stage, value) {
            #[cfg(feature = "tracing")]
            tracing::warn!("envelope_stage_value: rejected: {err}");
            return Err(err);
        }
        if self.values.get(stage) == value {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(%stage, value, active = %self.stage, "envelope_stage_value");

        self.values.set(stage, value);

        match (self.stage, stage) {
            (EnvelopeStage::Sustain, EnvelopeStage::Sustain) => {
                self.level = value;
            }
            (EnvelopeStage::Decay, EnvelopeStage::Sustain) => {
                let trajectory = segment::retarget(
                    self.curve,
                    self.level,
                    self.segment_target(EnvelopeStage::Decay),
                    self.sample_index,
                    self.stage_end_index,
                );
                self.apply(trajectory);
            }
            (active, changed) if active == changed => {
                let trajectory = segment::retime(
                    self.curve,
                    self.level,
                    self.segment_target(active),
                    self.sample_index,
                    self.stage_end_index,
                    value,
                    self.sample_rate,
                );
                self.apply(trajectory);
            }
            // Not playing: takes effect on the next entry.
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, trajectory: segment::Trajectory) {
        self.multiplier = trajectory.multiplier;
        self.stage_end_index = trajectory.end_index;
    }

    fn begin(&mut self, stage: EnvelopeStage) {
        self.stage = stage;
        self.sample_index = 0;
        self.stage_end_index = if stage.is_timed() {
            duration_to_samples(self.values.get(stage), self.sample_rate)
        } else {
            0
        };

        match stage {
            EnvelopeStage::Off => {
                self.level = 0.0;
                self.multiplier = 1.0;
            }
            EnvelopeStage::Attack => {
                self.level = self.minimum_level;
                self.start_segment(stage);
            }
            EnvelopeStage::Decay => {
                self.level = 1.0;
                self.start_segment(stage);
            }
            EnvelopeStage::Sustain => {
                self.level = self.values.get(EnvelopeStage::Sustain);
                self.multiplier = 1.0;
            }
            EnvelopeStage::Release => {
                // Entered from attack, decay or sustain: start where we are.
                self.level = self.level.max(self.minimum_level);
                self.start_segment(stage);
            }
        }
    }

    fn start_segment(&mut self, stage: EnvelopeStage) {
        self.multiplier = self.curve.multiplier(
            self.level,
            self.segment_target(stage),
            self.stage_end_index,
        );
    }

    /// Level a timed stage heads for.
    fn segment_target(&self, stage: EnvelopeStage) -> f64 {
        match stage {
            EnvelopeStage::Attack => 1.0,
            EnvelopeStage::Decay => self
                .values
                .get(EnvelopeStage::Sustain)
                .max(self.minimum_level),
            _ => self.minimum_level,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Last emitted level, without advancing.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Per-sample multiplier of the current segment.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Samples elapsed since the current stage was entered.
    pub fn sample_index(&self) -> u64 {
        self.sample_index
    }

    /// Sample index at which the current stage completes. Zero for flat stages.
    pub fn stage_end_index(&self) -> u64 {
        self.stage_end_index
    }

    /// Configured value for `stage` (`0.0` for `Off`).
    pub fn stage_value(&self, stage: EnvelopeStage) -> f64 {
        self.values.get(stage)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Silence floor.
    pub fn minimum_level(&self) -> f64 {
        self.minimum_level
    }

    /// Segment curve in use.
    pub fn curve(&self) -> SegmentCurve {
        self.curve
    }

    /// True unless off.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Off
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> EnvelopeConfig {
        EnvelopeConfig {
            sample_rate: self.sample_rate,
            attack: self.values.get(EnvelopeStage::Attack),
            decay: self.values.get(EnvelopeStage::Decay),
            sustain: self.values.get(EnvelopeStage::Sustain),
            release: self.values.get(EnvelopeStage::Release),
            minimum_level: self.minimum_level,
            curve: self.curve,
        }
    }
}
