//! Integration tests for calando-envelope.
//!
//! Tests cover full note cycles, forced stage changes, and re-timing of the
//! playing stage through the public API only.

use calando_envelope::{
    DEFAULT_MINIMUM_LEVEL, Envelope, EnvelopeConfig, EnvelopeError, EnvelopeStage, SegmentCurve,
};

const SR: f64 = 1000.0;
const FLOOR: f64 = DEFAULT_MINIMUM_LEVEL;

fn envelope(config: EnvelopeConfig) -> Envelope {
    Envelope::from_config(&config).expect("test config must be valid")
}

fn standard() -> Envelope {
    envelope(
        EnvelopeConfig::new(SR)
            .with_attack(0.01)
            .with_decay(0.02)
            .with_sustain(0.3)
            .with_release(0.05),
    )
}

fn collect(env: &mut Envelope, n: usize) -> Vec<f64> {
    (0..n).map(|_| env.advance()).collect()
}

// ---------------------------------------------------------------------------
// 1. Stage cycle
// ---------------------------------------------------------------------------

#[test]
fn ten_sample_attack_rises_then_hands_over() {
    let mut env = standard();
    env.note_on();
    assert_eq!(env.level(), FLOOR);

    let levels = collect(&mut env, 10);
    assert!(levels[0] > FLOOR);
    for pair in levels.windows(2) {
        assert!(pair[1] > pair[0], "attack must rise strictly: {pair:?}");
    }
    assert_eq!(env.stage(), EnvelopeStage::Attack);

    env.advance();
    assert_eq!(env.stage(), EnvelopeStage::Decay);
}

#[test]
fn long_attack_lands_near_peak() {
    let mut env = envelope(EnvelopeConfig::new(48000.0).with_attack(0.5));
    env.note_on();
    let samples = env.stage_end_index() as usize;
    assert_eq!(samples, 24000);

    let peak = collect(&mut env, samples)[samples - 1];
    assert!((peak - 1.0).abs() < 5e-3, "got {peak}");
    assert_eq!(env.stage(), EnvelopeStage::Attack);

    env.advance();
    assert_eq!(env.stage(), EnvelopeStage::Decay);
}

#[test]
fn exact_curve_attack_lands_on_peak() {
    let mut env = envelope(
        EnvelopeConfig::new(SR)
            .with_attack(0.01)
            .with_curve(SegmentCurve::Exact),
    );
    env.note_on();
    let peak = collect(&mut env, 10)[9];
    assert!((peak - 1.0).abs() < 1e-9, "got {peak}");
}

#[test]
fn twenty_sample_decay_reaches_sustain_then_holds() {
    let mut env = standard();
    env.enter_stage(EnvelopeStage::Decay);
    assert_eq!(env.level(), 1.0);

    let levels = collect(&mut env, 20);
    for pair in levels.windows(2) {
        assert!(pair[1] < pair[0]);
    }
    assert!((levels[19] - 0.3).abs() < 0.02, "got {}", levels[19]);

    for _ in 0..1000 {
        assert_eq!(env.advance(), 0.3);
    }
    assert_eq!(env.stage(), EnvelopeStage::Sustain);
}

#[test]
fn full_note_cycle_returns_to_off() {
    let mut env = standard();
    env.note_on();
    collect(&mut env, 100);
    assert_eq!(env.stage(), EnvelopeStage::Sustain);

    env.note_off();
    collect(&mut env, 51);
    assert_eq!(env.stage(), EnvelopeStage::Off);
    assert_eq!(env.level(), 0.0);
    assert!(!env.is_active());
}

#[test]
fn envelope_is_reusable_across_notes() {
    let mut env = standard();
    env.note_on();
    let first = collect(&mut env, 40);
    env.note_off();
    collect(&mut env, 60);
    assert_eq!(env.stage(), EnvelopeStage::Off);

    env.note_on();
    let second = collect(&mut env, 40);
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// 2. Forced stage changes
// ---------------------------------------------------------------------------

#[test]
fn release_from_mid_attack_has_no_jump() {
    let mut env = envelope(
        EnvelopeConfig::new(SR)
            .with_attack(0.2)
            .with_release(0.1),
    );
    env.note_on();
    let x = collect(&mut env, 120)[119];

    env.note_off();
    assert_eq!(env.level(), x);

    let release_samples = env.stage_end_index() as usize;
    assert_eq!(release_samples, 100);
    let tail = collect(&mut env, release_samples);
    assert!(tail[0] < x);
    for pair in tail.windows(2) {
        assert!(pair[1] < pair[0]);
    }
    let last = tail[tail.len() - 1];
    assert!(last <= FLOOR * 1.01 && last > 0.0, "got {last}");

    assert_eq!(env.advance(), 0.0);
}

#[test]
fn release_from_mid_decay_starts_at_decay_level() {
    let mut env = standard();
    env.enter_stage(EnvelopeStage::Decay);
    let x = collect(&mut env, 7)[6];

    env.note_off();
    assert_eq!(env.stage(), EnvelopeStage::Release);
    assert!(env.advance() < x);
}

#[test]
fn note_on_retriggers_from_floor() {
    let mut env = standard();
    env.enter_stage(EnvelopeStage::Sustain);
    env.note_on();
    assert_eq!(env.stage(), EnvelopeStage::Attack);
    assert_eq!(env.level(), FLOOR);
}

// ---------------------------------------------------------------------------
// 3. Re-timing the playing stage
// ---------------------------------------------------------------------------

#[test]
fn retiming_release_is_continuous() {
    let mut env = envelope(EnvelopeConfig::new(SR).with_release(0.1));
    env.enter_stage(EnvelopeStage::Sustain);
    env.set_stage_value(EnvelopeStage::Sustain, 0.8).unwrap();
    env.note_off();

    let before = collect(&mut env, 30);
    let last = before[29];
    let step = before[28] - before[29];

    env.set_stage_value(EnvelopeStage::Release, 0.5).unwrap();
    assert_eq!(env.level(), last);

    let next = env.advance();
    assert!(next < last);
    assert!(last - next <= step, "slower release must take smaller steps");

    // 30% elapsed → 70% of 500 samples remain.
    assert_eq!(env.stage_end_index(), 30 + 350);
}

#[test]
fn shortening_attack_mid_flight_speeds_it_up() {
    let mut env = envelope(EnvelopeConfig::new(SR).with_attack(0.1));
    env.note_on();
    collect(&mut env, 50);
    let before = env.multiplier();

    env.set_stage_value(EnvelopeStage::Attack, 0.02).unwrap();
    assert!(env.multiplier() > before);
    assert_eq!(env.stage_end_index(), 60);

    collect(&mut env, 10);
    assert_eq!(env.stage(), EnvelopeStage::Attack);
    env.advance();
    assert_eq!(env.stage(), EnvelopeStage::Decay);
}

#[test]
fn lowering_sustain_during_decay_lands_on_new_level() {
    let mut env = envelope(
        EnvelopeConfig::new(SR)
            .with_decay(0.1)
            .with_sustain(0.6)
            .with_curve(SegmentCurve::Exact),
    );
    env.enter_stage(EnvelopeStage::Decay);
    collect(&mut env, 40);

    env.set_stage_value(EnvelopeStage::Sustain, 0.2).unwrap();
    assert_eq!(env.stage_end_index(), 100);

    let end = collect(&mut env, 60)[59];
    assert!((end - 0.2).abs() < 1e-9, "got {end}");
    assert_eq!(env.advance(), 0.2);
}

#[test]
fn setting_current_value_does_not_change_output() {
    let mut a = standard();
    let mut b = standard();
    a.note_on();
    b.note_on();
    collect(&mut a, 4);
    collect(&mut b, 4);

    b.set_stage_value(EnvelopeStage::Attack, 0.01).unwrap();
    b.set_stage_value(EnvelopeStage::Sustain, 0.3).unwrap();

    assert_eq!(collect(&mut a, 80), collect(&mut b, 80));
}

// ---------------------------------------------------------------------------
// 4. Configuration boundary
// ---------------------------------------------------------------------------

#[test]
fn invalid_config_is_rejected() {
    let err = Envelope::from_config(&EnvelopeConfig::new(-1.0)).unwrap_err();
    assert_eq!(err, EnvelopeError::InvalidSampleRate(-1.0));

    let err = Envelope::from_config(&EnvelopeConfig::new(SR).with_attack(f64::NAN)).unwrap_err();
    assert!(matches!(
        err,
        EnvelopeError::InvalidDuration {
            stage: EnvelopeStage::Attack,
            ..
        }
    ));
}

#[test]
fn output_stays_finite_under_extreme_settings() {
    let mut env = envelope(
        EnvelopeConfig::new(192_000.0)
            .with_attack(1e-6)
            .with_decay(1e-6)
            .with_sustain(0.0)
            .with_release(30.0),
    );
    env.note_on();
    for _ in 0..1000 {
        let level = env.advance();
        assert!(level.is_finite() && level >= 0.0);
    }
    env.note_off();
    for _ in 0..1000 {
        let level = env.advance();
        assert!(level.is_finite() && level > 0.0);
    }
}

#[cfg(feature = "serde")]
#[test]
fn config_deserializes_from_toml() {
    let config: EnvelopeConfig = toml::from_str(
        r#"
        sample_rate = 48000.0
        attack = 0.005
        sustain = 0.5
        curve = "exact"
        "#,
    )
    .unwrap();

    assert_eq!(config.sample_rate, 48000.0);
    assert_eq!(config.attack, 0.005);
    assert_eq!(config.sustain, 0.5);
    assert_eq!(config.curve, SegmentCurve::Exact);
    assert_eq!(config.release, EnvelopeConfig::default().release);
    assert!(Envelope::from_config(&config).is_ok());

    let text = toml::to_string(&config).unwrap();
    let back: EnvelopeConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
}
