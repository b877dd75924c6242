//! Envelope demo: a note cycle with a mid-attack re-time.
//!
//! Run with: RUST_LOG=debug cargo run -p calando-envelope --features tracing --example envelope_demo

use calando_envelope::{Envelope, EnvelopeConfig, EnvelopeStage, SegmentCurve};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sample_rate = 1000.0;

    for curve in [SegmentCurve::Linearized, SegmentCurve::Exact] {
        println!("\n=== {curve:?} curve (1 kHz, A=40ms D=60ms S=0.4 R=80ms) ===\n");

        let config = EnvelopeConfig::new(sample_rate)
            .with_attack(0.04)
            .with_decay(0.06)
            .with_sustain(0.4)
            .with_release(0.08)
            .with_curve(curve);
        let mut env = Envelope::from_config(&config)?;

        println!("Sample# | Stage   | Level");
        println!("--------+---------+----------");

        env.note_on();
        for i in 0..200 {
            if i == 20 {
                // Stretch the attack while it is playing.
                env.set_stage_value(EnvelopeStage::Attack, 0.08)?;
                println!("        | attack re-timed to 80ms");
            }
            if i == 150 {
                env.note_off();
                println!("        | note off");
            }
            let level = env.advance();
            if i % 10 == 0 {
                println!("{i:>7} | {:<7} | {level:.6}", env.stage());
            }
        }
    }

    Ok(())
}
