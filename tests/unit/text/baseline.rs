use super::*;
use crate::config::Interval;

#[test]
fn clamp_respects_room_and_floor() {
    assert_eq!(clamp_amplitude(8.0, 100, 48, 2.0), 8.0);
    assert_eq!(clamp_amplitude(30.0, 100, 48, 2.0), 24.0);
    assert_eq!(clamp_amplitude(5.0, 50, 60, 2.0), 0.0);
}

#[test]
fn sine_wave_follows_position() {
    let mut wave = SineWave {
        amplitude: 3.0,
        frequency: 0.1,
    };
    let mut rng = RandomSource::seeded(0);
    assert_eq!(wave.offset(0, 0.0, &mut rng), 0.0);
    let x = std::f64::consts::FRAC_PI_2 / 0.1;
    assert!((wave.offset(7, x, &mut rng) - 3.0).abs() < 1e-9);
}

#[test]
fn jitter_stays_within_bound() {
    let mut jitter = Jitter { amplitude: 4.0 };
    let mut rng = RandomSource::seeded(1);
    for i in 0..500 {
        assert!(jitter.offset(i, 0.0, &mut rng).abs() <= 4.0);
    }
}

#[test]
fn policy_amplitude_is_clamped() {
    let cfg = VerticalOffset::SineWave {
        amplitude: Interval::fixed(20.0),
        frequency: Interval::fixed(0.1),
    };
    let mut rng = RandomSource::seeded(2);
    let policy = policy_for(&cfg, 50, 20, 2.0, &mut rng);
    assert_eq!(policy.bound(), 13.0);

    let jitter = policy_for(&VerticalOffset::Jitter { amplitude: 8.0 }, 30, 40, 2.0, &mut rng);
    assert_eq!(jitter.bound(), 0.0);
}
