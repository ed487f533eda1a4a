use super::*;

#[test]
fn lattice_points_are_zero() {
    let mut rng = RandomSource::seeded(1);
    let noise = PerlinNoise::new(&mut rng);
    for (x, y) in [(0.0, 0.0), (3.0, 7.0), (-2.0, 5.0)] {
        assert!(noise.sample(x, y).abs() < 1e-12);
    }
}

#[test]
fn values_are_bounded_and_vary() {
    let mut rng = RandomSource::seeded(2);
    let noise = PerlinNoise::new(&mut rng);
    let values = field_pointwise(&noise, 64, 64, 0.13);
    assert!(values.iter().all(|v| v.is_finite() && v.abs() <= 1.0 + 1e-9));
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(max - min > 0.3);
}

#[test]
fn same_seed_same_field() {
    let a = PerlinNoise::new(&mut RandomSource::seeded(9));
    let b = PerlinNoise::new(&mut RandomSource::seeded(9));
    assert_eq!(field_pointwise(&a, 20, 10, 0.2), field_pointwise(&b, 20, 10, 0.2));
}

#[test]
fn bulk_matches_pointwise() {
    let mut rng = RandomSource::seeded(3);
    let fbm = Fbm::new(PerlinNoise::new(&mut rng), 4, 0.5, 2.0);
    assert_eq!(
        field_bulk(&fbm, 57, 31, 0.07),
        field_pointwise(&fbm, 57, 31, 0.07)
    );
}

#[test]
fn fbm_single_octave_equals_base() {
    let mut rng = RandomSource::seeded(4);
    let base = PerlinNoise::new(&mut rng);
    let fbm = Fbm::new(base.clone(), 1, 0.5, 2.0);
    assert_eq!(fbm.sample(1.3, 2.7), base.sample(1.3, 2.7));
}
