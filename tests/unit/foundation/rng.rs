use super::*;

#[test]
fn seeded_sources_repeat() {
    let mut a = RandomSource::seeded(7);
    let mut b = RandomSource::seeded(7);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn request_sources_differ_by_text() {
    let mut a = RandomSource::for_request(1, "alpha");
    let mut b = RandomSource::for_request(1, "beta");
    let mut c = RandomSource::for_request(1, "alpha");
    let va = a.next_u64();
    assert_ne!(va, b.next_u64());
    assert_eq!(va, c.next_u64());
}

#[test]
fn uniform_draws_stay_in_range() {
    let mut r = RandomSource::seeded(3);
    for _ in 0..500 {
        let f = r.uniform_f32(-5.0, 5.0);
        assert!((-5.0..=5.0).contains(&f));
        let u = r.uniform_u32(220, 255);
        assert!((220..=255).contains(&u));
    }
    assert_eq!(r.uniform_f32(2.0, 2.0), 2.0);
    assert_eq!(r.uniform_f32(3.0, 1.0), 3.0);
    assert_eq!(r.uniform_u32(9, 9), 9);
}

#[test]
fn sample_indices_are_distinct_and_clamped() {
    let mut r = RandomSource::seeded(11);
    let mut idx = r.sample_indices(100, 40);
    assert_eq!(idx.len(), 40);
    idx.sort_unstable();
    idx.dedup();
    assert_eq!(idx.len(), 40);
    assert!(idx.iter().all(|&i| i < 100));

    assert_eq!(r.sample_indices(5, 50).len(), 5);
}

#[test]
fn chance_extremes_are_certain() {
    let mut r = RandomSource::seeded(5);
    assert!((0..50).all(|_| !r.chance(0.0)));
    assert!((0..50).all(|_| r.chance(1.0)));
    assert!(!r.chance(f64::NAN));
}

#[test]
fn pick_handles_empty() {
    let mut r = RandomSource::seeded(1);
    let empty: [u8; 0] = [];
    assert!(r.pick(&empty).is_none());
    assert_eq!(r.pick(&[42]), Some(&42));
}
