use super::*;

#[test]
fn origin_maps_to_world_center() {
    let p = forward(LonLat::new(0.0, 0.0), 0);
    assert!((p.x - 128.0).abs() < 1e-9);
    assert!((p.y - 128.0).abs() < 1e-9);
}

#[test]
fn world_size_doubles_per_zoom() {
    assert_eq!(world_size(0), 256.0);
    assert_eq!(world_size(1), 512.0);
    assert_eq!(world_size(14), 256.0 * 16384.0);
}

#[test]
fn round_trip_recovers_input_over_a_grid() {
    // Deterministic pseudo-random sweep over the valid Mercator range.
    let mut state = 0x9e37_79b9_7f4a_7c15u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    for _ in 0..2_000 {
        let lon = next() * 360.0 - 180.0;
        let lat = next() * 170.0 - 85.0;
        let zoom = (next() * 20.0) as u8;
        let back = inverse(forward(LonLat::new(lon, lat), zoom), zoom);
        assert!((back.lon - lon).abs() < 1e-6, "lon {lon} z{zoom} -> {}", back.lon);
        assert!((back.lat - lat).abs() < 1e-6, "lat {lat} z{zoom} -> {}", back.lat);
    }
}

#[test]
fn north_is_up() {
    let south = forward(LonLat::new(0.0, 10.0), 5);
    let north = forward(LonLat::new(0.0, 20.0), 5);
    assert!(north.y < south.y);
}

#[test]
fn bounds_covers_all_points() {
    let pts = [
        Point::new(3.0, 4.0),
        Point::new(-1.0, 10.0),
        Point::new(7.0, -2.0),
    ];
    let r = bounds(&pts).unwrap();
    assert_eq!(r, Rect::new(-1.0, -2.0, 7.0, 10.0));
    assert!(bounds(&[]).is_none());
}
