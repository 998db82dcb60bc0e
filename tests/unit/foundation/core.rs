use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(3)).unwrap().is_empty());
}

#[test]
fn fps_rejects_zero_and_rounds_seconds() {
    assert!(Fps::new(0).is_err());
    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.secs_to_frames_round(0.6), 18);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);
    assert!((fps.frames_to_secs(45) - 1.5).abs() < 1e-12);
}

#[test]
fn lonlat_lerp_midpoint() {
    let a = LonLat::new(-10.0, 40.0);
    let b = LonLat::new(10.0, 42.0);
    let m = a.lerp(b, 0.5);
    assert_eq!(m, LonLat::new(0.0, 41.0));
    assert!(!LonLat::new(f64::NAN, 0.0).is_finite());
}
