use super::*;

#[test]
fn single_sample_fails_validation() {
    let err = PaceSamples::new(vec![0.0], vec![10.0], None).unwrap_err();
    assert!(matches!(err, RouteReelError::Validation(_)));
    assert!(err.to_string().contains("at least 2"));
}

#[test]
fn mismatched_lengths_are_rejected() {
    assert!(PaceSamples::new(vec![0.0, 1.0], vec![10.0], None).is_err());
    assert!(PaceSamples::new(vec![0.0, 1.0], vec![10.0, 10.0], Some(vec![1.0])).is_err());
}

#[test]
fn decreasing_distance_is_rejected() {
    let err = PaceSamples::new(vec![0.0, 2.0, 1.0], vec![1.0; 3], None).unwrap_err();
    assert!(err.to_string().contains("non-decreasing"));
}

#[test]
fn non_finite_values_are_rejected() {
    assert!(PaceSamples::new(vec![0.0, f64::NAN], vec![1.0, 1.0], None).is_err());
    assert!(PaceSamples::new(vec![0.0, 1.0], vec![1.0, f64::INFINITY], None).is_err());
}

#[test]
fn valid_profile_with_elevation() {
    let p = PaceSamples::new(vec![0.0, 0.5, 1.0], vec![12.0, 14.0, 9.0], Some(vec![10.0, 40.0, 80.0]))
        .unwrap();
    assert_eq!(p.len(), 3);
    assert!(!p.is_empty());
}

#[test]
fn clipped_to_clamps_into_route_length() {
    let p = PaceSamples::new(vec![0.0, 0.5, 3.0], vec![1.0; 3], None).unwrap();
    let c = p.clipped_to(1.0);
    assert_eq!(c.distance_mi, vec![0.0, 0.5, 1.0]);
    assert_eq!(c.speed_mph, p.speed_mph);
}
