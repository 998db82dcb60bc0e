use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RouteReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RouteReelError::unsupported_geometry("x")
            .to_string()
            .contains("unsupported geometry:")
    );
    assert!(
        RouteReelError::malformed_coordinates("x")
            .to_string()
            .contains("malformed coordinates:")
    );
    assert!(
        RouteReelError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        RouteReelError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        RouteReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RouteReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: RouteReelError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, RouteReelError::Serde(_)));
}
