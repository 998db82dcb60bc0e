use super::*;
use crate::foundation::core::LonLat;

const REQUEST: &str = r#"{
    "geojson": {
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": [[-105.0, 40.0], [-105.0, 40.01], [-105.01, 40.01]]
        }
    },
    "dist_mi": [0.0, 0.5, 1.0],
    "speed_mph": [12.0, 14.0, 10.0],
    "elev_ft": [5000.0, 5050.0, 5020.0],
    "fps": 24,
    "width": 640,
    "height": 360
}"#;

#[test]
fn request_parses_with_flattened_options() {
    let req = RouteVideoRequest::from_json_str(REQUEST).unwrap();
    assert_eq!(req.config.fps, 24);
    assert_eq!(req.config.width, 640);
    assert_eq!(req.config.max_seconds, 60.0);
    assert_eq!(req.route().unwrap().len(), 3);
    let pace = req.pace().unwrap();
    assert_eq!(pace.len(), 3);
    assert_eq!(pace.elevation_ft.as_ref().map(Vec::len), Some(3));
}

#[test]
fn missing_required_fields_fail_to_parse() {
    assert!(RouteVideoRequest::from_json_str(r#"{"geojson": {}}"#).is_err());
    assert!(RouteVideoRequest::from_json_str("not json").is_err());
}

#[test]
fn mismatched_pace_arrays_are_rejected() {
    let mut req = RouteVideoRequest::from_json_str(REQUEST).unwrap();
    req.speed_mph.pop();
    assert!(req.pace().is_err());
}

#[test]
fn output_stem_prefers_name_then_hash_then_geometry() {
    let mut req = RouteVideoRequest::from_json_str(REQUEST).unwrap();
    let route = req.route().unwrap();
    let computed = route_hash(&route);
    assert_eq!(computed.len(), 16);
    assert_eq!(req.output_stem(&route), computed);

    req.route_hash = Some("abc123".to_owned());
    assert_eq!(req.output_stem(&route), "abc123");

    req.route_name = Some("Morning Loop / Boulder".to_owned());
    assert_eq!(req.output_stem(&route), "Morning_Loop___Boulder");

    req.route_name = Some("  ..  ".to_owned());
    assert_eq!(req.output_stem(&route), "abc123");
}

#[test]
fn route_hash_samples_every_tenth_vertex() {
    let pts: Vec<LonLat> = (0..25)
        .map(|i| LonLat::new(-105.0, 40.0 + f64::from(i) * 0.001))
        .collect();
    let a = Route::new(pts.clone()).unwrap();

    let mut nudged = pts.clone();
    nudged[5].lon += 0.01;
    let b = Route::new(nudged).unwrap();
    assert_eq!(route_hash(&a), route_hash(&b));

    let mut moved = pts;
    moved[10].lon += 0.01;
    let c = Route::new(moved).unwrap();
    assert_ne!(route_hash(&a), route_hash(&c));
}

#[test]
fn sanitize_keeps_safe_characters() {
    assert_eq!(sanitize_stem("ride-2024_06.final"), "ride-2024_06.final");
    assert_eq!(sanitize_stem("../etc/passwd"), "_etc_passwd");
    assert_eq!(sanitize_stem(""), "");
}

#[test]
fn load_request_validates_everything() {
    let dir = std::path::Path::new("target/request_unit");
    std::fs::create_dir_all(dir).unwrap();

    let ok = dir.join("ok.json");
    std::fs::write(&ok, REQUEST).unwrap();
    let (req, route, pace) = load_request(&ok).unwrap();
    assert_eq!(req.config.fps, 24);
    assert_eq!(route.len(), 3);
    assert_eq!(pace.len(), 3);

    let bad = dir.join("odd_width.json");
    std::fs::write(&bad, REQUEST.replace("640", "641")).unwrap();
    assert!(load_request(&bad).is_err());

    assert!(load_request(&dir.join("missing.json")).is_err());
}
