use super::*;

#[test]
fn defaults_are_valid() {
    let c = VideoConfig::default();
    c.validate().unwrap();
    assert_eq!(c.fps().unwrap().get(), 30);
    assert_eq!(
        c.viewport(),
        Canvas {
            width: 1280,
            height: 720
        }
    );
    assert!(!c.map_tiles);
}

#[test]
fn partial_json_fills_in_defaults() {
    let c: VideoConfig = serde_json::from_str(r#"{"fps": 24, "map_tiles": true}"#).unwrap();
    assert_eq!(c.fps, 24);
    assert!(c.map_tiles);
    assert_eq!(c.width, 1280);
    assert_eq!(c.zoom_out_seconds, 2.0);
}

#[test]
fn bad_values_are_rejected() {
    let bad = [
        VideoConfig {
            fps: 0,
            ..VideoConfig::default()
        },
        VideoConfig {
            fps: MAX_FPS + 1,
            ..VideoConfig::default()
        },
        VideoConfig {
            width: 641,
            ..VideoConfig::default()
        },
        VideoConfig {
            height: 0,
            ..VideoConfig::default()
        },
        VideoConfig {
            width: 8000,
            ..VideoConfig::default()
        },
        VideoConfig {
            max_seconds: 0.0,
            ..VideoConfig::default()
        },
        VideoConfig {
            max_seconds: 1.0e9,
            ..VideoConfig::default()
        },
        VideoConfig {
            fps: 240,
            max_seconds: 4600.0,
            ..VideoConfig::default()
        },
        VideoConfig {
            padding: 0.5,
            ..VideoConfig::default()
        },
        VideoConfig {
            follow_zoom: 3,
            ..VideoConfig::default()
        },
        VideoConfig {
            follow_zoom: 23,
            ..VideoConfig::default()
        },
        VideoConfig {
            hold_at_finish_seconds: -1.0,
            ..VideoConfig::default()
        },
        VideoConfig {
            final_summary_hold_seconds: f64::INFINITY,
            ..VideoConfig::default()
        },
    ];
    for c in bad {
        assert!(c.validate().is_err(), "{c:?}");
    }
}

#[test]
fn tile_source_presets() {
    let osm = TileSourceConfig::default();
    assert_eq!(osm.url_template, TileSourceConfig::OSM_HOT);
    assert_eq!(osm.timeout(), Duration::from_secs(10));
    assert!(osm.user_agent.starts_with("routereel/"));

    let mt = TileSourceConfig::maptiler("abc");
    assert!(mt.url_template.contains("{z}/{x}/{y}.png?key=abc"));
}

#[test]
fn output_path_prefers_the_explicit_name() {
    let mut o = PipelineOpts::new("videos");
    assert_eq!(o.output_path("loop"), PathBuf::from("videos/loop.mp4"));
    o.file_name = Some("custom.mp4".to_owned());
    assert_eq!(o.output_path("loop"), PathBuf::from("videos/custom.mp4"));
    assert_eq!(o.threading, RenderThreading::default());
}
