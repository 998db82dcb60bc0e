use super::*;

fn live(elevation_ft: Option<f64>) -> HudContent {
    HudContent::Live(HudSample {
        distance_mi: 1.234,
        speed_mph: 17.26,
        elevation_ft,
    })
}

#[test]
fn live_lines_show_elevation_only_when_known() {
    assert_eq!(
        live(Some(5280.4)).lines(),
        vec![
            "Distance: 1.23 mi".to_owned(),
            "Speed: 17.3 mph".to_owned(),
            "Elevation: 5280 ft".to_owned(),
        ]
    );
    assert_eq!(live(None).lines().len(), 2);
    assert_eq!(live(Some(f64::NAN)).lines().len(), 2);
}

#[test]
fn summary_lines() {
    let c = HudContent::Summary(RouteSummary {
        total_distance_mi: 10.0,
        average_speed_mph: 15.55,
        average_elevation_ft: Some(812.6),
    });
    assert_eq!(
        c.lines(),
        vec![
            "Summary".to_owned(),
            "Total distance: 10.00 mi".to_owned(),
            "Average Speed: 15.6 mph".to_owned(),
            "Average Elevation: 813 ft".to_owned(),
        ]
    );
}

#[test]
fn panel_size_comes_from_content() {
    let lines = vec!["Distance: 1.00 mi".to_owned(), "Speed: 9.0 mph".to_owned()];
    assert_eq!(
        panel_size(&lines),
        Canvas {
            width: 142,
            height: 52
        }
    );

    let more = vec![
        "Summary".to_owned(),
        "Total distance: 1.00 mi".to_owned(),
        "Average Speed: 9.0 mph".to_owned(),
    ];
    let s = panel_size(&more);
    assert_eq!(s.height, 18 * 3 + 16);
    assert_eq!(s.width, (7.2 * 23.0) as u32 + 20);
}

#[test]
fn panel_is_drawn_at_the_fixed_corner() {
    let out = Canvas {
        width: 300,
        height: 200,
    };
    let mut frame: Vec<u8> = [90u8, 90, 90, 255]
        .iter()
        .copied()
        .cycle()
        .take(out.rgba_len())
        .collect();
    draw_hud(&mut frame, out, &live(None), &TextRasterizer::empty()).unwrap();

    let at = |x: u32, y: u32| {
        let i = ((y * out.width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    };
    assert_eq!(at(9, 9), [90, 90, 90, 255]);
    assert_eq!(at(25, 10), [0, 0, 0, 255]);
    assert_eq!(at(10, 25), [0, 0, 0, 255]);
    assert_eq!(at(40, 40), [255, 255, 255, 255]);
    assert_eq!(at(250, 150), [90, 90, 90, 255]);
}
