use super::*;

fn panel_spec(outline: bool) -> PanelSpec {
    PanelSpec {
        size: Canvas {
            width: 40,
            height: 20,
        },
        lines: vec!["Speed: 12.0 mph".to_owned()],
        pad_x: 4.0,
        pad_y: 2.0,
        line_height: 12.0,
        font_size: 10.0,
        outline,
    }
}

fn px(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn empty_database_has_no_faces() {
    assert_eq!(TextRasterizer::empty().face_count(), 0);
}

#[test]
fn outlined_panel_has_black_border_and_white_fill() {
    let text = TextRasterizer::empty();
    let buf = text.render_panel(&panel_spec(true)).unwrap();
    assert_eq!(buf.len(), 40 * 20 * 4);
    for (x, y) in [(20, 0), (0, 10), (39, 10), (20, 19)] {
        assert_eq!(px(&buf, 40, x, y), [0, 0, 0, 255], "({x}, {y})");
    }
    assert_eq!(px(&buf, 40, 20, 10), [255, 255, 255, 255]);
}

#[test]
fn plain_panel_is_white_to_the_edge() {
    let text = TextRasterizer::empty();
    let buf = text.render_panel(&panel_spec(false)).unwrap();
    assert_eq!(px(&buf, 40, 0, 0), [255, 255, 255, 255]);
    assert!(buf.chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn markup_characters_are_escaped() {
    assert_eq!(
        escape_xml(r#"a<b & "c" 'd'>"#),
        "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;"
    );
    let mut s = panel_spec(true);
    s.lines = vec!["<not a tag> & more".to_owned(), "© • ✓".to_owned()];
    assert!(TextRasterizer::empty().render_panel(&s).is_ok());
}

#[test]
fn zero_sized_panels_are_rejected() {
    let mut s = panel_spec(true);
    s.size.width = 0;
    assert!(TextRasterizer::empty().render_panel(&s).is_err());
}

#[test]
fn svg_places_one_text_element_per_line() {
    let mut s = panel_spec(false);
    s.lines = vec!["one".to_owned(), "two".to_owned(), "three".to_owned()];
    let svg = panel_svg(&s);
    assert_eq!(svg.matches("<text").count(), 3);
    assert!(svg.contains(r#"y="12""#));
    assert!(svg.contains(r#"y="24""#));
    assert!(svg.contains(r#"y="36""#));
}
