use super::*;

const MAP: Canvas = Canvas {
    width: 1000,
    height: 800,
};
const VIEW: Canvas = Canvas {
    width: 200,
    height: 100,
};

#[test]
fn centered_crop_in_the_interior() {
    let c = CropRect::centered(Point::new(500.0, 400.0), VIEW, MAP);
    assert_eq!(
        c,
        CropRect {
            x0: 400,
            y0: 350,
            width: 200,
            height: 100
        }
    );
}

#[test]
fn crops_near_edges_shift_instead_of_padding() {
    let tl = CropRect::centered(Point::new(10.0, 5.0), VIEW, MAP);
    assert_eq!((tl.x0, tl.y0), (0, 0));
    let br = CropRect::centered(Point::new(995.0, 799.0), VIEW, MAP);
    assert_eq!((br.x0, br.y0), (800, 700));
    assert_eq!((br.width, br.height), (200, 100));
}

#[test]
fn oversized_crop_is_limited_to_the_map() {
    let c = CropRect::centered(
        Point::new(0.0, 0.0),
        Canvas {
            width: 5000,
            height: 5000,
        },
        MAP,
    );
    assert_eq!((c.x0, c.y0, c.width, c.height), (0, 0, 1000, 800));
}

#[test]
fn output_mapping_scales_with_crop_size() {
    let c = CropRect {
        x0: 100,
        y0: 50,
        width: 400,
        height: 200,
    };
    let p = c.to_output(Point::new(300.0, 150.0), VIEW);
    assert_eq!(p, Point::new(100.0, 50.0));
    assert_eq!(c.scale_x(VIEW), 0.5);
}

#[test]
fn fit_view_is_bounded_below_by_viewport_and_above_by_map() {
    let small = Rect::new(490.0, 390.0, 510.0, 410.0);
    assert_eq!(
        fit_view_size(Point::new(500.0, 400.0), small, VIEW, 0.05, MAP),
        VIEW
    );

    let wide = Rect::new(0.0, 0.0, 2000.0, 10.0);
    let fit = fit_view_size(Point::new(2000.0, 5.0), wide, VIEW, 0.05, MAP);
    assert_eq!(fit.width, MAP.width);
    assert_eq!(fit.height, VIEW.height);
}

#[test]
fn fit_view_uses_the_farther_side_plus_padding() {
    let bb = Rect::new(100.0, 300.0, 400.0, 420.0);
    let fit = fit_view_size(Point::new(400.0, 400.0), bb, VIEW, 0.1, MAP);
    // half width 300 -> 600 + 2 * 20 padding; half height 100 -> 200 + 2 * 10 padding.
    assert_eq!(fit.width, 640);
    assert_eq!(fit.height, 220);
}

#[test]
fn ease_out_quad_shape() {
    assert_eq!(ease_out_quad(0.0), 0.0);
    assert_eq!(ease_out_quad(1.0), 1.0);
    assert_eq!(ease_out_quad(0.5), 0.75);
    assert_eq!(ease_out_quad(2.0), 1.0);
}

#[test]
fn zoom_view_interpolates_between_sizes() {
    let to = Canvas {
        width: 600,
        height: 300,
    };
    assert_eq!(zoom_view_size(VIEW, to, 0.0), VIEW);
    assert_eq!(zoom_view_size(VIEW, to, 1.0), to);
    let mid = zoom_view_size(VIEW, to, 0.5);
    assert_eq!(mid.width, 500);
    assert_eq!(mid.height, 250);
}
