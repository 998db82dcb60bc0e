use super::*;
use crate::basemap::tiles::NoTiles;
use crate::foundation::core::{Fps, LonLat};
use crate::layout::zoom::ZoomQuery;
use crate::pace::samples::PaceSamples;

const VIEW: Canvas = Canvas {
    width: 320,
    height: 240,
};

fn fixture(follow_override: Option<u64>) -> RouteReelResult<FrameRenderer> {
    let route = Route::new(vec![LonLat::new(-105.0, 40.0), LonLat::new(-105.0, 40.01)])?;
    let pace = PaceSamples::new(vec![0.0, 0.5], vec![10.0, 10.0], None)?;
    let fps = Fps::new(10)?;
    let timeline = FrameTimeline::build(&route, &pace, fps, 1.0)?;
    let choice = ZoomQuery::new(timeline.positions(), route.points(), VIEW, 0.1).select(14);
    let text = TextRasterizer::empty();
    let basemap = Basemap::build(
        &choice,
        timeline.positions(),
        route.points(),
        VIEW,
        7000.0,
        &NoTiles,
        &text,
    )?;
    let follow = follow_override.unwrap_or(timeline.len() as u64);
    let phases = PhasePlan::new(follow, fps, 0.2, 0.5, 0.3)?;
    FrameRenderer::new(basemap, &timeline, &route, phases, VIEW, 0.1, text)
}

#[test]
fn fixture_has_the_expected_phase_lengths() {
    let r = fixture(None).unwrap();
    assert_eq!(
        r.phases(),
        PhasePlan {
            follow: 10,
            hold: 2,
            zoom: 5,
            final_hold: 3
        }
    );
    assert!(r.fit_size().width >= VIEW.width);
    assert!(r.fit_size().height >= VIEW.height);
}

#[test]
fn cameras_walk_through_every_phase() {
    let r = fixture(None).unwrap();

    let c = r.camera_at(FrameIndex(0)).unwrap();
    assert_eq!(c.phase, Phase::Follow { index: 0 });
    assert_eq!(c.dot_index, 0);
    assert_eq!((c.crop.width, c.crop.height), (320, 240));

    let c = r.camera_at(FrameIndex(9)).unwrap();
    assert_eq!(c.dot_index, 9);

    let c = r.camera_at(FrameIndex(10)).unwrap();
    assert_eq!(c.phase, Phase::Hold);
    assert_eq!(c.dot_index, 9);
    assert_eq!((c.crop.width, c.crop.height), (320, 240));

    let fit = r.fit_size();
    let mid = r.camera_at(FrameIndex(13)).unwrap();
    assert!(matches!(mid.phase, Phase::ZoomOut { .. }));
    assert!(mid.crop.width >= 320 && mid.crop.width <= fit.width);

    let end = r.camera_at(FrameIndex(16)).unwrap();
    assert_eq!(end.phase, Phase::ZoomOut { progress: 1.0 });
    assert_eq!((end.crop.width, end.crop.height), (fit.width, fit.height));

    let fin = r.camera_at(FrameIndex(19)).unwrap();
    assert_eq!(fin.phase, Phase::FinalHold);
    assert_eq!(fin.crop, end.crop);

    assert!(r.camera_at(FrameIndex(20)).is_err());
}

#[test]
fn rendering_is_deterministic() {
    let r = fixture(None).unwrap();
    let a = r.render_frame(FrameIndex(4)).unwrap();
    let b = r.render_frame(FrameIndex(4)).unwrap();
    assert_eq!((a.width, a.height), (320, 240));
    assert_eq!(a.data.len(), VIEW.rgba_len());
    assert!(a.premultiplied);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let other = r.render_frame(FrameIndex(5)).unwrap();
    assert_ne!(a.fingerprint(), other.fingerprint());
}

#[test]
fn dot_is_drawn_under_the_camera() {
    let r = fixture(None).unwrap();
    let cam = r.camera_at(FrameIndex(6)).unwrap();
    let frame = r.render_frame(FrameIndex(6)).unwrap();
    let p = cam.crop.to_output(r.trail[cam.dot_index], VIEW);
    let px = frame.pixel(p.x as u32, p.y as u32).unwrap();
    assert!(px[0] > 180 && px[1] < 90 && px[2] < 90, "dot pixel {px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn every_pixel_is_opaque() {
    let r = fixture(None).unwrap();
    for idx in [0, 10, 14, 19] {
        let f = r.render_frame(FrameIndex(idx)).unwrap();
        assert!(f.data.chunks_exact(4).all(|p| p[3] == 255), "frame {idx}");
    }
}

#[test]
fn follow_count_must_match_the_timeline() {
    assert!(fixture(Some(9)).is_err());
}
