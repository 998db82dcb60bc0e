use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn keys_inside_the_grid_validate() {
    assert_eq!(TileKey::tiles_per_axis(0), 1);
    assert_eq!(TileKey::tiles_per_axis(3), 8);
    assert!(TileKey { z: 3, x: 7, y: 7 }.validate().is_ok());
    assert!(TileKey { z: 3, x: 8, y: 0 }.validate().is_err());
    assert!(TileKey { z: 3, x: 0, y: 8 }.validate().is_err());
    assert!(TileKey { z: 31, x: 0, y: 0 }.validate().is_err());
}

#[test]
fn template_expansion() {
    let key = TileKey {
        z: 12,
        x: 845,
        y: 1554,
    };
    assert_eq!(
        expand_template("https://t.example/{z}/{x}/{y}.png?k=1", key),
        "https://t.example/12/845/1554.png?k=1"
    );
}

#[test]
fn solid_tiles_are_premultiplied_and_full_size() {
    let t = TileImage::solid([200, 100, 0, 128]);
    assert_eq!(t.rgba.len(), 256 * 256 * 4);
    assert_eq!(&t.rgba[0..4], &[100, 50, 0, 128]);
    assert!(TileImage::from_premul_rgba8(vec![0; 16]).is_err());
    assert!(TileImage::from_premul_rgba8(vec![0; 256 * 256 * 4]).is_ok());
}

#[test]
fn decode_accepts_tile_sized_images_only() {
    let t = TileImage::decode(&png_bytes(256, 256, [10, 20, 30, 255])).unwrap();
    assert_eq!(&t.rgba[0..4], &[10, 20, 30, 255]);

    let half = TileImage::decode(&png_bytes(256, 256, [255, 255, 255, 128])).unwrap();
    assert_eq!(&half.rgba[0..4], &[128, 128, 128, 128]);

    assert!(TileImage::decode(&png_bytes(512, 512, [0, 0, 0, 255])).is_err());
    assert!(TileImage::decode(b"<html>rate limited</html>").is_err());
}

#[test]
fn no_tiles_is_always_unavailable_but_checks_keys() {
    let src = NoTiles;
    assert!(matches!(
        src.fetch(TileKey { z: 2, x: 1, y: 1 }).unwrap(),
        TileFetch::Unavailable(_)
    ));
    assert!(src.fetch(TileKey { z: 2, x: 4, y: 1 }).is_err());
}

#[test]
fn http_source_requires_all_placeholders() {
    let t = Duration::from_millis(100);
    assert!(HttpTileSource::new("https://t.example/{z}/{x}.png", t, "ua").is_err());
    let src = HttpTileSource::new("https://t.example/{z}/{x}/{y}.png", t, "ua").unwrap();
    assert_eq!(
        src.url_for(TileKey { z: 1, x: 0, y: 1 }),
        "https://t.example/1/0/1.png"
    );
}

#[test]
fn unreachable_server_is_unavailable_not_an_error() {
    let src = HttpTileSource::new(
        "http://127.0.0.1:9/{z}/{x}/{y}.png",
        Duration::from_millis(500),
        "routereel-test",
    )
    .unwrap();
    let fetched = src.fetch(TileKey { z: 1, x: 0, y: 0 }).unwrap();
    assert!(matches!(fetched, TileFetch::Unavailable(_)));
    assert!(src.fetch(TileKey { z: 1, x: 2, y: 0 }).is_err());
}
