use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premul_opaque_is_identity_and_transparent_is_zero() {
    assert_eq!(premul_rgba8([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(premul_rgba8([10, 20, 30, 0]), [0, 0, 0, 0]);
    assert_eq!(premul_rgba8([255, 255, 255, 128]), [128, 128, 128, 128]);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
    assert_eq!(add_sat_u8(200, 100), 255);
}
