use super::*;

#[test]
fn over_zero_opacity_or_alpha_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn opaque_source_replaces() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn half_black_darkens() {
    let out = over([200, 100, 50, 255], [0, 0, 0, 128], 1.0);
    assert_eq!(out[3], 255);
    assert!((99..=101).contains(&out[0]));
}

#[test]
fn tint_multiplies_color_only() {
    let tint = Rgb8::new(0, 255, 102);
    assert_eq!(tinted([255, 255, 255, 255], tint), [0, 255, 102, 255]);
    assert_eq!(tinted([128, 128, 128, 128], tint), [0, 128, 51, 128]);
}

#[test]
fn premul_and_back() {
    let px = premul(Rgb8::new(200, 100, 0), 0.5);
    assert_eq!(px[3], 128);
    let straight = unpremultiply(px);
    assert!((199..=201).contains(&straight[0]));
    assert!((99..=101).contains(&straight[1]));
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn buffer_lengths_must_match() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    over_in_place(&mut dst, &[10, 10, 10, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![10, 10, 10, 255, 0, 0, 0, 0]);
}
