use super::*;

#[test]
fn bitmap_measure_is_fixed_advance() {
    let mut t = BitmapText;
    assert_eq!(t.measure("", 10.0), 0.0);
    assert!((t.measure("abc", 10.0) - 18.0).abs() < 1e-4);
    assert!((t.measure("ｱｲ", 10.0) - 12.0).abs() < 1e-4);
}

#[test]
fn bitmap_patterns_are_stable_and_nonblank() {
    assert_eq!(BitmapText::pattern('ｱ'), BitmapText::pattern('ｱ'));
    assert_eq!(BitmapText::pattern(' '), [0; 7]);
    for c in ['a', 'Z', '0', '{', 'ﾝ'] {
        assert!(BitmapText::pattern(c).iter().any(|r| *r != 0), "{c}");
        assert!(BitmapText::pattern(c).iter().all(|r| *r < 32));
    }
}

#[test]
fn bitmap_raster_draws_inside_box() {
    let mut t = BitmapText;
    let s = t.rasterize("ab", 18.0, Rgb8::WHITE).unwrap();
    assert_eq!(s.width(), 22);
    assert_eq!(s.height(), line_box(18.0));
    assert!(s.alpha_sum() > 0);

    let blank = t.rasterize("   ", 18.0, Rgb8::WHITE).unwrap();
    assert_eq!(blank.alpha_sum(), 0);
    assert!(t.rasterize("a", 0.0, Rgb8::WHITE).is_err());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(FontText::from_bytes(Arc::new(vec![1, 2, 3, 4])).is_err());
    let mut r = FontSpec::Bytes(Arc::new(vec![0; 16])).raster();
    assert!((r.measure("ab", 10.0) - 12.0).abs() < 1e-4);
}

#[test]
fn missing_font_path_falls_back() {
    let spec = FontSpec::discover(Some(Path::new("/definitely/not/a/font.ttf")));
    let mut raster = spec.raster();
    assert!(raster.measure("abc", 12.0) > 0.0);
}

#[test]
fn font_bytes_are_shared_not_copied() {
    let Some(bytes) = system_monospace() else {
        return;
    };
    let bytes = Arc::new(bytes);
    let text = FontText::from_bytes(bytes.clone()).unwrap();
    assert!(Arc::strong_count(&bytes) >= 2);
    drop(text);
}
