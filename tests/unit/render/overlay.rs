use super::*;

#[test]
fn scanlines_darken_every_third_row() {
    let mut s = Surface::filled(8, 7, [200, 200, 200, 255]);
    let mut overlay = ScanlineOverlay::new();
    overlay.apply(&mut s).unwrap();
    let row = |y| s.pixel(3, y).unwrap()[0];
    assert!(row(0) < 200);
    assert_eq!(row(1), 200);
    assert_eq!(row(2), 200);
    assert!(row(3) < 200);
    assert!(row(6) < 200);
}

#[test]
fn layer_follows_surface_size() {
    let mut overlay = ScanlineOverlay::new();
    let mut small = Surface::filled(4, 4, [255, 255, 255, 255]);
    overlay.apply(&mut small).unwrap();
    let mut big = Surface::filled(10, 9, [255, 255, 255, 255]);
    overlay.apply(&mut big).unwrap();
    assert!(big.pixel(9, 6).unwrap()[0] < 255);
}
