use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"codefall");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'c');
    b.write_bytes(b"odefall");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_str_terminator_separates_fields() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn unit_to_u8_clamps() {
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(4.0), 255);
}
