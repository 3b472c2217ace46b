//! Premultiplied RGBA8 pixel operators.

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CodefallError, CodefallResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(unit_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        out[i] = sc.saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Multiply the color channels of a premultiplied pixel by `tint`; alpha is unchanged.
pub fn tinted(src: PremulRgba8, tint: Rgb8) -> PremulRgba8 {
    [
        mul_div255_u8(u16::from(src[0]), u16::from(tint.r)),
        mul_div255_u8(u16::from(src[1]), u16::from(tint.g)),
        mul_div255_u8(u16::from(src[2]), u16::from(tint.b)),
        src[3],
    ]
}

/// Premultiply a straight color with `alpha` in `[0, 1]`.
pub fn premul(color: Rgb8, alpha: f32) -> PremulRgba8 {
    let a = u16::from(unit_to_u8(alpha));
    [
        mul_div255_u8(u16::from(color.r), a),
        mul_div255_u8(u16::from(color.g), a),
        mul_div255_u8(u16::from(color.b), a),
        a as u8,
    ]
}

/// Straight-alpha view of a premultiplied pixel.
pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), a]
}

/// `dst = src over dst` for equal-length RGBA8 buffers.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> CodefallResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CodefallError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
