//! Separable gaussian blur over premultiplied surfaces, used for glyph glow.

use crate::foundation::error::{CodefallError, CodefallResult};
use crate::render::surface::Surface;

/// Blur `src` with a `(2 * radius + 1)`-tap gaussian of standard deviation `sigma`.
pub fn blur(src: &Surface, radius: u32, sigma: f32) -> CodefallResult<Surface> {
    if radius == 0 {
        return Ok(src.clone());
    }
    let kernel = kernel_q16(radius, sigma)?;
    let (w, h) = (src.width() as usize, src.height() as usize);
    let mut tmp = vec![0u8; src.data().len()];
    let mut out = vec![0u8; src.data().len()];

    pass(src.data(), &mut tmp, w, h, &kernel, Axis::Horizontal);
    pass(&tmp, &mut out, w, h, &kernel, Axis::Vertical);
    Surface::from_premul_rgba8(src.width(), src.height(), out)
}

/// Glow treatment: a blurred copy at `strength` with the crisp source composited on top.
pub fn glow(src: &Surface, radius: u32, strength: f32) -> CodefallResult<Surface> {
    let halo = blur(src, radius, radius as f32 / 2.0 + 0.5)?;
    let mut out = Surface::new(src.width(), src.height());
    out.draw(&halo, 0, 0, None, strength);
    out.draw(src, 0, 0, None, 1.0);
    Ok(out)
}

/// Normalized gaussian weights in Q16 fixed point; weights sum to exactly `1 << 16`.
fn kernel_q16(radius: u32, sigma: f32) -> CodefallResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CodefallError::validation("blur sigma must be > 0"));
    }
    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-f64::from(i * i) / denom).exp())
        .collect();
    let sum: f64 = raw.iter().sum();

    let mut weights: Vec<u32> = raw
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + (65536 - total)).clamp(0, 65536) as u32;
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as isize - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x as isize + d).clamp(0, w as isize - 1) as usize, y),
                    Axis::Vertical => (x, (y as isize + d).clamp(0, h as isize - 1) as usize),
                };
                let idx = (sy * w + sx) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = (y * w + x) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[out + c] = ((a + 32768) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
