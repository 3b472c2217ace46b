use crate::foundation::core::{Rgb8, SurfaceSize};
use crate::foundation::error::{CodefallError, CodefallResult};
use crate::render::composite::{PremulRgba8, over, premul, tinted, unpremultiply};

/// Axis-aligned pixel rectangle inside a source surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl PixelRect {
    /// Construct a rectangle.
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// CPU framebuffer holding premultiplied RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface; zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Surface with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: PremulRgba8) -> Self {
        let size = SurfaceSize::new(width, height);
        Self {
            width: size.width,
            height: size.height,
            data: px.repeat(size.area()),
        }
    }

    /// Wrap an existing premultiplied buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> CodefallResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CodefallError::render("surface size overflow"))?;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(CodefallError::render(format!(
                "surface buffer of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Reset to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Sum of alpha over all pixels.
    pub fn alpha_sum(&self) -> u64 {
        self.data.chunks_exact(4).map(|px| u64::from(px[3])).sum()
    }

    /// Blend a straight color with `alpha` over a rectangle; coordinates may be off-surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8, alpha: f32) {
        let src = premul(color, alpha);
        if src[3] == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        for yy in y0..y1 {
            for xx in x0..x1 {
                let i = self.index(xx, yy);
                let d = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                self.data[i..i + 4].copy_from_slice(&over(d, src, 1.0));
            }
        }
    }

    /// Darken everything by blending black at `alpha` (trail fade).
    pub fn fade(&mut self, alpha: f32) {
        let (w, h) = (self.width, self.height);
        self.fill_rect(0, 0, w, h, Rgb8::new(0, 0, 0), alpha);
    }

    /// Composite `src_rect` of `src` at `(dx, dy)`, multiplied by `tint` when given.
    pub fn blit(
        &mut self,
        src: &Surface,
        src_rect: PixelRect,
        dx: i32,
        dy: i32,
        tint: Option<Rgb8>,
        opacity: f32,
    ) {
        if opacity <= 0.0 {
            return;
        }
        let rw = src_rect.w.min(src.width.saturating_sub(src_rect.x));
        let rh = src_rect.h.min(src.height.saturating_sub(src_rect.y));
        let Some((x0, y0, x1, y1)) = self.clip(dx, dy, rw, rh) else {
            return;
        };
        for yy in y0..y1 {
            let sy = src_rect.y + (i64::from(yy) - i64::from(dy)) as u32;
            for xx in x0..x1 {
                let sx = src_rect.x + (i64::from(xx) - i64::from(dx)) as u32;
                let si = src.index(sx, sy);
                let mut s = [
                    src.data[si],
                    src.data[si + 1],
                    src.data[si + 2],
                    src.data[si + 3],
                ];
                if s[3] == 0 {
                    continue;
                }
                if let Some(t) = tint {
                    s = tinted(s, t);
                }
                let di = self.index(xx, yy);
                let d = [
                    self.data[di],
                    self.data[di + 1],
                    self.data[di + 2],
                    self.data[di + 3],
                ];
                self.data[di..di + 4].copy_from_slice(&over(d, s, opacity));
            }
        }
    }

    /// Composite the whole of `src` at `(dx, dy)`.
    pub fn draw(&mut self, src: &Surface, dx: i32, dy: i32, tint: Option<Rgb8>, opacity: f32) {
        let rect = PixelRect::new(0, 0, src.width, src.height);
        self.blit(src, rect, dx, dy, tint, opacity);
    }

    /// Copy of `rect` as a new surface (clamped to bounds).
    pub fn crop(&self, rect: PixelRect) -> Surface {
        let mut out = Surface::new(rect.w, rect.h);
        let rw = rect.w.min(self.width.saturating_sub(rect.x));
        let rh = rect.h.min(self.height.saturating_sub(rect.y));
        if rw == 0 || rh == 0 {
            return out;
        }
        for y in 0..rh {
            let s = self.index(rect.x, rect.y + y);
            let d = out.index(0, y);
            let n = rw as usize * 4;
            out.data[d..d + n].copy_from_slice(&self.data[s..s + n]);
        }
        out
    }

    /// Straight-alpha bytes for encoders that expect unassociated alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    fn clip(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(w)).min(i64::from(self.width));
        let y1 = (i64::from(y) + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
