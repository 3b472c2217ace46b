use vello_cpu::kurbo::Rect;
use vello_cpu::peniko::Color;

use crate::foundation::core::SurfaceSize;
use crate::foundation::error::CodefallResult;
use crate::render::composite::over_in_place;
use crate::render::surface::Surface;

/// Opacity of the scanline pattern.
pub const SCANLINE_OPACITY: f32 = 0.18;
/// Vertical period of the pattern in pixels.
pub const SCANLINE_PERIOD: u32 = 3;

/// Horizontal scanline layer, rendered once per surface size.
#[derive(Debug, Default)]
pub struct ScanlineOverlay {
    layer: Option<Surface>,
}

impl ScanlineOverlay {
    /// Empty overlay; the layer is built on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite the pattern over `target`.
    pub fn apply(&mut self, target: &mut Surface) -> CodefallResult<()> {
        let size = target.size();
        let stale = self.layer.as_ref().is_none_or(|l| l.size() != size);
        if stale {
            self.layer = Some(render_scanlines(size)?);
        }
        match &self.layer {
            Some(layer) => over_in_place(target.data_mut(), layer.data(), 1.0),
            None => Ok(()),
        }
    }
}

fn render_scanlines(size: SurfaceSize) -> CodefallResult<Surface> {
    let w = size.width.min(u32::from(u16::MAX)) as u16;
    let h = size.height.min(u32::from(u16::MAX)) as u16;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(Color::from_rgba8(0, 0, 0, 255));
    ctx.push_opacity_layer(SCANLINE_OPACITY);
    for y in (0..u32::from(h)).step_by(SCANLINE_PERIOD as usize) {
        let y = f64::from(y);
        ctx.fill_rect(&Rect::new(0.0, y, f64::from(w), y + 1.0));
    }
    ctx.pop_layer();
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let layer = Surface::from_premul_rgba8(
        u32::from(w),
        u32::from(h),
        pixmap.data_as_u8_slice().to_vec(),
    )?;
    if layer.size() == size {
        return Ok(layer);
    }
    let mut padded = Surface::new(size.width, size.height);
    padded.draw(&layer, 0, 0, None, 1.0);
    Ok(padded)
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
