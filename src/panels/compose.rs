use crate::config::{EncodingStyle, PanelLayout};
use crate::data::profile::Profile;
use crate::encode::encode;
use crate::foundation::core::Rgb8;
use crate::foundation::error::CodefallResult;
use crate::panels::wrap::wrap_text;
use crate::render::atlas::GLYPH_FOREGROUND;
use crate::render::surface::Surface;
use crate::render::text::TextRaster;

/// Space above the first text line.
pub const HEADER_PX: u32 = 22;
/// Space below the last text line, holding the fade strip.
pub const FOOTER_PX: u32 = 16;
/// Horizontal inset of text.
pub const PADDING_PX: u32 = 8;

const BACKGROUND: Rgb8 = Rgb8::new(2, 10, 6);

/// Panel pixel height for `lines` wrapped lines.
pub fn panel_height(lines: usize, layout: &PanelLayout) -> u32 {
    HEADER_PX + (lines as f32 * layout.line_height).ceil() as u32 + FOOTER_PX
}

/// Render `profile` as an untinted multi-line panel bitmap.
#[tracing::instrument(skip_all, fields(profile = %profile.id, style = style.as_str()))]
pub fn compose_panel(
    profile: &Profile,
    style: EncodingStyle,
    layout: &PanelLayout,
    raster: &mut dyn TextRaster,
) -> CodefallResult<Surface> {
    let text = encode(profile, style);
    let lines = wrap_text(&text, layout.max_width, layout.font_size, raster);
    let width = layout.max_width.ceil() as u32 + 2 * PADDING_PX;
    let height = panel_height(lines.len(), layout);
    let mut panel = Surface::new(width, height);

    panel.fill_rect(0, 0, width, height, BACKGROUND, 0.55);
    panel.fill_rect(0, 0, width, 1, GLYPH_FOREGROUND, 0.35);
    panel.fill_rect(0, HEADER_PX as i32 - 4, width, 1, GLYPH_FOREGROUND, 0.12);

    let label = format!("{}.{}", profile.id.chars().take(8).collect::<String>(), style.as_str());
    let label_size = (layout.font_size * 0.85).max(6.0);
    let header = raster.rasterize(&label, label_size, GLYPH_FOREGROUND)?;
    panel.draw(&header, PADDING_PX as i32, 3, None, 0.7);

    let line_box = crate::render::text::line_box(layout.font_size) as f32;
    for (i, line) in lines.iter().enumerate() {
        let img = raster.rasterize(line, layout.font_size, GLYPH_FOREGROUND)?;
        let y = HEADER_PX as f32 + i as f32 * layout.line_height - (line_box - layout.line_height) / 2.0;
        panel.draw(&img, PADDING_PX as i32, y.round() as i32, None, 1.0);
    }

    let top = height - FOOTER_PX;
    for r in 0..FOOTER_PX {
        let fade = 1.0 - r as f32 / FOOTER_PX as f32;
        panel.fill_rect(0, (top + r) as i32, width, 1, GLYPH_FOREGROUND, 0.10 * fade);
    }
    Ok(panel)
}

#[cfg(test)]
#[path = "../../tests/unit/panels/compose.rs"]
mod tests;
