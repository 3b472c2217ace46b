//! Text measurement and rasterization.
//!
//! [`FontText`] shapes with parley and rasterizes glyph runs with vello_cpu over caller-supplied
//! font bytes. [`BitmapText`] draws hashed block glyphs and needs no font at all; it keeps
//! rendering deterministic where no font is installed.

use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CodefallError, CodefallResult};
use crate::foundation::math::Fnv1a64;
use crate::render::surface::Surface;

/// Measures and draws single-line text.
pub trait TextRaster {
    /// Advance width of `text` in pixels.
    fn measure(&mut self, text: &str, font_size: f32) -> f32;

    /// Draw `text` at `font_size` into a tightly sized transparent surface.
    ///
    /// The surface is `ceil(measure)` wide and [`line_box`] tall, baseline included.
    fn rasterize(&mut self, text: &str, font_size: f32, color: Rgb8) -> CodefallResult<Surface>;
}

/// Height of the surface produced for one line of text.
pub fn line_box(font_size: f32) -> u32 {
    (font_size * 1.25).ceil().max(1.0) as u32
}

fn check_size(font_size: f32) -> CodefallResult<()> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(CodefallError::validation(
            "text font_size must be finite and > 0",
        ));
    }
    Ok(())
}

/// Fixed-advance block glyphs derived from a hash of each character.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapText;

impl BitmapText {
    const COLS: u32 = 5;
    const ROWS: u32 = 7;

    fn advance(font_size: f32) -> f32 {
        (font_size * 0.6).max(1.0)
    }

    /// 5x7 bit pattern for `c`; rows in the low five bits. Whitespace is blank.
    pub fn pattern(c: char) -> [u8; 7] {
        if c.is_whitespace() {
            return [0; 7];
        }
        let mut h = Fnv1a64::new_default();
        h.write_u32(u32::from(c));
        let mut bits = h.finish();
        let mut rows = [0u8; 7];
        for row in &mut rows {
            *row = (bits & 0x1f) as u8;
            bits = bits.rotate_right(5);
        }
        // Mirror the right half onto the left.
        for row in &mut rows {
            let left = *row & 0b00111;
            *row = left | ((left & 0b001) << 4) | ((left & 0b010) << 2);
        }
        if rows.iter().all(|r| *r == 0) {
            rows[3] = 0b01110;
        }
        rows
    }
}

impl TextRaster for BitmapText {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * Self::advance(font_size)
    }

    fn rasterize(&mut self, text: &str, font_size: f32, color: Rgb8) -> CodefallResult<Surface> {
        check_size(font_size)?;
        let advance = Self::advance(font_size);
        let width = self.measure(text, font_size).ceil().max(1.0) as u32;
        let height = line_box(font_size);
        let block = (font_size / 9.0).floor().max(1.0) as u32;
        let glyph_h = block * Self::ROWS;
        let top = height.saturating_sub(glyph_h) / 2;
        let mut out = Surface::new(width, height);

        for (i, c) in text.chars().enumerate() {
            let left = (i as f32 * advance) as u32
                + ((advance as u32).saturating_sub(block * Self::COLS)) / 2;
            for (r, bits) in Self::pattern(c).iter().enumerate() {
                for col in 0..Self::COLS {
                    if bits & (1 << (Self::COLS - 1 - col)) == 0 {
                        continue;
                    }
                    out.fill_rect(
                        (left + col * block) as i32,
                        (top + r as u32 * block) as i32,
                        block,
                        block,
                        color,
                        1.0,
                    );
                }
            }
        }
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Brush;

/// Blob view over the font bytes without copying them.
fn shared(bytes: &Arc<Vec<u8>>) -> Arc<dyn AsRef<[u8]> + Send + Sync> {
    bytes.clone()
}

/// Parley-shaped text rasterized by vello_cpu.
pub struct FontText {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Brush>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontText")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl FontText {
    /// Register `bytes` (TTF/OTF) and use its first family.
    pub fn from_bytes(bytes: Arc<Vec<u8>>) -> CodefallResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(shared(&bytes)), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CodefallError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CodefallError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(shared(&bytes)), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
        })
    }

    /// Family name resolved from the font bytes.
    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout(&mut self, text: &str, font_size: f32) -> parley::Layout<Brush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        builder.push_default(parley::style::StyleProperty::Brush(Brush));
        let mut layout: parley::Layout<Brush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextRaster for FontText {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() || check_size(font_size).is_err() {
            return 0.0;
        }
        self.layout(text, font_size).width()
    }

    fn rasterize(&mut self, text: &str, font_size: f32, color: Rgb8) -> CodefallResult<Surface> {
        check_size(font_size)?;
        let layout = self.layout(text, font_size);
        let width = layout.width().ceil().clamp(1.0, f32::from(u16::MAX)) as u16;
        let height = line_box(font_size).min(u32::from(u16::MAX)) as u16;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                // Glyph id 0 is .notdef; missing characters stay blank.
                let glyphs = run
                    .glyphs()
                    .filter(|g| g.id != 0)
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Surface::from_premul_rgba8(
            u32::from(width),
            u32::from(height),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

/// Thread-safe recipe for building a [`TextRaster`] on any thread.
#[derive(Clone)]
pub enum FontSpec {
    /// Built-in block glyphs.
    Bitmap,
    /// TTF/OTF bytes rendered with [`FontText`].
    Bytes(Arc<Vec<u8>>),
}

impl std::fmt::Debug for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitmap => f.write_str("Bitmap"),
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
        }
    }
}

impl FontSpec {
    /// Font from `path` when given, else the system monospace face, else block glyphs.
    #[tracing::instrument]
    pub fn discover(path: Option<&Path>) -> Self {
        if let Some(p) = path {
            match std::fs::read(p) {
                Ok(bytes) => return Self::Bytes(Arc::new(bytes)),
                Err(err) => tracing::warn!(%err, path = %p.display(), "font file unreadable"),
            }
        }
        match system_monospace() {
            Some(bytes) => Self::Bytes(Arc::new(bytes)),
            None => {
                tracing::warn!("no system font found; using block glyphs");
                Self::Bitmap
            }
        }
    }

    /// Fresh rasterizer; unusable font bytes degrade to [`BitmapText`].
    pub fn raster(&self) -> Box<dyn TextRaster> {
        match self {
            Self::Bitmap => Box::new(BitmapText),
            Self::Bytes(bytes) => match FontText::from_bytes(bytes.clone()) {
                Ok(ft) => Box::new(ft),
                Err(err) => {
                    tracing::warn!(%err, "font bytes rejected; using block glyphs");
                    Box::new(BitmapText)
                }
            },
        }
    }
}

fn system_monospace() -> Option<Vec<u8>> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let families = [
        usvg::fontdb::Family::Monospace,
        usvg::fontdb::Family::SansSerif,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        ..usvg::fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, _index| data.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
