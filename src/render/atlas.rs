use std::collections::HashMap;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CodefallError, CodefallResult};
use crate::render::blur::glow;
use crate::render::surface::{PixelRect, Surface};
use crate::render::text::TextRaster;

/// Cells per atlas row.
pub const ATLAS_COLUMNS: u32 = 16;

/// Untinted glyph color; the theme tint multiplies it at draw time.
pub const GLYPH_FOREGROUND: Rgb8 = Rgb8::new(235, 255, 240);

const PUNCTUATION: &str = "{}[]\":,_=$|.;'-+<>/";

/// Drawable characters: half-width katakana, digits, Latin letters and encoder punctuation.
pub fn main_charset() -> Vec<char> {
    let mut out: Vec<char> = ('\u{FF66}'..='\u{FF9D}').collect();
    out.extend('0'..='9');
    out.extend('A'..='Z');
    out.extend('a'..='z');
    out.extend(PUNCTUATION.chars());
    out
}

/// Every glyph of a fixed character set prerendered once into a grid of square cells.
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    bitmap: Surface,
    cell_size: u32,
    columns: u32,
    charset: Vec<char>,
    lookup: HashMap<char, usize>,
}

impl GlyphAtlas {
    /// Rasterize `charset` centered in `cell_size` cells with a uniform glow.
    ///
    /// A character the rasterizer cannot draw leaves its cell blank.
    #[tracing::instrument(skip(charset, raster), fields(glyphs = charset.len()))]
    pub fn build(
        charset: &[char],
        cell_size: u32,
        raster: &mut dyn TextRaster,
    ) -> CodefallResult<Self> {
        if cell_size == 0 {
            return Err(CodefallError::validation("atlas cell_size must be > 0"));
        }
        let count = charset.len().max(1) as u32;
        let rows = count.div_ceil(ATLAS_COLUMNS);
        let mut bitmap = Surface::new(ATLAS_COLUMNS * cell_size, rows * cell_size);
        let font_size = cell_size as f32 * 0.8;
        let glow_radius = (cell_size / 8).max(1);

        let mut lookup = HashMap::with_capacity(charset.len());
        let mut buf = [0u8; 4];
        for (i, &c) in charset.iter().enumerate() {
            lookup.entry(c).or_insert(i);
            let glyph = match raster.rasterize(c.encode_utf8(&mut buf), font_size, GLYPH_FOREGROUND)
            {
                Ok(g) => g,
                Err(err) => {
                    tracing::debug!(%err, glyph = %c, "glyph left blank");
                    continue;
                }
            };
            let mut cell = Surface::new(cell_size, cell_size);
            let dx = (cell_size as i32 - glyph.width() as i32) / 2;
            let dy = (cell_size as i32 - glyph.height() as i32) / 2;
            cell.draw(&glyph, dx, dy, None, 1.0);
            let cell = glow(&cell, glow_radius, 0.7)?;
            let (ox, oy) = cell_origin(i, cell_size);
            bitmap.draw(&cell, ox as i32, oy as i32, None, 1.0);
        }
        tracing::debug!(rows, cell_size, "glyph atlas built");

        Ok(Self {
            bitmap,
            cell_size,
            columns: ATLAS_COLUMNS,
            charset: charset.to_vec(),
            lookup,
        })
    }

    /// Index of `c` in the character set.
    pub fn glyph_index(&self, c: char) -> Option<usize> {
        self.lookup.get(&c).copied()
    }

    /// Top-left pixel of cell `index`.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        cell_origin(index, self.cell_size)
    }

    /// Source rectangle of cell `index`.
    pub fn cell_rect(&self, index: usize) -> PixelRect {
        let (x, y) = self.cell_origin(index);
        PixelRect::new(x, y, self.cell_size, self.cell_size)
    }

    /// The prerendered sheet.
    pub fn bitmap(&self) -> &Surface {
        &self.bitmap
    }

    /// Cell edge length in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Cells per row.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Characters in atlas order.
    pub fn charset(&self) -> &[char] {
        &self.charset
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.charset.len()
    }

    /// Whether the atlas holds no glyphs.
    pub fn is_empty(&self) -> bool {
        self.charset.is_empty()
    }
}

fn cell_origin(index: usize, cell_size: u32) -> (u32, u32) {
    let i = index as u32;
    ((i % ATLAS_COLUMNS) * cell_size, (i / ATLAS_COLUMNS) * cell_size)
}

#[cfg(test)]
#[path = "../../tests/unit/render/atlas.rs"]
mod tests;
