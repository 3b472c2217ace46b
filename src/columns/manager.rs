use std::sync::Arc;

use crate::config::{Config, EncodingStyle, MIN_COLUMNS};
use crate::data::profile::Profile;
use crate::data::source::ProfileSource;
use crate::encode::{EncodedStream, FILLER, GlyphStream, build_glyph_stream};
use crate::foundation::core::Rgb8;
use crate::foundation::rng::RandomSource;
use crate::render::atlas::GlyphAtlas;
use crate::render::surface::Surface;

/// Seconds a key-position hit keeps the head highlighted.
pub const HIGHLIGHT_SECS: f32 = 0.6;
/// Rows a tail must clear below the surface before the column recycles.
pub const RECYCLE_MARGIN: f32 = 4.0;
/// Per-frame probability of swapping one filler glyph.
pub const SHIMMER_CHANCE: f64 = 0.02;
/// Per-frame probability of rebinding to another profile.
pub const REBIND_CHANCE: f64 = 0.001;
/// Size of each column's circular filler buffer.
pub const FILLER_SLOTS: usize = 64;

const SPEED_ROWS: (f32, f32) = (6.0, 18.0);
const TRAIL_ROWS: (u64, u64) = (8, 28);
const MAX_DRIFT_PX: f32 = 1.5;

/// `clamp(floor(width / cell_size * density), 8, max_columns)`.
pub fn column_count(width: u32, cell_size: u32, density: f32, max_columns: u32) -> usize {
    let cell = cell_size.max(1) as f32;
    let raw = (width as f32 / cell * density.max(0.0)).floor();
    let hi = max_columns.max(MIN_COLUMNS);
    (raw.clamp(0.0, hi as f32) as u32).clamp(MIN_COLUMNS, hi) as usize
}

/// One falling glyph trail bound to an encoded profile.
#[derive(Clone, Debug)]
pub struct StreamColumn {
    /// Left edge in pixels.
    pub x: f32,
    /// Head position in rows; negative while above the surface.
    pub head: f32,
    /// Fall speed in rows per second before the global speed scale.
    pub speed: f32,
    /// Visible trail length in glyphs.
    pub trail: u32,
    /// Seconds of highlight left.
    pub highlight: f32,
    /// Horizontal sway amplitude in pixels.
    pub drift: f32,
    /// Stream index shown on row zero.
    pub offset: usize,
    filler: [u8; FILLER_SLOTS],
    profile: Arc<Profile>,
    stream: GlyphStream,
}

impl StreamColumn {
    fn spawn(
        x: f32,
        rows: f32,
        profile: Arc<Profile>,
        style: EncodingStyle,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut filler = [0u8; FILLER_SLOTS];
        for slot in &mut filler {
            *slot = rng.index(FILLER.len()) as u8;
        }
        let mut col = Self {
            x,
            head: 0.0,
            speed: 0.0,
            trail: 0,
            highlight: 0.0,
            drift: 0.0,
            offset: 0,
            filler,
            stream: GlyphStream::default(),
            profile,
        };
        col.reset_geometry(rows, rng);
        col.head = -rng.range_f32(0.0, rows.max(1.0));
        col.encode(style, rng);
        col
    }

    fn reset_geometry(&mut self, rows: f32, rng: &mut dyn RandomSource) {
        self.head = -rng.range_f32(0.0, (rows / 2.0).max(1.0));
        self.speed = rng.range_f32(SPEED_ROWS.0, SPEED_ROWS.1);
        self.trail = rng.range_u64(TRAIL_ROWS.0, TRAIL_ROWS.1) as u32;
        self.drift = rng.range_f32(-MAX_DRIFT_PX, MAX_DRIFT_PX);
        self.highlight = 0.0;
    }

    fn encode(&mut self, style: EncodingStyle, rng: &mut dyn RandomSource) {
        let encoded = EncodedStream::new(&self.profile, style);
        self.stream = build_glyph_stream(&encoded, rng);
        self.offset = rng.index(self.stream.len().max(1));
    }

    fn bind(&mut self, profile: Arc<Profile>, style: EncodingStyle, rng: &mut dyn RandomSource) {
        self.profile = profile;
        self.encode(style, rng);
    }

    /// Profile currently displayed.
    pub fn profile(&self) -> &Arc<Profile> {
        &self.profile
    }

    /// Padded stream being scrolled.
    pub fn stream(&self) -> &GlyphStream {
        &self.stream
    }

    /// Stream index on `row`.
    pub fn index_at(&self, row: usize) -> usize {
        self.offset.wrapping_add(row)
    }

    /// Filler character substituted at stream index `index`.
    pub fn filler_at(&self, index: usize) -> char {
        FILLER[self.filler[index % FILLER_SLOTS] as usize % FILLER.len()]
    }

    /// Row of the head, if it has entered the surface.
    pub fn head_row(&self) -> Option<usize> {
        (self.head >= 0.0).then(|| self.head.floor() as usize)
    }
}

/// Owns every glyph column and drives them through advance and render.
#[derive(Debug, Default)]
pub struct StreamColumnManager {
    columns: Vec<StreamColumn>,
    width: u32,
    rows: f32,
    cell_size: u32,
    style: EncodingStyle,
}

impl StreamColumnManager {
    /// Empty manager; the first [`StreamColumnManager::resize`] populates it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active columns.
    pub fn columns(&self) -> &[StreamColumn] {
        &self.columns
    }

    /// Number of active columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns exist yet.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Visible rows for the current surface.
    pub fn rows(&self) -> f32 {
        self.rows
    }

    /// Match the column set to the surface; rebuilds from scratch only when the count changes.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        config: &Config,
        source: &mut ProfileSource,
        rng: &mut dyn RandomSource,
    ) {
        let cell = config.cell_size.max(1);
        let count = column_count(width, cell, config.density, config.max_columns);
        self.rows = (height as f32 / cell as f32).ceil();
        let pitch = width as f32 / count as f32;

        if count != self.columns.len() || cell != self.cell_size {
            tracing::debug!(count, rows = self.rows, "rebuilding glyph columns");
            self.style = config.encoding;
            let rows = self.rows;
            let style = self.style;
            self.columns = (0..count)
                .map(|i| {
                    let profile = source.next_profile(rng);
                    StreamColumn::spawn(i as f32 * pitch, rows, profile, style, rng)
                })
                .collect();
        } else if width != self.width {
            for (i, col) in self.columns.iter_mut().enumerate() {
                col.x = i as f32 * pitch;
            }
        }
        self.width = width;
        self.cell_size = cell;
    }

    /// Step every column by `dt` seconds.
    pub fn advance(
        &mut self,
        dt: f32,
        config: &Config,
        source: &mut ProfileSource,
        rng: &mut dyn RandomSource,
    ) {
        if config.encoding != self.style {
            self.style = config.encoding;
            for col in &mut self.columns {
                col.encode(self.style, rng);
            }
        }
        let limit = self.rows + RECYCLE_MARGIN;
        for col in &mut self.columns {
            col.head += col.speed * config.speed * dt;
            col.highlight = (col.highlight - dt).max(0.0);
            if let Some(row) = col.head_row()
                && col.stream.is_key(col.index_at(row))
            {
                col.highlight = HIGHLIGHT_SECS;
            }

            if col.head - col.trail as f32 > limit {
                col.reset_geometry(self.rows, rng);
                col.bind(source.next_profile(rng), self.style, rng);
                continue;
            }
            if rng.chance(SHIMMER_CHANCE) {
                let slot = rng.index(FILLER_SLOTS);
                col.filler[slot] = rng.index(FILLER.len()) as u8;
            }
            if rng.chance(REBIND_CHANCE) {
                col.bind(source.next_profile(rng), self.style, rng);
            }
        }
    }

    /// Draw every trail; `time` (seconds) drives the key pulse and sway.
    pub fn render(&self, surface: &mut Surface, atlas: &GlyphAtlas, config: &Config, time: f32) {
        let tint = config.theme.tint();
        let head_tint = tint.lerp(Rgb8::WHITE, 0.75);
        let cell = atlas.cell_size();
        let pulse = 0.5 + 0.5 * (time * 8.0).sin();

        for col in &self.columns {
            let Some(head) = col.head_row() else {
                continue;
            };
            let sway = col.drift * (time * 0.7 + col.x * 0.01).sin();
            let x = (col.x + sway).round() as i32;
            let trail = col.trail.max(1);
            for k in 0..trail {
                let Some(row) = head.checked_sub(k as usize) else {
                    break;
                };
                if row as f32 >= self.rows {
                    continue;
                }
                let index = col.index_at(row);
                let glyph = col
                    .stream
                    .char_at(index)
                    .and_then(|c| atlas.glyph_index(c))
                    .or_else(|| atlas.glyph_index(col.filler_at(index)));
                let Some(glyph) = glyph else {
                    continue;
                };

                let mut alpha = 1.0 - k as f32 / trail as f32;
                let mut color = if k == 0 { head_tint } else { tint };
                let keyed = col.stream.is_key(index);
                let lit = k == 0 && col.highlight > 0.0;
                if keyed || lit {
                    let weight = if keyed {
                        1.0
                    } else {
                        col.highlight / HIGHLIGHT_SECS
                    };
                    let boost = config.glow * (0.35 + 0.65 * pulse) * weight;
                    alpha = (alpha + boost).min(1.0);
                    color = color.lerp(Rgb8::WHITE, boost * 0.5);
                }
                surface.blit(
                    atlas.bitmap(),
                    atlas.cell_rect(glyph),
                    x,
                    (row as u32 * cell) as i32,
                    Some(color),
                    alpha,
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/columns/manager.rs"]
mod tests;
