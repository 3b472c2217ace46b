//! Runtime configuration.
//!
//! A single [`Config`] value is owned by the scheduler and passed by reference into every
//! manager. Setters clamp into the documented ranges so no out-of-range value ever reaches
//! simulation code; [`Config::normalized`] applies the same clamps to values loaded from JSON.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::CodefallResult;

/// Lower bound on the glyph column count.
pub const MIN_COLUMNS: u32 = 8;

/// Color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Classic phosphor green.
    #[default]
    Green,
    /// Cyan.
    Cyan,
    /// Magenta.
    Magenta,
}

impl Theme {
    /// Primary tint applied to glyphs and panels.
    pub fn tint(self) -> Rgb8 {
        match self {
            Self::Green => Rgb8::new(0, 255, 102),
            Self::Cyan => Rgb8::new(0, 229, 255),
            Self::Magenta => Rgb8::new(255, 64, 220),
        }
    }
}

/// Where profiles come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// Locally generated profiles only.
    #[default]
    Synthetic,
    /// External supplier with synthetic seed and fallback.
    External,
}

/// Text encoding applied to each profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStyle {
    /// Compact serialized object.
    #[default]
    Json,
    /// Pipe-delimited `key=value` pairs.
    Kv,
    /// One pseudo-declaration line.
    Code,
}

impl EncodingStyle {
    /// Short lowercase name, also used as the panel file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Kv => "kv",
            Self::Code => "code",
        }
    }
}

/// Active rendering mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Independently falling glyph columns.
    #[default]
    Columns,
    /// Falling composed text panels.
    Panels,
}

/// Text layout parameters for composed panels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLayout {
    /// Maximum text width in pixels before wrapping.
    pub max_width: f32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Distance between baselines in pixels.
    pub line_height: f32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            max_width: 260.0,
            font_size: 12.0,
            line_height: 15.0,
        }
    }
}

impl PanelLayout {
    fn normalized(self) -> Self {
        let font_size = finite_or(self.font_size, 12.0).clamp(6.0, 48.0);
        Self {
            max_width: finite_or(self.max_width, 260.0).clamp(40.0, 2048.0),
            font_size,
            line_height: finite_or(self.line_height, font_size * 1.25).max(font_size),
        }
    }
}

/// Inclusive range of fall speeds in pixels per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedRange {
    /// Slowest speed.
    pub min: f32,
    /// Fastest speed.
    pub max: f32,
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self {
            min: 30.0,
            max: 90.0,
        }
    }
}

impl SpeedRange {
    fn normalized(self) -> Self {
        let a = finite_or(self.min, 30.0).max(1.0);
        let b = finite_or(self.max, 90.0).max(1.0);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Engine configuration; every field has a default so partial JSON files load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Density scale in `[0.2, 2.0]`.
    pub density: f32,
    /// Speed scale in `[0.5, 3.0]`.
    pub speed: f32,
    /// Glow intensity in `[0, 1]`.
    pub glow: f32,
    /// Color theme.
    pub theme: Theme,
    /// Profile source selection.
    pub data_source: DataSourceKind,
    /// Coarse geographic filter (borough).
    pub area_group: Option<String>,
    /// Fine geographic filter (neighborhood-area code).
    pub area_code: Option<String>,
    /// Encoding style for every stream.
    pub encoding: EncodingStyle,
    /// Upper bound on glyph columns (never below [`MIN_COLUMNS`]).
    pub max_columns: u32,
    /// Rendering mode.
    pub mode: RenderMode,
    /// Panel text layout.
    pub panel_layout: PanelLayout,
    /// Panel fall speed range.
    pub panel_speed: SpeedRange,
    /// Glyph cell size in pixels.
    pub cell_size: u32,
    /// Font file used for glyphs and panels; system monospace when unset.
    pub font_path: Option<PathBuf>,
    /// Directory holding external dataset files.
    pub data_dir: Option<PathBuf>,
    /// Dataset identifiers queried by the external supplier.
    pub dataset_ids: Vec<String>,
    /// Access token forwarded to the external supplier.
    pub access_token: Option<String>,
    /// Optional on-disk supplier cache.
    pub cache_path: Option<PathBuf>,
    /// Maximum profiles requested per external fetch.
    pub fetch_limit: u32,
    /// Background worker threads; `0` runs background work inline.
    pub worker_threads: usize,
    /// Seed for deterministic runs; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            density: 1.0,
            speed: 1.0,
            glow: 0.6,
            theme: Theme::default(),
            data_source: DataSourceKind::default(),
            area_group: None,
            area_code: None,
            encoding: EncodingStyle::default(),
            max_columns: 180,
            mode: RenderMode::default(),
            panel_layout: PanelLayout::default(),
            panel_speed: SpeedRange::default(),
            cell_size: 18,
            font_path: None,
            data_dir: None,
            dataset_ids: Vec::new(),
            access_token: None,
            cache_path: None,
            fetch_limit: 200,
            worker_threads: 2,
            seed: None,
        }
    }
}

impl Config {
    /// Load a JSON config file and clamp every field into range.
    pub fn load(path: &Path) -> CodefallResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        Ok(cfg.normalized())
    }

    /// Copy with every numeric field clamped into its documented range.
    pub fn normalized(mut self) -> Self {
        self.set_density(self.density);
        self.set_speed(self.speed);
        self.set_glow(self.glow);
        self.set_max_columns(self.max_columns);
        self.set_cell_size(self.cell_size);
        self.panel_layout = self.panel_layout.normalized();
        self.panel_speed = self.panel_speed.normalized();
        self.fetch_limit = self.fetch_limit.clamp(1, 50_000);
        self.area_group = non_blank(self.area_group.take());
        self.area_code = non_blank(self.area_code.take());
        self
    }

    /// Set density, clamped to `[0.2, 2.0]`.
    pub fn set_density(&mut self, v: f32) {
        self.density = finite_or(v, 1.0).clamp(0.2, 2.0);
    }

    /// Set speed scale, clamped to `[0.5, 3.0]`.
    pub fn set_speed(&mut self, v: f32) {
        self.speed = finite_or(v, 1.0).clamp(0.5, 3.0);
    }

    /// Set glow intensity, clamped to `[0, 1]`.
    pub fn set_glow(&mut self, v: f32) {
        self.glow = finite_or(v, 0.6).clamp(0.0, 1.0);
    }

    /// Set the column cap; never below [`MIN_COLUMNS`].
    pub fn set_max_columns(&mut self, v: u32) {
        self.max_columns = v.max(MIN_COLUMNS);
    }

    /// Set the glyph cell size, clamped to `[8, 64]` pixels.
    pub fn set_cell_size(&mut self, v: u32) {
        self.cell_size = v.clamp(8, 64);
    }

    /// Set the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Set the encoding style.
    pub fn set_encoding(&mut self, style: EncodingStyle) {
        self.encoding = style;
    }

    /// Set the rendering mode.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Set the data source.
    pub fn set_data_source(&mut self, kind: DataSourceKind) {
        self.data_source = kind;
    }

    /// Set the geographic filters; blank strings clear a filter.
    pub fn set_area_filter(&mut self, group: Option<String>, code: Option<String>) {
        self.area_group = non_blank(group);
        self.area_code = non_blank(code);
    }

    /// Set panel layout (clamped).
    pub fn set_panel_layout(&mut self, layout: PanelLayout) {
        self.panel_layout = layout.normalized();
    }

    /// Set panel speed range (ordered and clamped).
    pub fn set_panel_speed(&mut self, range: SpeedRange) {
        self.panel_speed = range.normalized();
    }

    /// Desired panel pool size: `clamp(floor(40 * density), 10, 100)`.
    pub fn panel_target(&self) -> usize {
        ((40.0 * self.density).floor() as usize).clamp(10, 100)
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
