use std::time::Duration;

use crate::config::{Config, EncodingStyle};
use crate::data::source::ProfileSource;
use crate::foundation::error::CodefallResult;
use crate::foundation::rng::RandomSource;
use crate::panels::compose::compose_panel;
use crate::render::surface::Surface;
use crate::render::text::FontSpec;
use crate::work::TaskQueue;

/// Seconds between horizontal nudges, drawn uniformly per strip.
pub const JITTER_SECS: (f32, f32) = (0.8, 2.0);
/// Maximum horizontal nudge in pixels.
pub const JITTER_PX: f32 = 3.0;
/// Per-frame probability of the offset duplicate.
pub const GLITCH_CHANCE: f64 = 0.02;

/// Finished composition, tagged with the encoding style it was composed in.
pub type Composed = (EncodingStyle, CodefallResult<Surface>);

const STRIP_OPACITY: f32 = 0.92;
const GLITCH_OPACITY: f32 = 0.22;

/// One composed panel falling as a rigid block.
#[derive(Clone, Debug)]
pub struct FileStrip {
    /// Untinted panel bitmap.
    pub bitmap: Surface,
    /// Resting left edge; jitter is applied around it.
    pub home_x: f32,
    /// Current left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Fall speed in pixels per second.
    pub speed: f32,
    /// Seconds until the next nudge.
    pub jitter_in: f32,
}

impl FileStrip {
    /// Width of the bitmap.
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Height of the bitmap.
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// Keeps a density-sized pool of file strips, composing new ones in the background.
pub struct PanelCompositor {
    strips: Vec<FileStrip>,
    queue: TaskQueue<Composed>,
    font: FontSpec,
    style: EncodingStyle,
    width: u32,
    height: u32,
}

impl PanelCompositor {
    /// Compositor composing with `font` on `queue`.
    pub fn new(font: FontSpec, queue: TaskQueue<Composed>) -> Self {
        Self {
            strips: Vec::new(),
            queue,
            font,
            style: EncodingStyle::default(),
            width: 1,
            height: 1,
        }
    }

    /// Surface bounds used for placement and wrapping.
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Live strips.
    pub fn strips(&self) -> &[FileStrip] {
        &self.strips
    }

    /// Number of live strips.
    pub fn len(&self) -> usize {
        self.strips.len()
    }

    /// Whether no strips are live.
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Compositions submitted but not yet drained.
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Truncate to `target`, or submit enough compositions to reach it.
    pub fn reconcile(
        &mut self,
        target: usize,
        config: &Config,
        source: &mut ProfileSource,
        rng: &mut dyn RandomSource,
    ) {
        self.sync_style(config);
        if self.strips.len() > target {
            self.strips.truncate(target);
            return;
        }
        let missing = target.saturating_sub(self.strips.len() + self.queue.pending());
        if missing > 0 {
            tracing::debug!(missing, target, "submitting panel compositions");
        }
        for _ in 0..missing {
            let profile = source.next_profile(rng);
            let style = self.style;
            let layout = config.panel_layout;
            let font = self.font.clone();
            self.queue.submit(move || {
                let mut raster = font.raster();
                (style, compose_panel(&profile, style, &layout, raster.as_mut()))
            });
        }
    }

    /// Append finished compositions as new strips above the top edge.
    pub fn drain(&mut self, config: &Config, rng: &mut dyn RandomSource) -> usize {
        let results = self.queue.drain();
        self.append(results, config, rng)
    }

    /// Wait for in-flight compositions (up to `timeout`) and append them.
    pub fn settle(
        &mut self,
        timeout: Duration,
        config: &Config,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let results = self.queue.wait_idle(timeout);
        self.append(results, config, rng)
    }

    /// Strips composed in another style are dropped so the next reconcile recomposes them.
    fn sync_style(&mut self, config: &Config) {
        if config.encoding == self.style {
            return;
        }
        tracing::debug!(
            from = self.style.as_str(),
            to = config.encoding.as_str(),
            dropped = self.strips.len(),
            "encoding changed; recomposing panels"
        );
        self.style = config.encoding;
        self.strips.clear();
    }

    fn append(
        &mut self,
        results: Vec<Composed>,
        config: &Config,
        rng: &mut dyn RandomSource,
    ) -> usize {
        self.sync_style(config);
        let mut added = 0;
        for (style, result) in results {
            if style != self.style {
                continue;
            }
            match result {
                Ok(bitmap) => {
                    let strip = self.place(bitmap, config, rng);
                    self.strips.push(strip);
                    added += 1;
                }
                Err(err) => tracing::warn!(%err, "panel composition failed"),
            }
        }
        added
    }

    fn place(&self, bitmap: Surface, config: &Config, rng: &mut dyn RandomSource) -> FileStrip {
        let span = self.width.saturating_sub(bitmap.width()) as f32;
        let x = rng.range_f32(0.0, span).floor();
        let y = -(bitmap.height() as f32) - rng.range_f32(0.0, self.height as f32);
        FileStrip {
            home_x: x,
            x,
            y,
            speed: rng.range_f32(config.panel_speed.min, config.panel_speed.max),
            jitter_in: rng.range_f32(JITTER_SECS.0, JITTER_SECS.1),
            bitmap,
        }
    }

    /// Fall, jitter and wrap every strip.
    pub fn advance(&mut self, dt: f32, config: &Config, rng: &mut dyn RandomSource) {
        let bottom = self.height as f32;
        for strip in &mut self.strips {
            strip.y += strip.speed * config.speed * dt;
            strip.jitter_in -= dt;
            if strip.jitter_in <= 0.0 {
                strip.x = (strip.home_x + rng.range_f32(-JITTER_PX, JITTER_PX)).round();
                strip.jitter_in = rng.range_f32(JITTER_SECS.0, JITTER_SECS.1);
            }
            if strip.y > bottom {
                strip.y = -(strip.height() as f32);
            }
        }
    }

    /// Blit every strip tinted with the theme, occasionally with a glitch duplicate.
    pub fn render(&self, surface: &mut Surface, config: &Config, rng: &mut dyn RandomSource) {
        let tint = config.theme.tint();
        for strip in &self.strips {
            let (x, y) = (strip.x.round() as i32, strip.y.round() as i32);
            surface.draw(&strip.bitmap, x, y, Some(tint), STRIP_OPACITY);
            if rng.chance(GLITCH_CHANCE) {
                surface.draw(&strip.bitmap, x + 1, y + 1, Some(tint), GLITCH_OPACITY);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/panels/compositor.rs"]
mod tests;
