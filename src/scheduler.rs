//! Frame-driven render loop.
//!
//! [`Scheduler::tick`] is the only place simulation state changes: it drains finished background
//! work, recomputes targets from the current surface and config, advances the active mode and
//! draws the frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DataSourceKind, RenderMode};
use crate::columns::StreamColumnManager;
use crate::data::source::{ProfileSource, SEED_POOL};
use crate::data::supplier::{
    CachedSupplier, DatasetDirSupplier, ProfileFilter, ProfileSupplier, SupplierOptions,
};
use crate::foundation::clock::{Clock, SystemClock};
use crate::foundation::core::SurfaceSize;
use crate::foundation::error::CodefallResult;
use crate::foundation::rng::{RandomSource, StdRandom};
use crate::panels::PanelCompositor;
use crate::render::atlas::{GlyphAtlas, main_charset};
use crate::render::overlay::ScanlineOverlay;
use crate::render::surface::Surface;
use crate::render::text::FontSpec;
use crate::work::TaskQueue;

/// Largest simulation step taken in one tick.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(50);
/// Interval over which the frame rate is sampled.
pub const FPS_WINDOW: Duration = Duration::from_millis(500);
/// Opacity of the black fill that leaves glyph trails behind.
pub const TRAIL_FADE_ALPHA: f32 = 0.08;

/// Rolling frames-per-second estimate.
#[derive(Clone, Debug, Default)]
pub struct FpsMeter {
    window_start: Option<Duration>,
    frames: u32,
    fps: f32,
}

impl FpsMeter {
    /// Meter with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame at `now`; returns the new estimate when a window closes.
    pub fn record(&mut self, now: Duration) -> Option<f32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_sub(start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }

    /// Latest estimate; zero until the first window closes.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Summary of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Simulation step taken.
    pub dt: Duration,
    /// Current frame-rate estimate.
    pub fps: f32,
    /// Live glyph columns.
    pub columns: usize,
    /// Live file strips.
    pub strips: usize,
    /// Background tasks not yet drained.
    pub pending: usize,
}

/// Owns the surface, both mode managers and the profile pool.
pub struct Scheduler {
    config: Config,
    surface: Surface,
    font: FontSpec,
    atlas: GlyphAtlas,
    columns: StreamColumnManager,
    panels: PanelCompositor,
    source: ProfileSource,
    overlay: ScanlineOverlay,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    data: DataKey,
    refresh_wanted: bool,
    fps: FpsMeter,
    last_tick: Option<Duration>,
    time: f32,
}

/// Config fields that decide which supplier backs the pool.
#[derive(Clone, Debug, PartialEq)]
struct SupplierKey {
    kind: DataSourceKind,
    data_dir: Option<PathBuf>,
    dataset_ids: Vec<String>,
    access_token: Option<String>,
    cache_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
struct DataKey {
    supplier: SupplierKey,
    filter: ProfileFilter,
}

impl DataKey {
    fn of(config: &Config) -> Self {
        Self {
            supplier: SupplierKey {
                kind: config.data_source,
                data_dir: config.data_dir.clone(),
                dataset_ids: config.dataset_ids.clone(),
                access_token: config.access_token.clone(),
                cache_path: config.cache_path.clone(),
            },
            filter: profile_filter(config),
        }
    }
}

impl Scheduler {
    /// Assemble a scheduler from explicit parts.
    pub fn new(
        config: Config,
        size: SurfaceSize,
        font: FontSpec,
        source: ProfileSource,
        rng: Box<dyn RandomSource>,
    ) -> CodefallResult<Self> {
        let config = config.normalized();
        let atlas = GlyphAtlas::build(&main_charset(), config.cell_size, font.raster().as_mut())?;
        let panels = PanelCompositor::new(font.clone(), TaskQueue::for_threads(config.worker_threads)?);
        let clock = source.clock();
        let data = DataKey::of(&config);
        let mut out = Self {
            config,
            surface: Surface::filled(size.width, size.height, [0, 0, 0, 255]),
            font,
            atlas,
            columns: StreamColumnManager::new(),
            panels,
            source,
            overlay: ScanlineOverlay::new(),
            rng,
            clock,
            data,
            refresh_wanted: false,
            fps: FpsMeter::new(),
            last_tick: None,
            time: 0.0,
        };
        out.panels.set_bounds(size.width, size.height);
        Ok(out)
    }

    /// Wire every collaborator from `config`: font discovery, seeded randomness, the profile
    /// pool and, for external data, a cached dataset supplier with an initial refresh.
    #[tracing::instrument(skip(config))]
    pub fn from_config(config: Config, size: SurfaceSize) -> CodefallResult<Self> {
        let config = config.normalized();
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(StdRandom::seeded(seed)),
            None => Box::new(StdRandom::from_entropy()),
        };
        let font = FontSpec::discover(config.font_path.as_deref());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let mut source =
            ProfileSource::synthetic(clock.clone(), TaskQueue::for_threads(config.worker_threads)?);
        if let Some(supplier) = external_supplier(&config, clock) {
            source = source.with_supplier(supplier);
        }
        let mut out = Self::new(config, size, font, source, rng)?;
        out.source.seed(SEED_POOL, out.rng.as_mut());
        out.refresh_profiles();
        Ok(out)
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Edit the configuration; the result is clamped into range and takes effect on the next
    /// tick.
    pub fn update(&mut self, edit: impl FnOnce(&mut Config)) {
        edit(&mut self.config);
        self.config = std::mem::take(&mut self.config).normalized();
    }

    /// Framebuffer holding the last drawn frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Profile pool.
    pub fn source(&self) -> &ProfileSource {
        &self.source
    }

    /// Glyph-column manager.
    pub fn columns(&self) -> &StreamColumnManager {
        &self.columns
    }

    /// Panel compositor.
    pub fn panels(&self) -> &PanelCompositor {
        &self.panels
    }

    /// Latest frame-rate estimate.
    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Queue an external refresh with the configured filters; `false` when not applicable.
    pub fn refresh_profiles(&mut self) -> bool {
        if self.config.data_source != DataSourceKind::External {
            return false;
        }
        self.source.request_refresh(profile_filter(&self.config))
    }

    /// Resize for a viewport in CSS pixels; the device pixel ratio is capped at 2.
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) {
        let size = SurfaceSize::for_viewport(css_width, css_height, device_pixel_ratio);
        self.resize_pixels(size);
    }

    /// Resize to an exact pixel size.
    pub fn resize_pixels(&mut self, size: SurfaceSize) {
        if size == self.surface.size() {
            return;
        }
        tracing::debug!(width = size.width, height = size.height, "surface resized");
        self.surface = Surface::filled(size.width, size.height, [0, 0, 0, 255]);
        self.panels.set_bounds(size.width, size.height);
    }

    /// Run one frame at monotonic time `now`.
    pub fn tick(&mut self, now: Duration) -> FrameStats {
        let dt = match self.last_tick {
            Some(prev) => now.saturating_sub(prev).min(MAX_FRAME_DT),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        let step = dt.as_secs_f32();
        self.time += step;

        self.source.drain();
        self.panels.drain(&self.config, self.rng.as_mut());
        self.sync_data_source();
        self.sync_atlas();

        let SurfaceSize { width, height } = self.surface.size();
        let rng = self.rng.as_mut();
        match self.config.mode {
            RenderMode::Columns => {
                self.panels.reconcile(0, &self.config, &mut self.source, rng);
                self.columns
                    .resize(width, height, &self.config, &mut self.source, rng);
                self.columns
                    .advance(step, &self.config, &mut self.source, rng);
            }
            RenderMode::Panels => {
                let target = self.config.panel_target();
                self.panels
                    .reconcile(target, &self.config, &mut self.source, rng);
                self.panels.advance(step, &self.config, rng);
            }
        }

        self.surface.fade(TRAIL_FADE_ALPHA);
        match self.config.mode {
            RenderMode::Columns => {
                self.columns
                    .render(&mut self.surface, &self.atlas, &self.config, self.time);
            }
            RenderMode::Panels => {
                self.panels
                    .render(&mut self.surface, &self.config, self.rng.as_mut());
            }
        }
        if let Err(err) = self.overlay.apply(&mut self.surface) {
            tracing::warn!(%err, "scanline overlay skipped");
        }

        if let Some(fps) = self.fps.record(now) {
            tracing::trace!(fps, "frame rate sample");
        }
        FrameStats {
            dt,
            fps: self.fps.fps(),
            columns: self.columns.len(),
            strips: self.panels.len(),
            pending: self.panels.pending() + self.source.pending_refreshes(),
        }
    }

    /// Block until background work settles (or `timeout`), applying the results.
    pub fn settle(&mut self, timeout: Duration) {
        self.source.wait_refresh(timeout);
        self.panels
            .settle(timeout, &self.config, self.rng.as_mut());
    }

    fn sync_data_source(&mut self) {
        let key = DataKey::of(&self.config);
        if key != self.data {
            if key.supplier != self.data.supplier {
                tracing::debug!(kind = ?key.supplier.kind, "data source changed");
                match external_supplier(&self.config, self.clock.clone()) {
                    Some(supplier) => self.source.set_supplier(Some(supplier)),
                    None => {
                        self.source.set_supplier(None);
                        if !self.source.is_synthetic() {
                            self.source.reset_synthetic(SEED_POOL, self.rng.as_mut());
                        }
                    }
                }
            }
            self.data = key;
            self.refresh_wanted = self.source.has_supplier();
        }
        // A refresh still in flight refuses the request; retry on later ticks.
        if self.refresh_wanted && self.refresh_profiles() {
            self.refresh_wanted = false;
        }
    }

    fn sync_atlas(&mut self) {
        if self.atlas.cell_size() == self.config.cell_size {
            return;
        }
        let mut raster = self.font.raster();
        match GlyphAtlas::build(&main_charset(), self.config.cell_size, raster.as_mut()) {
            Ok(atlas) => self.atlas = atlas,
            Err(err) => tracing::warn!(%err, "atlas rebuild failed; keeping previous cell size"),
        }
    }
}

fn profile_filter(config: &Config) -> ProfileFilter {
    ProfileFilter {
        area_group: config.area_group.clone(),
        area_code: config.area_code.clone(),
        limit: config.fetch_limit,
    }
}

/// Cached dataset-directory supplier for an external configuration; `None` when the data source
/// is synthetic or no data directory is set.
pub fn external_supplier(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Option<Arc<dyn ProfileSupplier>> {
    if config.data_source != DataSourceKind::External {
        return None;
    }
    let Some(dir) = config.data_dir.clone() else {
        tracing::warn!("external data source selected without a data directory; staying synthetic");
        return None;
    };
    let mut supplier = CachedSupplier::new(DatasetDirSupplier::new(dir), clock);
    if let Some(path) = &config.cache_path {
        supplier = supplier.with_cache_file(path);
    }
    supplier.configure(SupplierOptions {
        access_token: config.access_token.clone(),
        dataset_ids: config.dataset_ids.clone(),
    });
    Some(Arc::new(supplier))
}

#[cfg(test)]
#[path = "../tests/unit/scheduler.rs"]
mod tests;
