//! codefall renders a data-driven "falling code" effect into a CPU framebuffer.
//!
//! Profile records (synthetic or loaded from datasets) are encoded into text and streamed down
//! the surface either as glyph columns or as composed text panels:
//!
//! - Build a [`Config`] and hand it to a [`Scheduler`]
//! - Call [`Scheduler::tick`] once per frame
//! - Read the frame from [`Scheduler::surface`] or write it with [`export::write_png`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod columns;
pub mod config;
pub mod data;
pub mod encode;
pub mod export;
pub mod panels;
pub mod render;
pub mod scheduler;
pub mod work;

pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::core::{MAX_DEVICE_PIXEL_RATIO, Rgb8, SurfaceSize};
pub use crate::foundation::error::{CodefallError, CodefallResult};
pub use crate::foundation::rng::{
    RandomSource, SequenceRandom, StdRandom, pick, pick_weighted, sample,
};

pub use crate::columns::{StreamColumnManager, column_count};
pub use crate::config::{Config, DataSourceKind, EncodingStyle, RenderMode, Theme};
pub use crate::data::profile::{Profile, ProfileRecord};
pub use crate::data::source::ProfileSource;
pub use crate::data::supplier::{
    CachedSupplier, DatasetDirSupplier, ProfileFilter, ProfileSupplier, SupplierOptions,
    fallback_profiles,
};
pub use crate::encode::{EncodedStream, GlyphStream, build_glyph_stream, encode, key_positions};
pub use crate::panels::PanelCompositor;
pub use crate::render::{GlyphAtlas, Surface};
pub use crate::scheduler::{FrameStats, Scheduler};
pub use crate::work::TaskQueue;
