//! File-strip rendering mode: composed text panels falling as rigid blocks.

mod compose;
mod compositor;
mod wrap;

pub use compose::{FOOTER_PX, HEADER_PX, PADDING_PX, compose_panel, panel_height};
pub use compositor::{Composed, FileStrip, GLITCH_CHANCE, JITTER_PX, JITTER_SECS, PanelCompositor};
pub use wrap::wrap_text;
