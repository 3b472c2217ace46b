//! CPU raster primitives: surfaces, compositing, blur, text, the glyph atlas and the scanline
//! overlay.

/// Prerendered glyph sheet.
pub mod atlas;
pub mod blur;
pub mod composite;
/// Scanline overlay rendered with vello_cpu.
pub mod overlay;
/// Premultiplied RGBA8 framebuffer.
pub mod surface;
pub mod text;

pub use atlas::{GlyphAtlas, main_charset};
pub use surface::{PixelRect, Surface};
pub use text::{BitmapText, FontSpec, FontText, TextRaster};
