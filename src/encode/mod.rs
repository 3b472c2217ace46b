//! Profile-to-text encoding and glyph stream padding.

mod painter;
mod stream;

pub use painter::{
    EncodedStream, KEY_LABELS, encode, format_income, key_positions, key_positions_in,
};
pub use stream::{FILLER, GlyphStream, PAD, build_glyph_stream};
