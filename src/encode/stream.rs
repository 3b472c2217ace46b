use std::collections::BTreeSet;

use crate::encode::painter::EncodedStream;
use crate::foundation::rng::{RandomSource, pick};

/// Filler characters padded on each side of an encoded string.
pub const PAD: usize = 40;

/// Visual-noise alphabet for padding and substitution.
pub const FILLER: &[char] = &[
    'ｦ', 'ｱ', 'ｳ', 'ｴ', 'ｵ', 'ｶ', 'ｷ', 'ｹ', 'ｺ', 'ｻ', 'ｼ', 'ｽ', 'ｾ', 'ｿ', 'ﾀ', 'ﾂ', 'ﾃ', 'ﾅ', 'ﾆ',
    'ﾇ', 'ﾈ', 'ﾊ', 'ﾋ', 'ﾎ', 'ﾏ', 'ﾐ', 'ﾑ', 'ﾒ', 'ﾓ', 'ﾔ', 'ﾕ', 'ﾗ', 'ﾘ', 'ﾜ', '0', '1', '2', '3',
    '4', '5', '7', '8', '9', ':', '.', '=', '+', '-', '<', '>',
];

/// Padded character buffer scrolled through by a stream column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphStream {
    chars: Vec<char>,
    keys: BTreeSet<usize>,
}

impl GlyphStream {
    /// Number of characters including padding.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the stream holds no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, wrapping around the buffer.
    pub fn char_at(&self, index: usize) -> Option<char> {
        if self.chars.is_empty() {
            return None;
        }
        Some(self.chars[index % self.chars.len()])
    }

    /// Whether `index` (wrapped) is a key position.
    pub fn is_key(&self, index: usize) -> bool {
        !self.chars.is_empty() && self.keys.contains(&(index % self.chars.len()))
    }

    /// Key positions, already shifted by [`PAD`].
    pub fn keys(&self) -> &BTreeSet<usize> {
        &self.keys
    }

    /// All characters in order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

/// Pad `encoded` with [`PAD`] random filler characters on each side.
pub fn build_glyph_stream(encoded: &EncodedStream, rng: &mut dyn RandomSource) -> GlyphStream {
    let mut chars = Vec::with_capacity(2 * PAD + encoded.char_len());
    chars.extend((0..PAD).map(|_| *pick(rng, FILLER)));
    chars.extend(encoded.text.chars());
    chars.extend((0..PAD).map(|_| *pick(rng, FILLER)));
    let keys = encoded.keys.iter().map(|k| k + PAD).collect();
    GlyphStream { chars, keys }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/stream.rs"]
mod tests;
