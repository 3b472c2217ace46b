//! Glyph-column rendering mode.

mod manager;

pub use manager::{
    FILLER_SLOTS, HIGHLIGHT_SECS, REBIND_CHANCE, RECYCLE_MARGIN, SHIMMER_CHANCE, StreamColumn,
    StreamColumnManager, column_count,
};
