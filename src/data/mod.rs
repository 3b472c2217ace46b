//! Profile records, synthetic generation, external supply and the shared pool.

/// The profile record and its loosely typed input form.
pub mod profile;
pub mod source;
pub mod supplier;
pub mod synth;
