//! Replaceable random-number source.
//!
//! Generation, jitter and shimmer all draw from a [`RandomSource`] so tests can pin the exact
//! sequence. [`StdRandom`] wraps a seedable `rand` generator; [`SequenceRandom`] replays a fixed
//! list of unit floats.

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Strategy interface for all randomness in the engine.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform 64-bit integer.
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * u64::MAX as f64) as u64
    }

    /// Uniform float in `[lo, hi)`; returns `lo` when the range is empty.
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64() as f32
    }

    /// Uniform integer in `[lo, hi]` (inclusive).
    fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo).saturating_add(1);
        lo + ((self.next_f64() * span as f64) as u64).min(span - 1)
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on empty range");
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Pick one element uniformly.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.index(items.len())]
}

/// Weighted choice over `(item, weight)` pairs; zero total weight picks the first item.
pub fn pick_weighted<'a, T>(rng: &mut dyn RandomSource, table: &'a [(T, u32)]) -> &'a T {
    let total: u32 = table.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return &table[0].0;
    }
    let mut roll = rng.range_u64(0, u64::from(total) - 1) as u32;
    for (item, weight) in table {
        if roll < *weight {
            return item;
        }
        roll -= weight;
    }
    &table[table.len() - 1].0
}

/// Choose `count` distinct elements without replacement (partial Fisher-Yates).
pub fn sample<T: Clone>(rng: &mut dyn RandomSource, items: &[T], count: usize) -> Vec<T> {
    let mut idx: Vec<usize> = (0..items.len()).collect();
    let n = count.min(items.len());
    for i in 0..n {
        let j = i + rng.index(idx.len() - i);
        idx.swap(i, j);
    }
    idx[..n].iter().map(|&i| items[i].clone()).collect()
}

/// [`RandomSource`] over `rand`'s standard generator.
#[derive(Clone, Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Deterministic generator for a seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.random_range(0.0..1.0)
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

/// Replays a fixed list of unit floats, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Values are clamped into `[0, 1)`; an empty list behaves like a constant `0.0`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always returns `v`.
    pub fn constant(v: f64) -> Self {
        Self::new([v])
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
