//! Cyclable profile pool with optional asynchronous external refresh.

use std::sync::Arc;
use std::time::Duration;

use crate::data::profile::Profile;
use crate::data::supplier::{ProfileFilter, ProfileSupplier};
use crate::data::synth::synth_profiles;
use crate::foundation::clock::Clock;
use crate::foundation::error::CodefallResult;
use crate::foundation::rng::RandomSource;
use crate::work::TaskQueue;

/// Pool size seeded synchronously before an external refresh lands.
pub const SEED_POOL: usize = 32;

/// Finished refresh, tagged with the supplier generation it was requested under.
pub type Refresh = (u64, CodefallResult<Vec<Profile>>);

/// Ordered pool of profiles handed out to streams.
///
/// Exactly one pool exists at a time. While it holds synthetic profiles it grows on demand;
/// once an external refresh succeeds the pool is replaced wholesale and no longer grows.
pub struct ProfileSource {
    pool: Vec<Arc<Profile>>,
    cursor: usize,
    synthetic: bool,
    clock: Arc<dyn Clock>,
    supplier: Option<Arc<dyn ProfileSupplier>>,
    generation: u64,
    refresh: TaskQueue<Refresh>,
}

impl ProfileSource {
    /// Empty synthetic pool; refresh work runs on `refresh`.
    pub fn synthetic(
        clock: Arc<dyn Clock>,
        refresh: TaskQueue<Refresh>,
    ) -> Self {
        Self {
            pool: Vec::new(),
            cursor: 0,
            synthetic: true,
            clock,
            supplier: None,
            generation: 0,
            refresh,
        }
    }

    /// Fixed, non-growing pool (cyclic repetition applies when it is small).
    pub fn fixed(profiles: Vec<Profile>, clock: Arc<dyn Clock>) -> Self {
        let mut src = Self::synthetic(clock, TaskQueue::inline());
        src.replace_pool(profiles);
        src
    }

    /// Attach an external supplier used by [`ProfileSource::request_refresh`].
    pub fn with_supplier(mut self, supplier: Arc<dyn ProfileSupplier>) -> Self {
        self.set_supplier(Some(supplier));
        self
    }

    /// Swap the external supplier; refreshes still in flight for the previous one are dropped
    /// when they arrive.
    pub fn set_supplier(&mut self, supplier: Option<Arc<dyn ProfileSupplier>>) {
        self.supplier = supplier;
        self.generation += 1;
    }

    /// Discard the pool and start over with `count` generated profiles.
    pub fn reset_synthetic(&mut self, count: usize, rng: &mut dyn RandomSource) {
        self.pool.clear();
        self.cursor = 0;
        self.synthetic = true;
        self.seed(count, rng);
    }

    /// Clock stamping generated profiles.
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Whether an external supplier is configured.
    pub fn has_supplier(&self) -> bool {
        self.supplier.is_some()
    }

    /// Whether the pool still holds generated profiles.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Current pool size.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Refreshes submitted but not yet drained.
    pub fn pending_refreshes(&self) -> usize {
        self.refresh.pending()
    }

    /// Grow a synthetic pool to at least `count` entries.
    pub fn seed(&mut self, count: usize, rng: &mut dyn RandomSource) {
        if !self.synthetic || self.pool.len() >= count {
            return;
        }
        let missing = count - self.pool.len();
        let now = self.clock.now_ms();
        self.pool
            .extend(synth_profiles(rng, now, missing).into_iter().map(Arc::new));
    }

    /// Exactly `count` profiles; element `i` is `pool[i % pool_len]`.
    pub fn get_profiles(
        &mut self,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<Arc<Profile>> {
        if count == 0 {
            return Vec::new();
        }
        self.seed(count, rng);
        if self.pool.is_empty() {
            self.synthetic = true;
            self.seed(count, rng);
        }
        let len = self.pool.len();
        (0..count).map(|i| self.pool[i % len].clone()).collect()
    }

    /// Next pool entry in cyclic order, generating one if the pool is empty.
    pub fn next_profile(&mut self, rng: &mut dyn RandomSource) -> Arc<Profile> {
        if self.pool.is_empty() {
            self.synthetic = true;
            self.seed(1, rng);
        }
        let p = self.pool[self.cursor % self.pool.len()].clone();
        self.cursor = (self.cursor + 1) % self.pool.len();
        p
    }

    /// Queue an asynchronous fetch; returns `false` without a supplier or while one is in flight.
    pub fn request_refresh(&mut self, filter: ProfileFilter) -> bool {
        let Some(supplier) = self.supplier.clone() else {
            return false;
        };
        if self.refresh.pending() > 0 {
            return false;
        }
        tracing::debug!(?filter, generation = self.generation, "profile refresh requested");
        let generation = self.generation;
        self.refresh
            .submit(move || (generation, supplier.fetch_profiles(&filter)));
        true
    }

    /// Apply completed refreshes; returns the number of profiles now in the pool when it was
    /// replaced.
    pub fn drain(&mut self) -> Option<usize> {
        let results = self.refresh.drain();
        self.apply(results)
    }

    /// Block until in-flight refreshes complete (or `timeout`), then apply them.
    pub fn wait_refresh(&mut self, timeout: Duration) -> Option<usize> {
        let results = self.refresh.wait_idle(timeout);
        self.apply(results)
    }

    fn apply(&mut self, results: Vec<Refresh>) -> Option<usize> {
        let mut replaced = None;
        for (generation, result) in results {
            if generation != self.generation {
                tracing::debug!(generation, "dropping refresh for a replaced supplier");
                continue;
            }
            match result {
                Ok(profiles) if !profiles.is_empty() => {
                    self.replace_pool(profiles);
                    replaced = Some(self.pool.len());
                }
                Ok(_) => tracing::warn!("profile refresh returned nothing; keeping current pool"),
                Err(err) => tracing::warn!(%err, "profile refresh failed; keeping current pool"),
            }
        }
        replaced
    }

    fn replace_pool(&mut self, profiles: Vec<Profile>) {
        self.pool = profiles.into_iter().map(Arc::new).collect();
        self.synthetic = false;
        self.cursor = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/source.rs"]
mod tests;
