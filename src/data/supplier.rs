//! External profile supplier boundary.
//!
//! [`ProfileSupplier`] is the contract; [`CachedSupplier`] wraps any supplier with a
//! time-boxed cache and the embedded fallback list so callers never see a failure.
//! [`DatasetDirSupplier`] is the bundled concrete supplier reading JSON datasets from disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::data::profile::{Profile, ProfileRecord};
use crate::foundation::clock::Clock;
use crate::foundation::error::{CodefallError, CodefallResult};

/// Cached lists older than this are never served.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Query parameters; also the cache key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileFilter {
    /// Borough filter (case-insensitive).
    pub area_group: Option<String>,
    /// Neighborhood-area code filter (case-insensitive).
    pub area_code: Option<String>,
    /// Maximum number of profiles.
    pub limit: u32,
}

impl ProfileFilter {
    fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.area_group.as_deref().unwrap_or("*").to_lowercase(),
            self.area_code.as_deref().unwrap_or("*").to_lowercase(),
            self.limit
        )
    }

    /// Whether `p` passes the area filters.
    pub fn matches(&self, p: &Profile) -> bool {
        fn eq(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                None => true,
                Some(w) => have.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(w)),
            }
        }
        eq(&self.area_group, &p.borough) && eq(&self.area_code, &p.area_code)
    }
}

/// Client configuration applied before first use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplierOptions {
    /// Credential forwarded to the data provider.
    pub access_token: Option<String>,
    /// Datasets to query, in order.
    pub dataset_ids: Vec<String>,
}

/// Source of externally supplied profiles.
pub trait ProfileSupplier: Send + Sync {
    /// Fetch profiles matching `filter`.
    fn fetch_profiles(&self, filter: &ProfileFilter) -> CodefallResult<Vec<Profile>>;

    /// Replace client configuration.
    fn configure(&mut self, _options: SupplierOptions) {}
}

impl<S: ProfileSupplier + ?Sized> ProfileSupplier for Box<S> {
    fn fetch_profiles(&self, filter: &ProfileFilter) -> CodefallResult<Vec<Profile>> {
        (**self).fetch_profiles(filter)
    }

    fn configure(&mut self, options: SupplierOptions) {
        (**self).configure(options);
    }
}

const FALLBACK_JSON: &str = include_str!("fallback_profiles.json");

/// The fixed embedded sample list served when a fetch fails or returns nothing.
pub fn fallback_profiles() -> Vec<Profile> {
    match serde_json::from_str::<Vec<ProfileRecord>>(FALLBACK_JSON) {
        Ok(records) => records.into_iter().map(Profile::from_record).collect(),
        Err(err) => {
            tracing::error!(%err, "embedded fallback profiles failed to parse");
            Vec::new()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
    created_ms: u64,
    profiles: Vec<Profile>,
}

/// Time-boxed caching and fallback around another supplier.
pub struct CachedSupplier<S> {
    inner: S,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    cache_path: Option<PathBuf>,
}

impl<S: ProfileSupplier> CachedSupplier<S> {
    /// Wrap `inner` with an in-memory cache using [`CACHE_TTL`].
    pub fn new(inner: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            clock,
            ttl: CACHE_TTL,
            entries: Mutex::new(HashMap::new()),
            cache_path: None,
        }
    }

    /// Also persist entries to a JSON file; unreadable or corrupt files count as misses.
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Override the time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Borrow the wrapped supplier.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fetch through the cache. Never fails: errors and empty results yield
    /// [`fallback_profiles`].
    #[tracing::instrument(skip(self), fields(key = %filter.cache_key()))]
    pub fn fetch_or_fallback(&self, filter: &ProfileFilter) -> Vec<Profile> {
        let key = filter.cache_key();
        let now = self.clock.now_ms();

        if let Some(hit) = self.lookup(&key, now) {
            tracing::debug!(count = hit.len(), "supplier cache hit");
            return hit;
        }

        match self.inner.fetch_profiles(filter) {
            Ok(profiles) if !profiles.is_empty() => {
                let entry = CacheEntry {
                    created_ms: now,
                    profiles: profiles.clone(),
                };
                self.store(key, entry);
                profiles
            }
            Ok(_) => {
                tracing::warn!("supplier returned no profiles; serving fallback sample");
                fallback_profiles()
            }
            Err(err) => {
                tracing::warn!(%err, "supplier fetch failed; serving fallback sample");
                fallback_profiles()
            }
        }
    }

    fn fresh(&self, entry: &CacheEntry, now: u64) -> bool {
        now.saturating_sub(entry.created_ms) < self.ttl.as_millis() as u64
    }

    fn lookup(&self, key: &str, now: u64) -> Option<Vec<Profile>> {
        let mut entries = self.entries.lock().ok()?;
        if let Some(entry) = entries.get(key) {
            if self.fresh(entry, now) {
                return Some(entry.profiles.clone());
            }
            entries.remove(key);
        }

        let path = self.cache_path.as_deref()?;
        let mut disk = match read_cache_file(path) {
            Ok(disk) => disk,
            Err(err) => {
                tracing::debug!(%err, "supplier cache file unavailable; treating as miss");
                return None;
            }
        };
        let entry = disk.remove(key)?;
        if !self.fresh(&entry, now) {
            return None;
        }
        let out = entry.profiles.clone();
        entries.insert(key.to_string(), entry);
        Some(out)
    }

    fn store(&self, key: String, entry: CacheEntry) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.insert(key, entry);
        if let Some(path) = self.cache_path.as_deref() {
            let now = self.clock.now_ms();
            let snapshot: HashMap<&String, &CacheEntry> = entries
                .iter()
                .filter(|(_, e)| self.fresh(e, now))
                .collect();
            if let Err(err) = write_cache_file(path, &snapshot) {
                tracing::debug!(%err, "supplier cache write failed; continuing without persistence");
            }
        }
    }
}

impl<S: ProfileSupplier> ProfileSupplier for CachedSupplier<S> {
    fn fetch_profiles(&self, filter: &ProfileFilter) -> CodefallResult<Vec<Profile>> {
        Ok(self.fetch_or_fallback(filter))
    }

    /// Forward to the wrapped supplier and drop cached lists from the previous configuration.
    fn configure(&mut self, options: SupplierOptions) {
        self.inner.configure(options);
        if let Ok(entries) = self.entries.get_mut() {
            entries.clear();
        }
    }
}

fn read_cache_file(path: &Path) -> CodefallResult<HashMap<String, CacheEntry>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read supplier cache '{}'", path.display()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_cache_file(path: &Path, entries: &HashMap<&String, &CacheEntry>) -> CodefallResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create cache dir '{}'", parent.display()))?;
    }
    let bytes = serde_json::to_vec(entries)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write supplier cache '{}'", path.display()))?;
    Ok(())
}

/// Reads datasets from `<root>/<dataset id>.json`, each a JSON array of loose profile records.
#[derive(Clone, Debug)]
pub struct DatasetDirSupplier {
    root: PathBuf,
    options: SupplierOptions,
}

impl DatasetDirSupplier {
    /// Supplier rooted at `root` with no datasets configured yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: SupplierOptions::default(),
        }
    }

    /// Directory datasets are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_dataset(&self, id: &str) -> CodefallResult<Vec<ProfileRecord>> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(CodefallError::validation(format!(
                "dataset id '{id}' must be a bare name"
            )));
        }
        let path = self.root.join(format!("{id}.json"));
        let bytes =
            std::fs::read(&path).with_context(|| format!("read dataset '{}'", path.display()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ProfileSupplier for DatasetDirSupplier {
    #[tracing::instrument(skip(self), fields(authenticated = self.options.access_token.is_some()))]
    fn fetch_profiles(&self, filter: &ProfileFilter) -> CodefallResult<Vec<Profile>> {
        if self.options.dataset_ids.is_empty() {
            return Err(CodefallError::data("no dataset identifiers configured"));
        }
        let limit = filter.limit.max(1) as usize;
        let mut out = Vec::new();
        for id in &self.options.dataset_ids {
            for rec in self.read_dataset(id)? {
                let p = Profile::from_record(rec);
                if filter.matches(&p) {
                    out.push(p);
                    if out.len() >= limit {
                        return Ok(out);
                    }
                }
            }
        }
        Ok(out)
    }

    fn configure(&mut self, options: SupplierOptions) {
        self.options = options;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/supplier.rs"]
mod tests;
