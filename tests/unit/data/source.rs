use super::*;
use crate::data::supplier::fallback_profiles;
use crate::foundation::clock::ManualClock;
use crate::foundation::error::CodefallError;
use crate::foundation::rng::StdRandom;

struct Fixed(Vec<Profile>);

impl ProfileSupplier for Fixed {
    fn fetch_profiles(&self, filter: &ProfileFilter) -> CodefallResult<Vec<Profile>> {
        Ok(self.0.iter().take(filter.limit as usize).cloned().collect())
    }
}

struct Broken;

impl ProfileSupplier for Broken {
    fn fetch_profiles(&self, _filter: &ProfileFilter) -> CodefallResult<Vec<Profile>> {
        Err(CodefallError::data("offline"))
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(ManualClock::new(1_700_000_000_000))
}

fn filter(limit: u32) -> ProfileFilter {
    ProfileFilter {
        limit,
        ..ProfileFilter::default()
    }
}

#[test]
fn empty_synthetic_pool_fills_on_request() {
    let mut rng = StdRandom::seeded(1);
    let mut src = ProfileSource::synthetic(clock(), TaskQueue::inline());
    let got = src.get_profiles(5, &mut rng);
    assert_eq!(got.len(), 5);
    assert_eq!(src.len(), 5);
    for (i, a) in got.iter().enumerate() {
        assert!(!a.name.is_empty() && !a.job.is_empty());
        for b in &got[i + 1..] {
            assert_ne!(a.id, b.id);
        }
    }
}

#[test]
fn small_fixed_pool_repeats_cyclically() {
    let mut rng = StdRandom::seeded(1);
    let pool = fallback_profiles();
    let mut src = ProfileSource::fixed(pool[..3].to_vec(), clock());
    let got = src.get_profiles(7, &mut rng);
    assert_eq!(got.len(), 7);
    for (i, p) in got.iter().enumerate() {
        assert_eq!(p.id, pool[i % 3].id);
    }
    assert_eq!(src.len(), 3);
}

#[test]
fn next_profile_cycles() {
    let mut rng = StdRandom::seeded(1);
    let pool = fallback_profiles();
    let mut src = ProfileSource::fixed(pool[..2].to_vec(), clock());
    let ids: Vec<_> = (0..5).map(|_| src.next_profile(&mut rng).id.clone()).collect();
    let want: Vec<_> = [0, 1, 0, 1, 0].iter().map(|&i| pool[i].id.clone()).collect();
    assert_eq!(ids, want);
}

#[test]
fn refresh_replaces_pool_only_on_drain() {
    let mut rng = StdRandom::seeded(2);
    let mut src = ProfileSource::synthetic(clock(), TaskQueue::inline())
        .with_supplier(Arc::new(Fixed(fallback_profiles())));
    src.seed(SEED_POOL, &mut rng);
    let bound = src.next_profile(&mut rng);

    assert!(src.request_refresh(filter(4)));
    assert!(!src.request_refresh(filter(4)), "one refresh in flight at a time");
    assert!(src.is_synthetic());
    assert_eq!(src.len(), SEED_POOL);

    assert_eq!(src.drain(), Some(4));
    assert!(!src.is_synthetic());
    assert_eq!(src.next_profile(&mut rng).id, fallback_profiles()[0].id);
    assert!(fallback_profiles().iter().all(|p| p.id != bound.id));
    assert_eq!(src.get_profiles(6, &mut rng).len(), 6);
    assert_eq!(src.len(), 4, "external pool does not grow");
}

#[test]
fn failed_refresh_keeps_pool() {
    let mut rng = StdRandom::seeded(3);
    let mut src =
        ProfileSource::synthetic(clock(), TaskQueue::inline()).with_supplier(Arc::new(Broken));
    src.seed(8, &mut rng);
    let before: Vec<_> = src.get_profiles(8, &mut rng).iter().map(|p| p.id.clone()).collect();
    assert!(src.request_refresh(filter(10)));
    assert_eq!(src.drain(), None);
    let after: Vec<_> = src.get_profiles(8, &mut rng).iter().map(|p| p.id.clone()).collect();
    assert_eq!(before, after);
    assert!(src.is_synthetic());
}

#[test]
fn refresh_without_supplier_is_refused() {
    let mut src = ProfileSource::synthetic(clock(), TaskQueue::inline());
    assert!(!src.has_supplier());
    assert!(!src.request_refresh(filter(1)));
    assert_eq!(src.pending_refreshes(), 0);
}

#[test]
fn refresh_for_replaced_supplier_is_dropped() {
    let mut rng = StdRandom::seeded(4);
    let mut src = ProfileSource::synthetic(clock(), TaskQueue::inline())
        .with_supplier(Arc::new(Fixed(fallback_profiles())));
    src.seed(8, &mut rng);
    assert!(src.request_refresh(filter(4)));
    src.set_supplier(None);
    assert_eq!(src.drain(), None);
    assert!(src.is_synthetic());
    assert_eq!(src.len(), 8);
    assert_eq!(src.pending_refreshes(), 0);
}

#[test]
fn reset_returns_external_pool_to_synthetic() {
    let mut rng = StdRandom::seeded(6);
    let mut src = ProfileSource::synthetic(clock(), TaskQueue::inline())
        .with_supplier(Arc::new(Fixed(fallback_profiles())));
    assert!(src.request_refresh(filter(50)));
    assert!(src.drain().is_some());
    assert!(!src.is_synthetic());

    src.set_supplier(None);
    src.reset_synthetic(SEED_POOL, &mut rng);
    assert!(src.is_synthetic());
    assert_eq!(src.len(), SEED_POOL);
    let fallback: Vec<_> = fallback_profiles().into_iter().map(|p| p.id).collect();
    assert!(
        src.get_profiles(SEED_POOL, &mut rng)
            .iter()
            .all(|p| !fallback.contains(&p.id))
    );
}
