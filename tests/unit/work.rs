use super::*;

#[test]
fn inline_results_wait_for_drain() {
    let mut q = TaskQueue::inline();
    q.submit(|| 1);
    q.submit(|| 2);
    assert_eq!(q.pending(), 2);
    assert_eq!(q.drain(), vec![1, 2]);
    assert_eq!(q.pending(), 0);
    assert!(q.drain().is_empty());
}

#[test]
fn pooled_results_arrive() {
    let mut q = TaskQueue::pooled(2).unwrap();
    for i in 0..8u32 {
        q.submit(move || i * 10);
    }
    let mut got = q.wait_idle(Duration::from_secs(10));
    got.extend(q.drain());
    got.sort();
    assert_eq!(got, (0..8).map(|i| i * 10).collect::<Vec<_>>());
    assert_eq!(q.pending(), 0);
}

#[test]
fn zero_threads_selects_inline() {
    assert!(TaskQueue::<()>::for_threads(0).unwrap().is_inline());
    assert!(!TaskQueue::<()>::for_threads(1).unwrap().is_inline());
    assert!(TaskQueue::<()>::pooled(0).is_err());
}
