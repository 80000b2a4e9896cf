//! Property-based tests for rust_priority_pool using proptest

use proptest::prelude::*;
use rust_priority_pool::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Occupies one worker until the returned sender is dropped.
fn occupy_worker(pool: &ThreadPool) -> mpsc::Sender<()> {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    pool.submit_with_priority(i32::MAX, move || {
        started_tx.send(()).unwrap();
        let _ = release_rx.recv();
    })
    .expect("Failed to submit blocker");
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Blocker never started");
    release_tx
}

// ============================================================================
// PoolConfig Tests
// ============================================================================

proptest! {
    /// Any positive thread count within the ceiling validates
    #[test]
    fn test_config_validates_within_ceiling(
        threads in 1usize..64,
        extra in 0usize..64,
        capacity in 1usize..10_000
    ) {
        let config = PoolConfig::new(threads)
            .with_mode(PoolMode::Elastic)
            .with_thread_ceiling(threads + extra)
            .with_queue_capacity(capacity);
        prop_assert!(config.validate().is_ok());
    }

    /// An elastic floor above the ceiling never validates
    #[test]
    fn test_config_rejects_floor_above_ceiling(ceiling in 1usize..32, excess in 1usize..32) {
        let config = PoolConfig::new(ceiling + excess)
            .with_mode(PoolMode::Elastic)
            .with_thread_ceiling(ceiling);
        prop_assert!(config.validate().is_err());
    }

    /// Configs survive a trip through JSON
    #[test]
    fn test_config_json(
        threads in 1usize..16,
        capacity in 1usize..1000,
        prefix in "[a-z]{3,10}"
    ) {
        let config = PoolConfig::new(threads)
            .with_queue_capacity(capacity)
            .with_thread_name_prefix(prefix);
        let json = serde_json::to_string(&config).unwrap();
        prop_assert_eq!(PoolConfig::from_json(&json).unwrap(), config);
    }
}

// ============================================================================
// Scheduling Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// With one worker, queued items run in non-increasing weight order
    #[test]
    fn test_weight_order_single_worker(weights in prop::collection::vec(-1000i32..1000, 1..40)) {
        let pool = ThreadPool::new();
        pool.start(1).unwrap();
        let gate = occupy_worker(&pool);

        let order = Arc::new(Mutex::new(Vec::new()));
        for &weight in &weights {
            let order = Arc::clone(&order);
            pool.submit_with_priority(weight, move || order.lock().unwrap().push(weight))
                .unwrap();
        }
        drop(gate);
        pool.shutdown().unwrap();

        let mut expected = weights.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(order.lock().unwrap().clone(), expected);
    }

    /// Every admitted item runs exactly once under graceful shutdown
    #[test]
    fn test_exactly_once(threads in 1usize..6, jobs in 1usize..150) {
        let pool = ThreadPool::new();
        pool.start(threads).unwrap();

        let counters: Arc<Vec<AtomicUsize>> =
            Arc::new((0..jobs).map(|_| AtomicUsize::new(0)).collect());
        for i in 0..jobs {
            let counters = Arc::clone(&counters);
            pool.submit_with_priority((i % 5) as i32, move || {
                counters[i].fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.shutdown().unwrap();

        prop_assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
        prop_assert_eq!(pool.stats().get_tasks_completed(), jobs as u64);
    }

    /// Fixed pools never change their thread count
    #[test]
    fn test_fixed_thread_count(threads in 1usize..8, jobs in 0usize..50) {
        let pool = ThreadPool::new();
        pool.start(threads).unwrap();

        let handles: Vec<_> = (0..jobs).map(|i| pool.submit(move || i).unwrap()).collect();
        prop_assert_eq!(pool.current_thread_count(), threads);
        for (i, handle) in handles.into_iter().enumerate() {
            prop_assert_eq!(handle.wait().unwrap(), i);
        }
        prop_assert_eq!(pool.current_thread_count(), threads);
        prop_assert!(pool.idle_thread_count() <= pool.current_thread_count());
        pool.shutdown().unwrap();
    }
}

// ============================================================================
// Capacity Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// The queue never holds more than its capacity; overflow is discarded
    #[test]
    fn test_capacity_never_exceeded(capacity in 1usize..8, overflow in 1usize..4) {
        let config = PoolConfig::new(1)
            .with_queue_capacity(capacity)
            .with_rejection_policy(RejectionPolicy::Discard)
            .with_submit_timeout(Duration::from_millis(5));
        let pool = ThreadPool::with_config(config).unwrap();
        pool.start(1).unwrap();
        let gate = occupy_worker(&pool);

        let mut discarded = 0;
        for _ in 0..capacity + overflow {
            let handle = pool.submit(|| ()).unwrap();
            if handle.is_discarded() {
                discarded += 1;
            }
            prop_assert!(pool.pending_queue_size() <= capacity);
        }
        prop_assert_eq!(pool.pending_queue_size(), capacity);
        prop_assert_eq!(discarded, overflow);
        prop_assert_eq!(pool.stats().get_tasks_discarded(), overflow as u64);

        drop(gate);
        pool.shutdown().unwrap();
    }
}
