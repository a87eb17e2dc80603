// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::atomic::Ordering;

use crate::api::Rng;
use crate::consts::POOL_SIZE;
use crate::origin::{Level, Origin};
use crate::support::test_utils::{MockSlowGather, MockSlowGatherBehaviour};
use crate::tests::pool_state_with;

fn rng_with_mock_pool() -> Rng {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut rng = Rng::new();
    rng.pool = Some(pool_state_with(Box::new(slow)));
    rng
}

#[test]
fn test_empty_randomize_touches_nothing() {
    let mut rng = Rng::new();

    rng.randomize(&mut [], Level::Strong);

    assert!(rng.pool.is_none());
    assert_eq!(rng.stats.ngetbytes1, 0);
    assert_eq!(rng.stats.getbytes1, 0);
}

#[test]
fn test_randomize_chunks_large_requests() {
    let mut rng = rng_with_mock_pool();

    let mut buffer = vec![0u8; 2 * POOL_SIZE + 100];
    rng.randomize(&mut buffer, Level::Strong);

    let stats = rng.pool.as_ref().expect("pool vanished").core.stats;
    assert_eq!(stats.ngetbytes1, 1);
    assert_eq!(stats.getbytes1, (2 * POOL_SIZE + 100) as u64);
    // Three independent read-outs served the request.
    assert_eq!(stats.mixkey, 3);
}

#[test]
fn test_very_strong_counts_separately() {
    let mut rng = rng_with_mock_pool();

    let mut buffer = [0u8; 16];
    rng.randomize(&mut buffer, Level::VeryStrong);

    let stats = rng.pool.as_ref().expect("pool vanished").core.stats;
    assert_eq!(stats.ngetbytes1, 0);
    assert_eq!(stats.ngetbytes2, 1);
    assert_eq!(stats.getbytes2, 16);
}

#[test]
fn test_quick_test_demotes_very_strong() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let calls = slow.call_log();
    let mut rng = Rng::new();
    rng.pool = Some(pool_state_with(Box::new(slow)));
    rng.quick_test = true;

    let mut buffer = [0u8; 16];
    rng.randomize(&mut buffer, Level::VeryStrong);

    let pool = rng.pool.as_ref().expect("pool vanished");
    // Counted and served as a strong request, no extra seeding.
    assert_eq!(pool.core.stats.ngetbytes1, 1);
    assert_eq!(pool.core.stats.ngetbytes2, 0);
    assert!(!pool.core.extra_seeded);
    let calls = calls.lock().expect("call log poisoned");
    assert!(calls.iter().all(|c| c.origin != Origin::ExtraPoll));
}

#[test]
fn test_add_bytes_quality_gates() {
    let mut rng = rng_with_mock_pool();
    let addbytes = |rng: &Rng| rng.pool.as_ref().expect("pool vanished").core.stats.addbytes;

    // Too low an estimate: dropped.
    rng.add_bytes(&[0x55; 100], 5);
    assert_eq!(addbytes(&rng), 0);

    // Unknown quality maps to a usable default.
    rng.add_bytes(&[0x55; 100], -1);
    assert_eq!(addbytes(&rng), 100);

    // Honest estimate: absorbed.
    rng.add_bytes(&[0x55; 100], 50);
    assert_eq!(addbytes(&rng), 200);

    // Empty input: dropped.
    rng.add_bytes(&[], 90);
    assert_eq!(addbytes(&rng), 200);
}

#[test]
fn test_add_bytes_chunks_oversized_input() {
    let mut rng = rng_with_mock_pool();

    rng.add_bytes(&vec![0x66; POOL_SIZE + 50], 80);

    let stats = rng.pool.as_ref().expect("pool vanished").core.stats;
    assert_eq!(stats.addbytes, (POOL_SIZE + 50) as u64);
    assert_eq!(stats.naddbytes, 2);
}

#[test]
fn test_add_bytes_before_allocation_is_a_noop() {
    let mut rng = Rng::new();

    rng.add_bytes(&[0x77; 32], 90);

    assert!(rng.pool.is_none());
    assert_eq!(rng.stats.addbytes, 0);
}

#[test]
fn test_fast_poll_requires_allocated_pool() {
    let mut rng = Rng::new();

    rng.fast_poll();
    assert!(rng.pool.is_none());

    let mut rng = rng_with_mock_pool();
    rng.fast_poll();
    let stats = rng.pool.as_ref().expect("pool vanished").core.stats;
    assert_eq!(stats.fastpolls, 1);
}

#[test]
fn test_close_fds_releases_backends_and_keeps_stats() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let closed = slow.close_count();
    let mut rng = Rng::new();
    rng.pool = Some(pool_state_with(Box::new(slow)));

    let mut buffer = [0u8; 32];
    rng.randomize(&mut buffer, Level::Strong);

    rng.close_fds();

    assert!(rng.pool.is_none());
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    // Usage counters survive the close.
    assert!(rng.stats.mixkey >= 1);
    assert_eq!(rng.stats.ngetbytes1, 1);

    // Closing again is harmless.
    rng.close_fds();
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}
