// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::atomic::Ordering;

use crate::consts::POOL_SIZE;
use crate::origin::{Level, Origin};
use crate::support::test_utils::{
    MockFastGather, MockHwGather, MockHwGatherBehaviour, MockSlowGather, MockSlowGatherBehaviour,
};
use crate::tests::pool_state_with;

#[test]
fn test_fast_poll_stirs_but_never_fills() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut state = pool_state_with(Box::new(slow));

    for _ in 0..10 {
        state.fast_random_poll();
    }

    assert_eq!(state.core.stats.fastpolls, 10);
    assert_eq!(state.core.fill_counter, 0);
    assert!(!state.core.pool_filled);
    // The clock and rusage stirs did land in the pool.
    assert!(state.core.stats.addbytes > 0);
}

#[test]
fn test_fast_poll_invokes_fast_gatherer() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let fast = MockFastGather::new(vec![1, 2, 3, 4]);
    let polls = fast.poll_count();

    let mut state = pool_state_with(Box::new(slow));
    state.backends.fast = Some(Box::new(fast));

    state.fast_random_poll();

    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_hw_failure_sets_sticky_flag() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut state = pool_state_with(Box::new(slow));
    state.backends.hw = Some(Box::new(MockHwGather::new(
        MockHwGatherBehaviour::FailAtPoll,
    )));

    assert!(!state.core.stats.hw_failed);
    state.fast_random_poll();
    assert!(state.core.stats.hw_failed);
}

#[test]
fn test_random_poll_requests_a_fifth_of_the_pool() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let calls = slow.call_log();
    let mut state = pool_state_with(Box::new(slow));

    state.random_poll();

    assert_eq!(state.core.stats.slowpolls, 1);
    let calls = calls.lock().expect("call log poisoned");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].origin, Origin::SlowPoll);
    assert_eq!(calls[0].length, POOL_SIZE / 5);
    assert_eq!(calls[0].level, Level::Strong);
}

#[test]
#[should_panic(expected = "no way to gather entropy")]
fn test_failing_slow_gather_is_fatal() {
    let slow = MockSlowGather::new(MockSlowGatherBehaviour::FailAtGather);
    let mut state = pool_state_with(Box::new(slow));

    state.read_random_source(Origin::SlowPoll, 16, Level::Strong);
}
