// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::api::Rng;
use crate::consts::POOL_SIZE;
use crate::origin::{Level, Origin};
use crate::seed_file::SeedFile;
use crate::support::test_utils::{MockSlowGather, MockSlowGatherBehaviour};
use crate::tests::{pool_state_with, temp_path};

#[test]
fn test_missing_seed_file_allows_update() {
    let path = temp_path("missing");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut state = pool_state_with(Box::new(slow));
    let mut seed_file = SeedFile::new();
    seed_file.register(path);

    assert!(!seed_file.load_into(&mut state));
    assert!(seed_file.allow_update);
    assert_eq!(state.core.stats.addbytes, 0);
}

#[test]
fn test_empty_seed_file_allows_update() {
    let path = temp_path("empty");
    std::fs::write(&path, []).expect("Failed to create empty seed file");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut state = pool_state_with(Box::new(slow));
    let mut seed_file = SeedFile::new();
    seed_file.register(path.clone());

    assert!(!seed_file.load_into(&mut state));
    assert!(seed_file.allow_update);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_wrong_size_seed_file_is_ignored() {
    let path = temp_path("wrong-size");
    std::fs::write(&path, [0u8; 10]).expect("Failed to write seed file");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut state = pool_state_with(Box::new(slow));
    let mut seed_file = SeedFile::new();
    seed_file.register(path.clone());

    assert!(!seed_file.load_into(&mut state));
    assert!(!seed_file.allow_update);
    assert_eq!(state.core.stats.addbytes, 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_load_stirs_pool_and_tops_up() {
    let path = temp_path("load");
    std::fs::write(&path, [0xcdu8; POOL_SIZE]).expect("Failed to write seed file");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let calls = slow.call_log();
    let mut state = pool_state_with(Box::new(slow));
    let mut seed_file = SeedFile::new();
    seed_file.register(path.clone());

    assert!(seed_file.load_into(&mut state));
    assert!(seed_file.allow_update);

    // The full-pool XOR wrapped the cursor, which forces a mix.
    assert!(state.core.stats.mixrnd >= 1);
    // The pid/clock stirs and the top-up advanced the cursor past zero.
    assert!(state.core.write_pos > 0 && state.core.write_pos < POOL_SIZE);

    let calls = calls.lock().expect("call log poisoned");
    assert!(calls
        .iter()
        .any(|c| c.origin == Origin::Init && c.length == 32 && c.level == Level::Strong));

    let _ = std::fs::remove_file(&path);
}

#[test]
#[should_panic(expected = "seed file registered twice")]
fn test_double_registration_is_a_bug() {
    let mut seed_file = SeedFile::new();
    seed_file.register(temp_path("double-a"));
    seed_file.register(temp_path("double-b"));
}

#[test]
fn test_update_requires_filled_pool() {
    let path = temp_path("update-unfilled");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut rng = Rng::new();
    rng.seed_file.register(path.clone());
    rng.seed_file.allow_update = true;
    rng.pool = Some(pool_state_with(Box::new(slow)));

    rng.update_seed_file();
    assert!(!path.exists());
}

#[test]
fn test_update_requires_permission() {
    let path = temp_path("update-denied");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut rng = Rng::new();
    rng.seed_file.register(path.clone());
    let mut state = pool_state_with(Box::new(slow));
    state.core.pool_filled = true;
    rng.pool = Some(state);

    rng.update_seed_file();
    assert!(!path.exists());
}

#[test]
fn test_update_writes_mixed_derivative() {
    let path = temp_path("update");

    let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
    let mut rng = Rng::new();
    rng.seed_file.register(path.clone());
    rng.seed_file.allow_update = true;

    let mut state = pool_state_with(Box::new(slow));
    state.core.add_randomness(&[0x42; POOL_SIZE], Origin::SlowPoll);
    assert!(state.core.pool_filled);
    rng.pool = Some(state);

    rng.update_seed_file();

    let written = std::fs::read(&path).expect("seed file missing after update");
    assert_eq!(written.len(), POOL_SIZE);

    // The file holds a mixed derivative, never the pool itself.
    let pool = rng.pool.as_ref().expect("pool vanished");
    assert_ne!(&written[..], &pool.core.rnd.bytes()[..POOL_SIZE]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_seed_file_round_trip() {
    let path = temp_path("round-trip");

    // Save from one instance...
    {
        let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
        let mut rng = Rng::new();
        rng.seed_file.register(path.clone());
        rng.seed_file.allow_update = true;
        let mut state = pool_state_with(Box::new(slow));
        state.core.add_randomness(&[0x37; POOL_SIZE], Origin::SlowPoll);
        rng.pool = Some(state);
        rng.update_seed_file();
    }

    // ...and a fresh instance starts filled from it.
    {
        let slow = MockSlowGather::new(MockSlowGatherBehaviour::None);
        let mut state = pool_state_with(Box::new(slow));
        let mut seed_file = SeedFile::new();
        seed_file.register(path.clone());

        assert!(seed_file.load_into(&mut state));
        assert!(seed_file.allow_update);
    }

    let _ = std::fs::remove_file(&path);
}
