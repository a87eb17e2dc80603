// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! End-to-end exercise of the process-wide API against real entropy
//! backends. Everything runs in a single test because the pool, the seed
//! file registration and the usage counters are process singletons.

use memstir::Level;

#[test]
fn test_global_api_end_to_end() {
    let seed_path =
        std::env::temp_dir().join(format!("memstir-global-{}.seed", std::process::id()));
    let _ = std::fs::remove_file(&seed_path);

    memstir::set_seed_file(seed_path.clone());
    memstir::initialize(true);
    assert!(!memstir::is_faked());

    let mut buffer = [0u8; 64];
    memstir::randomize(&mut buffer, Level::Strong);
    assert!(buffer.iter().any(|&b| b != 0));

    // Requests beyond the pool size are served in chunks.
    let mut large = vec![0u8; 2 * memstir::POOL_SIZE + 5];
    memstir::randomize(&mut large, Level::Strong);
    assert!(large.iter().any(|&b| b != 0));

    memstir::add_bytes(&[0u8; 64], -1);
    memstir::fast_poll();

    // The pool is filled and the (absent) seed file allowed updates, so
    // this writes exactly one pool of bytes.
    memstir::update_seed_file();
    let meta = std::fs::metadata(&seed_path).expect("seed file missing after update");
    assert_eq!(meta.len(), memstir::POOL_SIZE as u64);

    memstir::dump_stats();
    memstir::close_fds();

    // The RNG reinitializes lazily after a close, now loading the seed
    // file written above.
    memstir::randomize(&mut buffer, Level::Strong);
    assert!(buffer.iter().any(|&b| b != 0));

    let _ = std::fs::remove_file(&seed_path);
}
