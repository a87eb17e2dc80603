// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

mod api;
mod poll;
mod seed_file;

use crate::gather::SlowGather;
use crate::state::{Backends, PoolCore, PoolState};

pub(crate) fn pool_core() -> PoolCore {
    PoolCore::try_create(false).expect("Failed to allocate pool buffers")
}

pub(crate) fn pool_state_with(slow: Box<dyn SlowGather>) -> PoolState {
    PoolState::new(
        pool_core(),
        Backends {
            slow,
            fast: None,
            hw: None,
        },
    )
}

/// Deterministic pseudo-random fill, derived by chaining SHA-1.
pub(crate) fn fill_deterministic(buffer: &mut [u8], seed: &[u8]) {
    let mut state = [0u8; 20];
    memsha1::sha1(seed, &mut state);

    for chunk in buffer.chunks_mut(20) {
        chunk.copy_from_slice(&state[..chunk.len()]);
        let prev = state;
        memsha1::sha1(&prev, &mut state);
    }
}

/// Temp file path unique to this process and test.
pub(crate) fn temp_path(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("memstir-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path
}
