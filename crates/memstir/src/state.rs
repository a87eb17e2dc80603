// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Pool state: buffers, cursors, flags and the bound entropy backends.

use crate::buffer::PoolBuf;
use crate::consts::{ADD_VALUE, POOL_SIZE};
use crate::error::BufferError;
use crate::gather::{FastGather, HwGather, SlowGather};
use crate::mix::{mix_pool, FailsafeDigest};
use crate::stats::Stats;

/// Entropy backends bound at initialization, fixed for the life of the pool.
pub(crate) struct Backends {
    /// The slow gatherer. Must exist; its failure is fatal.
    pub slow: Box<dyn SlowGather>,
    /// Optional platform fast gatherer.
    pub fast: Option<Box<dyn FastGather>>,
    /// Optional hardware RNG poller.
    pub hw: Option<Box<dyn HwGather>>,
}

/// The pool proper: both buffers plus every cursor, flag and counter that
/// the seeding state machine tracks.
pub(crate) struct PoolCore {
    /// The entropy pool. New bytes are XORed in at `write_pos`.
    pub rnd: PoolBuf,
    /// Scratch pool for read-out. Derived from `rnd`, wiped after each read.
    pub key: PoolBuf,
    pub write_pos: usize,
    /// Read-out cursor into `key`, advanced round-robin across reads.
    pub read_pos: usize,
    /// True once enough trusted entropy has been absorbed to use the pool.
    pub pool_filled: bool,
    /// Trusted bytes absorbed while the pool was not yet filled.
    pub fill_counter: usize,
    /// One-time flag: the first very-strong request has topped up the pool.
    pub extra_seeded: bool,
    /// Coarse estimate of unread entropy bytes, floored at zero.
    pub balance: isize,
    /// The pool content is exactly the output of the most recent mix.
    pub just_mixed: bool,
    pub failsafe: FailsafeDigest,
    pub stats: Stats,
}

impl PoolCore {
    pub fn try_create(secure: bool) -> Result<Self, BufferError> {
        Ok(Self {
            rnd: PoolBuf::try_create(secure)?,
            key: PoolBuf::try_create(secure)?,
            write_pos: 0,
            read_pos: 0,
            pool_filled: false,
            fill_counter: 0,
            extra_seeded: false,
            balance: 0,
            just_mixed: false,
            failsafe: FailsafeDigest::new(),
            stats: Stats::default(),
        })
    }

    /// Mix the canonical pool, with failsafe-digest handling.
    pub fn mix_rnd(&mut self) {
        mix_pool(self.rnd.bytes_mut(), Some(&mut self.failsafe));
        self.stats.mixrnd += 1;
    }

    /// Mix the scratch pool.
    pub fn mix_key(&mut self) {
        mix_pool(self.key.bytes_mut(), None);
        self.stats.mixkey += 1;
    }

    /// Derive the scratch pool from the canonical one: a word-wise wrapping
    /// add of `ADD_VALUE` in host byte order. Output is emitted from the
    /// derivative, never from the pool itself.
    pub fn derive_key(&mut self) {
        let rnd = self.rnd.bytes();
        let key = self.key.bytes_mut();

        for (src, dst) in rnd[..POOL_SIZE]
            .chunks_exact(8)
            .zip(key[..POOL_SIZE].chunks_exact_mut(8))
        {
            let word = u64::from_ne_bytes(src.try_into().unwrap()).wrapping_add(ADD_VALUE);
            dst.copy_from_slice(&word.to_ne_bytes());
        }
    }
}

pub(crate) type PidFn = Box<dyn Fn() -> u32 + Send>;

/// The complete RNG state guarded by the pool lock.
pub(crate) struct PoolState {
    pub core: PoolCore,
    pub backends: Backends,
    /// Last observed process id, for fork detection.
    pub last_pid: Option<u32>,
    pid_fn: PidFn,
}

impl PoolState {
    pub fn new(core: PoolCore, backends: Backends) -> Self {
        Self {
            core,
            backends,
            last_pid: None,
            pid_fn: Box::new(std::process::id),
        }
    }

    pub fn current_pid(&self) -> u32 {
        (self.pid_fn)()
    }

    #[cfg(test)]
    pub(crate) fn set_pid_fn_for_test(&mut self, pid_fn: PidFn) {
        self.pid_fn = pid_fn;
    }
}
