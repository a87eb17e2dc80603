// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The public surface: one process-wide pool behind one mutex.
//!
//! The pool, the seed file and the entropy backends are process singletons,
//! so the RNG is exposed as free functions over a single lazily-initialized
//! handle. Every entry point that touches state takes the lock first; a
//! poisoned lock is fatal. Multiple independent instances are deliberately
//! impossible.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::consts::POOL_SIZE;
use crate::gather::{probe_fast_gather, probe_slow_gather};
use crate::origin::{Level, Origin};
use crate::seed_file::SeedFile;
use crate::state::{Backends, PoolCore, PoolState};
use crate::stats::Stats;

pub(crate) struct Rng {
    pub(crate) secure_alloc: bool,
    pub(crate) quick_test: bool,
    /// Usage counters survive a close.
    pub(crate) stats: Stats,
    pub(crate) seed_file: SeedFile,
    pub(crate) pool: Option<PoolState>,
}

impl Rng {
    pub(crate) const fn new() -> Self {
        Self {
            secure_alloc: false,
            quick_test: false,
            stats: Stats {
                mixrnd: 0,
                mixkey: 0,
                slowpolls: 0,
                fastpolls: 0,
                getbytes1: 0,
                ngetbytes1: 0,
                getbytes2: 0,
                ngetbytes2: 0,
                addbytes: 0,
                naddbytes: 0,
                hw_failed: false,
            },
            seed_file: SeedFile::new(),
            pool: None,
        }
    }

    pub(crate) fn ensure_initialized(&mut self) {
        if self.pool.is_some() {
            return;
        }

        let mut core = PoolCore::try_create(self.secure_alloc)
            .unwrap_or_else(|err| panic!("failed to allocate the random pool: {err}"));
        core.stats = self.stats;

        let slow =
            probe_slow_gather().unwrap_or_else(|| panic!("no entropy gathering module detected"));
        log::debug!("entropy gatherer `{}' selected", slow.name());

        let backends = Backends {
            slow,
            fast: probe_fast_gather(),
            hw: None,
        };

        self.pool = Some(PoolState::new(core, backends));
    }

    pub(crate) fn randomize(&mut self, buffer: &mut [u8], mut level: Level) {
        if buffer.is_empty() {
            return;
        }

        self.ensure_initialized();

        if self.quick_test && level == Level::VeryStrong {
            level = Level::Strong;
        }

        let Rng {
            pool: Some(pool),
            seed_file,
            ..
        } = self
        else {
            unreachable!("pool initialized above")
        };

        let stats = &mut pool.core.stats;
        if level == Level::VeryStrong {
            stats.getbytes2 += buffer.len() as u64;
            stats.ngetbytes2 += 1;
        } else {
            stats.getbytes1 += buffer.len() as u64;
            stats.ngetbytes1 += 1;
        }

        for chunk in buffer.chunks_mut(POOL_SIZE) {
            pool.read_pool(seed_file, chunk, level);
        }
    }

    pub(crate) fn add_bytes(&mut self, buffer: &[u8], quality: i32) {
        let quality = if quality == -1 {
            35
        } else {
            quality.clamp(0, 100)
        };

        if buffer.is_empty() || quality < 10 {
            return;
        }

        // External bytes only stir an already-allocated pool; the coarse
        // entropy accounting cannot honor the quality estimate beyond the
        // gate above.
        let Some(pool) = self.pool.as_mut() else {
            return;
        };

        for chunk in buffer.chunks(POOL_SIZE) {
            pool.core.add_randomness(chunk, Origin::External);
        }
    }

    pub(crate) fn fast_poll(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.fast_random_poll();
        }
    }

    pub(crate) fn update_seed_file(&mut self) {
        let Some(pool) = self.pool.as_mut() else {
            return;
        };
        if self.seed_file.path().is_none() || !pool.core.pool_filled {
            return;
        }
        if !self.seed_file.allow_update {
            log::info!("note: random seed file not updated");
            return;
        }

        // Same derivation as a read-out, but the bytes go to disk instead
        // of a caller.
        pool.core.derive_key();
        pool.core.mix_rnd();
        pool.core.mix_key();

        self.seed_file.write_current(pool.core.key.bytes());
    }

    pub(crate) fn close_fds(&mut self) {
        if let Some(mut pool) = self.pool.take() {
            pool.backends.slow.close();
            self.stats = pool.core.stats;
            // The buffers zeroize on drop; cursors and flags die with the
            // state.
        }
    }

    pub(crate) fn dump_stats(&self) {
        let stats = self
            .pool
            .as_ref()
            .map(|pool| pool.core.stats)
            .unwrap_or(self.stats);
        stats.dump();
    }
}

static POOL_LOCK: Mutex<Rng> = Mutex::new(Rng::new());

fn lock_pool() -> MutexGuard<'static, Rng> {
    match POOL_LOCK.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("failed to acquire the pool lock"),
    }
}

/// Initialize the random subsystem.
///
/// With `full` set, allocates the pool and binds the entropy backends under
/// the pool lock; without it this is a no-op kept so callers can force the
/// cheap setup early in a threaded program. Initialization also happens
/// lazily on first use.
///
/// # Panics
///
/// Panics if no entropy gathering backend is available.
pub fn initialize(full: bool) {
    if full {
        lock_pool().ensure_initialized();
    }
}

/// Fill `buffer` with cryptographically strong random bytes.
///
/// [`Level::Weak`] and [`Level::Strong`] are served identically;
/// [`Level::VeryStrong`] additionally blocks until fresh slow-source
/// entropy covering the request has been absorbed. Requests larger than
/// [`POOL_SIZE`] are served in independent chunks. An empty request
/// returns immediately without touching any state.
///
/// # Panics
///
/// Panics if no entropy gathering backend is available or the bound
/// backend fails.
pub fn randomize(buffer: &mut [u8], level: Level) {
    if buffer.is_empty() {
        return;
    }
    lock_pool().randomize(buffer, level);
}

/// Add caller-supplied bytes to the pool.
///
/// `quality` estimates the goodness of the entropy in the range `0..=100`,
/// with `-1` meaning unknown. Estimates below 10 and empty buffers are
/// ignored. The bytes only stir the pool; they never count toward the
/// initial fill differently than other external input.
pub fn add_bytes(buffer: &[u8], quality: i32) {
    lock_pool().add_bytes(buffer, quality);
}

/// Trigger a fast poll if the pool has been allocated.
///
/// A no-op before first use of the RNG, so that incidental calls from
/// library plumbing do not start filling a pool nobody asked for.
pub fn fast_poll() {
    lock_pool().fast_poll();
}

/// Register the persistent seed file.
///
/// # Panics
///
/// Panics when called twice; the seed file is a process singleton.
pub fn set_seed_file<P: Into<PathBuf>>(path: P) {
    lock_pool().seed_file.register(path.into());
}

/// Write the current pool state to the registered seed file.
///
/// Does nothing unless the pool is filled and the seed file was read
/// successfully (or found absent) earlier. The written bytes are a mixed
/// derivative of the pool, never the pool itself. Failures are logged and
/// ignored.
pub fn update_seed_file() {
    lock_pool().update_seed_file();
}

/// Ask the entropy backends to release their descriptors and free the pool.
///
/// Usage counters survive; the next use of the RNG starts from a cold pool.
pub fn close_fds() {
    lock_pool().close_fds();
}

/// Log the usage counters in a stable line format.
pub fn dump_stats() {
    lock_pool().dump_stats();
}

/// Force the pool buffers into locked memory. Must be called before the
/// first full initialization to take effect.
pub fn secure_alloc() {
    lock_pool().secure_alloc = true;
}

/// Degrade very-strong requests to strong, for test suites that cannot
/// afford blocking entropy reads. Not meant for regular applications.
pub fn enable_quick_gen() {
    lock_pool().quick_test = true;
}

/// True iff the quality of the RNG has been degraded for test purposes.
pub fn is_faked() -> bool {
    let mut rng = lock_pool();
    // The runtime backend probe has to happen before the answer means
    // anything.
    rng.ensure_initialized();
    rng.quick_test
}
