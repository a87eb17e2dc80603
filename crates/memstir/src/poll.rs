// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Entropy polling.
//!
//! A slow poll makes a blocking request to the bound slow gatherer and is
//! repeated by the reader until the pool is filled. A fast poll is cheap and
//! non-blocking: it stirs in whatever the platform can produce without
//! waiting, none of which counts toward the initial fill.

use core::mem;
use core::slice;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::consts::POOL_SIZE;
use crate::origin::{Level, Origin};
use crate::state::PoolState;

impl PoolState {
    /// One blocking poll of the slow gatherer: a fifth of the pool at
    /// STRONG.
    pub(crate) fn random_poll(&mut self) {
        self.core.stats.slowpolls += 1;
        self.read_random_source(Origin::SlowPoll, POOL_SIZE / 5, Level::Strong);
    }

    /// Request `length` bytes from the bound slow gatherer, feeding them
    /// into the pool as they arrive. A gatherer failure is fatal: an RNG
    /// that quietly degrades is worse than one that stops.
    pub(crate) fn read_random_source(&mut self, origin: Origin, length: usize, level: Level) {
        let core = &mut self.core;
        let result = self.backends.slow.gather(
            &mut |bytes, origin| core.add_randomness(bytes, origin),
            origin,
            length,
            level,
        );

        if let Err(err) = result {
            panic!("no way to gather entropy for the RNG: {err}");
        }
    }

    /// One fast poll. Never blocks.
    pub(crate) fn fast_random_poll(&mut self) {
        let core = &mut self.core;
        core.stats.fastpolls += 1;

        if let Some(fast) = self.backends.fast.as_deref_mut() {
            fast.poll(
                &mut |bytes, origin| core.add_randomness(bytes, origin),
                Origin::FastPoll,
            );
        }

        // Highest-resolution wall clock available.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        core.add_randomness(&now.as_nanos().to_ne_bytes(), Origin::FastPoll);

        // Resource usage snapshot of the current process. Errors are
        // ignored; whatever landed in the struct gets stirred in, and the
        // struct is wiped afterwards.
        unsafe {
            let mut usage: libc::rusage = mem::zeroed();
            libc::getrusage(libc::RUSAGE_SELF, &mut usage);
            let bytes = slice::from_raw_parts(
                &usage as *const libc::rusage as *const u8,
                mem::size_of::<libc::rusage>(),
            );
            core.add_randomness(bytes, Origin::FastPoll);
            core::ptr::write_volatile(&mut usage, mem::zeroed());
        }

        // Seconds and clock ticks, in case everything above was degraded.
        core.add_randomness(&now.as_secs().to_ne_bytes(), Origin::FastPoll);
        let ticks = unsafe {
            let mut tms: libc::tms = mem::zeroed();
            libc::times(&mut tms)
        };
        core.add_randomness(&ticks.to_ne_bytes(), Origin::FastPoll);

        // Hardware RNG bytes if a poller is bound. A transient failure is
        // remembered and surfaced by the statistics dump.
        if let Some(hw) = self.backends.hw.as_deref_mut() {
            let result = hw.poll(
                &mut |bytes, origin| core.add_randomness(bytes, origin),
                Origin::FastPoll,
            );
            if result.is_err() {
                core.stats.hw_failed = true;
            }
        }
    }
}
