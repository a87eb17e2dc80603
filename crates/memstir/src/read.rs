// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Read random bytes out of the pool.
//!
//! Output is never taken from the pool directly. A derivative of the pool
//! (word-wise add of a constant) is mixed independently and the caller
//! reads from that, so outputs do not expose pool bytes. The read cursor
//! advances round-robin across calls, so back-to-back reads sample
//! different regions of the derivative even though both pools are remixed
//! every time.
//!
//! Fork handling is best-effort pid comparison at entry and exit. The
//! pool is inherited verbatim across fork, so without the checks parent
//! and child would emit identical bytes. A fork landing inside the
//! critical section of a threaded process is caught by the exit check,
//! which discards the produced bytes and restarts; forks that do not land
//! around a read are caught by the entry check of the next read. No
//! at-fork handler is registered.

use zeroize::Zeroize;

use crate::consts::POOL_SIZE;
use crate::origin::{Level, Origin};
use crate::seed_file::SeedFile;
use crate::state::PoolState;

impl PoolState {
    /// Fill `buffer` with random bytes at the requested level.
    ///
    /// Larger requests must be chunked by the caller; asking for more than
    /// the pool holds is a bug.
    pub(crate) fn read_pool(&mut self, seed_file: &mut SeedFile, buffer: &mut [u8], level: Level) {
        assert!(
            buffer.len() <= POOL_SIZE,
            "too many random bits requested"
        );

        loop {
            // Are we suddenly running as the child of a fork?
            let pid_now = self.current_pid();
            match self.last_pid {
                None => self.last_pid = Some(pid_now),
                Some(pid) if pid != pid_now => {
                    self.core
                        .add_randomness(&pid_now.to_ne_bytes(), Origin::Init);
                    self.core.just_mixed = false;
                    self.last_pid = Some(pid_now);
                }
                _ => {}
            }

            if !self.core.pool_filled && seed_file.load_into(self) {
                self.core.pool_filled = true;
            }

            // The first very-strong request ever seeds the pool beyond the
            // plain filled state.
            if level == Level::VeryStrong && !self.core.extra_seeded {
                self.core.balance = 0;
                let needed = buffer.len().max(16);
                self.read_random_source(Origin::ExtraPoll, needed, Level::VeryStrong);
                self.core.balance += needed as isize;
                self.core.extra_seeded = true;
            }

            // Very-strong requests are covered by fresh entropy in full.
            if level == Level::VeryStrong && self.core.balance < buffer.len() as isize {
                if self.core.balance < 0 {
                    self.core.balance = 0;
                }
                let needed = buffer.len() - self.core.balance as usize;
                self.read_random_source(Origin::ExtraPoll, needed, Level::VeryStrong);
                self.core.balance += needed as isize;
            }

            while !self.core.pool_filled {
                self.random_poll();
            }

            self.fast_random_poll();

            // Stir the pid in so a fork cannot replay the same stream.
            if let Some(pid) = self.last_pid {
                self.core.add_randomness(&pid.to_ne_bytes(), Origin::Init);
            }

            // Guarantee the pool is freshly mixed before deriving from it.
            if !self.core.just_mixed {
                self.core.mix_rnd();
            }

            self.core.derive_key();
            self.core.mix_rnd();
            self.core.mix_key();

            for out in buffer.iter_mut() {
                *out = self.core.key.bytes()[self.core.read_pos];
                self.core.read_pos = (self.core.read_pos + 1) % POOL_SIZE;
                self.core.balance -= 1;
            }
            if self.core.balance < 0 {
                self.core.balance = 0;
            }

            self.core.key.bytes_mut()[..POOL_SIZE].zeroize();

            // A fork inside the critical section leaves the other process
            // with an identical pool; the bytes just produced may be
            // emitted over there too, so discard them and start over as
            // the new process.
            let pid_after = self.current_pid();
            if pid_after != pid_now {
                self.core
                    .add_randomness(&pid_after.to_ne_bytes(), Origin::Init);
                self.core.just_mixed = false;
                self.last_pid = Some(pid_after);
                continue;
            }

            return;
        }
    }
}
