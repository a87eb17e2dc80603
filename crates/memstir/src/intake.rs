// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Entropy intake: XOR bytes into the pool at the write cursor.

use crate::consts::POOL_SIZE;
use crate::origin::Origin;
use crate::state::PoolCore;

impl PoolCore {
    /// Add `buffer` to the pool, byte-wise XOR at the write cursor.
    ///
    /// Whenever the cursor wraps the pool is mixed. Bytes from trusted
    /// origins that were absorbed by this call since its start or its last
    /// wrap advance the initial-fill counter; fast-poll bytes never do.
    pub(crate) fn add_randomness(&mut self, buffer: &[u8], origin: Origin) {
        self.stats.addbytes += buffer.len() as u64;
        self.stats.naddbytes += 1;

        if !buffer.is_empty() {
            self.just_mixed = false;
        }

        let mut count = 0usize;
        let mut remaining = buffer.len();

        for &byte in buffer {
            self.rnd.bytes_mut()[self.write_pos] ^= byte;
            self.write_pos += 1;
            count += 1;
            remaining -= 1;

            if self.write_pos >= POOL_SIZE {
                if origin.counts_toward_initial_fill() && !self.pool_filled {
                    self.fill_counter += count;
                    count = 0;
                    if self.fill_counter >= POOL_SIZE {
                        self.pool_filled = true;
                    }
                }

                self.write_pos = 0;
                self.mix_rnd();
                self.just_mixed = remaining == 0;
            }
        }
    }
}
