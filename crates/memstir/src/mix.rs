// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The pool mixing transform.
//!
//! The 600-byte pool is stirred in place by running SHA-1 compressions over
//! overlapping 64-byte windows and letting each compression's state displace
//! the 20 bytes following its window start. Every output digest therefore
//! depends on 44 bytes of surrounding context, so a single-bit change
//! propagates across the whole pool within one full mix. The first window
//! joins the tail of the pool to its head so the boundary bytes get the same
//! amount of context as everything else.

use memsha1::{sha1, Sha1Mix};

use crate::consts::{BLOCK_LEN, DIGEST_LEN, POOL_ALLOC, POOL_BLOCKS, POOL_SIZE};

/// SHA-1 snapshot of the canonical pool, taken after each mix and folded
/// into the head of the pool at the start of the next one.
///
/// This guards against an implementation error in the cascade producing a
/// short cycle: whatever the cascade does, the pool is always additionally
/// XORed with a strong digest of its prior state.
pub(crate) struct FailsafeDigest {
    digest: [u8; DIGEST_LEN],
    valid: bool,
}

impl FailsafeDigest {
    pub const fn new() -> Self {
        Self {
            digest: [0u8; DIGEST_LEN],
            valid: false,
        }
    }

    #[cfg(test)]
    pub fn digest(&self) -> Option<&[u8; DIGEST_LEN]> {
        self.valid.then_some(&self.digest)
    }
}

/// Mix a pool buffer in place.
///
/// `failsafe` is passed for the canonical pool only: its digest is XORed
/// into `pool[0..20]` right after the first compression, and refreshed from
/// the mixed pool at the end. The scratch pool is mixed without it.
///
/// The trailing `BLOCK_LEN` bytes of the buffer are the hash scratch area.
pub(crate) fn mix_pool(buffer: &mut [u8; POOL_ALLOC], mut failsafe: Option<&mut FailsafeDigest>) {
    let mut md = Sha1Mix::new();

    let (pool, hashbuf) = buffer.split_at_mut(POOL_SIZE);
    let hashbuf: &mut [u8; BLOCK_LEN] = hashbuf.try_into().unwrap();

    // First block: the last digest-length bytes of the pool joined with its
    // leading bytes, so the head is displaced with full wrap-around context.
    hashbuf[..DIGEST_LEN].copy_from_slice(&pool[POOL_SIZE - DIGEST_LEN..]);
    hashbuf[DIGEST_LEN..].copy_from_slice(&pool[..BLOCK_LEN - DIGEST_LEN]);
    md.mixblock(hashbuf);
    pool[..DIGEST_LEN].copy_from_slice(&hashbuf[..DIGEST_LEN]);

    if let Some(failsafe) = failsafe.as_deref_mut() {
        if failsafe.valid {
            for (p, d) in pool[..DIGEST_LEN].iter_mut().zip(failsafe.digest.iter()) {
                *p ^= d;
            }
        }
    }

    // Remaining blocks: window at p, state written at p + DIGEST_LEN.
    let mut p = 0;
    for _ in 1..POOL_BLOCKS {
        if p + BLOCK_LEN <= POOL_SIZE {
            hashbuf.copy_from_slice(&pool[p..p + BLOCK_LEN]);
        } else {
            for (i, b) in hashbuf.iter_mut().enumerate() {
                *b = pool[(p + i) % POOL_SIZE];
            }
        }

        md.mixblock(hashbuf);
        p += DIGEST_LEN;
        pool[p..p + DIGEST_LEN].copy_from_slice(&hashbuf[..DIGEST_LEN]);
    }

    if let Some(failsafe) = failsafe {
        sha1(&pool[..POOL_SIZE], &mut failsafe.digest);
        failsafe.valid = true;
    }
}
