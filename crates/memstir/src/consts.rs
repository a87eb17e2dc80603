// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// SHA-1 output size in bytes
pub use memsha1::DIGEST_LEN;

/// SHA-1 block size in bytes
pub use memsha1::BLOCK_LEN;

/// Number of digests that make up the pool
pub const POOL_BLOCKS: usize = 30;

/// Size of the entropy pool in bytes
pub const POOL_SIZE: usize = POOL_BLOCKS * DIGEST_LEN;

/// Pool size in 64-bit words, for the word-wise read-out transform
pub(crate) const POOL_WORDS: usize = POOL_SIZE / 8;

/// Allocated size of each pool buffer: the pool itself plus one hash block
/// of scratch space for the mixing transform
pub(crate) const POOL_ALLOC: usize = POOL_SIZE + BLOCK_LEN;

/// Constant added word-wise to the pool at read-out.
///
/// Fixed at 64 bits on every host so that pool evolution does not depend on
/// the platform word size.
pub(crate) const ADD_VALUE: u64 = 0xa5a5_a5a5_a5a5_a5a5;

const _: () = {
    assert!(POOL_SIZE % 8 == 0);
    assert!(POOL_SIZE % DIGEST_LEN == 0);
    assert!(POOL_WORDS * 8 == POOL_SIZE);
};
