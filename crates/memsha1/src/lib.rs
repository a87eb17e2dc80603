// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SHA-1 implementation per RFC 3174 with raw compression-function access
//!
//! Unlike packaged hash crates, this implementation exposes the compression
//! function directly through [`Sha1Mix`], which is what an entropy-pool
//! mixing transform needs: one compression per 64-byte window, with the
//! running state readable between blocks and without length padding.
//! All intermediate values (message schedule, streaming state) are zeroized.
//!
//! References:
//! - RFC 3174: US Secure Hash Algorithm 1 (SHA1)
//!   <https://datatracker.ietf.org/doc/html/rfc3174>
//!
//! SHA-1 is not collision resistant and must not be used for signatures.
//! Here it serves purely as a mixing primitive for an entropy pool, where
//! preimage-style strength is what matters.

#![no_std]
#![warn(missing_docs)]

mod sha1;

/// SHA-1 output size in bytes
pub const DIGEST_LEN: usize = 20;

/// SHA-1 block size in bytes
pub const BLOCK_LEN: usize = 64;

pub use sha1::{sha1, Sha1Mix};
