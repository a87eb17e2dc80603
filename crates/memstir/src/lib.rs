// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # memstir
//!
//! Continuously-seeded entropy-pool CSPRNG.
//!
//! The generator is modeled after the design in Peter Gutmann's 1998 Usenix
//! Security Symposium paper "Software Generation of Practically Strong
//! Random Numbers" (see also chapter 6 of his "Cryptographic Security
//! Architecture", 2004): a 600-byte entropy pool, continuously stirred by a
//! SHA-1-based mixing transform and continuously re-seeded from entropy
//! sources of varying trust levels. Output is read from an independently
//! mixed derivative of the pool, never from the pool itself.
//!
//! ## Core model
//!
//! - Entropy arrives through [`add_bytes`] and the internal pollers, tagged
//!   with an [`Origin`] that decides whether it counts toward the initial
//!   pool fill.
//! - [`randomize`] serves requests at a [`Level`]; very-strong requests
//!   block until fresh slow-source entropy covers them.
//! - A registered seed file ([`set_seed_file`], [`update_seed_file`])
//!   carries the pool across process lifetimes.
//! - Fork safety is best-effort pid detection around every read.
//!
//! The pool is a process-wide singleton behind a single mutex; the public
//! surface is free functions.
//!
//! ## Example
//!
//! ```no_run
//! use memstir::Level;
//!
//! let mut key = [0u8; 32];
//! memstir::randomize(&mut key, Level::Strong);
//! ```
//!
//! ## Platform support
//!
//! Unix-like systems. The entropy backends are probed at first use: the OS
//! CSPRNG (via `getrandom`) first, then the `/dev/random` devices. Pool
//! buffers can be placed in mlock'd pages with [`secure_alloc`].

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod api;
mod buffer;
mod consts;
mod error;
mod gather;
mod intake;
mod mix;
mod origin;
mod poll;
mod read;
mod seed_file;
mod state;
mod stats;
mod support;

#[cfg(test)]
mod tests;

pub use api::{
    add_bytes, close_fds, dump_stats, enable_quick_gen, fast_poll, initialize, is_faked,
    randomize, secure_alloc, set_seed_file, update_seed_file,
};
pub use consts::{BLOCK_LEN, DIGEST_LEN, POOL_BLOCKS, POOL_SIZE};
pub use error::GatherError;
pub use gather::{DevRandomGather, FastGather, GetentropyGather, HwGather, SlowGather};
pub use origin::{Level, Origin};

#[cfg(any(test, feature = "test_utils"))]
pub use support::test_utils;
