// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Trust tag accompanying bytes added to the pool.
///
/// The origin governs whether the bytes may advance the initial-fill
/// counter: timing-based fast-poll data is too easy for a local observer to
/// predict, so it stirs the pool but never counts toward declaring the pool
/// usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Initialization-time material: seed file contents, pid and clock stirs.
    Init = 0,
    /// Bytes from a blocking slow poll of the OS entropy source.
    SlowPoll = 1,
    /// Bytes from a cheap non-blocking poll (timestamps, resource usage).
    FastPoll = 2,
    /// Extra seeding performed for the first high-strength request.
    ExtraPoll = 3,
    /// Application-supplied bytes.
    External = 4,
}

impl Origin {
    pub(crate) fn counts_toward_initial_fill(self) -> bool {
        !matches!(self, Origin::FastPoll)
    }
}

/// Requested strength of a random read.
///
/// [`Level::Weak`] and [`Level::Strong`] are served identically.
/// [`Level::VeryStrong`] additionally guarantees that the pool has absorbed
/// fresh slow-source entropy covering the request before any byte is
/// emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Weak random, an alias for [`Level::Strong`] at this layer.
    Weak = 0,
    /// Strong random, suitable for most purposes.
    Strong = 1,
    /// Very strong random for key generation; may block on the entropy
    /// source.
    VeryStrong = 2,
}

// The read-out state machine relies on this ordering.
const _: () = {
    assert!(Level::Weak as u8 == 0);
    assert!(Level::Strong as u8 == 1);
    assert!(Level::VeryStrong as u8 == 2);
};
