// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for memstir.

use thiserror::Error;

/// Errors reported by an entropy gatherer backend.
///
/// A failure from the bound slow gatherer is fatal to the RNG; failures
/// from the optional hardware poller are recorded and ignored.
#[derive(Debug, Error)]
pub enum GatherError {
    /// The OS entropy source is unavailable or failed to deliver data.
    #[error("entropy source unavailable")]
    SourceUnavailable,

    /// I/O failure while reading an entropy device.
    #[error("entropy device i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal seed-file failures, absorbed (logged and ignored) at the call
/// site; the pool simply starts cold or skips the update.
#[derive(Debug, Error)]
pub(crate) enum SeedFileError {
    /// The advisory whole-file lock failed for a reason other than
    /// contention.
    #[error("advisory lock failed: {0}")]
    Lock(#[source] std::io::Error),

    /// I/O failure while writing the seed bytes.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// Error type for pool buffer allocation.
#[derive(Debug, Error, Eq, PartialEq)]
pub(crate) enum BufferError {
    /// Anonymous page mapping failed.
    #[error("page creation failed")]
    PageCreationFailed,

    /// The page could not be locked into memory.
    #[error("mlock failed")]
    LockFailed,
}
