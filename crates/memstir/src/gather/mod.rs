// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Entropy gatherer backends.
//!
//! The slow gatherer is chosen once, at first initialization, by probing the
//! compiled-in candidates in fixed order: the OS syscall source first, then
//! the `/dev/random` devices. The choice is fixed for the life of the
//! process. If no candidate probes successfully the RNG is unusable and any
//! call that demands entropy is fatal.

mod devrandom;
mod getentropy;

pub use devrandom::DevRandomGather;
pub use getentropy::GetentropyGather;

use crate::error::GatherError;
use crate::origin::{Level, Origin};

/// A blocking, trusted entropy gatherer.
///
/// `gather` must deliver exactly `length` bytes through `sink`, in one or
/// more calls, before returning `Ok`. The sink XORs the bytes into the pool
/// under the held pool lock, so implementations must not call back into the
/// RNG.
pub trait SlowGather: Send {
    /// Short name of the backend, for logging.
    fn name(&self) -> &'static str;

    /// Deliver `length` bytes of entropy through `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError`] if the source cannot deliver; the RNG treats
    /// this as fatal.
    fn gather(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
        length: usize,
        level: Level,
    ) -> Result<(), GatherError>;

    /// Release any OS resources the gatherer holds. Called on close.
    fn close(&mut self) {}
}

/// A non-blocking gatherer with no length contract: it provides whatever it
/// can produce quickly, possibly nothing.
pub trait FastGather: Send {
    /// Deliver whatever is quickly available through `sink`.
    fn poll(&mut self, sink: &mut dyn FnMut(&[u8], Origin), origin: Origin);
}

/// A hardware RNG poller, same shape as a fast gatherer but fallible;
/// failures are recorded and otherwise ignored.
pub trait HwGather: Send {
    /// Deliver hardware RNG bytes through `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError`] on a transient hardware failure; the RNG
    /// records it in the statistics and carries on.
    fn poll(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
    ) -> Result<(), GatherError>;
}

/// Probe the slow gatherer candidates in fixed order.
pub(crate) fn probe_slow_gather() -> Option<Box<dyn SlowGather>> {
    if GetentropyGather::is_available() {
        return Some(Box::new(GetentropyGather::new()));
    }

    if DevRandomGather::is_available() {
        return Some(Box::new(DevRandomGather::new()));
    }

    None
}

/// Probe for a platform fast gatherer.
///
/// There is none on Unix; the generic clock and resource-usage sources of
/// the fast poll cover it.
pub(crate) fn probe_fast_gather() -> Option<Box<dyn FastGather>> {
    None
}
