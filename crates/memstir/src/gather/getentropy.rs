// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use zeroize::Zeroizing;

use crate::error::GatherError;
use crate::gather::SlowGather;
use crate::origin::{Level, Origin};

/// Slow gatherer backed by the OS CSPRNG via `getrandom`:
/// - Linux/Android: `getrandom()` syscall
/// - macOS/iOS: `getentropy()`
/// - Windows: `BCryptGenRandom`
///
/// Holds no descriptors, so `close` is a no-op.
pub struct GetentropyGather {}

impl GetentropyGather {
    /// Creates the gatherer.
    pub fn new() -> Self {
        Self {}
    }

    /// Runtime probe: a one-byte test fill.
    pub fn is_available() -> bool {
        let mut probe = [0u8; 1];
        getrandom::fill(&mut probe).is_ok()
    }
}

impl Default for GetentropyGather {
    fn default() -> Self {
        Self::new()
    }
}

impl SlowGather for GetentropyGather {
    fn name(&self) -> &'static str {
        "getentropy"
    }

    fn gather(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
        length: usize,
        _level: Level,
    ) -> Result<(), GatherError> {
        let mut buffer = Zeroizing::new([0u8; 128]);
        let mut remaining = length;

        while remaining > 0 {
            let n = remaining.min(buffer.len());
            getrandom::fill(&mut buffer[..n]).map_err(|_| GatherError::SourceUnavailable)?;
            sink(&buffer[..n], origin);
            remaining -= n;
        }

        Ok(())
    }
}
