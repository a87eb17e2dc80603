// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::consts::POOL_SIZE;

/// Usage counters, kept for [`crate::dump_stats`].
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Stats {
    pub mixrnd: u64,
    pub mixkey: u64,
    pub slowpolls: u64,
    pub fastpolls: u64,
    pub getbytes1: u64,
    pub ngetbytes1: u64,
    pub getbytes2: u64,
    pub ngetbytes2: u64,
    pub addbytes: u64,
    pub naddbytes: u64,
    /// Sticky flag: a hardware RNG poll failed at least once.
    pub hw_failed: bool,
}

impl Stats {
    /// Log the counters in a stable line format.
    pub fn dump(&self) {
        log::info!(
            "random usage: poolsize={} mixed={} polls={}/{} added={}/{}",
            POOL_SIZE,
            self.mixrnd,
            self.slowpolls,
            self.fastpolls,
            self.naddbytes,
            self.addbytes,
        );
        log::info!(
            "              outmix={} getlvl1={}/{} getlvl2={}/{}{}",
            self.mixkey,
            self.ngetbytes1,
            self.getbytes1,
            self.ngetbytes2,
            self.getbytes2,
            if self.hw_failed { " (hwrng failed)" } else { "" },
        );
    }
}
