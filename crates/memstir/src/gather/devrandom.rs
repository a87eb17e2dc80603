// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use zeroize::Zeroizing;

use crate::error::GatherError;
use crate::gather::SlowGather;
use crate::origin::{Level, Origin};

const DEV_RANDOM: &str = "/dev/random";
const DEV_URANDOM: &str = "/dev/urandom";

/// Slow gatherer reading the `/dev/random` devices on unix-like systems.
///
/// Very-strong requests read the blocking device, everything else the
/// non-blocking one. Descriptors are opened lazily, kept open between
/// polls, and released by `close`.
pub struct DevRandomGather {
    random: Option<File>,
    urandom: Option<File>,
}

impl DevRandomGather {
    /// Creates the gatherer without opening any device yet.
    pub fn new() -> Self {
        Self {
            random: None,
            urandom: None,
        }
    }

    /// Probe: both devices must be present.
    pub fn is_available() -> bool {
        Path::new(DEV_RANDOM).exists() && Path::new(DEV_URANDOM).exists()
    }

    fn device(&mut self, level: Level) -> io::Result<&mut File> {
        let (slot, name) = if level == Level::VeryStrong {
            (&mut self.random, DEV_RANDOM)
        } else {
            (&mut self.urandom, DEV_URANDOM)
        };

        if slot.is_none() {
            *slot = Some(File::open(name)?);
        }

        Ok(slot.as_mut().unwrap())
    }
}

impl Default for DevRandomGather {
    fn default() -> Self {
        Self::new()
    }
}

impl SlowGather for DevRandomGather {
    fn name(&self) -> &'static str {
        "devrandom"
    }

    fn gather(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
        length: usize,
        level: Level,
    ) -> Result<(), GatherError> {
        let device = self.device(level)?;
        let mut buffer = Zeroizing::new([0u8; 128]);
        let mut remaining = length;

        while remaining > 0 {
            let n = remaining.min(buffer.len());
            device.read_exact(&mut buffer[..n])?;
            sink(&buffer[..n], origin);
            remaining -= n;
        }

        Ok(())
    }

    fn close(&mut self) {
        self.random = None;
        self.urandom = None;
    }
}
