// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::GatherError;
use crate::gather::{FastGather, HwGather, SlowGather};
use crate::origin::{Level, Origin};

/// One recorded invocation of a mock slow gatherer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherCall {
    pub origin: Origin,
    pub length: usize,
    pub level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSlowGatherBehaviour {
    /// Deliver the requested bytes, all set to the fill value.
    None,
    /// Fail every gather request.
    FailAtGather,
}

/// Scripted slow gatherer that records every request it serves.
pub struct MockSlowGather {
    behaviour: MockSlowGatherBehaviour,
    fill: u8,
    calls: Arc<Mutex<Vec<GatherCall>>>,
    closed: Arc<AtomicUsize>,
}

impl MockSlowGather {
    pub fn new(behaviour: MockSlowGatherBehaviour) -> Self {
        Self {
            behaviour,
            fill: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deliver this byte value instead of zeros.
    pub fn with_fill(mut self, fill: u8) -> Self {
        self.fill = fill;
        self
    }

    /// Shared handle to the call log, usable after the gatherer has been
    /// boxed into the pool state.
    pub fn call_log(&self) -> Arc<Mutex<Vec<GatherCall>>> {
        Arc::clone(&self.calls)
    }

    /// Shared close counter.
    pub fn close_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closed)
    }
}

impl SlowGather for MockSlowGather {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn gather(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
        length: usize,
        level: Level,
    ) -> Result<(), GatherError> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(GatherCall {
                origin,
                length,
                level,
            });

        if self.behaviour == MockSlowGatherBehaviour::FailAtGather {
            return Err(GatherError::SourceUnavailable);
        }

        let buffer = [self.fill; 128];
        let mut remaining = length;
        while remaining > 0 {
            let n = remaining.min(buffer.len());
            sink(&buffer[..n], origin);
            remaining -= n;
        }

        Ok(())
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fast gatherer delivering a fixed payload and counting its polls.
pub struct MockFastGather {
    payload: Vec<u8>,
    polls: Arc<AtomicUsize>,
}

impl MockFastGather {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn poll_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.polls)
    }
}

impl FastGather for MockFastGather {
    fn poll(&mut self, sink: &mut dyn FnMut(&[u8], Origin), origin: Origin) {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if !self.payload.is_empty() {
            sink(&self.payload, origin);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockHwGatherBehaviour {
    None,
    FailAtPoll,
}

/// Hardware poller mock, either delivering a few bytes or failing.
pub struct MockHwGather {
    behaviour: MockHwGatherBehaviour,
}

impl MockHwGather {
    pub fn new(behaviour: MockHwGatherBehaviour) -> Self {
        Self { behaviour }
    }
}

impl HwGather for MockHwGather {
    fn poll(
        &mut self,
        sink: &mut dyn FnMut(&[u8], Origin),
        origin: Origin,
    ) -> Result<(), GatherError> {
        match self.behaviour {
            MockHwGatherBehaviour::None => {
                sink(&[0xaa; 8], origin);
                Ok(())
            }
            MockHwGatherBehaviour::FailAtPoll => Err(GatherError::SourceUnavailable),
        }
    }
}
