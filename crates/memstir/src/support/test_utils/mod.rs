// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Mock entropy gatherers for deterministic tests.

mod mock_gather;

pub use mock_gather::{
    GatherCall, MockFastGather, MockHwGather, MockHwGatherBehaviour, MockSlowGather,
    MockSlowGatherBehaviour,
};
