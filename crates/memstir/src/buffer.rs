// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Pool buffer allocation.
//!
//! Each pool buffer is `POOL_ALLOC` bytes: the 600-byte pool followed by
//! one 64-byte hash block of scratch space for the mixing transform. When
//! secure allocation is requested the buffer lives in an anonymous mmap'd
//! page locked into memory with mlock, so pool content never reaches swap.
//! Either way the memory is zeroized before release.

use core::ptr;
use core::slice;

use zeroize::Zeroize;

use crate::consts::POOL_ALLOC;
use crate::error::BufferError;

pub(crate) struct PoolBuf {
    ptr: *mut u8,
    /// Page size when locked, `POOL_ALLOC` for heap allocations.
    capacity: usize,
    locked: bool,
}

// Safety: the buffer owns its memory; all access goes through &self/&mut self
unsafe impl Send for PoolBuf {}

impl PoolBuf {
    /// Allocate a zeroed pool buffer, from a locked page iff `secure`.
    pub fn try_create(secure: bool) -> Result<Self, BufferError> {
        if secure {
            Self::try_create_locked()
        } else {
            let boxed: Box<[u8; POOL_ALLOC]> = Box::new([0u8; POOL_ALLOC]);
            Ok(Self {
                ptr: Box::into_raw(boxed) as *mut u8,
                capacity: POOL_ALLOC,
                locked: false,
            })
        }
    }

    fn try_create_locked() -> Result<Self, BufferError> {
        let capacity = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                capacity,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(BufferError::PageCreationFailed);
        }

        let ptr = ptr as *mut u8;
        if unsafe { libc::mlock(ptr as *const _, capacity) } != 0 {
            unsafe { libc::munmap(ptr as *mut libc::c_void, capacity) };
            return Err(BufferError::LockFailed);
        }

        Ok(Self {
            ptr,
            capacity,
            locked: true,
        })
    }

    pub fn bytes(&self) -> &[u8; POOL_ALLOC] {
        unsafe { &*(self.ptr as *const [u8; POOL_ALLOC]) }
    }

    pub fn bytes_mut(&mut self) -> &mut [u8; POOL_ALLOC] {
        unsafe { &mut *(self.ptr as *mut [u8; POOL_ALLOC]) }
    }
}

impl Drop for PoolBuf {
    fn drop(&mut self) {
        let whole = unsafe { slice::from_raw_parts_mut(self.ptr, self.capacity) };
        whole.zeroize();

        if self.locked {
            unsafe {
                libc::munlock(self.ptr as *const _, self.capacity);
                libc::munmap(self.ptr as *mut libc::c_void, self.capacity);
            }
        } else {
            drop(unsafe { Box::from_raw(self.ptr as *mut [u8; POOL_ALLOC]) });
        }
    }
}
