// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SHA-1 implementation per RFC 3174

use crate::{BLOCK_LEN, DIGEST_LEN};

/// Initial hash values H(0) per RFC 3174 Section 6.1
const H0: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

/// Round constants K(t) per RFC 3174 Section 5, one per 20-round span
const K: [u32; 4] = [0x5a827999, 0x6ed9eba1, 0x8f1bbcdc, 0xca62c1d6];

/// f(t) logical functions per RFC 3174 Section 5
#[inline(always)]
const fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

#[inline(always)]
const fn parity(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
const fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

/// Compress one 64-byte block into the running state H
fn compress(h: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 80];

    // Prepare message schedule
    for t in 0..16 {
        w[t] = u32::from_be_bytes(block[t * 4..(t + 1) * 4].try_into().unwrap());
    }
    for t in 16..80 {
        w[t] = (w[t - 3] ^ w[t - 8] ^ w[t - 14] ^ w[t - 16]).rotate_left(1);
    }

    let mut a = h[0];
    let mut b = h[1];
    let mut c = h[2];
    let mut d = h[3];
    let mut e = h[4];

    // 80 rounds
    for t in 0..80 {
        let (f, k) = match t / 20 {
            0 => (ch(b, c, d), K[0]),
            1 => (parity(b, c, d), K[1]),
            2 => (maj(b, c, d), K[2]),
            _ => (parity(b, c, d), K[3]),
        };
        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(w[t])
            .wrapping_add(k);

        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    h[0] = h[0].wrapping_add(a);
    h[1] = h[1].wrapping_add(b);
    h[2] = h[2].wrapping_add(c);
    h[3] = h[3].wrapping_add(d);
    h[4] = h[4].wrapping_add(e);

    // Zeroize the message schedule
    for word in &mut w {
        unsafe {
            core::ptr::write_volatile(word, 0);
        }
    }
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}

/// Raw SHA-1 compression context for pool mixing.
///
/// Carries only the 160-bit running state. [`Sha1Mix::mixblock`] applies one
/// compression per call with no padding and no message-length counter, so a
/// caller can feed an arbitrary sequence of 64-byte windows and read the
/// state back after each block. The state is zeroized on drop.
pub struct Sha1Mix {
    h: [u32; 5],
}

impl Sha1Mix {
    /// Create a context initialized to H(0).
    pub fn new() -> Self {
        Self { h: H0 }
    }

    /// Compress `block` into the running state, then overwrite the first 20
    /// bytes of `block` with the updated state.
    ///
    /// The state words are written little-endian on every host so that a
    /// sequence of mixblock calls evolves a buffer identically on all
    /// platforms.
    pub fn mixblock(&mut self, block: &mut [u8; BLOCK_LEN]) {
        compress(&mut self.h, block);
        for (i, word) in self.h.iter().enumerate() {
            block[i * 4..(i + 1) * 4].copy_from_slice(&word.to_le_bytes());
        }
    }
}

impl Default for Sha1Mix {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Sha1Mix {
    fn drop(&mut self) {
        for word in &mut self.h {
            unsafe {
                core::ptr::write_volatile(word, 0);
            }
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}

/// SHA-1 streaming state
struct Sha1State {
    h: [u32; 5],
    buffer: [u8; BLOCK_LEN],
    buffer_len: usize,
    total_len: u64,
}

impl Sha1State {
    fn new() -> Self {
        Self {
            h: H0,
            buffer: [0u8; BLOCK_LEN],
            buffer_len: 0,
            total_len: 0,
        }
    }

    fn update(&mut self, data: &[u8]) {
        let mut offset = 0;
        self.total_len += data.len() as u64;

        // Fill buffer if partially filled
        if self.buffer_len > 0 {
            let space = BLOCK_LEN - self.buffer_len;
            let copy_len = core::cmp::min(space, data.len());

            self.buffer[self.buffer_len..self.buffer_len + copy_len]
                .copy_from_slice(&data[..copy_len]);
            self.buffer_len += copy_len;

            offset = copy_len;

            if self.buffer_len == BLOCK_LEN {
                compress(&mut self.h, &self.buffer.clone());
                self.buffer_len = 0;
            }
        }

        // Process full blocks
        while offset + BLOCK_LEN <= data.len() {
            let block: [u8; BLOCK_LEN] = data[offset..offset + BLOCK_LEN].try_into().unwrap();
            compress(&mut self.h, &block);

            offset += BLOCK_LEN;
        }

        // Buffer remaining
        if offset < data.len() {
            let remaining = data.len() - offset;

            self.buffer[..remaining].copy_from_slice(&data[offset..]);
            self.buffer_len = remaining;
        }
    }

    fn finalize(mut self, out: &mut [u8; DIGEST_LEN]) {
        // Padding: append 1 bit, then zeros, then 64-bit length
        let bit_len = self.total_len * 8;

        self.buffer[self.buffer_len] = 0x80;
        self.buffer_len += 1;

        // If not enough space for the length field (8 bytes), pad and compress
        if self.buffer_len > BLOCK_LEN - 8 {
            for i in self.buffer_len..BLOCK_LEN {
                self.buffer[i] = 0;
            }

            compress(&mut self.h, &self.buffer.clone());
            self.buffer_len = 0;
        }

        // Pad with zeros up to the length field
        for i in self.buffer_len..BLOCK_LEN - 8 {
            self.buffer[i] = 0;
        }

        // Append 64-bit length in big-endian
        self.buffer[BLOCK_LEN - 8..BLOCK_LEN].copy_from_slice(&bit_len.to_be_bytes());

        compress(&mut self.h, &self.buffer.clone());

        // Output hash, big-endian per RFC 3174
        for (i, &word) in self.h.iter().enumerate() {
            out[i * 4..(i + 1) * 4].copy_from_slice(&word.to_be_bytes());
        }

        self.zeroize();
    }

    fn zeroize(&mut self) {
        for word in &mut self.h {
            unsafe {
                core::ptr::write_volatile(word, 0);
            }
        }
        unsafe {
            core::ptr::write_volatile(&mut self.buffer, [0u8; BLOCK_LEN]);
            core::ptr::write_volatile(&mut self.buffer_len, 0);
            core::ptr::write_volatile(&mut self.total_len, 0);
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}

/// One-shot SHA-1
pub fn sha1(data: &[u8], out: &mut [u8; DIGEST_LEN]) {
    let mut state = Sha1State::new();
    state.update(data);
    state.finalize(out);
}
