// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Persistent seed file handling.
//!
//! The seed file caches the pool across process lifetimes: exactly
//! `POOL_SIZE` raw bytes, no header. It is read and written under advisory
//! whole-file locks with bounded backoff. Multiple processes sharing one
//! seed file race on update with last-writer-wins; such instances start
//! from correlated pools and differentiate only through the pid, clock and
//! top-up entropy each stirs in independently.
//!
//! Every anomaly short of a failed read of a well-formed file is logged and
//! ignored; the pool simply starts cold.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use core::mem;

use zeroize::Zeroizing;

use crate::consts::POOL_SIZE;
use crate::error::SeedFileError;
use crate::origin::{Level, Origin};
use crate::state::PoolState;

/// Seed file registration and update policy.
pub(crate) struct SeedFile {
    path: Option<PathBuf>,
    /// True once it is safe to overwrite the file: it was read successfully
    /// or found absent or empty.
    pub allow_update: bool,
}

impl SeedFile {
    pub const fn new() -> Self {
        Self {
            path: None,
            allow_update: false,
        }
    }

    /// Register the seed file path. Registering twice is a bug.
    pub fn register(&mut self, path: PathBuf) {
        if self.path.is_some() {
            panic!("seed file registered twice");
        }
        self.path = Some(path);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the seed file into the pool. Returns true iff the pool absorbed
    /// a full seed, in which case the caller may consider the pool filled.
    ///
    /// A successful load also stirs in the pid and clocks, so parallel
    /// instances sharing a seed file diverge, and tops the pool up with a
    /// few slow-source bytes that will not block.
    pub fn load_into(&mut self, pool: &mut PoolState) -> bool {
        let Some(path) = self.path.clone() else {
            return false;
        };

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.allow_update = true;
                return false;
            }
            Err(err) => {
                log::info!("can't open `{}': {}", path.display(), err);
                return false;
            }
        };

        if let Err(err) = lock_seed_file(&file, &path, false) {
            log::info!("can't lock `{}': {}", path.display(), err);
            return false;
        }

        let meta = match file.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                log::info!("can't stat `{}': {}", path.display(), err);
                return false;
            }
        };
        if !meta.is_file() {
            log::info!("`{}' is not a regular file - ignored", path.display());
            return false;
        }
        if meta.len() == 0 {
            log::info!("note: random seed file is empty");
            self.allow_update = true;
            return false;
        }
        if meta.len() != POOL_SIZE as u64 {
            log::warn!("warning: invalid size of random seed file - not used");
            return false;
        }

        let mut buffer = Zeroizing::new([0u8; POOL_SIZE]);
        if let Err(err) = (&file).read_exact(&mut buffer[..]) {
            // A well-formed seed file that cannot be read points at
            // something much worse than a cold pool.
            panic!("can't read `{}': {}", path.display(), err);
        }
        drop(file);

        pool.core.add_randomness(&buffer[..], Origin::Init);

        // Minor per-process entropy; this also forces a mix.
        let pid = pool.current_pid();
        pool.core.add_randomness(&pid.to_ne_bytes(), Origin::Init);
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        pool.core.add_randomness(&secs.to_ne_bytes(), Origin::Init);
        let ticks = unsafe {
            let mut tms: libc::tms = mem::zeroed();
            libc::times(&mut tms)
        };
        pool.core.add_randomness(&ticks.to_ne_bytes(), Origin::Init);

        // A few bytes from the slow source that will not block.
        pool.read_random_source(Origin::Init, 32, Level::Strong);

        self.allow_update = true;
        true
    }

    /// Write the current scratch pool to the seed file.
    ///
    /// The caller has already derived and mixed the scratch pool; this only
    /// performs the locked write. All failures are logged and ignored.
    pub fn write_current(&self, key: &[u8]) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        let file = match OpenOptions::new()
            .write(true)
            .create(true)
            .mode(0o600)
            .open(path)
        {
            Ok(file) => file,
            Err(err) => {
                log::info!("can't create `{}': {}", path.display(), err);
                return;
            }
        };

        if let Err(err) = lock_seed_file(&file, path, true) {
            log::info!("can't lock `{}': {}", path.display(), err);
            return;
        }

        // Truncate only after the lock is held.
        if let Err(err) = file.set_len(0).map_err(SeedFileError::Write) {
            log::info!("can't write `{}': {}", path.display(), err);
            return;
        }

        if let Err(err) = (&file)
            .write_all(&key[..POOL_SIZE])
            .map_err(SeedFileError::Write)
        {
            log::info!("can't write `{}': {}", path.display(), err);
        }
    }
}

/// Take an advisory whole-file lock, waiting a reasonable time to succeed.
///
/// Backs off in growing steps, capped at ten seconds per attempt. Returns
/// `Err` only for lock failures other than contention; contention is waited
/// out indefinitely. The caller decides how to report the failure.
fn lock_seed_file(file: &File, path: &Path, for_write: bool) -> Result<(), SeedFileError> {
    let mut lck: libc::flock = unsafe { mem::zeroed() };
    lck.l_type = if for_write {
        libc::F_WRLCK as libc::c_short
    } else {
        libc::F_RDLCK as libc::c_short
    };
    lck.l_whence = libc::SEEK_SET as libc::c_short;

    let mut backoff = 0u64;
    loop {
        let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_SETLK, &lck) };
        if rc != -1 {
            return Ok(());
        }

        let err = std::io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EAGAIN) | Some(libc::EACCES) => {}
            _ => return Err(SeedFileError::Lock(err)),
        }

        if backoff > 2 {
            log::info!("waiting for lock on `{}'...", path.display());
        }

        thread::sleep(Duration::from_secs(backoff) + Duration::from_millis(250));
        if backoff < 10 {
            backoff += 1;
        }
    }
}
