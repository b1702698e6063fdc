//! Session traits for talking to a network share
//!
//! One session backs exactly one logical operation (a listing, an
//! attribute fetch, or a download); sessions are never pooled or
//! shared across requests. Dropping a session closes the underlying
//! connection, so release happens on every exit path.

use std::io::Write;
use std::time::SystemTime;

use crate::config::ShareDescriptor;
use crate::error::ShareResult;

/// One entry returned by a directory listing, relative to the share root
#[derive(Debug, Clone)]
pub struct RemoteDirEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: SystemTime,
}

/// Size and modify-time attributes of a single remote file
#[derive(Debug, Clone, Copy)]
pub struct RemoteAttributes {
    pub size: u64,
    pub modified: SystemTime,
}

/// Opens authenticated sessions against a configured share
pub trait SessionFactory: Send + Sync {
    /// Open one session
    ///
    /// # Errors
    /// Returns `ShareError::Connection` when the host cannot be
    /// reached or refuses the credentials.
    fn open(&self, share: &ShareDescriptor) -> ShareResult<Box<dyn ShareSession>>;
}

/// An authenticated connection to one share
///
/// Calls are blocking; callers run a whole operation inside one
/// `spawn_blocking` closure so the session never crosses an await
/// point.
pub trait ShareSession {
    /// List a directory, path relative to the share root
    fn list_dir(&self, path: &str) -> ShareResult<Vec<RemoteDirEntry>>;

    /// Fetch size and modify-time without transferring data
    fn stat(&self, path: &str) -> ShareResult<RemoteAttributes>;

    /// Copy up to `limit` bytes of the remote file into `dest` in
    /// sequential reads of at most `chunk_size` bytes, returning the
    /// number of bytes received. A short count means the transfer hit
    /// end of file before `limit`.
    fn fetch(
        &self,
        path: &str,
        dest: &mut dyn Write,
        chunk_size: usize,
        limit: u64,
    ) -> ShareResult<u64>;
}
