//! Chunked download of one remote file into local scratch storage

use smbfs::{SessionFactory, ShareDescriptor, ShareError, ShareResult};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;

use crate::paths;
use crate::state::{GatewayState, CHUNK_SIZE};

/// A finished download: the scratch file plus what the remote declared
/// about it
///
/// The job owns its scratch file. Publishing transfers that ownership
/// to the response body; a job that is dropped unconsumed (for
/// instance because the client went away while the download was in
/// flight) removes the file itself.
#[derive(Debug)]
pub struct RetrievalJob {
    /// Fully downloaded scratch file, removed when the last owner drops
    pub scratch_path: TempPath,
    /// Size declared by the remote, verified against bytes received
    pub size: u64,
    /// Original filename, used for the content disposition
    pub filename: String,
}

/// Download `virtual_path` from the named share into a scratch file
///
/// The whole transfer completes before this returns; one session is
/// held for the duration of the download and dropped at its terminal
/// state, before streaming starts. A mid-transfer failure therefore
/// never corrupts a response already in flight, at the cost of
/// first-byte latency and temporary disk use.
///
/// # Errors
/// `ShareNotFound` for an unregistered share name, `Connection` or
/// `Remote` for session and transfer failures (including a transfer
/// shorter than the declared size), `Local` for scratch-file I/O.
pub async fn retrieve(
    state: &GatewayState,
    share_name: &str,
    virtual_path: &str,
) -> ShareResult<RetrievalJob> {
    let share = state
        .registry()
        .find(share_name)
        .ok_or_else(|| ShareError::ShareNotFound(share_name.to_string()))?
        .clone();
    let sessions = state.sessions();
    let vpath = virtual_path.to_string();
    let scratch_dir = state.scratch_dir().clone();

    // Deliberately not bounded by the op timeout: once the download
    // starts it runs to success or hard failure, never cancellation.
    // If the caller disappears meanwhile, tokio drops the returned
    // job, and with it the scratch file.
    match tokio::task::spawn_blocking(move || download(sessions, &share, &vpath, &scratch_dir))
        .await
    {
        Ok(result) => result,
        Err(join) => Err(ShareError::Remote(format!(
            "download worker failed: {}",
            join
        ))),
    }
}

fn download(
    sessions: Arc<dyn SessionFactory>,
    share: &ShareDescriptor,
    virtual_path: &str,
    scratch_dir: &Path,
) -> ShareResult<RetrievalJob> {
    let session = sessions.open(share)?;
    let remote_path = paths::share_path(&share.root, virtual_path);
    let declared = session.stat(&remote_path)?.size;

    // dropped on any failure below, which removes the file
    let mut scratch = tempfile::Builder::new()
        .prefix("mediagate-")
        .suffix(".part")
        .tempfile_in(scratch_dir)
        .map_err(ShareError::Local)?;

    let received = session.fetch(&remote_path, scratch.as_file_mut(), CHUNK_SIZE, declared)?;
    if received != declared {
        return Err(ShareError::Remote(format!(
            "truncated transfer of {}: expected {} bytes, received {}",
            remote_path, declared, received
        )));
    }
    scratch.as_file_mut().flush().map_err(ShareError::Local)?;

    // keep the deletion responsibility attached to the path
    let scratch_path = scratch.into_temp_path();

    tracing::debug!(
        "downloaded {} from {} ({} bytes) to {}",
        remote_path,
        share.name,
        declared,
        scratch_path.display()
    );
    Ok(RetrievalJob {
        scratch_path,
        size: declared,
        filename: paths::file_name(virtual_path).to_string(),
    })
}
