//! Scratch-file-backed response bodies with guaranteed cleanup

use axum::body::{Body, Bytes};
use axum::http::{header, Response, StatusCode};
use futures::Stream;
use smbfs::{ShareError, ShareResult};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::TempPath;
use tokio_util::io::ReaderStream;

use crate::retrieval::RetrievalJob;
use crate::state::CHUNK_SIZE;

/// Removes the scratch file exactly once, on whatever path the
/// response ends
///
/// The guard takes over the temp path from the retrieval job, so
/// ownership of the deletion passes from job to body without a window
/// where nobody holds it. An already-removed file is a no-op. Any
/// other removal failure is logged and swallowed; the response has
/// usually completed by then and must not be failed retroactively.
struct ScratchGuard {
    path: Option<TempPath>,
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let shown = path.to_path_buf();
            match path.close() {
                Ok(()) => tracing::debug!("removed scratch file {}", shown.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("failed to remove scratch file {}: {}", shown.display(), e)
                }
            }
        }
    }
}

/// Lazy, finite, non-restartable chunk stream over a finished scratch
/// file. Dropping it removes the scratch file, so exhaustion, read
/// errors and client disconnects all end in exactly one removal.
pub(crate) struct ScratchStream {
    inner: ReaderStream<tokio::fs::File>,
    _guard: ScratchGuard,
}

impl ScratchStream {
    /// Open the scratch file for streaming, taking over its deletion.
    /// The file is removed even when opening fails.
    pub(crate) async fn open(path: TempPath) -> io::Result<Self> {
        let file = tokio::fs::File::open(&path).await;
        let guard = ScratchGuard { path: Some(path) };
        let file = file?;
        Ok(Self {
            inner: ReaderStream::with_capacity(file, CHUNK_SIZE),
            _guard: guard,
        })
    }
}

impl Stream for ScratchStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Turn a finished retrieval into the streaming response
///
/// The body owns the scratch file through a drop guard, which is what
/// guarantees cleanup on cancellation as well as on completion.
pub(crate) async fn publish(job: RetrievalJob) -> ShareResult<Response<Body>> {
    let stream = ScratchStream::open(job.scratch_path)
        .await
        .map_err(ShareError::Local)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, job.size)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", job.filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ShareError::Local(io::Error::new(io::ErrorKind::Other, e)))
}
