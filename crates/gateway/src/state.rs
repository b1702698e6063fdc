//! Shared request state for the gateway

use smbfs::{SessionFactory, ShareError, ShareRegistry, ShareResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fixed read size for remote transfers and scratch-file streaming
pub(crate) const CHUNK_SIZE: usize = 8192;

/// Default bound on list and stat operations against one share
const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(30);

/// State shared by all request handlers
///
/// The registry is immutable and the factory stateless, so requests
/// share nothing mutable.
#[derive(Clone)]
pub struct GatewayState {
    registry: Arc<ShareRegistry>,
    sessions: Arc<dyn SessionFactory>,
    op_timeout: Duration,
    scratch_dir: PathBuf,
}

impl GatewayState {
    /// Create new gateway state
    pub fn new(registry: ShareRegistry, sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            registry: Arc::new(registry),
            sessions,
            op_timeout: DEFAULT_OP_TIMEOUT,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Override the bound on per-share list and stat operations
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    /// Override where scratch files are allocated
    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Get the share registry
    pub fn registry(&self) -> &ShareRegistry {
        &self.registry
    }

    pub(crate) fn sessions(&self) -> Arc<dyn SessionFactory> {
        self.sessions.clone()
    }

    pub(crate) fn scratch_dir(&self) -> &PathBuf {
        &self.scratch_dir
    }

    /// Run one blocking share operation on the blocking pool, bounded
    /// by the configured timeout. A timed-out operation surfaces as a
    /// remote I/O failure; the blocking closure itself is left to run
    /// out on the pool.
    pub(crate) async fn run_share_op<T, F>(&self, what: &'static str, f: F) -> ShareResult<T>
    where
        F: FnOnce() -> ShareResult<T> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.op_timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(ShareError::Remote(format!("{} worker failed: {}", what, join))),
            Err(_) => Err(ShareError::Remote(format!(
                "{} timed out after {:?}",
                what, self.op_timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn test_run_share_op_success() {
        let state = testing::state_with(vec![]);
        let result = state.run_share_op("noop", || Ok(7)).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_run_share_op_error_passes_through() {
        let state = testing::state_with(vec![]);
        let result: ShareResult<()> = state
            .run_share_op("noop", || Err(ShareError::ShareNotFound("x".to_string())))
            .await;
        assert!(matches!(result, Err(ShareError::ShareNotFound(_))));
    }

    #[tokio::test]
    async fn test_run_share_op_timeout() {
        let state = testing::state_with(vec![]).with_op_timeout(Duration::from_millis(10));
        let result: ShareResult<()> = state
            .run_share_op("slow", || {
                std::thread::sleep(Duration::from_millis(200));
                Ok(())
            })
            .await;
        match result {
            Err(ShareError::Remote(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout error, got {:?}", other),
        }
    }
}
