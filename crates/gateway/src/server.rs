//! HTTP server for the media gateway

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use smbfs::{SessionFactory, ShareError, ShareRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::federation::{self, RemoteEntry};
use crate::metadata::{self, MediaMetadata};
use crate::paths;
use crate::retrieval;
use crate::state::GatewayState;
use crate::stream;

/// Media gateway API for managing the HTTP server
#[derive(Clone)]
pub struct GatewayApi {
    state: GatewayState,
}

impl GatewayApi {
    /// Create a new gateway over the configured shares
    ///
    /// # Arguments
    /// * `registry` - Immutable share configuration loaded at startup
    /// * `sessions` - Factory used to open one session per operation
    pub fn new(registry: ShareRegistry, sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            state: GatewayState::new(registry, sessions),
        }
    }

    /// Override the bound on per-share list and stat operations
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.state = self.state.with_op_timeout(timeout);
        self
    }

    /// Override where scratch files are allocated
    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.state = self.state.with_scratch_dir(dir);
        self
    }

    /// Create the axum router with all routes configured
    pub fn router(&self) -> Router {
        Router::new()
            .route("/media/list", get(list_media))
            .route("/media/metadata/:share/*path", get(media_metadata))
            .route("/media/stream/:share/*path", get(stream_media))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the gateway server
    ///
    /// # Arguments
    /// * `host` - Host to bind to (e.g., "0.0.0.0")
    /// * `port` - Port to bind to (e.g., 8081)
    pub async fn serve(self, host: &str, port: u16) -> crate::Result<()> {
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Media gateway listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health_check(State(state): State<GatewayState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        format!(
            "Media gateway running. Shares: {}",
            state.registry().shares().len()
        ),
    )
}

#[derive(Debug, Deserialize)]
struct ListParams {
    path: Option<String>,
}

/// Federated directory listing across all shares
async fn list_media(
    State(state): State<GatewayState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RemoteEntry>>, AppError> {
    let raw = params.path.unwrap_or_else(|| "/".to_string());
    let vpath = normalize(&raw)?;
    Ok(Json(federation::list_directory(&state, &vpath).await))
}

/// Attribute lookup for one file
async fn media_metadata(
    State(state): State<GatewayState>,
    Path((share, path)): Path<(String, String)>,
) -> Result<Json<MediaMetadata>, AppError> {
    let vpath = normalize(&path)?;
    let meta = metadata::get_metadata(&state, &share, &vpath).await?;
    Ok(Json(meta))
}

/// Download a remote file into scratch storage, then stream it out
async fn stream_media(
    State(state): State<GatewayState>,
    Path((share, path)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let vpath = normalize(&path)?;
    let job = retrieval::retrieve(&state, &share, &vpath).await?;
    Ok(stream::publish(job).await?)
}

fn normalize(raw: &str) -> Result<String, AppError> {
    paths::normalize_virtual(raw)
        .ok_or_else(|| AppError::BadRequest(format!("invalid path: {}", raw)))
}

/// Application error types
#[derive(Debug)]
enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<ShareError> for AppError {
    fn from(err: ShareError) -> Self {
        match err {
            ShareError::ShareNotFound(name) => {
                AppError::NotFound(format!("Share {} not found", name))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}
