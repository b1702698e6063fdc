//! Attribute-only metadata lookups

use chrono::{DateTime, Utc};
use serde::Serialize;
use smbfs::{ShareError, ShareResult};

use crate::federation::to_timestamp;
use crate::paths;
use crate::state::GatewayState;

/// Metadata for one media file, computed on demand and never cached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// Filename without its extension
    pub title: String,
    pub path: String,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    pub share_name: String,
    pub display_name: String,
}

/// Fetch size and modify-time for one file without transferring data
///
/// # Errors
/// `ShareNotFound` for an unregistered share name; `Connection` or
/// `Remote` when the attribute fetch fails.
pub async fn get_metadata(
    state: &GatewayState,
    share_name: &str,
    virtual_path: &str,
) -> ShareResult<MediaMetadata> {
    let share = state
        .registry()
        .find(share_name)
        .ok_or_else(|| ShareError::ShareNotFound(share_name.to_string()))?
        .clone();

    let attrs = state
        .run_share_op("stat", {
            let share = share.clone();
            let sessions = state.sessions();
            let remote_path = paths::share_path(&share.root, virtual_path);
            move || sessions.open(&share)?.stat(&remote_path)
        })
        .await?;

    let name = paths::file_name(virtual_path);
    Ok(MediaMetadata {
        title: paths::title(name).to_string(),
        path: virtual_path.to_string(),
        size: attrs.size,
        modified_time: to_timestamp(attrs.modified),
        share_name: share.name,
        display_name: share.display_name,
    })
}
