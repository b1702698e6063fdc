//! Federated directory listings across every configured share

use chrono::{DateTime, Utc};
use serde::Serialize;
use smbfs::{RemoteDirEntry, ShareDescriptor};
use std::time::SystemTime;

use crate::paths;
use crate::state::GatewayState;

/// Filename extensions served as media
const MEDIA_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "wmv"];

/// One entry in a federated directory listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub name: String,
    /// Path relative to the federated root, share-agnostic
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    pub share_name: String,
    pub display_name: String,
}

/// List `virtual_path` on every share and merge the results
///
/// Shares are queried in registration order, one short-lived session
/// each. A share that cannot be reached or listed is logged and
/// skipped, so the result is the union of the shares that answered; a
/// path that exists nowhere yields an empty list, not an error. Entry
/// order follows share order, then remote listing order.
pub async fn list_directory(state: &GatewayState, virtual_path: &str) -> Vec<RemoteEntry> {
    let mut entries = Vec::new();
    for share in state.registry().shares() {
        let listed = state
            .run_share_op("list", {
                let share = share.clone();
                let sessions = state.sessions();
                let vpath = virtual_path.to_string();
                move || {
                    let session = sessions.open(&share)?;
                    let remote = session.list_dir(&paths::share_path(&share.root, &vpath))?;
                    Ok(collect_entries(&share, &vpath, remote))
                }
            })
            .await;
        match listed {
            Ok(mut batch) => entries.append(&mut batch),
            Err(err) => {
                tracing::warn!(
                    "skipping share {} while listing {}: {}",
                    share.name,
                    virtual_path,
                    err
                );
            }
        }
    }
    entries
}

/// Keep directories and media files, rebasing paths onto the
/// federated root
fn collect_entries(
    share: &ShareDescriptor,
    virtual_path: &str,
    remote: Vec<RemoteDirEntry>,
) -> Vec<RemoteEntry> {
    remote
        .into_iter()
        .filter(|e| e.name != "." && e.name != "..")
        .filter(|e| e.is_directory || is_media(&e.name))
        .map(|e| RemoteEntry {
            path: paths::virtual_child(virtual_path, &e.name),
            is_directory: e.is_directory,
            size: e.size,
            modified_time: to_timestamp(e.modified),
            share_name: share.name.clone(),
            display_name: share.display_name.clone(),
            name: e.name,
        })
        .collect()
}

/// Whether a filename carries one of the recognized media extensions
pub(crate) fn is_media(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| MEDIA_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}

pub(crate) fn to_timestamp(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
