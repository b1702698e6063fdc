//! Production SMB sessions over libsmbclient

use pavao::{SmbClient, SmbCredentials, SmbDirentType, SmbOpenOptions, SmbOptions};
use std::io::{Read, Write};
use std::time::SystemTime;

use crate::config::ShareDescriptor;
use crate::error::{ShareError, ShareResult};
use crate::session::{RemoteAttributes, RemoteDirEntry, SessionFactory, ShareSession};

/// Opens NTLM-authenticated sessions through libsmbclient
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSessionFactory;

impl NativeSessionFactory {
    pub fn new() -> Self {
        Self
    }
}

impl SessionFactory for NativeSessionFactory {
    fn open(&self, share: &ShareDescriptor) -> ShareResult<Box<dyn ShareSession>> {
        let client = SmbClient::new(
            SmbCredentials::default()
                .server(format!("smb://{}", share.host))
                .share(format!("/{}", share.name.trim_start_matches('/')))
                .username(share.username.clone())
                .password(share.password.clone())
                .workgroup(share.domain.clone()),
            SmbOptions::default().one_share_per_server(true),
        )
        .map_err(|e| ShareError::Connection {
            share: share.name.clone(),
            host: share.host.clone(),
            detail: e.to_string(),
        })?;
        Ok(Box::new(NativeSession { client }))
    }
}

/// One libsmbclient connection; dropping it disconnects
struct NativeSession {
    client: SmbClient,
}

impl ShareSession for NativeSession {
    fn list_dir(&self, path: &str) -> ShareResult<Vec<RemoteDirEntry>> {
        let entries = self
            .client
            .list_dir(path)
            .map_err(|e| ShareError::Remote(format!("list {}: {}", path, e)))?;

        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            let is_directory = matches!(entry.get_type(), SmbDirentType::Dir);
            if !is_directory && !matches!(entry.get_type(), SmbDirentType::File) {
                // printer queues, IPC endpoints and the like
                continue;
            }
            let name = entry.name().to_string();
            // listings carry no size or mtime, a stat per entry fills them in
            let full = join(path, &name);
            let (size, modified) = match self.client.stat(&full) {
                Ok(st) => (st.size, st.modified),
                Err(e) => {
                    tracing::debug!("stat {} after listing failed: {}", full, e);
                    (0, SystemTime::now())
                }
            };
            out.push(RemoteDirEntry {
                name,
                is_directory,
                size,
                modified,
            });
        }
        Ok(out)
    }

    fn stat(&self, path: &str) -> ShareResult<RemoteAttributes> {
        let st = self
            .client
            .stat(path)
            .map_err(|e| ShareError::Remote(format!("stat {}: {}", path, e)))?;
        Ok(RemoteAttributes {
            size: st.size,
            modified: st.modified,
        })
    }

    fn fetch(
        &self,
        path: &str,
        dest: &mut dyn Write,
        chunk_size: usize,
        limit: u64,
    ) -> ShareResult<u64> {
        let mut file = self
            .client
            .open_with(path, SmbOpenOptions::default().read(true))
            .map_err(|e| ShareError::Remote(format!("open {}: {}", path, e)))?;

        let mut buf = vec![0u8; chunk_size];
        let mut received: u64 = 0;
        while received < limit {
            let want = (chunk_size as u64).min(limit - received) as usize;
            let n = file.read(&mut buf[..want]).map_err(|e| {
                ShareError::Remote(format!("read {} at offset {}: {}", path, received, e))
            })?;
            if n == 0 {
                break;
            }
            dest.write_all(&buf[..n]).map_err(ShareError::Local)?;
            received += n as u64;
        }
        Ok(received)
    }
}

fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
