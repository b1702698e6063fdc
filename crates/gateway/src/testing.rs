//! In-memory session factory used by unit tests

use smbfs::{
    RemoteAttributes, RemoteDirEntry, SessionFactory, ShareDescriptor, ShareError, ShareRegistry,
    ShareResult, ShareSession,
};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::state::GatewayState;

/// Script for one share's fake sessions
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeShare {
    /// Full path within the share -> contents
    files: BTreeMap<String, Vec<u8>>,
    /// Full directory paths within the share
    dirs: Vec<String>,
    fail_connect: bool,
    fail_list: bool,
    /// Serve only this many bytes of each file, simulating a
    /// truncated transfer
    serve_limit: Option<u64>,
    /// Sleep this long at the start of a fetch, simulating a slow
    /// transfer
    fetch_delay: Option<Duration>,
}

impl FakeShare {
    pub(crate) fn file(mut self, path: &str, contents: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), contents);
        self
    }

    pub(crate) fn dir(mut self, path: &str) -> Self {
        self.dirs.push(path.to_string());
        self
    }

    pub(crate) fn refuse_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub(crate) fn refuse_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub(crate) fn serve_limit(mut self, limit: u64) -> Self {
        self.serve_limit = Some(limit);
        self
    }

    pub(crate) fn slow_fetch(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }
}

pub(crate) struct MockSessionFactory {
    shares: HashMap<String, FakeShare>,
}

impl SessionFactory for MockSessionFactory {
    fn open(&self, share: &ShareDescriptor) -> ShareResult<Box<dyn ShareSession>> {
        let fake = self.shares.get(&share.name).cloned().unwrap_or_default();
        if fake.fail_connect {
            return Err(ShareError::Connection {
                share: share.name.clone(),
                host: share.host.clone(),
                detail: "connection refused".to_string(),
            });
        }
        Ok(Box::new(FakeSession { fake }))
    }
}

struct FakeSession {
    fake: FakeShare,
}

impl ShareSession for FakeSession {
    fn list_dir(&self, path: &str) -> ShareResult<Vec<RemoteDirEntry>> {
        if self.fake.fail_list {
            return Err(ShareError::Remote("listing failed".to_string()));
        }
        if path != "/" && !self.fake.dirs.iter().any(|d| d == path) {
            return Err(ShareError::Remote(format!("no such directory: {}", path)));
        }

        // real servers list the dot entries too
        let mut out = vec![
            dir_entry("."),
            dir_entry(".."),
        ];
        for dir in &self.fake.dirs {
            if parent_of(dir) == path {
                out.push(dir_entry(name_of(dir)));
            }
        }
        for (file, contents) in &self.fake.files {
            if parent_of(file) == path {
                out.push(RemoteDirEntry {
                    name: name_of(file).to_string(),
                    is_directory: false,
                    size: contents.len() as u64,
                    modified: fixed_mtime(),
                });
            }
        }
        Ok(out)
    }

    fn stat(&self, path: &str) -> ShareResult<RemoteAttributes> {
        let contents = self
            .fake
            .files
            .get(path)
            .ok_or_else(|| ShareError::Remote(format!("no such file: {}", path)))?;
        Ok(RemoteAttributes {
            size: contents.len() as u64,
            modified: fixed_mtime(),
        })
    }

    fn fetch(
        &self,
        path: &str,
        dest: &mut dyn Write,
        chunk_size: usize,
        limit: u64,
    ) -> ShareResult<u64> {
        if let Some(delay) = self.fake.fetch_delay {
            std::thread::sleep(delay);
        }
        let contents = self
            .fake
            .files
            .get(path)
            .ok_or_else(|| ShareError::Remote(format!("no such file: {}", path)))?;
        let available = self
            .fake
            .serve_limit
            .unwrap_or(contents.len() as u64)
            .min(contents.len() as u64)
            .min(limit) as usize;
        let mut sent = 0u64;
        for chunk in contents[..available].chunks(chunk_size) {
            dest.write_all(chunk).map_err(ShareError::Local)?;
            sent += chunk.len() as u64;
        }
        Ok(sent)
    }
}

fn dir_entry(name: &str) -> RemoteDirEntry {
    RemoteDirEntry {
        name: name.to_string(),
        is_directory: true,
        size: 0,
        modified: fixed_mtime(),
    }
}

fn fixed_mtime() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

fn parent_of(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "/",
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Descriptor pointing at nothing real; the mock keys on the name
pub(crate) fn descriptor(name: &str, display: &str) -> ShareDescriptor {
    ShareDescriptor {
        name: name.to_string(),
        display_name: display.to_string(),
        host: "test.invalid".to_string(),
        root: "/".to_string(),
        username: "tester".to_string(),
        password: "secret".to_string(),
        domain: "WORKGROUP".to_string(),
    }
}

/// Gateway state over a mock factory with the given shares
pub(crate) fn state_with(shares: Vec<(ShareDescriptor, FakeShare)>) -> GatewayState {
    let mut descriptors = Vec::new();
    let mut fakes = HashMap::new();
    for (descriptor, fake) in shares {
        fakes.insert(descriptor.name.clone(), fake);
        descriptors.push(descriptor);
    }
    if descriptors.is_empty() {
        descriptors.push(descriptor("unused", "Unused"));
    }
    let registry = ShareRegistry::from_shares(descriptors).unwrap();
    GatewayState::new(registry, Arc::new(MockSessionFactory { shares: fakes }))
}
