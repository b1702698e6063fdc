//! Share configuration, loaded once at process start
//!
//! The registry is built explicitly in `main` and handed to the
//! components that need it; nothing here is lazily initialized.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

fn default_root() -> String {
    "/".to_string()
}

fn default_domain() -> String {
    "WORKGROUP".to_string()
}

/// Identity and credentials of one configured SMB share
#[derive(Debug, Clone, Deserialize)]
pub struct ShareDescriptor {
    /// Unique name, also the share component on the server
    pub name: String,
    /// Human-readable name shown in listings
    pub display_name: String,
    /// Server address, with optional port
    pub host: String,
    /// Root path within the share that the gateway exposes
    #[serde(default = "default_root")]
    pub root: String,
    pub username: String,
    pub password: String,
    /// NT domain / workgroup
    #[serde(default = "default_domain")]
    pub domain: String,
}

#[derive(Debug, Deserialize)]
struct ShareFile {
    shares: Vec<ShareDescriptor>,
}

/// Immutable set of configured shares
///
/// Loaded once at startup and shared behind an `Arc` for the life of
/// the process. There are no mutation operations.
#[derive(Debug, Clone)]
pub struct ShareRegistry {
    shares: Vec<ShareDescriptor>,
}

impl ShareRegistry {
    /// Load share definitions from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file is missing, not valid TOML, defines
    /// no shares, or repeats a share name. All of these are fatal at
    /// startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let parsed: ShareFile = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_shares(parsed.shares)
    }

    /// Build a registry from descriptors, validating name uniqueness
    pub fn from_shares(shares: Vec<ShareDescriptor>) -> Result<Self, ConfigError> {
        if shares.is_empty() {
            return Err(ConfigError::NoShares);
        }
        let mut seen = HashSet::new();
        for share in &shares {
            if !seen.insert(share.name.as_str()) {
                return Err(ConfigError::DuplicateShare(share.name.clone()));
            }
        }
        Ok(Self { shares })
    }

    /// Configured shares, in registration order
    pub fn shares(&self) -> &[ShareDescriptor] {
        &self.shares
    }

    /// Look up a share by its unique name
    pub fn find(&self, name: &str) -> Option<&ShareDescriptor> {
        self.shares.iter().find(|s| s.name == name)
    }
}
