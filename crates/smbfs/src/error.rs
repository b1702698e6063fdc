use std::fmt;
use std::io;

/// Error type for share operations
#[derive(Debug)]
pub enum ShareError {
    /// Could not reach or authenticate to the remote host
    Connection {
        share: String,
        host: String,
        detail: String,
    },
    /// Referenced share name is not registered
    ShareNotFound(String),
    /// Attribute fetch or data transfer failed or was truncated
    Remote(String),
    /// Scratch file creation, write or cleanup failure
    Local(io::Error),
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShareError::Connection {
                share,
                host,
                detail,
            } => write!(f, "cannot connect to share {} on {}: {}", share, host, detail),
            ShareError::ShareNotFound(name) => write!(f, "share {} not found", name),
            ShareError::Remote(msg) => write!(f, "remote I/O error: {}", msg),
            ShareError::Local(err) => write!(f, "local I/O error: {}", err),
        }
    }
}

impl std::error::Error for ShareError {}

impl From<io::Error> for ShareError {
    fn from(err: io::Error) -> Self {
        ShareError::Local(err)
    }
}

/// Result type alias for share operations
pub type ShareResult<T> = Result<T, ShareError>;

/// Share configuration errors, always fatal at startup
#[derive(Debug)]
pub enum ConfigError {
    /// Could not read the configuration file
    Read { path: String, source: io::Error },
    /// Configuration file is not valid TOML
    Parse {
        path: String,
        source: toml::de::Error,
    },
    /// No shares configured
    NoShares,
    /// Two shares carry the same name
    DuplicateShare(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read share configuration {}: {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "malformed share configuration {}: {}", path, source)
            }
            ConfigError::NoShares => write!(f, "share configuration defines no shares"),
            ConfigError::DuplicateShare(name) => {
                write!(f, "share name {} is configured more than once", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
