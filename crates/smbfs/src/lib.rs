//! SMB session layer for the media gateway
//!
//! This crate wraps libsmbclient (through the pavao bindings) behind a
//! small session trait so the HTTP layer can be exercised without a
//! live SMB server. It also owns share configuration and the error
//! taxonomy shared across the workspace.

pub mod config;
pub mod error;
pub mod native;
pub mod session;

pub use config::{ShareDescriptor, ShareRegistry};
pub use error::{ConfigError, ShareError, ShareResult};
pub use native::NativeSessionFactory;
pub use session::{RemoteAttributes, RemoteDirEntry, SessionFactory, ShareSession};
