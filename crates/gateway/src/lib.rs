//! HTTP media gateway over federated SMB shares
//!
//! This crate exposes the configured shares as one virtual directory
//! tree and re-streams selected media files to HTTP clients. A remote
//! transfer fully lands in a local scratch file first; the response
//! body then owns that scratch file and removes it on every completion
//! path, including client disconnects.

mod federation;
mod metadata;
mod paths;
mod retrieval;
mod server;
mod state;
mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use federation::{list_directory, RemoteEntry};
pub use metadata::{get_metadata, MediaMetadata};
pub use retrieval::{retrieve, RetrievalJob};
pub use server::GatewayApi;
pub use state::GatewayState;

/// Result type alias for gateway server operations
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
