//! # tmdbcache - Local materialization of TMDB metadata
//!
//! Movie and person documents fetched from TMDB are cached locally so that
//! repeated lookups never hit the network twice.
//!
//! tmdbcache provides:
//! - A single `EntityRecord` type for both movies and persons
//! - Two interchangeable storage backends: one SQLite file, or one JSON file per entity
//! - A cache-aside `Materializer` that loads, fetches and persists on demand
//! - Pure projections over stored documents (cast/crew person ids, info summaries)
//! - A blocking TMDB v3 client implementing the `RemoteCatalog` trait

pub mod entity;
pub mod movie;
pub mod person;
pub mod remote;
pub mod storage;
pub mod materialize;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use entity::{Document, EntityId, EntityKind, EntityRecord};
pub use movie::{Movie, MovieInfo};
pub use person::Person;
pub use remote::{RemoteCatalog, RemoteError, TmdbClient};
pub use storage::{EntityStore, FileStore, SqliteStore};
pub use materialize::Materializer;

/// Result type alias for tmdbcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tmdbcache operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetching {kind} {id} failed: {source}")]
    FetchFailed {
        kind: EntityKind,
        id: String,
        source: RemoteError,
    },

    #[error("Refusing to store an empty document for {0} {1}")]
    EmptyDocument(EntityKind, EntityId),

    #[error("Malformed document: {0}")]
    Document(String),
}
