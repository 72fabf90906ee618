//! Remote catalog - where documents come from on a cache miss
//!
//! The materializer only sees the `RemoteCatalog` trait. `TmdbClient` is the
//! production implementation; tests use an in-memory fake.

pub mod tmdb;
#[cfg(test)]
pub(crate) mod fake;

pub use tmdb::TmdbClient;

use crate::entity::{Document, EntityId, EntityKind};

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Failures reported by a remote catalog
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The catalog has no entity with this id
    #[error("not found")]
    NotFound,

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound)
    }
}

/// Source of entity documents.
///
/// Fetches are blocking. A missing entity is reported as
/// `RemoteError::NotFound`; an unknown external id as `Ok(None)`.
pub trait RemoteCatalog {
    fn fetch_movie(&self, id: EntityId) -> RemoteResult<Document>;

    fn fetch_person(&self, id: EntityId) -> RemoteResult<Document>;

    /// Translate an IMDb title id (`tt...`) to a native movie id
    fn resolve_external_movie_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>>;

    /// Translate an IMDb name id (`nm...`) to a native person id
    fn resolve_external_person_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>>;

    fn fetch(&self, kind: EntityKind, id: EntityId) -> RemoteResult<Document> {
        match kind {
            EntityKind::Movie => self.fetch_movie(id),
            EntityKind::Person => self.fetch_person(id),
        }
    }

    fn resolve_external_id(&self, kind: EntityKind, external_id: &str) -> RemoteResult<Option<EntityId>> {
        match kind {
            EntityKind::Movie => self.resolve_external_movie_id(external_id),
            EntityKind::Person => self.resolve_external_person_id(external_id),
        }
    }
}
