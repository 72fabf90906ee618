//! In-memory catalog that counts every call

use super::{RemoteCatalog, RemoteError, RemoteResult};
use crate::entity::{Document, EntityId, EntityKind};
use std::cell::Cell;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct FakeCatalog {
    documents: HashMap<(EntityKind, EntityId), Document>,
    external: HashMap<String, EntityId>,
    failing: bool,
    pub fetches: Cell<usize>,
    pub translations: Cell<usize>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose every call fails with a transport error
    pub fn unreachable() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn with(mut self, kind: EntityKind, id: EntityId, document: Document) -> Self {
        self.documents.insert((kind, id), document);
        self
    }

    pub fn with_external(mut self, external_id: &str, id: EntityId) -> Self {
        self.external.insert(external_id.to_string(), id);
        self
    }

    fn lookup(&self, kind: EntityKind, id: EntityId) -> RemoteResult<Document> {
        self.fetches.set(self.fetches.get() + 1);
        if self.failing {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        self.documents.get(&(kind, id)).cloned().ok_or(RemoteError::NotFound)
    }

    fn translate(&self, external_id: &str) -> RemoteResult<Option<EntityId>> {
        self.translations.set(self.translations.get() + 1);
        if self.failing {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        Ok(self.external.get(external_id).copied())
    }
}

impl RemoteCatalog for FakeCatalog {
    fn fetch_movie(&self, id: EntityId) -> RemoteResult<Document> {
        self.lookup(EntityKind::Movie, id)
    }

    fn fetch_person(&self, id: EntityId) -> RemoteResult<Document> {
        self.lookup(EntityKind::Person, id)
    }

    fn resolve_external_movie_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>> {
        self.translate(external_id)
    }

    fn resolve_external_person_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>> {
        self.translate(external_id)
    }
}
