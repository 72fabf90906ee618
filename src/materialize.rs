//! Cache-aside materialization
//!
//! `Materializer` answers "give me entity X" from a store, falling back to the
//! remote catalog on a miss and persisting what it fetched:
//!
//! 1. store hit: return the stored record
//! 2. no remote configured: `None`
//! 3. remote not-found: `None`, nothing persisted, retried next time
//! 4. remote success: save, then return
//!
//! Remote transport failures surface as `Error::FetchFailed` whatever the
//! backend; callers decide whether to carry on.

use std::collections::BTreeSet;
use crate::{Error, Result};
use crate::entity::{EntityId, EntityKind, EntityRecord};
use crate::movie::Movie;
use crate::remote::{RemoteCatalog, RemoteError};
use crate::storage::EntityStore;

/// Fetch-or-create orchestrator over one store and an optional catalog
pub struct Materializer<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    remote: Option<&'a dyn RemoteCatalog>,
}

impl<'a, S: EntityStore + ?Sized> Materializer<'a, S> {
    pub fn new(store: &'a S, remote: Option<&'a dyn RemoteCatalog>) -> Self {
        Self { store, remote }
    }

    /// Store-only materializer; misses stay misses
    pub fn offline(store: &'a S) -> Self {
        Self::new(store, None)
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn is_online(&self) -> bool {
        self.remote.is_some()
    }

    /// Look in the store only
    pub fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>> {
        self.store.load(kind, id)
    }

    /// Ask the remote catalog only; the result is not persisted
    pub fn fetch(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>> {
        let Some(remote) = self.remote else {
            return Ok(None);
        };
        match remote.fetch(kind, id) {
            Ok(attributes) => Ok(Some(EntityRecord::new(kind, id, attributes))),
            Err(RemoteError::NotFound) => {
                tracing::debug!("{} {} not found in remote catalog", kind, id);
                Ok(None)
            }
            Err(source) => Err(Error::FetchFailed { kind, id: id.to_string(), source }),
        }
    }

    /// Return the record for `id`, fetching and persisting it on a miss
    pub fn resolve(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>> {
        if let Some(record) = self.store.load(kind, id)? {
            tracing::debug!("Cache hit for {} {}", kind, id);
            return Ok(Some(record));
        }
        tracing::debug!("Cache miss for {} {}", kind, id);

        let Some(record) = self.fetch(kind, id)? else {
            return Ok(None);
        };
        self.store.save(&record)?;
        Ok(Some(record))
    }

    pub fn resolve_movie(&self, id: EntityId) -> Result<Option<EntityRecord>> {
        self.resolve(EntityKind::Movie, id)
    }

    pub fn resolve_person(&self, id: EntityId) -> Result<Option<EntityRecord>> {
        self.resolve(EntityKind::Person, id)
    }

    /// Translate an external (IMDb) id once, then resolve the native id
    pub fn resolve_by_external_id(&self, kind: EntityKind, external_id: &str) -> Result<Option<EntityRecord>> {
        let Some(remote) = self.remote else {
            return Ok(None);
        };
        let native = match remote.resolve_external_id(kind, external_id) {
            Ok(native) => native,
            Err(RemoteError::NotFound) => None,
            Err(source) => {
                return Err(Error::FetchFailed { kind, id: external_id.to_string(), source });
            }
        };
        match native {
            Some(id) => {
                tracing::debug!("{} {} is {} {}", kind, external_id, kind, id);
                self.resolve(kind, id)
            }
            None => Ok(None),
        }
    }

    /// Union of the cast and crew person ids of every stored movie
    pub fn movie_person_ids(&self) -> Result<BTreeSet<EntityId>> {
        let mut ids = BTreeSet::new();
        for record in self.store.all_records(EntityKind::Movie)? {
            if let Some(movie) = Movie::new(&record) {
                ids.extend(movie.person_ids());
            }
        }
        Ok(ids)
    }

    /// Resolve one person into a listing line
    pub fn person_line(&self, id: EntityId) -> Result<PersonLine> {
        let label = self
            .resolve_person(id)?
            .and_then(|record| record.as_person().map(|p| p.to_string()));
        Ok(PersonLine { id, label })
    }

    /// Resolve every person in `ids`, in order
    pub fn person_listing(&self, ids: impl IntoIterator<Item = EntityId>) -> Result<Vec<PersonLine>> {
        ids.into_iter().map(|id| self.person_line(id)).collect()
    }
}

/// One `<person> :: <id>` line of the persons id file
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PersonLine {
    pub id: EntityId,
    /// Display form of the person, `None` when the catalog has no such person
    pub label: Option<String>,
}

impl std::fmt::Display for PersonLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} :: {}", self.label.as_deref().unwrap_or("<unknown>"), self.id)
    }
}
