//! Storage Layer - local persistence of entity records
//!
//! Two interchangeable backends implement `EntityStore`:
//! - `SqliteStore`: one SQLite file with tables movies(id, data), persons(id, data)
//!   and the foreign-catalog tables imdbmovies(id, data), imdbpersons(id, data)
//! - `FileStore`: one pretty-printed `<id>.json` document per entity under a
//!   directory per kind

pub mod schema;
pub mod sqlite;
pub mod files;

pub use sqlite::{SqliteStore, StoreStats};
pub use files::FileStore;

use crate::entity::{EntityId, EntityKind, EntityRecord};
use crate::Result;

/// Key-to-document persistence for entity records.
///
/// `save` has insert-or-replace semantics and `load` returns `None` for
/// unknown ids. Storage failures are returned, never swallowed.
pub trait EntityStore {
    fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>>;

    /// Persist a record, replacing any previous version; returns rows affected
    fn save(&self, record: &EntityRecord) -> Result<usize>;

    /// Every stored `(id, raw JSON text)` of a kind, in no particular order
    fn all_ids(&self, kind: EntityKind) -> Result<Vec<(EntityId, String)>>;

    fn all_records(&self, kind: EntityKind) -> Result<Vec<EntityRecord>> {
        self.all_ids(kind)?
            .into_iter()
            .map(|(id, raw)| EntityRecord::from_json(kind, id, &raw))
            .collect()
    }

    fn contains(&self, kind: EntityKind, id: EntityId) -> Result<bool> {
        Ok(self.load(kind, id)?.is_some())
    }
}
