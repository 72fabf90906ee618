//! Person projections

use crate::entity::{keys, list, text, Document, EntityId, EntityKind, EntityRecord};
use serde_json::Value;
use std::collections::BTreeSet;

/// Borrowed view over a person record
#[derive(Debug, Clone, Copy)]
pub struct Person<'a> {
    record: &'a EntityRecord,
}

impl<'a> Person<'a> {
    pub fn new(record: &'a EntityRecord) -> Option<Self> {
        (record.kind == EntityKind::Person).then_some(Self { record })
    }

    pub fn id(&self) -> EntityId {
        self.record.id
    }

    fn details(&self) -> Option<&'a Document> {
        self.record.section(keys::DETAILS)
    }

    pub fn name(&self) -> &'a str {
        text(self.details(), "name").unwrap_or("")
    }

    pub fn known_for_department(&self) -> Option<&'a str> {
        text(self.details(), "known_for_department").filter(|d| !d.is_empty())
    }

    pub fn url(&self) -> String {
        format!("https://www.themoviedb.org/person/{}", self.id())
    }

    pub fn imdb_url(&self) -> Option<String> {
        text(self.details(), "imdb_id")
            .or_else(|| text(self.record.section(keys::EXTERNAL_IDS), "imdb_id"))
            .filter(|iid| !iid.is_empty())
            .map(|iid| format!("https://www.imdb.com/name/{}", iid))
    }

    /// Movies the person is credited on, as cast or crew
    pub fn movie_ids(&self) -> BTreeSet<EntityId> {
        let credits = self.record.section(keys::MOVIE_CREDITS);
        list(credits, "cast")
            .iter()
            .chain(list(credits, "crew"))
            .filter_map(|rec| rec.get("id").and_then(Value::as_i64))
            .collect()
    }
}

impl std::fmt::Display for Person<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(dept) = self.known_for_department() {
            write!(f, " ({})", dept)?;
        }
        Ok(())
    }
}
