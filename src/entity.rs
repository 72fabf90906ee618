//! Entity types - the cached unit of data
//!
//! Every cached object is an `EntityRecord`: a kind, a native TMDB id and an
//! opaque JSON document. Storage backends never look inside the document.

use crate::movie::Movie;
use crate::person::Person;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Native TMDB identifier
pub type EntityId = i64;

/// Attribute document of an entity (a JSON object)
pub type Document = serde_json::Map<String, Value>;

/// Fixed top-level keys of a composed entity document
pub mod keys {
    pub const RETRIEVED_DT: &str = "retrieved_dt";
    pub const DETAILS: &str = "details";
    pub const CREDITS: &str = "credits";
    pub const MOVIE_CREDITS: &str = "movie_credits";
    pub const TV_CREDITS: &str = "tv_credits";
    pub const EXTERNAL_IDS: &str = "external_ids";
    pub const KEYWORDS: &str = "keywords";
}

/// The two kinds of entity mirrored from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Person,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Person => "person",
        }
    }

    /// Table holding records of this kind keyed by native id
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movies",
            EntityKind::Person => "persons",
        }
    }

    /// Table holding foreign-catalog documents keyed by external id
    pub fn external_table(&self) -> &'static str {
        match self {
            EntityKind::Movie => "imdbmovies",
            EntityKind::Person => "imdbpersons",
        }
    }

    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Movie, EntityKind::Person]
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(EntityKind::Movie),
            "person" | "persons" | "people" => Ok(EntityKind::Person),
            _ => Err(Error::Document(format!("Unknown entity kind: {}", s))),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cached entity: identity plus its full attribute document.
///
/// Records are replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub id: EntityId,
    pub attributes: Document,
}

impl EntityRecord {
    pub fn new(kind: EntityKind, id: EntityId, attributes: Document) -> Self {
        Self { kind, id, attributes }
    }

    pub fn movie(id: EntityId, attributes: Document) -> Self {
        Self::new(EntityKind::Movie, id, attributes)
    }

    pub fn person(id: EntityId, attributes: Document) -> Self {
        Self::new(EntityKind::Person, id, attributes)
    }

    /// Decode a record from its stored JSON text
    pub fn from_json(kind: EntityKind, id: EntityId, text: &str) -> Result<Self> {
        let attributes: Document = serde_json::from_str(text)?;
        Ok(Self::new(kind, id, attributes))
    }

    /// Compact JSON text of the attribute document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.attributes)?)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// When the document was fetched from the catalog, if recorded
    pub fn retrieved_dt(&self) -> Option<&str> {
        self.attributes.get(keys::RETRIEVED_DT).and_then(Value::as_str)
    }

    pub fn section(&self, key: &str) -> Option<&Document> {
        self.attributes.get(key).and_then(Value::as_object)
    }

    pub fn as_movie(&self) -> Option<Movie<'_>> {
        Movie::new(self)
    }

    pub fn as_person(&self) -> Option<Person<'_>> {
        Person::new(self)
    }
}

impl std::fmt::Display for EntityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(movie) = self.as_movie() {
            write!(f, "{}", movie)
        } else if let Some(person) = self.as_person() {
            write!(f, "{}", person)
        } else {
            write!(f, "{} {}", self.kind, self.id)
        }
    }
}

/// Array stored under `key` of an optional object, empty when missing
pub(crate) fn list<'a>(doc: Option<&'a Document>, key: &str) -> &'a [Value] {
    doc.and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// String stored under `key` of an optional object
pub(crate) fn text<'a>(doc: Option<&'a Document>, key: &str) -> Option<&'a str> {
    doc.and_then(|d| d.get(key)).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse() {
        assert_eq!("movie".parse::<EntityKind>().unwrap(), EntityKind::Movie);
        assert_eq!("People".parse::<EntityKind>().unwrap(), EntityKind::Person);
        assert!("tv".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_nested_unicode() {
        let doc = json!({
            "retrieved_dt": "2024-03-01T10:00:00.123456+00:00",
            "details": {"title": "Le Fabuleux Destin d'Amélie Poulain", "genres": [{"id": 35, "name": "Comédie"}]},
            "keywords": {"keywords": []},
            "rating": 7.9,
            "adult": false,
            "homepage": null,
        });
        let record = EntityRecord::movie(194, doc.as_object().unwrap().clone());

        let text = record.to_json().unwrap();
        let decoded = EntityRecord::from_json(EntityKind::Movie, 194, &text).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(decoded.retrieved_dt(), Some("2024-03-01T10:00:00.123456+00:00"));
    }

    #[test]
    fn test_non_object_document_rejected() {
        assert!(EntityRecord::from_json(EntityKind::Person, 1, "[1, 2]").is_err());
    }
}
