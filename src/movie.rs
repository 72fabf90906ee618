//! Movie projections
//!
//! Read-only views computed from a movie document. Nothing here touches
//! the network or the disk.

use crate::entity::{keys, list, text, Document, EntityId, EntityKind, EntityRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Crew jobs reported as directors
pub const DIRECTOR_JOBS: &[&str] = &["Director"];
/// Crew jobs reported as writers
pub const WRITER_JOBS: &[&str] = &["Screenplay", "Writer", "Novel"];
/// Crew jobs reported as composers
pub const COMPOSER_JOBS: &[&str] = &["Original Music Composer", "Music"];

/// Borrowed view over a movie record
#[derive(Debug, Clone, Copy)]
pub struct Movie<'a> {
    record: &'a EntityRecord,
}

impl<'a> Movie<'a> {
    /// Wrap a record, `None` if it is not a movie
    pub fn new(record: &'a EntityRecord) -> Option<Self> {
        (record.kind == EntityKind::Movie).then_some(Self { record })
    }

    pub fn id(&self) -> EntityId {
        self.record.id
    }

    pub fn record(&self) -> &'a EntityRecord {
        self.record
    }

    fn details(&self) -> Option<&'a Document> {
        self.record.section(keys::DETAILS)
    }

    fn credits(&self) -> Option<&'a Document> {
        self.record.section(keys::CREDITS)
    }

    pub fn title(&self) -> &'a str {
        text(self.details(), "title").unwrap_or("")
    }

    pub fn original_title(&self) -> &'a str {
        text(self.details(), "original_title").unwrap_or("")
    }

    /// Release year, 0 when the release date is unknown
    pub fn year(&self) -> i32 {
        text(self.details(), "release_date")
            .and_then(|rd| rd.get(..4))
            .and_then(|y| y.parse().ok())
            .unwrap_or(0)
    }

    pub fn url(&self) -> String {
        format!("https://www.themoviedb.org/movie/{}", self.id())
    }

    pub fn imdb_id(&self) -> Option<&'a str> {
        text(self.details(), "imdb_id")
            .or_else(|| text(self.record.section(keys::EXTERNAL_IDS), "imdb_id"))
            .filter(|iid| !iid.is_empty())
    }

    pub fn imdb_url(&self) -> Option<String> {
        self.imdb_id().map(|iid| format!("https://www.imdb.com/title/{}", iid))
    }

    /// Every person credited in the cast or the crew
    pub fn person_ids(&self) -> BTreeSet<EntityId> {
        let credits = self.credits();
        list(credits, "cast")
            .iter()
            .chain(list(credits, "crew"))
            .filter_map(|rec| rec.get("id").and_then(Value::as_i64))
            .collect()
    }

    /// Crew members whose job is one of `jobs`, first credit per person wins
    pub fn crew_with_jobs(&self, jobs: &[&str]) -> Vec<CrewEntry> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for rec in list(self.credits(), "crew") {
            let Some(id) = rec.get("id").and_then(Value::as_i64) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            let job = rec.get("job").and_then(Value::as_str).unwrap_or("");
            if jobs.contains(&job) {
                found.push(CrewEntry {
                    name: rec.get("name").and_then(Value::as_str).unwrap_or("").to_string(),
                    id,
                });
                seen.insert(id);
            }
        }
        found
    }

    pub fn cast(&self) -> Vec<CastEntry> {
        list(self.credits(), "cast")
            .iter()
            .filter_map(|rec| {
                Some(CastEntry {
                    character: rec.get("character").and_then(Value::as_str).unwrap_or("").to_string(),
                    actor: rec.get("name").and_then(Value::as_str).unwrap_or("").to_string(),
                    pid: rec.get("id").and_then(Value::as_i64)?,
                })
            })
            .collect()
    }

    /// Flattened summary of the movie
    pub fn info(&self) -> MovieInfo {
        let details = self.details();
        let external_ids = self.record.section(keys::EXTERNAL_IDS);
        let names = |key: &str, field: &str| -> Vec<String> {
            list(details, key)
                .iter()
                .filter_map(|rec| rec.get(field).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        };

        let title = self.title();
        let original_title = Some(self.original_title())
            .filter(|ot| !ot.is_empty() && *ot != title)
            .map(str::to_string);

        MovieInfo {
            id: self.id(),
            title: title.to_string(),
            original_title,
            year: self.year(),
            runtime: details.and_then(|d| d.get("runtime")).and_then(Value::as_i64),
            original_language: text(details, "original_language").map(str::to_string),
            languages: names("spoken_languages", "english_name"),
            overview: text(details, "overview").unwrap_or("").to_string(),
            genres: names("genres", "name"),
            cast: self.cast(),
            crew: CrewSummary {
                director: self.crew_with_jobs(DIRECTOR_JOBS),
                writer: self.crew_with_jobs(WRITER_JOBS),
                composer: self.crew_with_jobs(COMPOSER_JOBS),
            },
            countries: names("production_countries", "name"),
            rating: details.and_then(|d| d.get("vote_average")).and_then(Value::as_f64),
            imdb_id: text(external_ids, "imdb_id").filter(|s| !s.is_empty()).map(str::to_string),
            wikidata_id: text(external_ids, "wikidata_id").filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

impl std::fmt::Display for Movie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (title, original) = (self.title(), self.original_title());
        write!(f, "{}", title)?;
        if !original.is_empty() && original != title {
            write!(f, " [{}]", original)?;
        }
        write!(f, " ({})", self.year())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastEntry {
    pub character: String,
    pub actor: String,
    pub pid: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewEntry {
    pub name: String,
    pub id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewSummary {
    pub director: Vec<CrewEntry>,
    pub writer: Vec<CrewEntry>,
    pub composer: Vec<CrewEntry>,
}

/// Flattened movie summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub id: EntityId,
    pub title: String,
    pub original_title: Option<String>,
    pub year: i32,
    pub runtime: Option<i64>,
    pub original_language: Option<String>,
    pub languages: Vec<String>,
    pub overview: String,
    pub genres: Vec<String>,
    pub cast: Vec<CastEntry>,
    pub crew: CrewSummary,
    pub countries: Vec<String>,
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn fight_club() -> EntityRecord {
        let doc = json!({
            "retrieved_dt": "2024-05-04T12:00:00+00:00",
            "details": {
                "title": "Fight Club",
                "original_title": "Fight Club",
                "release_date": "1999-10-15",
                "runtime": 139,
                "original_language": "en",
                "spoken_languages": [{"english_name": "English", "iso_639_1": "en"}],
                "overview": "A ticking-time-bomb insomniac...",
                "genres": [{"id": 18, "name": "Drama"}],
                "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
                "vote_average": 8.4,
                "imdb_id": "tt0137523"
            },
            "credits": {
                "cast": [
                    {"id": 819, "name": "Edward Norton", "character": "Narrator"},
                    {"id": 287, "name": "Brad Pitt", "character": "Tyler Durden"}
                ],
                "crew": [
                    {"id": 7467, "name": "David Fincher", "job": "Director"},
                    {"id": 7468, "name": "Chuck Palahniuk", "job": "Novel"},
                    {"id": 7469, "name": "Jim Uhls", "job": "Screenplay"},
                    {"id": 7469, "name": "Jim Uhls", "job": "Writer"},
                    {"id": 1004624, "name": "Dust Brothers", "job": "Original Music Composer"},
                    {"id": 287, "name": "Brad Pitt", "job": "Producer"}
                ]
            },
            "external_ids": {"imdb_id": "tt0137523", "wikidata_id": "Q190050"},
            "keywords": {"keywords": [{"id": 825, "name": "support group"}]}
        });
        EntityRecord::movie(550, doc.as_object().unwrap().clone())
    }

    #[test]
    fn test_person_ids_union_of_cast_and_crew() {
        let record = fight_club();
        let ids = record.as_movie().unwrap().person_ids();
        let expected: BTreeSet<EntityId> = [287, 819, 7467, 7468, 7469, 1004624].into_iter().collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_info_summary() {
        let record = fight_club();
        let info = record.as_movie().unwrap().info();

        assert_eq!(info.title, "Fight Club");
        assert_eq!(info.original_title, None);
        assert_eq!(info.year, 1999);
        assert_eq!(info.runtime, Some(139));
        assert_eq!(info.genres, vec!["Drama"]);
        assert_eq!(info.languages, vec!["English"]);
        assert_eq!(info.cast.len(), 2);
        assert_eq!(info.cast[1].character, "Tyler Durden");
        assert_eq!(info.crew.director, vec![CrewEntry { name: "David Fincher".into(), id: 7467 }]);
        // Jim Uhls appears twice in the crew but once as a writer
        assert_eq!(info.crew.writer.len(), 2);
        assert_eq!(info.crew.composer[0].id, 1004624);
        assert_eq!(info.imdb_id.as_deref(), Some("tt0137523"));
        assert_eq!(info.wikidata_id.as_deref(), Some("Q190050"));
    }

    #[test]
    fn test_info_is_deterministic() {
        let record = fight_club();
        let movie = record.as_movie().unwrap();
        assert_eq!(movie.info(), movie.info());
        assert_eq!(movie.person_ids(), movie.person_ids());
    }

    #[test]
    fn test_display_and_urls() {
        let mut record = fight_club();
        record.attributes["details"]["original_title"] = json!("Le Club");
        let movie = record.as_movie().unwrap();

        assert_eq!(movie.to_string(), "Fight Club [Le Club] (1999)");
        assert_eq!(movie.url(), "https://www.themoviedb.org/movie/550");
        assert_eq!(movie.imdb_url().as_deref(), Some("https://www.imdb.com/title/tt0137523"));
    }

    #[test]
    fn test_sparse_document() {
        let record = EntityRecord::movie(1, json!({"details": {"release_date": ""}}).as_object().unwrap().clone());
        let movie = record.as_movie().unwrap();
        assert_eq!(movie.year(), 0);
        assert!(movie.person_ids().is_empty());
        assert!(movie.info().cast.is_empty());
    }
}
