//! One-JSON-file-per-entity storage
//!
//! Each record lives at `<root>/<id>.json`, pretty-printed so it can be read
//! and edited by hand. Roots are expected to exist already.

use std::fs;
use std::path::{Path, PathBuf};
use crate::Result;
use crate::entity::{Document, EntityId, EntityKind, EntityRecord};
use crate::materialize::Materializer;
use crate::remote::RemoteCatalog;
use super::EntityStore;

const EXTENSION: &str = "json";

/// Directory-backed storage, one root per entity kind
#[derive(Debug, Clone)]
pub struct FileStore {
    movies_root: PathBuf,
    persons_root: PathBuf,
}

impl FileStore {
    pub fn new(movies_root: impl Into<PathBuf>, persons_root: impl Into<PathBuf>) -> Self {
        Self {
            movies_root: movies_root.into(),
            persons_root: persons_root.into(),
        }
    }

    pub fn root(&self, kind: EntityKind) -> &Path {
        match kind {
            EntityKind::Movie => &self.movies_root,
            EntityKind::Person => &self.persons_root,
        }
    }

    /// Location of the document for `id`; pure, touches nothing
    pub fn path(&self, kind: EntityKind, id: EntityId) -> PathBuf {
        self.root(kind).join(format!("{}.{}", id, EXTENSION))
    }

    pub fn exists(&self, kind: EntityKind, id: EntityId) -> bool {
        self.path(kind, id).is_file()
    }

    /// Return the cached document, fetching and writing it first if needed.
    ///
    /// Remote failures are logged and reported as `None`; nothing is written
    /// in that case. Disk failures are returned as errors.
    pub fn load_or_fetch(&self, kind: EntityKind, id: EntityId, remote: Option<&dyn RemoteCatalog>) -> Result<Option<Document>> {
        match Materializer::new(self, remote).resolve(kind, id) {
            Ok(record) => Ok(record.map(|r| r.attributes)),
            Err(crate::Error::FetchFailed { source, .. }) => {
                tracing::warn!("Could not fetch {} {}: {}", kind, id, source);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Write through a temporary sibling so readers never see a partial file
    fn write_atomic(path: &Path, contents: &str) -> Result<()> {
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        if let Err(e) = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, path)) {
            fs::remove_file(&tmp).ok();
            return Err(e.into());
        }
        Ok(())
    }
}

impl EntityStore for FileStore {
    fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>> {
        let path = self.path(kind, id);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        EntityRecord::from_json(kind, id, &text).map(Some)
    }

    fn save(&self, record: &EntityRecord) -> Result<usize> {
        if record.is_empty() {
            return Err(crate::Error::EmptyDocument(record.kind, record.id));
        }
        let path = self.path(record.kind, record.id);
        let mut contents = serde_json::to_string_pretty(&record.attributes)?;
        contents.push('\n');
        Self::write_atomic(&path, &contents)?;
        tracing::info!("Saved {} <<{}>> to {}", record.kind, record, path.display());
        Ok(1)
    }

    fn all_ids(&self, kind: EntityKind) -> Result<Vec<(EntityId, String)>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(self.root(kind))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<EntityId>().ok())
            else {
                continue;
            };
            found.push((id, fs::read_to_string(&path)?));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::tests::fight_club;
    use crate::remote::fake::FakeCatalog;
    use serde_json::json;
    use tempfile::TempDir;

    fn scratch() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("movies")).unwrap();
        fs::create_dir(dir.path().join("persons")).unwrap();
        let store = FileStore::new(dir.path().join("movies"), dir.path().join("persons"));
        (dir, store)
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_path_is_deterministic() {
        let store = FileStore::new("/data/movies", "/data/persons");
        assert_eq!(store.path(EntityKind::Movie, 550), PathBuf::from("/data/movies/550.json"));
        assert_eq!(store.path(EntityKind::Person, 287), PathBuf::from("/data/persons/287.json"));
        assert!(!store.exists(EntityKind::Movie, 550));
    }

    #[test]
    fn test_cache_hit_does_not_fetch() {
        let (_dir, store) = scratch();
        let cached = doc(json!({"details": {"title": "Fight Club", "release_date": "1999-10-15"}}));
        fs::write(store.path(EntityKind::Movie, 550), serde_json::to_string_pretty(&cached).unwrap()).unwrap();

        assert_eq!(store.load_or_fetch(EntityKind::Movie, 550, None).unwrap(), Some(cached.clone()));

        let remote = FakeCatalog::new().with(EntityKind::Movie, 550, doc(json!({"details": {"title": "Other"}})));
        assert_eq!(store.load_or_fetch(EntityKind::Movie, 550, Some(&remote)).unwrap(), Some(cached));
        assert_eq!(remote.fetches.get(), 0);
    }

    #[test]
    fn test_cache_miss_writes_document() {
        let (_dir, store) = scratch();
        let fetched = doc(json!({"retrieved_dt": "2024-01-01T00:00:00+00:00", "details": {"title": "Fight Club 2"}}));
        let remote = FakeCatalog::new().with(EntityKind::Movie, 551, fetched.clone());

        let result = store.load_or_fetch(EntityKind::Movie, 551, Some(&remote)).unwrap();

        assert_eq!(result, Some(fetched.clone()));
        assert!(store.exists(EntityKind::Movie, 551));
        let on_disk: Document = serde_json::from_str(&fs::read_to_string(store.path(EntityKind::Movie, 551)).unwrap()).unwrap();
        assert_eq!(on_disk, fetched);
        assert!(!store.path(EntityKind::Movie, 551).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_absent_without_remote() {
        let (_dir, store) = scratch();
        assert_eq!(store.load_or_fetch(EntityKind::Person, 287, None).unwrap(), None);
        assert!(!store.exists(EntityKind::Person, 287));
    }

    #[test]
    fn test_remote_failure_is_swallowed() {
        let (_dir, store) = scratch();
        let remote = FakeCatalog::unreachable();

        assert_eq!(store.load_or_fetch(EntityKind::Person, 287, Some(&remote)).unwrap(), None);
        assert_eq!(remote.fetches.get(), 1);
        assert!(!store.exists(EntityKind::Person, 287));
    }

    #[test]
    fn test_pretty_unicode_roundtrip() {
        let (_dir, store) = scratch();
        let record = EntityRecord::person(1, doc(json!({
            "retrieved_dt": "2024-01-01T00:00:00.000001+00:00",
            "details": {"name": "Audrey Tautou", "place_of_birth": "Beaumont, Puy-de-Dôme, France", "also_known_as": ["オドレイ・トトゥ"]},
        })));

        store.save(&record).unwrap();

        let text = fs::read_to_string(store.path(EntityKind::Person, 1)).unwrap();
        assert!(text.contains("Puy-de-Dôme"));
        assert!(text.contains("オドレイ・トトゥ"));
        assert!(text.lines().count() > 1);
        assert_eq!(store.load(EntityKind::Person, 1).unwrap(), Some(record));
    }

    #[test]
    fn test_all_ids_skips_foreign_files() {
        let (_dir, store) = scratch();
        store.save(&fight_club()).unwrap();
        fs::write(store.root(EntityKind::Movie).join("notes.json"), "{}").unwrap();
        fs::write(store.root(EntityKind::Movie).join("README.md"), "hello").unwrap();

        let ids: Vec<EntityId> = store.all_ids(EntityKind::Movie).unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![550]);
        assert_eq!(store.all_records(EntityKind::Movie).unwrap(), vec![fight_club()]);
    }
}
