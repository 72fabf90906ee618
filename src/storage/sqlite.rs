//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::entity::{Document, EntityId, EntityKind, EntityRecord};
use super::{schema, EntityStore};

/// SQLite-backed storage for movie and person documents
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates file and tables if they don't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let existed = path.is_file();
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        if !existed {
            tracing::info!("Created database file {}", path.display());
        }
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Foreign Catalog Documents ==========

    /// Insert or replace a document keyed by an external (IMDb) id
    pub fn save_external(&self, kind: EntityKind, external_id: &str, document: &Document) -> Result<usize> {
        let data = serde_json::to_string(document)?;
        let rows = self.conn.execute(
            &format!("INSERT OR REPLACE INTO {} (id, data) VALUES (?1, ?2)", kind.external_table()),
            params![external_id, data],
        )?;
        tracing::info!("Saved external {} {} to db", kind, external_id);
        Ok(rows)
    }

    /// Get a document by external (IMDb) id
    pub fn load_external(&self, kind: EntityKind, external_id: &str) -> Result<Option<Document>> {
        let data: Option<String> = self.conn
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", kind.external_table()),
                [external_id],
                |row| row.get(0),
            )
            .optional()?;

        data.map(|text| serde_json::from_str(&text).map_err(Error::from))
            .transpose()
    }

    // ========== Statistics ==========

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            movies: self.count(EntityKind::Movie.table())?,
            persons: self.count(EntityKind::Person.table())?,
            imdb_movies: self.count(EntityKind::Movie.external_table())?,
            imdb_persons: self.count(EntityKind::Person.external_table())?,
        })
    }
}

impl EntityStore for SqliteStore {
    fn load(&self, kind: EntityKind, id: EntityId) -> Result<Option<EntityRecord>> {
        let data: Option<String> = self.conn
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", kind.table()),
                [id],
                |row| row.get(0),
            )
            .optional()?;

        data.map(|text| EntityRecord::from_json(kind, id, &text))
            .transpose()
    }

    fn save(&self, record: &EntityRecord) -> Result<usize> {
        if record.is_empty() {
            return Err(Error::EmptyDocument(record.kind, record.id));
        }
        let rows = self.conn.execute(
            &format!("INSERT OR REPLACE INTO {} (id, data) VALUES (?1, ?2)", record.kind.table()),
            params![record.id, record.to_json()?],
        )?;
        tracing::info!("Saved {} <<{}>> to db", record.kind, record);
        Ok(rows)
    }

    fn all_ids(&self, kind: EntityKind) -> Result<Vec<(EntityId, String)>> {
        let mut stmt = self.conn.prepare(&format!("SELECT id, data FROM {}", kind.table()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, EntityId>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub movies: usize,
    pub persons: usize,
    pub imdb_movies: usize,
    pub imdb_persons: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Movies: {}", self.movies)?;
        writeln!(f, "  Persons: {}", self.persons)?;
        writeln!(f, "  IMDb movies: {}", self.imdb_movies)?;
        writeln!(f, "  IMDb persons: {}", self.imdb_persons)
    }
}
