//! Database schema definitions

/// SQL to create the movies table
pub const CREATE_MOVIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY,
    data TEXT NOT NULL
)
"#;

/// SQL to create the persons table
pub const CREATE_PERSONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS persons (
    id INTEGER PRIMARY KEY,
    data TEXT NOT NULL
)
"#;

/// SQL to create the IMDb movies table, keyed by `tt...` ids
pub const CREATE_IMDB_MOVIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS imdbmovies (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL
)
"#;

/// SQL to create the IMDb persons table, keyed by `nm...` ids
pub const CREATE_IMDB_PERSONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS imdbpersons (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_MOVIES_TABLE,
        CREATE_PERSONS_TABLE,
        CREATE_IMDB_MOVIES_TABLE,
        CREATE_IMDB_PERSONS_TABLE,
    ]
}
