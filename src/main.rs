//! tmdbcache CLI - look up TMDB movies and persons through the local cache

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tmdbcache::config::{self, TmdbCacheConfig};
use tmdbcache::storage::{EntityStore, FileStore, SqliteStore};
use tmdbcache::ui::{self, Icons};
use tmdbcache::{EntityKind, Error, Materializer, RemoteCatalog, TmdbClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tmdbcache")]
#[command(version)]
#[command(about = "Cache TMDB movie and person metadata locally")]
#[command(long_about = r#"
tmdbcache keeps a local copy of every TMDB document it has seen, either in a
single SQLite file or as one JSON file per entity. Documents are fetched from
TMDB only when they are not cached yet.

Example usage:
  tmdbcache movie 550
  tmdbcache person 287 --backend files
  tmdbcache find tt0137523
  tmdbcache persons-file persons.txt
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Single SQLite database file
    Sqlite,
    /// One JSON file per entity
    Files,
}

#[derive(Args)]
struct StoreArgs {
    /// Storage backend
    #[arg(short, long, value_enum, default_value = "sqlite")]
    backend: Backend,

    /// Never contact TMDB, answer from the cache only
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a movie, fetching it on a cache miss
    Movie {
        /// TMDB movie id
        id: i64,

        #[command(flatten)]
        store: StoreArgs,

        /// Print the info summary as JSON
        #[arg(long)]
        json: bool,

        /// Print the raw cached document
        #[arg(long)]
        raw: bool,
    },

    /// Show a person, fetching it on a cache miss
    Person {
        /// TMDB person id
        id: i64,

        #[command(flatten)]
        store: StoreArgs,

        /// Print the raw cached document
        #[arg(long)]
        raw: bool,
    },

    /// Look up an entity by its IMDb id (tt... for movies, nm... for persons)
    Find {
        imdb_id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List cached entities
    List {
        /// List persons instead of movies
        #[arg(short, long)]
        person: bool,

        /// Storage backend
        #[arg(short, long, value_enum, default_value = "sqlite")]
        backend: Backend,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write "<person> :: <id>" for every person credited in a cached movie
    PersonsFile {
        /// Output file
        output: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show cache statistics
    Stats,

    /// Write a config file with the default locations
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();

    match cli.command {
        Commands::Movie { id, store, json, raw } => {
            let backend = open_store(&config, store.backend)?;
            let remote = open_remote(&config, store.offline)?;
            let materializer = Materializer::new(backend.as_ref(), remote.as_ref().map(|c| c as &dyn RemoteCatalog));

            let Some(record) = report(with_spinner(|| materializer.resolve_movie(id)), EntityKind::Movie, &id.to_string())? else {
                return Ok(());
            };
            if raw {
                println!("{}", serde_json::to_string_pretty(&record.attributes)?);
            } else if let Some(movie) = record.as_movie() {
                if json {
                    println!("{}", serde_json::to_string_pretty(&movie.info())?);
                } else {
                    ui::movie_card(&movie);
                }
            }
        }

        Commands::Person { id, store, raw } => {
            let backend = open_store(&config, store.backend)?;
            let remote = open_remote(&config, store.offline)?;
            let materializer = Materializer::new(backend.as_ref(), remote.as_ref().map(|c| c as &dyn RemoteCatalog));

            let Some(record) = report(with_spinner(|| materializer.resolve_person(id)), EntityKind::Person, &id.to_string())? else {
                return Ok(());
            };
            if raw {
                println!("{}", serde_json::to_string_pretty(&record.attributes)?);
            } else if let Some(person) = record.as_person() {
                ui::person_card(&person);
            }
        }

        Commands::Find { imdb_id, store } => {
            let kind = if imdb_id.starts_with("tt") {
                EntityKind::Movie
            } else if imdb_id.starts_with("nm") {
                EntityKind::Person
            } else {
                anyhow::bail!("IMDb ids start with \"tt\" (titles) or \"nm\" (names): {}", imdb_id);
            };
            if store.offline {
                anyhow::bail!("find needs TMDB to translate {}; drop --offline", imdb_id);
            }

            let backend = open_store(&config, store.backend)?;
            let remote = open_remote(&config, false)?;
            let materializer = Materializer::new(backend.as_ref(), remote.as_ref().map(|c| c as &dyn RemoteCatalog));

            ui::header(Icons::SEARCH, &format!("Looking up {}...", imdb_id));
            let Some(record) = report(with_spinner(|| materializer.resolve_by_external_id(kind, &imdb_id)), kind, &imdb_id)? else {
                return Ok(());
            };
            ui::summary_row("TMDB id", &record.id.to_string());
            if let Some(movie) = record.as_movie() {
                ui::movie_card(&movie);
            } else if let Some(person) = record.as_person() {
                ui::person_card(&person);
            }
        }

        Commands::List { person, backend, json } => {
            let kind = if person { EntityKind::Person } else { EntityKind::Movie };
            let store = open_store(&config, backend)?;
            let mut records = store.all_records(kind)?;
            records.sort_by_key(|r| r.id);

            if json {
                let listing: Vec<_> = records
                    .iter()
                    .map(|r| serde_json::json!({"id": r.id, "label": r.to_string()}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else if records.is_empty() {
                println!("∅ No cached {} entries.", kind);
            } else {
                let icon = if person { Icons::PERSON } else { Icons::FILM };
                for record in &records {
                    println!("{} {:>8}  {}", icon, record.id, record);
                }
            }
        }

        Commands::PersonsFile { output, store } => {
            let backend = open_store(&config, store.backend)?;
            let remote = open_remote(&config, store.offline)?;
            let materializer = Materializer::new(backend.as_ref(), remote.as_ref().map(|c| c as &dyn RemoteCatalog));

            let ids = materializer.movie_person_ids()?;
            ui::header(Icons::PERSON, &format!("Resolving {} persons...", ids.len()));

            let progress = ui::ListingProgress::new(ids.len(), "Resolving");
            let mut lines = Vec::with_capacity(ids.len());
            for id in ids {
                let line = match materializer.person_line(id) {
                    Ok(line) => line,
                    Err(Error::FetchFailed { source, .. }) => {
                        tracing::warn!("Could not fetch person {}: {}", id, source);
                        tmdbcache::materialize::PersonLine { id, label: None }
                    }
                    Err(e) => return Err(e.into()),
                };
                progress.inc(&line.to_string());
                lines.push(line.to_string());
            }
            progress.finish(lines.len());

            let mut contents = lines.join("\n");
            contents.push('\n');
            std::fs::write(&output, contents)?;
            ui::success(&format!("Wrote {}", output.display()));
        }

        Commands::Stats => {
            ui::header(Icons::STATS, "tmdbcache statistics");

            let db_path = config.database_path();
            ui::section("SQLite");
            if db_path.is_file() {
                let stats = SqliteStore::open(&db_path)?.stats()?;
                let (movies, persons) = (stats.movies.to_string(), stats.persons.to_string());
                let (imdb_movies, imdb_persons) = (stats.imdb_movies.to_string(), stats.imdb_persons.to_string());
                println!("{}", ui::stats_table(&[
                    ("Movies", movies.as_str()),
                    ("Persons", persons.as_str()),
                    ("IMDb movies", imdb_movies.as_str()),
                    ("IMDb persons", imdb_persons.as_str()),
                ]));
            } else {
                ui::info("Database", &format!("{} (not created yet)", db_path.display()));
            }

            ui::section("Files");
            let files = FileStore::new(config.movies_root(), config.persons_root());
            for kind in EntityKind::all() {
                let root = files.root(*kind);
                let count = if root.is_dir() { files.all_ids(*kind)?.len().to_string() } else { ui::dim("missing") };
                ui::summary_row(&format!("{} {}", Icons::FOLDER, root.display()), &count);
            }
        }

        Commands::Init { force } => {
            let defaults = TmdbCacheConfig {
                database: Some(config.database_path().display().to_string()),
                movies_root: Some(config.movies_root().display().to_string()),
                persons_root: Some(config.persons_root().display().to_string()),
                api_key_file: Some(config.api_key_file().display().to_string()),
                api_base_url: Some(config.api_base_url().to_string()),
                timeout_secs: Some(config.timeout().as_secs()),
            };
            config::write_config(&config_path, &defaults, force)?;
            config::ensure_db_dir(&defaults.database_path())?;
            config::ensure_dir(&defaults.movies_root())?;
            config::ensure_dir(&defaults.persons_root())?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }
    }

    Ok(())
}

fn open_store(config: &TmdbCacheConfig, backend: Backend) -> anyhow::Result<Box<dyn EntityStore>> {
    match backend {
        Backend::Sqlite => {
            let path = config.database_path();
            config::ensure_db_dir(&path)?;
            Ok(Box::new(SqliteStore::open(&path)?))
        }
        Backend::Files => {
            let (movies, persons) = (config.movies_root(), config.persons_root());
            ensure_root(&movies)?;
            ensure_root(&persons)?;
            Ok(Box::new(FileStore::new(movies, persons)))
        }
    }
}

fn ensure_root(root: &Path) -> anyhow::Result<()> {
    if !root.is_dir() {
        tracing::info!("Creating {}", root.display());
    }
    config::ensure_dir(root)
}

/// TMDB client, or `None` when offline or no API key is configured
fn open_remote(config: &TmdbCacheConfig, offline: bool) -> anyhow::Result<Option<TmdbClient>> {
    if offline {
        return Ok(None);
    }
    match config.api_key() {
        Ok(key) => Ok(Some(TmdbClient::with_options(key, config.api_base_url(), config.timeout())?)),
        Err(e) => {
            ui::warn(&format!("{}; answering from the cache only", e));
            Ok(None)
        }
    }
}

fn with_spinner<T>(work: impl FnOnce() -> T) -> T {
    let spinner = ui::Spinner::new("Resolving...");
    let result = work();
    spinner.finish();
    result
}

/// Print a miss or a fetch failure; pass a hit through
fn report<T>(result: tmdbcache::Result<Option<T>>, kind: EntityKind, id: &str) -> anyhow::Result<Option<T>> {
    match result {
        Ok(Some(found)) => Ok(Some(found)),
        Ok(None) => {
            ui::error(&format!("No {} {} in the cache or on TMDB", kind, id));
            Ok(None)
        }
        Err(e @ Error::FetchFailed { .. }) => {
            ui::error(&e.to_string());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
