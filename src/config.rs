use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::remote::tmdb::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable that takes precedence over the API key file
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TmdbCacheConfig {
    pub database: Option<String>,
    pub movies_root: Option<String>,
    pub persons_root: Option<String>,
    pub api_key_file: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl TmdbCacheConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| default_data_root().join("tmdb").join("tmdb.db"))
    }

    pub fn movies_root(&self) -> PathBuf {
        self.movies_root
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| default_data_root().join("tmdb").join("movies"))
    }

    pub fn persons_root(&self) -> PathBuf {
        self.persons_root
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| default_data_root().join("tmdb").join("persons"))
    }

    pub fn api_key_file(&self) -> PathBuf {
        self.api_key_file
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| home_dir().join(".tmdb"))
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    /// API key from the environment, else the first line of the key file
    pub fn api_key(&self) -> anyhow::Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        let path = self.api_key_file();
        if !path.exists() {
            anyhow::bail!("no TMDB API key: set {} or create {}", API_KEY_ENV, path.display());
        }
        let contents = std::fs::read_to_string(&path)?;
        match contents.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(key) => Ok(key.to_string()),
            None => anyhow::bail!("API key file {} is empty", path.display()),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `~/orgee-roam-extdata`, the parent of all cached data
pub fn default_data_root() -> PathBuf {
    home_dir().join("orgee-roam-extdata")
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("tmdbcache.toml")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<TmdbCacheConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: TmdbCacheConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &TmdbCacheConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

pub fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TmdbCacheConfig::default();
        assert!(config.movies_root().ends_with("orgee-roam-extdata/tmdb/movies"));
        assert!(config.persons_root().ends_with("orgee-roam-extdata/tmdb/persons"));
        assert!(config.database_path().ends_with("tmdb/tmdb.db"));
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/var/cache/tmdb"), PathBuf::from("/var/cache/tmdb"));
        assert_eq!(expand_tilde("~/tmdb"), home_dir().join("tmdb"));
        assert_eq!(expand_tilde("~"), home_dir());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmdbcache.toml");
        let config = TmdbCacheConfig {
            database: Some("/tmp/tmdb.db".into()),
            timeout_secs: Some(5),
            ..Default::default()
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(path.as_path())).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.database_path(), PathBuf::from("/tmp/tmdb.db"));
        assert_eq!(loaded.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("nope.toml").as_path())).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("a").join("b").join("tmdb.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
