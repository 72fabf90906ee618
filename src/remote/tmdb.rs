//! Blocking TMDB v3 client

use super::{RemoteCatalog, RemoteError, RemoteResult};
use crate::entity::{keys, Document, EntityId};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TMDB API client authenticated with a v3 API key
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> RemoteResult<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_options(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// GET `<base>/<path>` and decode the JSON body
    fn get(&self, path: &str, query: &[(&str, &str)]) -> RemoteResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .map_err(|e| RemoteError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        if !status.is_success() {
            return Err(RemoteError::Status { status: status.as_u16(), url });
        }

        response
            .json::<Value>()
            .map_err(|e| RemoteError::Decode { url, message: e.without_url().to_string() })
    }

    pub fn movie_details(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("movie/{}", id), &[])
    }

    pub fn movie_credits(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("movie/{}/credits", id), &[])
    }

    pub fn movie_external_ids(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("movie/{}/external_ids", id), &[])
    }

    pub fn movie_keywords(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("movie/{}/keywords", id), &[])
    }

    pub fn person_details(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("person/{}", id), &[])
    }

    pub fn person_movie_credits(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("person/{}/movie_credits", id), &[])
    }

    pub fn person_tv_credits(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("person/{}/tv_credits", id), &[])
    }

    pub fn person_external_ids(&self, id: EntityId) -> RemoteResult<Value> {
        self.get(&format!("person/{}/external_ids", id), &[])
    }

    /// First native id listed under `results_key` of a `/find` response
    fn find(&self, external_id: &str, results_key: &str) -> RemoteResult<Option<EntityId>> {
        let found = self.get(&format!("find/{}", external_id), &[("external_source", "imdb_id")])?;
        Ok(first_result_id(&found, results_key))
    }
}

impl RemoteCatalog for TmdbClient {
    fn fetch_movie(&self, id: EntityId) -> RemoteResult<Document> {
        Ok(compose(vec![
            (keys::DETAILS, self.movie_details(id)?),
            (keys::CREDITS, self.movie_credits(id)?),
            (keys::EXTERNAL_IDS, self.movie_external_ids(id)?),
            (keys::KEYWORDS, self.movie_keywords(id)?),
        ]))
    }

    fn fetch_person(&self, id: EntityId) -> RemoteResult<Document> {
        Ok(compose(vec![
            (keys::DETAILS, self.person_details(id)?),
            (keys::MOVIE_CREDITS, self.person_movie_credits(id)?),
            (keys::TV_CREDITS, self.person_tv_credits(id)?),
            (keys::EXTERNAL_IDS, self.person_external_ids(id)?),
        ]))
    }

    fn resolve_external_movie_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>> {
        self.find(external_id, "movie_results")
    }

    fn resolve_external_person_id(&self, external_id: &str) -> RemoteResult<Option<EntityId>> {
        self.find(external_id, "person_results")
    }
}

/// Current UTC time as stored in `retrieved_dt`
pub fn retrieved_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Merge sub-fetch results under their fixed keys, stamped with the retrieval time
pub fn compose(sections: Vec<(&str, Value)>) -> Document {
    let mut doc = Document::new();
    doc.insert(keys::RETRIEVED_DT.to_string(), Value::String(retrieved_now()));
    for (key, value) in sections {
        doc.insert(key.to_string(), value);
    }
    doc
}

fn first_result_id(found: &Value, results_key: &str) -> Option<EntityId> {
    found
        .get(results_key)
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .and_then(|first| first.get("id"))
        .and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compose_uses_fixed_keys() {
        let doc = compose(vec![
            (keys::DETAILS, json!({"title": "Fight Club"})),
            (keys::CREDITS, json!({"cast": [], "crew": []})),
        ]);

        assert_eq!(doc.len(), 3);
        assert_eq!(doc["details"]["title"], "Fight Club");
        let stamp = doc[keys::RETRIEVED_DT].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_first_result_id() {
        let found = json!({"movie_results": [{"id": 550}, {"id": 551}], "person_results": []});
        assert_eq!(first_result_id(&found, "movie_results"), Some(550));
        assert_eq!(first_result_id(&found, "person_results"), None);
        assert_eq!(first_result_id(&found, "tv_results"), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = TmdbClient::with_options("key", "http://localhost:9/3/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:9/3");
    }
}
