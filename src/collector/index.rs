//! Search-engine index client: owns the index template/mapping and performs
//! per-document indexing.
//!
//! Grounded on `Logger_Subscriber.py`'s `INDEX_SETTINGS` and `main()`'s
//! index bootstrap, extended per spec §4.6.1 with the `country` and
//! `@timestamp` fields the original never mapped, and with an index
//! **template** (`<name>*`) installed alongside the concrete index so
//! future rollover indices inherit the same mapping.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::error::{CollectorError, CollectorResult};
use super::enrich::EnrichedEvent;

pub struct IndexClient {
    http: Client,
    base_url: String,
    index_name: String,
    user: Option<String>,
    password: Option<String>,
}

impl IndexClient {
    pub fn new(base_url: String, index_name: String, user: Option<String>, password: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .build()
                .expect("reqwest client builder should never fail here"),
            base_url,
            index_name,
            user,
            password,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));
        let mut req = self.http.request(method, url);
        if let Some(user) = &self.user {
            req = req.basic_auth(user, self.password.as_ref());
        }
        req
    }

    fn index_settings() -> Value {
        json!({
            "settings": {
                "number_of_shards": 1,
                "number_of_replicas": 0
            },
            "mappings": {
                "properties": {
                    "honeypot_type": { "type": "keyword" },
                    "attacker_ip": { "type": "ip" },
                    "attacker_port": { "type": "integer" },
                    "username": { "type": "keyword" },
                    "password": { "type": "keyword" },
                    "user-agent": { "type": "keyword" },
                    "time_of_entry": { "type": "date" },
                    "time_of_exit": { "type": "date" },
                    "commands_executed": { "type": "keyword" },
                    "duration_of_attack": { "type": "integer" },
                    "location": { "type": "geo_point" },
                    "country": { "type": "keyword" },
                    "@timestamp": { "type": "date" }
                }
            }
        })
    }

    /// Drop any pre-existing index with the canonical name, install the
    /// index template (`<name>*`), and create the concrete index — all with
    /// the mapping above.
    pub async fn bootstrap(&self) -> CollectorResult<()> {
        let exists = self
            .request(reqwest::Method::HEAD, &self.index_name)
            .send()
            .await
            .map_err(|e| CollectorError::SearchConnection(e.to_string()))?;

        if exists.status() == StatusCode::OK {
            self.request(reqwest::Method::DELETE, &self.index_name)
                .send()
                .await
                .map_err(|e| CollectorError::SearchConnection(e.to_string()))?;
        }

        let template_body = json!({
            "index_patterns": [format!("{}*", self.index_name)],
            "template": Self::index_settings(),
        });
        let template_path = format!("_index_template/{}-template", self.index_name);
        self.put_checked(&template_path, &template_body).await?;

        self.put_checked(&self.index_name, &Self::index_settings()).await?;
        Ok(())
    }

    async fn put_checked(&self, path: &str, body: &Value) -> CollectorResult<()> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await
            .map_err(|e| CollectorError::SearchConnection(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CollectorError::Authorization(response.status().to_string()))
            }
            status if status.is_client_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(CollectorError::Mapping(body))
            }
            _ => Ok(()),
        }
    }

    /// Index a single enriched event. Distinguishes connection/authorization/
    /// mapping failures so the caller can decide whether to ack.
    pub async fn index_document(&self, event: &EnrichedEvent) -> CollectorResult<()> {
        let path = format!("{}/_doc", self.index_name);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(event)
            .send()
            .await
            .map_err(|e| CollectorError::SearchConnection(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CollectorError::Authorization(response.status().to_string()))
            }
            status if status.is_client_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(CollectorError::Mapping(body))
            }
            status if status.is_server_error() => {
                Err(CollectorError::SearchConnection(format!("search engine returned {status}")))
            }
            _ => Ok(()),
        }
    }
}
