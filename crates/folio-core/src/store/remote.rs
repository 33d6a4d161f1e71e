//! Remote REST persistence
//!
//! Speaks the PostgREST dialect used by Supabase: collections map to
//! tables, reads order server-side, writes upsert on the id column.
//! Every request carries the API key as both the `apikey` header and a
//! bearer token. Non-2xx responses surface the server's own message when
//! the body carries one, else a per-operation fallback string.

use std::marker::PhantomData;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::debug;

use super::{CollectionStore, Record};
use crate::config::Config;
use crate::error::{Error, Result};

/// Guard against a hung endpoint stalling reads forever
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// REST-backed store for one collection
pub struct RemoteStore<R: Record> {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    _marker: PhantomData<R>,
}

impl<R: Record> RemoteStore<R> {
    /// Build from configuration; call only when remote is configured
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url().unwrap_or_default(),
            api_key: config
                .supabase_key
                .clone()
                .unwrap_or_default()
                .trim()
                .to_string(),
            table: config.table_for(R::COLLECTION).to_string(),
            _marker: PhantomData,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn order_clause() -> &'static str {
        if R::ORDERS_BY_CREATED_AT {
            "sort_order.asc,created_at.desc"
        } else {
            "sort_order.asc"
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn a failed response into the message shown to the user
    async fn failure(response: reqwest::Response, fallback: &str) -> Error {
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => parse_error_body(&body, fallback),
            Err(_) => fallback.to_string(),
        };
        Error::Remote(message)
    }

    fn fallback(verb: &str) -> String {
        format!("Could not {} {} right now.", verb, R::DISPLAY_SINGULAR)
    }
}

#[async_trait]
impl<R: Record> CollectionStore<R> for RemoteStore<R> {
    async fn read(&self) -> Result<Vec<R>> {
        let response = self
            .authed(self.client.get(self.endpoint()))
            .query(&[("select", "*"), ("order", Self::order_clause())])
            .send()
            .await?;

        if !response.status().is_success() {
            let fallback = format!("Could not load {} right now.", R::COLLECTION);
            return Err(Self::failure(response, &fallback).await);
        }

        let mut records: Vec<R> = response.json().await?;
        for record in &mut records {
            record.normalize();
        }
        debug!(
            collection = R::COLLECTION,
            count = records.len(),
            "remote read"
        );
        Ok(records)
    }

    async fn write(&self, records: &[R]) -> Result<()> {
        let response = self
            .authed(self.client.post(self.endpoint()))
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(records)
            .send()
            .await?;

        if !response.status().is_success() {
            let fallback = format!("Could not reorder {}.", R::COLLECTION);
            return Err(Self::failure(response, &fallback).await);
        }
        Ok(())
    }

    async fn insert(&self, record: &R) -> Result<R> {
        let response = self
            .authed(self.client.post(self.endpoint()))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, &Self::fallback("add")).await);
        }

        let rows: Vec<R> = response.json().await.unwrap_or_default();
        Ok(first_row(rows).unwrap_or_else(|| record.clone()))
    }

    async fn update(&self, record: &R) -> Result<R> {
        let response = self
            .authed(self.client.patch(self.endpoint()))
            .query(&[("id", format!("eq.{}", record.id()))])
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, &Self::fallback("update")).await);
        }

        let rows: Vec<R> = response.json().await.unwrap_or_default();
        Ok(first_row(rows).unwrap_or_else(|| record.clone()))
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let response = self
            .authed(self.client.delete(self.endpoint()))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::failure(response, &Self::fallback("remove")).await);
        }
        Ok(())
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn change_token(&self) -> Option<SystemTime> {
        None
    }
}

/// First returned row, normalized
fn first_row<R: Record>(rows: Vec<R>) -> Option<R> {
    rows.into_iter().next().map(|mut row| {
        row.normalize();
        row
    })
}

/// Extract the server's error message from a response body
fn parse_error_body(body: &serde_json::Value, fallback: &str) -> String {
    body.get("message")
        .and_then(|v| v.as_str())
        .or_else(|| body.get("error").and_then(|v| v.as_str()))
        .map(|s| s.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;

    fn remote_config() -> Config {
        Config {
            supabase_url: Some("https://proj.supabase.co/".to_string()),
            supabase_key: Some("anon-key".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let store: RemoteStore<Project> = RemoteStore::new(&remote_config());
        assert_eq!(
            store.endpoint(),
            "https://proj.supabase.co/rest/v1/portfolio_projects"
        );
    }

    #[test]
    fn test_order_clause_uses_created_at_for_projects() {
        assert_eq!(
            RemoteStore::<Project>::order_clause(),
            "sort_order.asc,created_at.desc"
        );
        assert_eq!(
            RemoteStore::<crate::models::ExperienceItem>::order_clause(),
            "sort_order.asc"
        );
    }

    #[test]
    fn test_parse_error_body_prefers_message() {
        let body = serde_json::json!({"message": "row level security", "error": "other"});
        assert_eq!(parse_error_body(&body, "fallback"), "row level security");

        let body = serde_json::json!({"error": "bad key"});
        assert_eq!(parse_error_body(&body, "fallback"), "bad key");

        let body = serde_json::json!({"code": 42});
        assert_eq!(parse_error_body(&body, "fallback"), "fallback");
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(
            RemoteStore::<Project>::fallback("add"),
            "Could not add project right now."
        );
        assert_eq!(
            RemoteStore::<crate::models::QualificationItem>::fallback("remove"),
            "Could not remove qualification item right now."
        );
    }

    #[test]
    fn test_row_shape_uses_snake_case_columns() {
        let mut project = Project::new("Wire Check");
        project.is_featured = true;
        let row = serde_json::to_value(&project).unwrap();

        assert!(row.get("is_featured").is_some());
        assert!(row.get("sort_order").is_some());
        assert!(row.get("created_at").is_some());
        assert!(row.get("isFeatured").is_none());
    }
}
