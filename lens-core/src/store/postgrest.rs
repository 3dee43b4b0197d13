//! `FeedStore` over a PostgREST gateway (Supabase `rest/v1`).

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::FeedStore;
use crate::config::StoreConfig;
use crate::error::{LensError, LensResult};
use crate::record::{ClientRef, DateRecord, OwnerProfile, ProjectRef};
use crate::window::FeedWindow;

const DATE_COLUMNS: &str = "id,project_id,starts_at,ends_at,location";
const PROJECT_COLUMNS: &str = "id,title,status,client_id,owner_id";
const CLIENT_COLUMNS: &str = "id,name";
const PROFILE_COLUMNS: &str = "user_id,default_alarm_minutes";

pub struct PostgrestStore {
    http: reqwest::Client,
    rest_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for PostgrestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestStore")
            .field("rest_url", &self.rest_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl PostgrestStore {
    /// Build a store from config. Fails if the URL or key is missing.
    pub fn from_config(config: &StoreConfig) -> LensResult<Self> {
        let url = config.url.as_deref().ok_or(LensError::StoreNotConfigured)?;
        let api_key = config.api_key.clone().ok_or(LensError::StoreNotConfigured)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Self::new(http, url, api_key)
    }

    pub fn new(http: reqwest::Client, project_url: &str, api_key: SecretString) -> LensResult<Self> {
        let mut base = Url::parse(project_url)
            .map_err(|e| LensError::Config(format!("Invalid store url '{project_url}': {e}")))?;

        // Url::join drops the last path segment unless it ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| LensError::Config(e.to_string()))?;

        Ok(PostgrestStore {
            http,
            rest_url,
            api_key,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> LensResult<Vec<T>> {
        let url = self
            .rest_url
            .join(table)
            .map_err(|e| LensError::Config(e.to_string()))?;
        let key = self.api_key.expose_secret();

        debug!(table, ?query, "Querying store");

        let resp = self
            .http
            .get(url)
            .query(query)
            .header("apikey", key)
            .header(ACCEPT, "application/json")
            .bearer_auth(key)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(LensError::Store {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| LensError::Decode(format!("{table}: {e}")))
    }
}

#[async_trait]
impl FeedStore for PostgrestStore {
    async fn dates_in_window(
        &self,
        window: &FeedWindow,
        limit: usize,
    ) -> LensResult<Vec<DateRecord>> {
        let threshold = window
            .threshold()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        self.select(
            "project_dates",
            &[
                ("select", DATE_COLUMNS.to_string()),
                ("order", "starts_at.asc".to_string()),
                ("limit", limit.to_string()),
                (window.column().as_str(), format!("gte.{threshold}")),
            ],
        )
        .await
    }

    async fn projects_by_ids(&self, ids: &[String]) -> LensResult<Vec<ProjectRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.select(
            "projects",
            &[
                ("select", PROJECT_COLUMNS.to_string()),
                ("id", in_list(ids)),
            ],
        )
        .await
    }

    async fn clients_by_ids(&self, ids: &[String]) -> LensResult<Vec<ClientRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.select(
            "clients",
            &[("select", CLIENT_COLUMNS.to_string()), ("id", in_list(ids))],
        )
        .await
    }

    async fn profile_by_token(&self, token: &str) -> LensResult<Option<OwnerProfile>> {
        let profiles: Vec<OwnerProfile> = self
            .select(
                "user_profiles",
                &[
                    ("select", PROFILE_COLUMNS.to_string()),
                    ("calendar_token", format!("eq.{token}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(profiles.into_iter().next())
    }
}

/// PostgREST `in` filter with every value double-quoted.
fn in_list(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

/// PostgREST errors are JSON with a `message`; anything else is passed through.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
