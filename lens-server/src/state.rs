use std::sync::Arc;

use lens_core::config::LensConfig;
use lens_core::feed::FeedOptions;
use lens_core::store::{FeedStore, PostgrestStore, UnconfiguredStore};
use lens_core::LensError;
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedStore>,
    pub config: Arc<LensConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedStore>, config: LensConfig) -> Self {
        AppState {
            store,
            config: Arc::new(config),
        }
    }

    /// Connect to the configured gateway. Without one the server still
    /// starts, and feeds carry a "not configured" error.
    pub fn from_config(config: LensConfig) -> Result<Self, LensError> {
        let store: Arc<dyn FeedStore> = match PostgrestStore::from_config(&config.store) {
            Ok(store) => Arc::new(store),
            Err(LensError::StoreNotConfigured) => {
                warn!("No store url/api key configured, feeds will be empty");
                Arc::new(UnconfiguredStore)
            }
            Err(e) => return Err(e),
        };

        Ok(Self::new(store, config))
    }

    pub fn store(&self) -> &dyn FeedStore {
        self.store.as_ref()
    }

    pub fn store_configured(&self) -> bool {
        self.config.store.url.is_some() && self.config.store.api_key.is_some()
    }

    /// Feed options from config, before per-request overrides.
    pub fn feed_defaults(&self) -> FeedOptions {
        let feed = &self.config.feed;
        FeedOptions {
            calendar_name: feed.calendar_name.clone(),
            alarm_minutes: 0,
            base_url: feed.base_url.clone(),
            max_events: feed.max_events,
        }
    }

    /// Public origin of the app, for subscription links.
    pub fn public_origin(&self) -> String {
        match self.config.feed.base_url.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => base.trim_end_matches('/').to_string(),
            _ => format!(
                "http://{}:{}",
                self.config.server.host, self.config.server.port
            ),
        }
    }
}
