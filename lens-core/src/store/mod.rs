//! Read access to the project database.
//!
//! The feed only ever reads, so the port is four queries. `PostgrestStore`
//! talks to the hosted REST gateway; tests supply in-memory stores.

mod postgrest;

use async_trait::async_trait;

use crate::error::{LensError, LensResult};
use crate::record::{ClientRef, DateRecord, OwnerProfile, ProjectRef};
use crate::window::FeedWindow;

pub use postgrest::PostgrestStore;

#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Date records in `window`, ordered by start, at most `limit` rows.
    async fn dates_in_window(&self, window: &FeedWindow, limit: usize)
    -> LensResult<Vec<DateRecord>>;

    async fn projects_by_ids(&self, ids: &[String]) -> LensResult<Vec<ProjectRef>>;

    async fn clients_by_ids(&self, ids: &[String]) -> LensResult<Vec<ClientRef>>;

    /// Owner profile holding this calendar token, if any.
    async fn profile_by_token(&self, token: &str) -> LensResult<Option<OwnerProfile>>;
}

/// Store used when no gateway is configured; every read fails.
#[derive(Debug, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl FeedStore for UnconfiguredStore {
    async fn dates_in_window(&self, _: &FeedWindow, _: usize) -> LensResult<Vec<DateRecord>> {
        Err(LensError::StoreNotConfigured)
    }

    async fn projects_by_ids(&self, _: &[String]) -> LensResult<Vec<ProjectRef>> {
        Err(LensError::StoreNotConfigured)
    }

    async fn clients_by_ids(&self, _: &[String]) -> LensResult<Vec<ClientRef>> {
        Err(LensError::StoreNotConfigured)
    }

    async fn profile_by_token(&self, _: &str) -> LensResult<Option<OwnerProfile>> {
        Err(LensError::StoreNotConfigured)
    }
}
