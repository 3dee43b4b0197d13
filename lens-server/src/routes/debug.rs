//! Feed diagnostics: is the store reachable and what would the feed see

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use lens_core::constants::PREVIEW_LIMIT;
use lens_core::window::FeedWindow;
use lens_core::{DateRecord, ProjectRef};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ics-debug", get(feed_debug))
}

#[derive(Serialize)]
pub struct StoreInfo {
    pub configured: bool,
    pub url: Option<String>,
}

#[derive(Serialize, Default)]
pub struct DebugCounts {
    pub future_dates: usize,
    pub projects: usize,
}

#[derive(Serialize, Default)]
pub struct DebugSample {
    pub future_dates: Vec<DateRecord>,
    pub projects: Vec<ProjectRef>,
}

#[derive(Serialize)]
pub struct DebugResponse {
    pub store: StoreInfo,
    pub counts: DebugCounts,
    pub sample: DebugSample,
    pub error: Option<String>,
    pub now: DateTime<Utc>,
}

/// GET /api/ics-debug - Next few dates and their projects, or the error
async fn feed_debug(State(state): State<AppState>) -> Json<DebugResponse> {
    let now = Utc::now();

    let (sample, error) = sample(&state, now).await;

    Json(DebugResponse {
        store: StoreInfo {
            configured: state.store_configured(),
            url: state.config.store.url.clone(),
        },
        counts: DebugCounts {
            future_dates: sample.future_dates.len(),
            projects: sample.projects.len(),
        },
        sample,
        error,
        now,
    })
}

/// Dates plus their projects. A failed project lookup keeps the dates.
async fn sample(state: &AppState, now: DateTime<Utc>) -> (DebugSample, Option<String>) {
    let store = state.store();
    let future_dates = match store
        .dates_in_window(&FeedWindow::upcoming(now), PREVIEW_LIMIT)
        .await
    {
        Ok(dates) => dates,
        Err(e) => return (DebugSample::default(), Some(e.to_string())),
    };

    let mut ids: Vec<String> = future_dates.iter().map(|d| d.project_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let (projects, error) = match store.projects_by_ids(&ids).await {
        Ok(projects) => (projects, None),
        Err(e) => {
            warn!(error = %e, "Project lookup failed in debug sample");
            (Vec::new(), Some(e.to_string()))
        }
    };

    (
        DebugSample {
            future_dates,
            projects,
        },
        error,
    )
}
