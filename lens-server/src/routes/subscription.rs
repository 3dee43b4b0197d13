//! Subscription links and a preview of upcoming events

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use lens_core::constants::PREVIEW_LIMIT;
use lens_core::feed::{FeedEvent, FeedOptions, FeedQuery, collect_feed_data, resolve_scope};
use lens_core::window::FeedWindow;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::routes::AppError;
use crate::routes::feed::parse_number;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ics/subscription", get(subscription))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub alarm: Option<String>,
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct PreviewEvent {
    #[serde(flatten)]
    pub event: FeedEvent,
    pub reminder_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub https_url: String,
    pub webcal_url: String,
    pub alarm_minutes: i64,
    pub upcoming: Vec<PreviewEvent>,
}

/// GET /api/ics/subscription - Feed URLs to paste into a calendar app
async fn subscription(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let query = FeedQuery {
        alarm_minutes: params.alarm.as_deref().and_then(|v| parse_number("alarm", v)),
        token: params.token,
        ..FeedQuery::default()
    };

    let store = state.store();
    let scope = resolve_scope(store, &query).await;

    let now = Utc::now();
    let defaults = state.feed_defaults();
    let data = collect_feed_data(
        store,
        &FeedWindow::upcoming(now),
        scope.owner.as_deref(),
        defaults.max_events,
    )
    .await?;

    let options = FeedOptions {
        alarm_minutes: scope.alarm_minutes,
        max_events: PREVIEW_LIMIT,
        ..defaults
    };
    let upcoming = data
        .events(&options)
        .into_iter()
        .map(|event| PreviewEvent {
            reminder_at: event.reminder_at(scope.alarm_minutes),
            event,
        })
        .collect();

    let https_url = feed_url(
        &state.public_origin(),
        query.alarm_minutes.map(|_| scope.alarm_minutes),
        query.token.as_deref(),
    )?;

    Ok(Json(SubscriptionResponse {
        webcal_url: webcal_url(&https_url),
        https_url,
        alarm_minutes: scope.alarm_minutes,
        upcoming,
    }))
}

/// `<origin>/api/ics` with the alarm and token the subscriber picked.
fn feed_url(origin: &str, alarm: Option<i64>, token: Option<&str>) -> anyhow::Result<String> {
    let mut url = Url::parse(&format!("{origin}/api/ics"))?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            pairs.append_pair("token", token.trim());
        }
        if let Some(alarm) = alarm {
            pairs.append_pair("alarm", &alarm.to_string());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url.to_string())
}

/// Same feed under the `webcal:` scheme, which calendar apps open directly.
fn webcal_url(https_url: &str) -> String {
    match https_url.split_once("://") {
        Some((_, rest)) => format!("webcal://{rest}"),
        None => https_url.to_string(),
    }
}
