//! Calendar feed endpoint

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use lens_core::feed::{FeedQuery, generate_feed};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";
pub const NO_STORE: &str = "no-store, max-age=0";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ics", get(calendar_feed))
}

/// Raw query parameters. Everything is a string so a bad value can fall
/// back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub calname: Option<String>,
    pub past: Option<String>,
    #[serde(rename = "sinceDays")]
    pub since_days: Option<String>,
    pub alarm: Option<String>,
    pub token: Option<String>,
}

impl FeedParams {
    pub fn into_query(self) -> FeedQuery {
        FeedQuery {
            calendar_name: self.calname,
            include_past: self.past.as_deref().is_some_and(is_truthy),
            since_days: self
                .since_days
                .as_deref()
                .and_then(|v| parse_number("sinceDays", v)),
            alarm_minutes: self.alarm.as_deref().and_then(|v| parse_number("alarm", v)),
            token: self.token,
        }
    }
}

/// `past=include` is what existing subscriptions use; booleans work too.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "include" | "true" | "1" | "yes"
    )
}

/// Parse a whole number, rounding decimals. Garbage is logged and ignored.
pub(crate) fn parse_number(name: &str, value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n.round() as i64),
        _ => {
            warn!(param = name, value, "Ignoring unparseable query parameter");
            None
        }
    }
}

/// GET /api/ics - Calendar feed for subscription clients
///
/// Always 200 with a parseable document; failures are reported inside it.
async fn calendar_feed(
    State(state): State<AppState>,
    params: Result<Query<FeedParams>, QueryRejection>,
) -> impl IntoResponse {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "Bad feed query, using defaults");
            FeedParams::default()
        }
    };

    let body = generate_feed(
        state.store(),
        &params.into_query(),
        &state.feed_defaults(),
        Utc::now(),
    )
    .await;

    (
        [
            (header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE),
            (header::CACHE_CONTROL, NO_STORE),
        ],
        body,
    )
}
