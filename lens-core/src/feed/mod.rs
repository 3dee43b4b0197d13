//! The calendar feed: collect records, join them, render a document.
//!
//! [`generate_feed`] is the whole request path. It never fails: any error
//! turns into [`error_feed`] so calendar clients always get a parseable body.

mod builder;
mod collect;
mod event;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::constants::{DEFAULT_OWNER_ALARM_MINUTES, MAX_ALARM_MINUTES};
use crate::error::LensResult;
use crate::store::FeedStore;
use crate::window::FeedWindow;

pub use builder::{build_feed, error_feed, render_feed};
pub use collect::collect_feed_data;
pub use event::{FeedData, FeedEvent, FeedOptions, project_link, reminder_offset};

/// What a subscriber asked for. `None` fields take defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub calendar_name: Option<String>,
    pub include_past: bool,
    pub since_days: Option<i64>,
    pub alarm_minutes: Option<i64>,
    pub token: Option<String>,
}

/// Who the feed is scoped to and the reminder offset that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedScope {
    pub owner: Option<String>,
    pub alarm_minutes: i64,
}

/// Resolve the owner for `query.token`. An unknown token or a failed
/// lookup falls back to the public feed. An explicit `alarm` wins over the
/// owner's saved default; without a token there is no reminder by default.
pub async fn resolve_scope(store: &dyn FeedStore, query: &FeedQuery) -> FeedScope {
    let token = query.token.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let profile = match token {
        Some(token) => match store.profile_by_token(token).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                warn!("Unknown calendar token, serving the public feed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Profile lookup failed, serving the public feed");
                None
            }
        },
        None => None,
    };

    let default_alarm = match (&profile, token) {
        (Some(profile), _) => profile
            .default_alarm_minutes
            .unwrap_or(DEFAULT_OWNER_ALARM_MINUTES),
        (None, Some(_)) => DEFAULT_OWNER_ALARM_MINUTES,
        (None, None) => 0,
    };

    FeedScope {
        owner: profile.map(|p| p.user_id),
        alarm_minutes: query
            .alarm_minutes
            .unwrap_or(default_alarm)
            .min(MAX_ALARM_MINUTES),
    }
}

/// Build the feed document for `query`, falling back to an error document.
pub async fn generate_feed(
    store: &dyn FeedStore,
    query: &FeedQuery,
    defaults: &FeedOptions,
    now: DateTime<Utc>,
) -> String {
    match try_generate_feed(store, query, defaults, now).await {
        Ok(ics) => ics,
        Err(e) => {
            warn!(error = %e, "Serving error feed");
            error_feed(&e.to_string())
        }
    }
}

async fn try_generate_feed(
    store: &dyn FeedStore,
    query: &FeedQuery,
    defaults: &FeedOptions,
    now: DateTime<Utc>,
) -> LensResult<String> {
    let scope = resolve_scope(store, query).await;
    let window = FeedWindow::new(now, query.include_past, query.since_days);

    let data = collect_feed_data(
        store,
        &window,
        scope.owner.as_deref(),
        defaults.max_events,
    )
    .await?;

    let options = FeedOptions {
        calendar_name: query
            .calendar_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| defaults.calendar_name.clone()),
        alarm_minutes: scope.alarm_minutes,
        ..defaults.clone()
    };

    let events = data.events(&options);
    info!(
        events = events.len(),
        scoped = scope.owner.is_some(),
        include_past = query.include_past,
        "Built calendar feed"
    );

    Ok(render_feed(&events, &options, now))
}
