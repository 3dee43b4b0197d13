//! Time window of date records included in a feed.

use chrono::{DateTime, TimeDelta, Utc};

use crate::constants::{DEFAULT_SINCE_DAYS, MAX_SINCE_DAYS};

/// Column of `project_dates` a window filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowColumn {
    StartsAt,
    EndsAt,
}

impl WindowColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowColumn::StartsAt => "starts_at",
            WindowColumn::EndsAt => "ends_at",
        }
    }
}

/// Which date records a feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedWindow {
    /// Dates starting now or later
    Upcoming { from: DateTime<Utc> },
    /// Dates that had not ended by `since`, including ones already past
    IncludePast { since: DateTime<Utc> },
}

impl FeedWindow {
    /// Build the window for a request made at `now`. `since_days` is only
    /// used when past events are included and is clamped to
    /// `0..=MAX_SINCE_DAYS`.
    pub fn new(now: DateTime<Utc>, include_past: bool, since_days: Option<i64>) -> Self {
        if include_past {
            let days = since_days
                .unwrap_or(DEFAULT_SINCE_DAYS)
                .clamp(0, MAX_SINCE_DAYS);
            let since = TimeDelta::try_days(days)
                .and_then(|lookback| now.checked_sub_signed(lookback))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            FeedWindow::IncludePast { since }
        } else {
            FeedWindow::Upcoming { from: now }
        }
    }

    pub fn upcoming(now: DateTime<Utc>) -> Self {
        FeedWindow::Upcoming { from: now }
    }

    pub fn column(&self) -> WindowColumn {
        match self {
            FeedWindow::Upcoming { .. } => WindowColumn::StartsAt,
            FeedWindow::IncludePast { .. } => WindowColumn::EndsAt,
        }
    }

    /// Lower bound (inclusive) on the window column.
    pub fn threshold(&self) -> DateTime<Utc> {
        match self {
            FeedWindow::Upcoming { from } => *from,
            FeedWindow::IncludePast { since } => *since,
        }
    }
}
