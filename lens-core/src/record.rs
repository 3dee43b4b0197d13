//! Rows read from the project database.
//!
//! Field names follow the table columns so the types deserialize straight
//! from the REST gateway's JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled date for a project (`project_dates` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRecord {
    pub id: String,
    pub project_id: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl DateRecord {
    /// End time, only if it comes strictly after the start.
    pub fn valid_end(&self) -> Option<DateTime<Utc>> {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) if end > start => Some(end),
            (None, end) => end,
            _ => None,
        }
    }

    /// Location with surrounding whitespace removed, if any is left.
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }
}

/// A project as seen by the feed (`projects` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text status, e.g. "IN_EDIT" or "PAID"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl ProjectRef {
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }
}

/// A client (`clients` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ClientRef {
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

/// Feed settings of a user, found through their calendar token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub user_id: String,
    #[serde(default)]
    pub default_alarm_minutes: Option<i64>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
