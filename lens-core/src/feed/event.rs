//! Per-request join of date records with their projects and clients.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::warn;

use crate::constants::{
    DEFAULT_CALENDAR_NAME, FALLBACK_PROJECT_TITLE, MAX_ALARM_MINUTES, MAX_FEED_EVENTS, UID_DOMAIN,
};
use crate::record::{ClientRef, DateRecord, ProjectRef};
use crate::status::{FeedStatus, status_label};

const SUMMARY_SEPARATOR: &str = " — ";

/// Rendering options for one feed document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedOptions {
    pub calendar_name: String,
    /// Reminder offset; zero or negative means no reminder
    pub alarm_minutes: i64,
    /// Public URL of the web app, for links back to projects
    pub base_url: Option<String>,
    pub max_events: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        FeedOptions {
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            alarm_minutes: 0,
            base_url: None,
            max_events: MAX_FEED_EVENTS,
        }
    }
}

/// Date records plus lookup maps for the projects and clients they refer to.
#[derive(Debug, Clone, Default)]
pub struct FeedData {
    pub dates: Vec<DateRecord>,
    pub projects: HashMap<String, ProjectRef>,
    pub clients: HashMap<String, ClientRef>,
}

/// One calendar event, resolved from a date record and its joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEvent {
    pub uid: String,
    pub project_id: String,
    pub title: String,
    pub status_label: String,
    pub status: FeedStatus,
    pub client: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub link: Option<String>,
}

impl FeedData {
    pub fn new(
        dates: Vec<DateRecord>,
        projects: impl IntoIterator<Item = ProjectRef>,
        clients: impl IntoIterator<Item = ClientRef>,
    ) -> Self {
        FeedData {
            dates,
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
            clients: clients.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Resolve events in ascending start order, capped at `max_events`.
    /// Dates without a start time are skipped.
    pub fn events(&self, options: &FeedOptions) -> Vec<FeedEvent> {
        let mut events: Vec<FeedEvent> = self
            .dates
            .iter()
            .filter_map(|record| {
                let event = self.resolve(record, options.base_url.as_deref());
                if event.is_none() {
                    warn!(date_id = %record.id, "Skipping date without a start time");
                }
                event
            })
            .collect();

        events.sort_by_key(|e| e.starts_at);
        events.truncate(options.max_events);
        events
    }

    fn resolve(&self, record: &DateRecord, base_url: Option<&str>) -> Option<FeedEvent> {
        let starts_at = record.starts_at?;
        let project = self.projects.get(&record.project_id);
        let client = project
            .and_then(|p| p.client_id.as_ref())
            .and_then(|id| self.clients.get(id))
            .and_then(ClientRef::name);
        let status = project.and_then(|p| p.status.as_deref());

        Some(FeedEvent {
            uid: format!("{}@{}", record.id, UID_DOMAIN),
            project_id: record.project_id.clone(),
            title: project
                .and_then(ProjectRef::title)
                .unwrap_or(FALLBACK_PROJECT_TITLE)
                .to_string(),
            status_label: status_label(status),
            status: FeedStatus::from_project_status(status),
            client: client.map(String::from),
            starts_at,
            ends_at: record.valid_end(),
            location: record.location().map(String::from),
            link: base_url.and_then(|base| project_link(base, &record.project_id)),
        })
    }
}

impl FeedEvent {
    /// `Title — STATUS — Client`, leaving out the client when unknown.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.title.as_str(), self.status_label.as_str()];
        if let Some(client) = &self.client {
            parts.push(client);
        }
        parts.join(SUMMARY_SEPARATOR)
    }

    /// Client/location lines, then the project link, with a blank line
    /// between the two blocks. Empty when there is nothing to say.
    pub fn description(&self) -> String {
        let mut info = Vec::new();
        if let Some(client) = &self.client {
            info.push(format!("Client: {client}"));
        }
        if let Some(location) = &self.location {
            info.push(format!("Location: {location}"));
        }

        let mut blocks = Vec::new();
        if !info.is_empty() {
            blocks.push(info.join("\n"));
        }
        if let Some(link) = &self.link {
            blocks.push(format!("Open: {link}"));
        }
        blocks.join("\n\n")
    }

    /// When a reminder `minutes` before the start fires.
    pub fn reminder_at(&self, minutes: i64) -> Option<DateTime<Utc>> {
        reminder_offset(minutes).and_then(|offset| self.starts_at.checked_sub_signed(offset))
    }
}

/// Reminder lead time for `minutes`, capped at [`MAX_ALARM_MINUTES`].
/// `None` when no reminder should be set.
pub fn reminder_offset(minutes: i64) -> Option<TimeDelta> {
    if minutes <= 0 {
        return None;
    }
    TimeDelta::try_minutes(minutes.min(MAX_ALARM_MINUTES))
}

/// `<base>/projects/<id>`, or nothing when the base URL is blank.
pub fn project_link(base_url: &str, project_id: &str) -> Option<String> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}/projects/{project_id}"))
}
