//! Mapping of free-text project statuses onto calendar event statuses.

use icalendar::EventStatus;
use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_STATUS;

/// Project statuses that mean the work is locked in.
const CONFIRMED_STATUSES: [&str; 4] = ["CONFIRMED", "PAID", "DELIVERED", "INVOICED"];

/// Event status as written to the STATUS property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl FeedStatus {
    /// Map a project status. Anything unrecognized (PROSPECT, IN_EDIT, ...)
    /// or missing stays tentative.
    pub fn from_project_status(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return FeedStatus::Tentative;
        };

        let status = status.trim().to_uppercase();
        if status == "CANCELLED" {
            FeedStatus::Cancelled
        } else if CONFIRMED_STATUSES.contains(&status.as_str()) {
            FeedStatus::Confirmed
        } else {
            FeedStatus::Tentative
        }
    }

}

impl From<FeedStatus> for EventStatus {
    fn from(status: FeedStatus) -> Self {
        match status {
            FeedStatus::Tentative => EventStatus::Tentative,
            FeedStatus::Confirmed => EventStatus::Confirmed,
            FeedStatus::Cancelled => EventStatus::Cancelled,
        }
    }
}

/// Human-readable status for titles: `in_edit` becomes `IN EDIT`.
pub fn status_label(status: Option<&str>) -> String {
    let status = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STATUS);

    status
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_in_any_case() {
        for s in ["CANCELLED", "cancelled", "Cancelled", " cancelled "] {
            assert_eq!(FeedStatus::from_project_status(Some(s)), FeedStatus::Cancelled);
        }
    }

    #[test]
    fn test_terminal_statuses_are_confirmed() {
        for s in ["PAID", "paid", "CONFIRMED", "Delivered", "INVOICED"] {
            assert_eq!(
                FeedStatus::from_project_status(Some(s)),
                FeedStatus::Confirmed,
                "{s} should be confirmed"
            );
        }
    }

    #[test]
    fn test_everything_else_is_tentative() {
        assert_eq!(FeedStatus::from_project_status(None), FeedStatus::Tentative);
        for s in ["PROSPECT", "IN_EDIT", "", "canceled", "CANCELLED_BY_CLIENT"] {
            assert_eq!(FeedStatus::from_project_status(Some(s)), FeedStatus::Tentative);
        }
    }

    #[test]
    fn test_into_event_status() {
        assert_eq!(EventStatus::from(FeedStatus::Cancelled), EventStatus::Cancelled);
        assert_eq!(EventStatus::from(FeedStatus::Confirmed), EventStatus::Confirmed);
        assert_eq!(EventStatus::from(FeedStatus::Tentative), EventStatus::Tentative);
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(Some("in_edit")), "IN EDIT");
        assert_eq!(status_label(Some("  pre__production ")), "PRE PRODUCTION");
        assert_eq!(status_label(Some("CONFIRMED")), "CONFIRMED");
        assert_eq!(status_label(None), "PROSPECT");
        assert_eq!(status_label(Some(" ")), "PROSPECT");
    }
}
