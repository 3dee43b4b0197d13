/// Product identifier written into every generated document.
pub const PRODID: &str = "-//Project Lens//ICS//EN";

/// Domain suffix for event UIDs.
pub const UID_DOMAIN: &str = "project-lens";

pub const DEFAULT_CALENDAR_NAME: &str = "Project Lens — Projects";

/// Upper bound on events per feed, keeps response size bounded.
pub const MAX_FEED_EVENTS: usize = 500;

/// Lookback window used when past events are included.
pub const DEFAULT_SINCE_DAYS: i64 = 1;

/// Longest lookback a subscriber can ask for.
pub const MAX_SINCE_DAYS: i64 = 3650;

/// Reminder offset for owners who never picked one.
pub const DEFAULT_OWNER_ALARM_MINUTES: i64 = 15;

/// Longest reminder offset, four weeks.
pub const MAX_ALARM_MINUTES: i64 = 40_320;

/// Title used when a date's project is missing or untitled.
pub const FALLBACK_PROJECT_TITLE: &str = "Project";

/// Status label used when a project has no status.
pub const FALLBACK_STATUS: &str = "PROSPECT";

/// Rows shown by the debug and subscription previews.
pub const PREVIEW_LIMIT: usize = 5;
