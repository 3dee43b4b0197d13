//! Calendar document rendering.

use chrono::{DateTime, TimeDelta, Utc};
use icalendar::{Alarm, Component, EventLike, Trigger};

use super::event::{FeedData, FeedEvent, FeedOptions, reminder_offset};
use crate::ics::{calendar_shell, plain_text, render, text_property};

/// Render the feed for `data`. `now` is used for DTSTAMP.
pub fn build_feed(data: &FeedData, options: &FeedOptions, now: DateTime<Utc>) -> String {
    render_feed(&data.events(options), options, now)
}

/// Render already resolved events, in the order given.
pub fn render_feed(events: &[FeedEvent], options: &FeedOptions, now: DateTime<Utc>) -> String {
    let mut calendar = calendar_shell();
    calendar
        .append_property(text_property("X-WR-CALNAME", &options.calendar_name))
        .append_property(("CALSCALE", "GREGORIAN"))
        .append_property(("METHOD", "PUBLISH"));

    let reminder = reminder_offset(options.alarm_minutes);
    for event in events {
        calendar.push(to_vevent(event, reminder, now));
    }

    render(&calendar)
}

/// Minimal valid document carrying an error message, served instead of a
/// failed response so subscribed clients keep polling.
pub fn error_feed(message: &str) -> String {
    let mut calendar = calendar_shell();
    calendar.append_property(text_property("X-ERROR", message));
    render(&calendar)
}

fn to_vevent(
    event: &FeedEvent,
    reminder: Option<TimeDelta>,
    now: DateTime<Utc>,
) -> icalendar::Event {
    let summary = event.summary();
    let summary = plain_text(&summary);
    let description = event.description();

    let mut vevent = icalendar::Event::new();
    vevent
        .uid(&event.uid)
        .timestamp(now)
        .starts(event.starts_at)
        .summary(&summary)
        .status(event.status.into());

    if let Some(end) = event.ends_at {
        vevent.ends(end);
    }
    if let Some(location) = &event.location {
        vevent.location(&plain_text(location));
    }
    if !description.is_empty() {
        vevent.description(&plain_text(&description));
    }
    // URI value, written as is
    if let Some(link) = &event.link {
        vevent.url(link);
    }
    if let Some(offset) = reminder {
        vevent.alarm(Alarm::display(&summary, Trigger::before_start(offset)));
    }

    vevent.done()
}
