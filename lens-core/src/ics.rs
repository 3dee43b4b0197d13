//! Calendar document output on top of the `icalendar` crate.
//!
//! The crate escapes TEXT values and folds long lines. What is left here is
//! the document header, line break cleanup and trimming the crate's output.

use std::borrow::Cow;

use icalendar::{Calendar, Property};

use crate::constants::PRODID;

/// Calendar with only `VERSION` and `PRODID` set. Header properties keep
/// the order they are appended in.
pub fn calendar_shell() -> Calendar {
    let mut calendar = Calendar::empty();
    calendar
        .append_property(("VERSION", "2.0"))
        .append_property(("PRODID", PRODID));
    calendar
}

/// Property whose value is free text.
pub fn text_property(name: &str, value: &str) -> Property {
    Property::new(name, plain_text(value))
}

/// Turn CRLF and lone CR into LF. Only LF is escaped to `\n` on output.
pub fn plain_text(value: &str) -> Cow<'_, str> {
    if value.contains('\r') {
        Cow::Owned(value.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Serialize `calendar` with CRLF line endings.
/// Drops the DTSTAMP and UID the crate writes into every VALARM.
pub fn render(calendar: &Calendar) -> String {
    let ics = calendar.to_string();
    let mut out = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        out.push_str(line);
        out.push_str("\r\n");
    }

    out
}
