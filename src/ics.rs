//! Single-event iCalendar export, handed to the desktop calendar app.

use crate::model::Task;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use ics::properties::{Description, DtEnd, DtStart, Status, Summary, Transp};
use ics::{Event, ICalendar};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EXPORT_FILE: &str = "task.ics";
const PRODUCT_ID: &str = "-//termcal//Task Manager//EN";

pub fn build_event(task: &Task, stamp: DateTime<Utc>) -> String {
    let uid = format!("{}-{}@termcal.local", task.id, stamp.timestamp());
    let mut event = Event::new(uid, stamp.format("%Y%m%dT%H%M%SZ").to_string());
    let start = format_local(&task.deadline);
    event.push(DtStart::new(start.clone()));
    event.push(DtEnd::new(start));
    event.push(Summary::new(task.description.clone()));
    event.push(Description::new(task.description.clone()));
    event.push(Status::confirmed());
    event.push(Transp::opaque());

    let mut calendar = ICalendar::new("2.0", PRODUCT_ID);
    calendar.add_event(event);
    calendar.to_string()
}

pub fn export(task: &Task, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(EXPORT_FILE);
    fs::write(&path, build_event(task, Utc::now()))
        .with_context(|| format!("writing {:?}", path))?;
    info!(path = %path.display(), task = task.id, "exported task to iCalendar");
    Ok(path)
}

/// Opening is best effort; a missing desktop opener is only logged.
pub fn open_in_calendar(path: &Path) {
    if let Err(err) = open::that(path) {
        warn!(path = %path.display(), error = %err, "could not open calendar file");
    }
}

fn format_local(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::tempdir;

    fn task() -> Task {
        let deadline = NaiveDate::from_ymd_opt(2025, 6, 2)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .expect("valid deadline");
        Task::new(7, "Submit report", deadline)
    }

    #[test]
    fn event_carries_deadline_and_summary() {
        let stamp = Utc
            .with_ymd_and_hms(2025, 5, 1, 12, 0, 0)
            .single()
            .expect("valid stamp");
        let ical = build_event(&task(), stamp);
        assert!(ical.starts_with("BEGIN:VCALENDAR\r\n"));
        for expected in [
            "VERSION:2.0",
            "BEGIN:VEVENT",
            "DTSTAMP:20250501T120000Z",
            "DTSTART:20250602T143000",
            "DTEND:20250602T143000",
            "SUMMARY:Submit report",
            "DESCRIPTION:Submit report",
            "STATUS:CONFIRMED",
            "TRANSP:OPAQUE",
            "END:VEVENT",
        ] {
            assert!(ical.contains(expected), "missing {expected}");
        }
        assert!(ical.contains(&format!("UID:7-{}@termcal.local", stamp.timestamp())));
    }

    #[test]
    fn export_writes_into_the_directory() {
        let dir = tempdir().expect("tempdir");
        let path = export(&task(), dir.path()).expect("export");
        assert_eq!(path, dir.path().join(EXPORT_FILE));
        let written = fs::read_to_string(path).expect("read");
        assert!(written.contains("END:VCALENDAR"));
    }
}
