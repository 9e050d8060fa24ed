//! Source dates from file names and modification times

use chrono::{DateTime, Local};
use mindmap_domain::SourceDate;
use std::fs::Metadata;
use std::path::Path;

/// Parse the date prefix of a file stem
///
/// The stem must be exactly `YYYY-MM-DD`, or start with `YYYY-MM-DD-`, and the
/// date must exist on the calendar.
///
/// # Examples
///
/// ```
/// use mindmap_ingest::parse_source_date;
///
/// assert_eq!(parse_source_date("2024-12-07-demo").unwrap().to_string(), "2024-12-07");
/// assert!(parse_source_date("2023-02-29-leap").is_none());
/// assert!(parse_source_date("2024-12-07demo").is_none());
/// ```
pub fn parse_source_date(stem: &str) -> Option<SourceDate> {
    let prefix = stem.get(..10)?;
    let rest = &stem[10..];
    if !rest.is_empty() && !rest.starts_with('-') {
        return None;
    }
    if !prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    }) {
        return None;
    }
    SourceDate::parse(prefix)
}

/// Date for a conversation file: the file name prefix if present, otherwise
/// the local date of the modification time
pub fn source_date_for(path: &Path, metadata: &Metadata) -> SourceDate {
    if let Some(date) = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(parse_source_date)
    {
        return date;
    }

    let modified: DateTime<Local> = match metadata.modified() {
        Ok(time) => time.into(),
        Err(_) => Local::now(),
    };
    SourceDate::new(modified.date_naive())
}
