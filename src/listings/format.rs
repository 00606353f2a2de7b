use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::domain::ListingRecord;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Renders the channel announcement. Never fails: a broken record produces an
/// inline error line instead.
pub fn format_listing(record: &ListingRecord, now: DateTime<Utc>, tz: Tz) -> String {
    render(record, now, tz).unwrap_or_else(|err| format!("Error formatting message: {err}"))
}

fn render(record: &ListingRecord, now: DateTime<Utc>, tz: Tz) -> Result<String, FormatError> {
    let company = required(&record.company_name, "company_name")?;
    let title = required(&record.title, "title")?;
    let url = required(&record.url, "url")?;
    let sponsorship = required(&record.sponsorship, "sponsorship")?;
    let locations = match record.locations.as_deref() {
        Some(list) if !list.is_empty() => list.join(", "),
        _ => "Not specified".to_string(),
    };
    let today = now.with_timezone(&tz).format("%B, %d");

    Ok(format!(
        "\n>>> # {company} just posted a new role!\n\n\
         ### Role:\n[{title}]({url})\n\n\
         ### Location:\n{locations}\n\n\
         ### Sponsorship: `{sponsorship}`\n\
         ### Posted on: {today}\n"
    ))
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, FormatError> {
    value.as_deref().ok_or(FormatError::MissingField(field))
}
