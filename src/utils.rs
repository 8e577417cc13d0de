use chrono::{DateTime, Local, TimeZone, Utc};

use crate::error::ClientError;

/// Longest job description the analyze form accepts, in characters.
pub const JOB_DESCRIPTION_CHAR_LIMIT: usize = 3000;

/// Validate and trim a job description for submission.
pub fn prepare_job_description(text: &str) -> Result<String, ClientError> {
    if text.trim().is_empty() {
        return Err(ClientError::InvalidInput(
            "Please enter a job description".to_string(),
        ));
    }
    Ok(text.chars().take(JOB_DESCRIPTION_CHAR_LIMIT).collect())
}

/// Cut `text` to `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// Card date, e.g. "Jan 5, 2025, 03:04 PM", in the given zone.
pub fn format_date_in<Tz>(date: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(zone)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}

/// Card date in the local time zone.
pub fn format_date(date: &DateTime<Utc>) -> String {
    format_date_in(date, &Local)
}
