use chrono::{Local, TimeZone};

use crate::{NotesError, Result, MAX_TITLE_CHARS};

const PREVIEW_CHARS: usize = 110;

/// Formats epoch milliseconds as a short local date and time.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
        None => "—".to_string(),
    }
}

/// One-paragraph preview of a note body for list output.
pub fn content_preview(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return "No content yet.".to_string();
    }

    if trimmed.chars().count() > PREVIEW_CHARS {
        let head: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", head)
    } else {
        trimmed.to_string()
    }
}

/// Checks a user-supplied title against the input limits.
pub fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(NotesError::EmptyTitle);
    }

    let actual = title.trim().chars().count();
    if actual > MAX_TITLE_CHARS {
        return Err(NotesError::TitleTooLong {
            max: MAX_TITLE_CHARS,
            actual,
        });
    }
    Ok(())
}

/// "1 note", "3 notes"
pub fn note_count_label(count: usize) -> String {
    format!("{} note{}", count, if count == 1 { "" } else { "s" })
}
