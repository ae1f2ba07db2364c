use serde::Serialize;
use time::OffsetDateTime;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Render a byte count with base-1024 units at one decimal place (`1536` -> `1.5 KB`).
/// A trailing `.0` is dropped (`1024` -> `1 KB`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0usize;
    let mut divisor = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }
    let value = bytes as f64 / divisor as f64;
    let rounded = format!("{value:.1}");
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// "X ago" phrasing for how long before `now` the instant `then` happened.
pub fn format_relative(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let secs = (now - then).whole_seconds();
    if secs < 0 {
        return "in the future".to_string();
    }
    let minutes = (secs as f64 / 60.0).round() as i64;
    let phrase = match secs {
        s if s < 30 => "less than a minute".to_string(),
        s if s < 90 => "1 minute".to_string(),
        s if s < 45 * 60 => format!("{minutes} minutes"),
        s if s < 90 * 60 => "about 1 hour".to_string(),
        s if s < 24 * 3600 => format!("about {} hours", (secs as f64 / 3600.0).round() as i64),
        s if s < 42 * 3600 => "1 day".to_string(),
        s if s < 30 * 86400 => format!("{} days", (secs as f64 / 86400.0).round() as i64),
        s if s < 45 * 86400 => "about 1 month".to_string(),
        s if s < 365 * 86400 => {
            let months = ((secs as f64 / (30.4375 * 86400.0)).round() as i64).max(2);
            format!("{months} months")
        }
        _ => {
            let years_f = secs as f64 / (365.25 * 86400.0);
            let years = years_f.floor() as i64;
            let rem_months = (years_f - years as f64) * 12.0;
            if rem_months < 3.0 {
                if years == 1 {
                    "about 1 year".to_string()
                } else {
                    format!("about {years} years")
                }
            } else if rem_months < 9.0 {
                format!("over {years} years")
            } else {
                format!("almost {} years", years + 1)
            }
        }
    };
    format!("{phrase} ago")
}

/// `document_uploaded` -> `Document Uploaded`.
pub fn format_action_label(action: &str) -> String {
    action
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    High,
    Moderate,
}

pub fn relevance_tier(relevance: i64) -> RelevanceTier {
    if relevance >= 80 {
        RelevanceTier::High
    } else {
        RelevanceTier::Moderate
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Word,
    Text,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Word => "Word",
            FileKind::Text => "Text",
        }
    }
}

pub fn file_kind(mime_type: &str) -> FileKind {
    if mime_type.contains("pdf") {
        FileKind::Pdf
    } else if mime_type.contains("word") || mime_type.contains("docx") {
        FileKind::Word
    } else {
        FileKind::Text
    }
}
