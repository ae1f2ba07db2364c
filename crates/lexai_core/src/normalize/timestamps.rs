use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Parse a server timestamp (ISO 8601).
///
/// RFC 3339 values keep their offset. Offset-less values from a deterministic allowlist are
/// read as UTC. Anything else is `None` (no fuzzy parsing).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(dt);
    }

    for fmt in [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ] {
        if let Ok(pdt) = PrimitiveDateTime::parse(trimmed, fmt) {
            return Some(pdt.assume_utc());
        }
    }

    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// Parse a plain `YYYY-MM-DD` calendar date (e.g. a date picked for filtering).
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn rfc3339_keeps_offset() {
        let dt = parse_timestamp("2024-01-05T23:30:00+05:30").expect("parse");
        assert_eq!(dt, datetime!(2024-01-05 18:00 UTC));
    }

    #[test]
    fn date_only_is_utc_midnight() {
        assert_eq!(
            parse_timestamp("2024-01-06"),
            Some(datetime!(2024-01-06 0:00 UTC))
        );
    }

    #[test]
    fn offsetless_datetime_is_utc() {
        assert_eq!(
            parse_timestamp("2024-01-06 08:15"),
            Some(datetime!(2024-01-06 8:15 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-01-06T08:15:30.250"),
            Some(datetime!(2024-01-06 8:15:30.25 UTC))
        );
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_calendar_date("2024-13-01"), None);
        assert_eq!(parse_calendar_date(" 2024-02-29 "), Some(date!(2024 - 02 - 29)));
    }
}
