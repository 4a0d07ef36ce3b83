//! Last-modified instants.
//!
//! Resolvers hand over modification times in whatever form their content
//! store keeps them. Everything is normalized to ISO-8601 with an explicit
//! offset (`2024-01-15T10:30:00+00:00`) when the sitemap is rendered.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Last-modified value as supplied by a resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LastModified {
    /// A point in time.
    At(DateTime<FixedOffset>),
    /// Unix timestamp in seconds.
    Timestamp(i64),
    /// Already formatted text (RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`
    /// or a numeric timestamp).
    Text(String),
}

impl LastModified {
    /// Interpret the value as an instant, if possible.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::At(instant) => Some(*instant),
            Self::Timestamp(secs) => from_unix(*secs),
            Self::Text(text) => parse_text(text),
        }
    }

    /// Format as ISO-8601, falling back to `now` when the value is unusable.
    #[must_use]
    pub fn normalize(&self, now: DateTime<FixedOffset>) -> String {
        let instant = self.to_datetime().unwrap_or_else(|| {
            tracing::warn!(value = ?self, "Unparseable lastmod, using generation time");
            now
        });
        format_instant(instant)
    }
}

impl From<DateTime<FixedOffset>> for LastModified {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::At(value)
    }
}

impl From<DateTime<Utc>> for LastModified {
    fn from(value: DateTime<Utc>) -> Self {
        Self::At(value.fixed_offset())
    }
}

impl From<i64> for LastModified {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for LastModified {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for LastModified {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Format an instant the way sitemaps expect it.
#[must_use]
pub fn format_instant(instant: DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn from_unix(secs: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(secs, 0).map(|instant| instant.fixed_offset())
}

fn parse_text(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant);
    }
    if let Ok(secs) = text.parse::<i64>() {
        return from_unix(secs);
    }
    // Database timestamp columns
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-01-02T03:04:05+00:00").unwrap()
    }

    #[test]
    fn test_timestamp_normalized() {
        let lastmod = LastModified::Timestamp(1_705_314_600);
        assert_eq!(lastmod.normalize(now()), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_datetime_keeps_offset() {
        let instant = DateTime::parse_from_rfc3339("2024-01-15T10:30:00+02:00").unwrap();
        let lastmod = LastModified::from(instant);
        assert_eq!(lastmod.normalize(now()), "2024-01-15T10:30:00+02:00");
    }

    #[test]
    fn test_formatted_text_and_instant_agree() {
        let text = LastModified::from("2024-01-15T10:30:00Z");
        let instant = LastModified::from(
            DateTime::parse_from_rfc3339("2024-01-15T10:30:00+00:00").unwrap(),
        );
        assert_eq!(text.normalize(now()), instant.normalize(now()));
        assert_eq!(text.normalize(now()), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_database_datetime_text() {
        let lastmod = LastModified::from("2024-01-15 10:30:00");
        assert_eq!(lastmod.normalize(now()), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_date_only_text() {
        let lastmod = LastModified::from("2024-01-15");
        assert_eq!(lastmod.normalize(now()), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_numeric_text() {
        let lastmod = LastModified::from("1705314600");
        assert_eq!(lastmod.normalize(now()), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_garbage_falls_back_to_now() {
        let lastmod = LastModified::from("last tuesday");
        assert!(lastmod.to_datetime().is_none());
        assert_eq!(lastmod.normalize(now()), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_utc_conversion() {
        let utc = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert_eq!(
            LastModified::from(utc).normalize(now()),
            "1970-01-01T00:00:00+00:00"
        );
    }
}
