use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref HEX_RE: Regex = Regex::new(r"^(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid {kind} format: {detail}")]
    InvalidFormat { kind: &'static str, detail: String },

    #[error("invalid {kind}: {detail}")]
    InvalidValue { kind: &'static str, detail: String },
}

impl ValueError {
    fn format(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidFormat {
            kind,
            detail: detail.into(),
        }
    }

    fn value(kind: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidValue {
            kind,
            detail: detail.into(),
        }
    }
}

/// Lower-cased, trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(ValueError::value("email", "cannot be empty"));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(ValueError::format("email", raw));
        }
        Ok(Self(email))
    }

    /// Rebuilds a value read back from storage.
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color in canonical `#RRGGBB` upper-case form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueError::value("hex color", "cannot be empty"));
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !HEX_RE.is_match(digits) {
            return Err(ValueError::format("hex color", "expected #RRGGBB or #RGB"));
        }
        Ok(Self(Self::normalize(digits)))
    }

    /// Expands shorthand and upper-cases. Input must already be 3 or 6 hex digits.
    fn normalize(digits: &str) -> String {
        let upper = digits.to_ascii_uppercase();
        let full = if upper.len() == 3 {
            upper.chars().flat_map(|c| [c, c]).collect()
        } else {
            upper
        };
        format!("#{full}")
    }

    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day, always interpreted at midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(Date);

impl CalendarDate {
    /// Parses `YYYY-MM-DD`. Impossible days such as `2023-02-29` are rejected.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValueError::value("date", "cannot be empty"));
        }
        if !DATE_RE.is_match(raw) {
            return Err(ValueError::format("date", "expected YYYY-MM-DD"));
        }
        Date::parse(raw, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValueError::format("date", format!("{raw} is not a calendar day")))
    }

    pub fn from_datetime(at: OffsetDateTime) -> Self {
        Self(at.to_offset(UtcOffset::UTC).date())
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn date(&self) -> Date {
        self.0
    }

    pub fn midnight_utc(&self) -> OffsetDateTime {
        self.0.midnight().assume_utc()
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    pub fn add_days(&self, days: i64) -> Result<Self, ValueError> {
        days.checked_mul(86_400)
            .map(time::Duration::seconds)
            .and_then(|delta| self.0.checked_add(delta))
            .map(Self)
            .ok_or_else(|| ValueError::value("date", "out of range"))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Opaque UUID identifier shared by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ValueError::format("identifier", raw))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Id {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn email_is_normalized_and_validated() {
        let e = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(e.as_str(), "alice@example.com");
        assert_eq!(e, Email::parse("alice@example.com").unwrap());

        assert!(matches!(
            Email::parse(""),
            Err(ValueError::InvalidValue { .. })
        ));
        for bad in ["no-at-sign", "a@b", "a@@b.com", "a b@c.com", "@test.com"] {
            assert!(
                matches!(Email::parse(bad), Err(ValueError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn hex_color_normalization_is_idempotent_and_case_insensitive() {
        for raw in ["#f00", "f00", "#FF0000", "ff0000", "#Ff0000"] {
            let once = HexColor::parse(raw).unwrap();
            assert_eq!(once.as_str(), "#FF0000");
            let twice = HexColor::parse(once.as_str()).unwrap();
            assert_eq!(once, twice);
        }
        assert_eq!(HexColor::parse("#1a2").unwrap().as_str(), "#11AA22");
    }

    #[test]
    fn hex_color_rejects_garbage() {
        assert!(matches!(
            HexColor::parse(""),
            Err(ValueError::InvalidValue { .. })
        ));
        for bad in ["#12", "#1234", "#GGGGGG", "##FF0000", "#FF00000", "red"] {
            assert!(
                matches!(HexColor::parse(bad), Err(ValueError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn date_parses_and_formats_back() {
        for raw in ["2024-01-15", "2024-02-29", "1999-12-31", "2000-01-01"] {
            let d = CalendarDate::parse(raw).unwrap();
            assert_eq!(d.to_string(), raw);
            assert_eq!(CalendarDate::parse(&d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn date_rejects_bad_input() {
        assert!(matches!(
            CalendarDate::parse(""),
            Err(ValueError::InvalidValue { .. })
        ));
        for bad in [
            "2023-02-29",
            "2024-13-01",
            "2024-04-31",
            "2024-1-5",
            "15-01-2024",
            "2024/01/15",
            "2024-01-15T00:00:00Z",
            "tomorrow",
        ] {
            assert!(
                matches!(CalendarDate::parse(bad), Err(ValueError::InvalidFormat { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn date_truncates_timestamps_to_utc_day() {
        let d = CalendarDate::from_datetime(datetime!(2024-01-15 23:30 -02:00));
        assert_eq!(d.date(), date!(2024 - 01 - 16));
        assert_eq!(d.midnight_utc(), datetime!(2024-01-16 0:00 UTC));
    }

    #[test]
    fn date_ordering_and_arithmetic() {
        let a = CalendarDate::parse("2024-02-28").unwrap();
        let b = a.add_days(1).unwrap();
        assert_eq!(b.to_string(), "2024-02-29");
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert!(!a.is_after(&a));
        assert_eq!(b.add_days(-1).unwrap(), a);
        assert!(a.add_days(i64::from(i32::MAX)).is_err());
        for days in [i64::MAX, i64::MIN, i64::MAX / 86_400, i64::MIN / 86_400] {
            assert!(
                matches!(a.add_days(days), Err(ValueError::InvalidValue { .. })),
                "{days} days should be out of range"
            );
        }
    }

    #[test]
    fn id_requires_uuid() {
        let id = Id::generate();
        assert_eq!(Id::parse(&id.to_string()).unwrap(), id);
        assert_ne!(Id::generate(), id);
        assert!(matches!(
            Id::parse("not-a-uuid"),
            Err(ValueError::InvalidFormat { .. })
        ));
        assert!(Id::parse("00000000-0000-0000-0000-000000000000")
            .unwrap()
            .is_nil());
    }
}
