//! Time layouts.
//!
//! A time field parses its values under a layout: either a named
//! preset or an explicit strftime pattern. The default is RFC 3339.

use crate::error::SchemaError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Named layout presets and their strftime equivalents. Presets whose
/// pattern carries `%Z` accept a zone abbreviation but read the value
/// as UTC.
const PRESETS: [(&str, &str); 13] = [
    ("ANSIC", "%a %b %e %H:%M:%S %Y"),
    ("UnixDate", "%a %b %e %H:%M:%S %Z %Y"),
    ("RubyDate", "%a %b %d %H:%M:%S %z %Y"),
    ("RFC822", "%d %b %y %H:%M %Z"),
    ("RFC822Z", "%d %b %y %H:%M %z"),
    ("RFC850", "%A, %d-%b-%y %H:%M:%S %Z"),
    ("RFC1123", "%a, %d %b %Y %H:%M:%S %Z"),
    ("RFC1123Z", "%a, %d %b %Y %H:%M:%S %z"),
    ("Kitchen", "%I:%M%p"),
    ("Stamp", "%b %e %H:%M:%S"),
    ("StampMilli", "%b %e %H:%M:%S%.3f"),
    ("StampMicro", "%b %e %H:%M:%S%.6f"),
    ("StampNano", "%b %e %H:%M:%S%.9f"),
];

/// The parse layout of a time field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Layout {
    /// RFC 3339, the default. Also covers the `RFC3339` and
    /// `RFC3339Nano` preset keywords.
    #[default]
    Rfc3339,
    /// A strftime pattern, either from a preset keyword or supplied
    /// verbatim through the `layout=` tag option.
    Pattern(String),
}

impl Layout {
    /// Resolve a `layout=` tag option value.
    ///
    /// Accepts a preset keyword or a pattern containing at least one
    /// `%` specifier; anything else is a schema error so that a
    /// misspelled preset fails construction instead of silently
    /// rejecting every value at request time.
    pub(crate) fn resolve(field: &str, spec: &str) -> Result<Self, SchemaError> {
        if spec == "RFC3339" || spec == "RFC3339Nano" {
            return Ok(Self::Rfc3339);
        }
        if let Some((_, fmt)) = PRESETS.iter().find(|(name, _)| *name == spec) {
            return Ok(Self::Pattern((*fmt).to_string()));
        }
        if spec.contains('%') {
            return Ok(Self::Pattern(spec.to_string()));
        }
        Err(SchemaError::UnknownLayout {
            field: field.to_string(),
            layout: spec.to_string(),
        })
    }

    /// Parse `s` under this layout, normalising to UTC.
    ///
    /// Patterns without an offset are read as UTC; patterns without a
    /// date are anchored at the epoch date.
    pub(crate) fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Self::Pattern(fmt) => parse_pattern(s, fmt),
        }
    }
}

fn parse_pattern(s: &str, fmt: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_str(s, fmt) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
        return Some(Utc.from_utc_datetime(&t));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
        return Some(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)));
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
        return Some(Utc.from_utc_datetime(&epoch.and_time(t)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn rfc3339_is_the_default() {
        assert_eq!(Layout::default(), Layout::Rfc3339);
        let t = Layout::Rfc3339.parse("2018-01-14T06:05:48.839Z").unwrap();
        assert_eq!(t.hour(), 6);
    }

    #[test]
    fn presets_resolve() {
        let layout = Layout::resolve("created_at", "UnixDate").unwrap();
        assert!(layout.parse("Thu May 23 09:30:06 IDT 2000").is_some());
        assert!(layout.parse("2006-01-02 15:04").is_none());
    }

    #[test]
    fn kitchen_clock_parses() {
        let layout = Layout::resolve("t", "Kitchen").unwrap();
        let t = layout.parse("9:30PM").unwrap();
        assert_eq!(t.hour(), 21);
        assert!(layout.parse("21:30").is_none());
    }

    #[test]
    fn explicit_pattern() {
        let layout = Layout::resolve("created_at", "%Y-%m-%d %H:%M").unwrap();
        assert!(layout.parse("2006-01-02 15:04").is_some());
        assert!(layout.parse("2006-01-02").is_none());
    }

    #[test]
    fn date_only_pattern_is_anchored_at_midnight() {
        let layout = Layout::resolve("d", "%Y-%m-%d").unwrap();
        let t = layout.parse("2024-03-01").unwrap();
        assert_eq!(t.hour(), 0);
    }

    #[test]
    fn offset_patterns_normalise_to_utc() {
        let layout = Layout::resolve("t", "RFC1123Z").unwrap();
        let t = layout.parse("Mon, 02 Jan 2006 15:04:05 +0200").unwrap();
        assert_eq!(t.hour(), 13);
    }

    #[test]
    fn misspelled_preset_fails_construction() {
        let err = Layout::resolve("created_at", "UnixDat").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownLayout { .. }));
    }

    #[test]
    fn rfc3339_rejects_other_shapes() {
        assert!(Layout::Rfc3339.parse("Sunday?").is_none());
        assert!(Layout::Rfc3339.parse("2006-01-02 15:04").is_none());
    }
}
