//! ISO 8601 date, datetime and duration validation.
//!
//! Accepted dates: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD` and ordinal
//! dates (`YYYY-DDD`). A datetime is a date, a `T`, a time of day with
//! optional fraction and an optional zone designator (`Z`, `+hh`, `+hhmm`,
//! `+hh:mm`).

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use mcc_engine::{CheckResult, Evaluation, Validator};
use mcc_model::AttrValue;
use regex::Regex;

static ZONE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Z|[+-]\d{2}(:?\d{2})?)$").expect("Invalid time zone regex")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[+-]?P(?:\d+(?:[.,]\d+)?W|(?:\d+(?:[.,]\d+)?Y)?(?:\d+(?:[.,]\d+)?M)?(?:\d+(?:[.,]\d+)?D)?(?:T(?:\d+(?:[.,]\d+)?H)?(?:\d+(?:[.,]\d+)?M)?(?:\d+(?:[.,]\d+)?S)?)?)$",
    )
    .expect("Invalid ISO 8601 duration regex")
});

/// Alternative duration form `PYYYY-MM-DDThh:mm:ss`.
static DURATION_ALTERNATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?P\d{4}-?\d{2}-?\d{2}T\d{2}:?\d{2}:?\d{2}$")
        .expect("Invalid ISO 8601 alternative duration regex")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y-%j", "%Y%j"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

/// Parse an ISO 8601 calendar or ordinal date, including reduced precision.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let reduced = match value.len() {
        4 if value.bytes().all(|b| b.is_ascii_digit()) => Some(format!("{value}-01-01")),
        7 if value.as_bytes()[4] == b'-' => Some(format!("{value}-01")),
        _ => None,
    };
    if let Some(full) = reduced {
        return NaiveDate::parse_from_str(&full, "%Y-%m-%d").ok();
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parse a time of day, ignoring any zone designator.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let time = match ZONE_SUFFIX.find(value) {
        Some(zone) if zone.start() > 0 => &value[..zone.start()],
        _ => value,
    };
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
}

/// A full datetime requires both a date and a time separated by `T`.
pub fn is_datetime(value: &str) -> bool {
    match value.trim().split_once('T') {
        Some((date, time)) => parse_date(date).is_some() && parse_time(time).is_some(),
        None => false,
    }
}

/// Whether `value` is an ISO 8601 duration (`PnYnMnDTnHnMnS`, `PnW` or the
/// alternative `PYYYY-MM-DDThh:mm:ss` form).
pub fn is_duration(value: &str) -> bool {
    let value = value.trim();
    if DURATION_ALTERNATIVE.is_match(value) {
        return true;
    }
    DURATION.is_match(value)
        && !value.ends_with('P')
        && !value.ends_with('T')
}

/// Accepts a datetime, falling back to a plain date.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckIsoDateTime;

impl Validator for CheckIsoDateTime {
    fn name(&self) -> &'static str {
        "check for valid iso-8601 date(time)"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        let Some(value) = value else {
            return eval.fail("does not exist");
        };
        let text = value.to_string();
        if is_datetime(&text) {
            eval.success("has a valid ISO-8601 datetime")
        } else if parse_date(&text).is_some() {
            eval.success("has a valid ISO-8601 date (but not datetime)")
        } else {
            eval.fail("is not a valid date or datetime")
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckIsoDuration;

impl Validator for CheckIsoDuration {
    fn name(&self) -> &'static str {
        "check for valid iso-8601 duration"
    }

    fn evaluate_global(&self, eval: &mut Evaluation<'_>, value: Option<&AttrValue>) -> CheckResult {
        let Some(value) = value else {
            return eval.fail("does not exist");
        };
        if is_duration(&value.to_string()) {
            eval.success("is a valid duration")
        } else {
            eval.fail("is not a valid duration")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{evaluate, spec};

    #[test]
    fn dates() {
        for valid in ["2017", "2017-03", "2017-03-14", "20170314", "2017-073"] {
            assert!(parse_date(valid).is_some(), "{valid} should parse");
        }
        for invalid in ["2017-13", "2017-02-30", "March 2017", ""] {
            assert!(parse_date(invalid).is_none(), "{invalid} should not parse");
        }
    }

    #[test]
    fn datetimes() {
        for valid in [
            "2017-03-14T12:00:00Z",
            "2017-03-14T12:00:00.125+02:00",
            "2017-03-14T12:00",
            "20170314T120000-0500",
        ] {
            assert!(is_datetime(valid), "{valid} should parse");
        }
        for invalid in ["2017-03-14", "2017-03-14 12:00:00", "2017-03-14T25:00:00"] {
            assert!(!is_datetime(invalid), "{invalid} should not parse");
        }
    }

    #[test]
    fn durations() {
        for valid in ["P1Y2M10DT2H30M", "PT36H", "P3W", "P0.5Y", "P0003-02-10T02:30:00"] {
            assert!(is_duration(valid), "{valid} should parse");
        }
        for invalid in ["P", "PT", "1Y", "P1H", "P1YT", "three days"] {
            assert!(!is_duration(invalid), "{invalid} should not parse");
        }
    }

    #[test]
    fn date_falls_back_from_datetime() {
        let result = evaluate(
            &CheckIsoDateTime,
            spec("date_created"),
            Some("2017-03-14".into()),
        );
        assert!(result.is_passed());
        assert_eq!(result.message(), "has a valid ISO-8601 date (but not datetime)");
    }

    #[test]
    fn invalid_duration_fails() {
        let result = evaluate(
            &CheckIsoDuration,
            spec("time_coverage_duration"),
            Some("three days".into()),
        );
        assert_eq!(result.passed(), Some(false));
    }
}
