//! Coercion of cleaned text into typed values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ValueError;
use crate::schema::{Value, ValueType};

/// Where a value came from, for the warning emitted when it is skipped.
#[derive(Clone, Copy)]
pub struct CoercionContext<'a> {
    pub line: usize,
    /// Attribute type the value is destined for.
    pub concept: &'a str,
    pub diagnostics: &'a dyn Diagnostics,
}

/// Coerce a value, reporting a warning and returning `None` on failure.
pub fn coerce(value_type: ValueType, value: &str, ctx: &CoercionContext<'_>) -> Option<Value> {
    match parse_value(value_type, value) {
        Ok(v) => Some(v),
        Err(e) => {
            ctx.diagnostics.report(
                Diagnostic::warning(
                    DiagnosticKind::InvalidValue,
                    format!(
                        "column of type <{value_type}> for '{}' has invalid value '{value}', skipping column: {e}",
                        ctx.concept
                    ),
                )
                .at_line(ctx.line),
            );
            None
        }
    }
}

/// Parse a value according to its declared type.
pub fn parse_value(value_type: ValueType, value: &str) -> Result<Value, ValueError> {
    match value_type {
        ValueType::String => Ok(Value::String(value.to_string())),
        ValueType::Long => Ok(Value::Long(value.parse()?)),
        ValueType::Double => parse_double(value).map(Value::Double),
        ValueType::Boolean => parse_boolean(value).map(Value::Boolean),
        ValueType::DateTime => parse_datetime(value).map(Value::DateTime),
    }
}

/// Finite doubles only: `inf` and `NaN` have no literal form in a statement.
fn parse_double(value: &str) -> Result<f64, ValueError> {
    let parsed: f64 = value.parse()?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ValueError::NonFinite(value.to_string()))
    }
}

fn parse_boolean(value: &str) -> Result<bool, ValueError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValueError::Boolean(value.to_string()))
    }
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDThh:mm[:ss[.fff]][offset]`.
///
/// A date without a time is taken at the start of the day. A trailing `Z`
/// or `+hh:mm` offset is accepted and dropped: the wall-clock time is kept.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, ValueError> {
    let mut parts = value.split('T');
    let date = parts.next().unwrap_or_default();
    if !is_iso_date(date) {
        return Err(ValueError::DateTimeShape(value.to_string()));
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;

    match parts.next().filter(|t| !t.is_empty()) {
        Some(time) => {
            let time = strip_offset(time)
                .ok_or_else(|| ValueError::DateTimeShape(value.to_string()))?;
            Ok(date.and_time(parse_time(time)?))
        }
        None => Ok(date.and_time(NaiveTime::MIN)),
    }
}

/// `YYYY-MM-DD` with every field zero-padded.
fn is_iso_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Remove a `Z`, `+hh`, `+hhmm`, `+hh:mm` or `+hh:mm:ss` suffix.
fn strip_offset(time: &str) -> Option<&str> {
    if let Some(local) = time.strip_suffix('Z') {
        return Some(local);
    }
    let Some(sign) = time.find(|c| c == '+' || c == '-') else {
        return Some(time);
    };

    let offset = &time[sign + 1..];
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    let valid = if offset.contains(':') {
        let fields: Vec<&str> = offset.split(':').collect();
        fields.len() <= 3 && fields.iter().all(|&f| two_digits(f))
    } else {
        (offset.len() == 2 || offset.len() == 4) && offset.bytes().all(|b| b.is_ascii_digit())
    };

    valid.then_some(&time[..sign])
}

fn parse_time(value: &str) -> Result<NaiveTime, ValueError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|e| NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| e))
        .map_err(ValueError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnostics, Severity};

    fn ctx(sink: &CollectingDiagnostics) -> CoercionContext<'_> {
        CoercionContext {
            line: 12,
            concept: "age",
            diagnostics: sink,
        }
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_string_passes_through() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(
            coerce(ValueType::String, "anything at all", &ctx(&sink)),
            Some(Value::from("anything at all"))
        );
    }

    #[test]
    fn test_long() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::Long, "42", &ctx(&sink)), Some(Value::Long(42)));
        assert_eq!(coerce(ValueType::Long, "-7", &ctx(&sink)), Some(Value::Long(-7)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_long_failure_warns_with_line_and_concept() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::Long, "4.5", &ctx(&sink)), None);

        let reports = sink.diagnostics();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Warning);
        assert_eq!(reports[0].kind, DiagnosticKind::InvalidValue);
        assert_eq!(reports[0].line, Some(12));
        assert!(reports[0].message.contains("'age'"));
        assert!(reports[0].message.contains("<long>"));
    }

    #[test]
    fn test_double() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::Double, "3.25", &ctx(&sink)), Some(Value::Double(3.25)));
        assert_eq!(coerce(ValueType::Double, "1e3", &ctx(&sink)), Some(Value::Double(1000.0)));
        assert_eq!(coerce(ValueType::Double, "three", &ctx(&sink)), None);
        assert_eq!(sink.count(Severity::Warning), 1);
    }

    #[test]
    fn test_double_rejects_non_finite() {
        let sink = CollectingDiagnostics::new();
        for text in ["inf", "-inf", "infinity", "NaN"] {
            assert_eq!(coerce(ValueType::Double, text, &ctx(&sink)), None);
        }
        assert_eq!(sink.count(Severity::Warning), 4);
        assert_eq!(
            parse_value(ValueType::Double, "NaN"),
            Err(ValueError::NonFinite("NaN".to_string()))
        );
    }

    #[test]
    fn test_boolean_case_insensitive() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::Boolean, "TRUE", &ctx(&sink)), Some(Value::Boolean(true)));
        assert_eq!(coerce(ValueType::Boolean, "False", &ctx(&sink)), Some(Value::Boolean(false)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_boolean_rejects_other_text() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::Boolean, "yes", &ctx(&sink)), None);
        assert_eq!(coerce(ValueType::Boolean, "1", &ctx(&sink)), None);
        assert_eq!(sink.count(Severity::Warning), 2);
    }

    #[test]
    fn test_datetime_date_only_is_start_of_day() {
        assert_eq!(parse_datetime("2020-01-05").unwrap(), datetime(2020, 1, 5, 0, 0, 0));
        assert_eq!(parse_datetime("2020-01-05T").unwrap(), datetime(2020, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_datetime_with_time() {
        assert_eq!(
            parse_datetime("2020-01-05T10:00:00").unwrap(),
            datetime(2020, 1, 5, 10, 0, 0)
        );
        assert_eq!(
            parse_datetime("2020-01-05T10:30").unwrap(),
            datetime(2020, 1, 5, 10, 30, 0)
        );

        let with_millis = parse_datetime("2020-01-05T10:00:00.250").unwrap();
        assert_eq!(
            with_millis,
            NaiveDate::from_ymd_opt(2020, 1, 5)
                .unwrap()
                .and_hms_milli_opt(10, 0, 0, 250)
                .unwrap()
        );
    }

    #[test]
    fn test_datetime_offset_keeps_wall_clock() {
        let expected = datetime(2020, 1, 5, 10, 0, 0);
        assert_eq!(parse_datetime("2020-01-05T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2020-01-05T10:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_datetime("2020-01-05T10:00-05:00").unwrap(), expected);
        assert_eq!(parse_datetime("2020-01-05T10:00:00+0100").unwrap(), expected);
        assert_eq!(
            parse_datetime("2020-01-05T10:00:00.5Z").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 5)
                .unwrap()
                .and_hms_milli_opt(10, 0, 0, 500)
                .unwrap()
        );
    }

    #[test]
    fn test_datetime_rejects_bad_offset() {
        assert!(parse_datetime("2020-01-05T10:00:00+1").is_err());
        assert!(parse_datetime("2020-01-05T10:00:00+01:0x").is_err());
        assert!(parse_datetime("2020-01-05T10:00:00ZZ").is_err());
    }

    #[test]
    fn test_datetime_requires_padded_date() {
        assert_eq!(
            parse_datetime("2020-1-5"),
            Err(ValueError::DateTimeShape("2020-1-5".to_string()))
        );
        assert!(parse_datetime("2020-01-5T10:00").is_err());
        assert!(parse_datetime("20200-01-05").is_err());
    }

    #[test]
    fn test_datetime_failures() {
        assert!(parse_datetime("05/01/2020").is_err());
        assert!(parse_datetime("2020-13-01").is_err());
        assert!(parse_datetime("2020-01-05T25:00:00").is_err());
        assert!(parse_datetime("T10:00").is_err());
        assert!(parse_datetime("").is_err());
    }

    #[test]
    fn test_datetime_failure_warns() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(coerce(ValueType::DateTime, "yesterday", &ctx(&sink)), None);
        assert_eq!(sink.count_kind(DiagnosticKind::InvalidValue), 1);
    }
}
