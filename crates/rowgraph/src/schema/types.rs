//! Declared value types and typed attribute values.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RowgraphError;

/// Value type declared for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Long,
    Double,
    Boolean,
    DateTime,
}

impl ValueType {
    /// All value types, in declaration order.
    pub const ALL: [ValueType; 5] = [
        ValueType::String,
        ValueType::Long,
        ValueType::Double,
        ValueType::Boolean,
        ValueType::DateTime,
    ];

    /// Name as written in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Boolean => "boolean",
            ValueType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = RowgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                RowgraphError::Config(format!(
                    "value type '{s}' not valid - must be either: string, long, double, boolean, or datetime"
                ))
            })
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A value coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

/// Renders the value as a TypeQL literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Value::Long(n) => write!(f, "{n}"),
            // Debug keeps the decimal point on whole numbers.
            Value::Double(d) => write!(f, "{d:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_value_type_parse_case_insensitive() {
        assert_eq!("LONG".parse::<ValueType>().unwrap(), ValueType::Long);
        assert_eq!("DateTime".parse::<ValueType>().unwrap(), ValueType::DateTime);
    }

    #[test]
    fn test_value_type_parse_rejects_unknown() {
        let err = "integer".parse::<ValueType>().unwrap_err();
        assert!(err.to_string().contains("string, long, double, boolean, or datetime"));
    }

    #[test]
    fn test_value_type_serde() {
        let t: ValueType = serde_json::from_str("\"double\"").unwrap();
        assert_eq!(t, ValueType::Double);
        assert_eq!(serde_json::to_string(&ValueType::Boolean).unwrap(), "\"boolean\"");
        assert!(serde_json::from_str::<ValueType>("\"date\"").is_err());
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Value::from("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(Value::Long(-42).to_string(), "-42");
        assert_eq!(Value::Double(3.0).to_string(), "3.0");
        assert_eq!(Value::Boolean(true).to_string(), "true");

        let dt = NaiveDate::from_ymd_opt(2020, 1, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "2020-01-05T10:00:00");
    }
}
