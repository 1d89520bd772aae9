//! Date and time formatting

use super::DataTransformer;
use crate::error::{DatagridError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt::Write;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Formats date-times with a strftime pattern.
///
/// Accepted input: RFC 3339 strings, naive date-times (`2024-01-15 10:30:00`),
/// dates (`2024-01-15`) and unix timestamps in seconds. Naive values are
/// taken as UTC; `null` and `""` pass through as `null`.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::transformer::{DataTransformer, DateTimeTransformer};
/// use serde_json::json;
///
/// let transformer = DateTimeTransformer::new("%d/%m/%Y");
/// assert_eq!(transformer.transform(json!("2024-01-15")).unwrap(), json!("15/01/2024"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeTransformer {
	format: String,
}

impl DateTimeTransformer {
	/// Creates a transformer rendering with `format`
	pub fn new(format: impl Into<String>) -> Self {
		Self {
			format: format.into(),
		}
	}
}

fn parse(value: &Value) -> Result<Option<DateTime<FixedOffset>>> {
	match value {
		Value::Null => Ok(None),
		Value::String(s) if s.trim().is_empty() => Ok(None),
		Value::String(s) => {
			let s = s.trim();
			if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
				return Ok(Some(dt));
			}
			for format in NAIVE_FORMATS {
				if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
					return Ok(Some(naive.and_utc().fixed_offset()));
				}
			}
			NaiveDate::parse_from_str(s, "%Y-%m-%d")
				.ok()
				.and_then(|date| date.and_hms_opt(0, 0, 0))
				.map(|naive| Some(naive.and_utc().fixed_offset()))
				.ok_or_else(|| {
					DatagridError::transformation(format!("\"{}\" is not a date or date-time", s))
				})
		}
		Value::Number(n) => n
			.as_i64()
			.and_then(|secs| DateTime::from_timestamp(secs, 0))
			.map(|dt| Some(dt.fixed_offset()))
			.ok_or_else(|| DatagridError::transformation(format!("{} is not a valid timestamp", n))),
		other => Err(DatagridError::transformation(format!(
			"expected a date-time, got {}",
			other
		))),
	}
}

impl DataTransformer for DateTimeTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		let Some(datetime) = parse(&value)? else {
			return Ok(Value::Null);
		};

		let mut out = String::new();
		write!(out, "{}", datetime.format(&self.format)).map_err(|_| {
			DatagridError::transformation(format!("invalid date-time format \"{}\"", self.format))
		})?;
		Ok(Value::String(out))
	}
}
