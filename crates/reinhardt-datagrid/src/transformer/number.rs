//! Number formatting

use super::DataTransformer;
use crate::error::{DatagridError, Result};
use crate::settings::NumberSettings;
use serde_json::Value;

/// Renders numbers with a fixed precision and optional digit grouping.
///
/// Numeric strings are accepted, `null` passes through.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::transformer::{DataTransformer, NumberFormatTransformer};
/// use serde_json::json;
///
/// let transformer = NumberFormatTransformer::new(Some(2)).with_grouping(true);
/// assert_eq!(transformer.transform(json!(1234567.891)).unwrap(), json!("1,234,567.89"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatTransformer {
	precision: Option<usize>,
	grouping: bool,
	decimal_point: String,
	thousands_separator: String,
}

impl NumberFormatTransformer {
	/// Creates a transformer with `.` and `,` as separators
	pub fn new(precision: Option<usize>) -> Self {
		Self::with_settings(precision, &NumberSettings::default())
	}

	/// Creates a transformer using the separators of `settings`
	pub fn with_settings(precision: Option<usize>, settings: &NumberSettings) -> Self {
		Self {
			precision,
			grouping: false,
			decimal_point: settings.decimal_point.clone(),
			thousands_separator: settings.thousands_separator.clone(),
		}
	}

	/// Enables or disables digit grouping
	pub fn with_grouping(mut self, grouping: bool) -> Self {
		self.grouping = grouping;
		self
	}

	/// Sets the decimal separator
	pub fn with_decimal_point(mut self, decimal_point: impl Into<String>) -> Self {
		self.decimal_point = decimal_point.into();
		self
	}

	/// Sets the thousands separator
	pub fn with_thousands_separator(mut self, separator: impl Into<String>) -> Self {
		self.thousands_separator = separator.into();
		self
	}

	fn render(&self, number: &serde_json::Number) -> Result<String> {
		let integer = number
			.as_i64()
			.map(|i| i.to_string())
			.or_else(|| number.as_u64().map(|u| u.to_string()));
		let plain = match (integer, self.precision) {
			(Some(i), Some(0)) | (Some(i), None) => i,
			(Some(i), Some(p)) => format!("{}.{}", i, "0".repeat(p)),
			(None, precision) => {
				let f = number.as_f64().ok_or_else(|| {
					DatagridError::transformation(format!("{} is not representable", number))
				})?;
				match precision {
					Some(p) => format!("{:.*}", p, f),
					None => f.to_string(),
				}
			}
		};

		let (sign, unsigned) = match plain.strip_prefix('-') {
			Some(rest) => ("-", rest),
			None => ("", plain.as_str()),
		};
		let (int_part, frac_part) = match unsigned.split_once('.') {
			Some((i, f)) => (i, Some(f)),
			None => (unsigned, None),
		};

		let mut out = String::from(sign);
		if self.grouping {
			out.push_str(&group(int_part, &self.thousands_separator));
		} else {
			out.push_str(int_part);
		}
		if let Some(frac) = frac_part {
			out.push_str(&self.decimal_point);
			out.push_str(frac);
		}
		Ok(out)
	}
}

fn group(digits: &str, separator: &str) -> String {
	let len = digits.len();
	let mut out = String::with_capacity(len + len / 3 * separator.len());
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (len - i) % 3 == 0 {
			out.push_str(separator);
		}
		out.push(c);
	}
	out
}

impl DataTransformer for NumberFormatTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		let number = match value {
			Value::Null => return Ok(Value::Null),
			Value::Number(n) => n,
			Value::String(s) if s.trim().is_empty() => return Ok(Value::Null),
			Value::String(s) => s.trim().parse::<serde_json::Number>().map_err(|_| {
				DatagridError::transformation(format!("\"{}\" is not a number", s))
			})?,
			other => {
				return Err(DatagridError::transformation(format!(
					"expected a number, got {}",
					other
				)));
			}
		};
		self.render(&number).map(Value::String)
	}
}
