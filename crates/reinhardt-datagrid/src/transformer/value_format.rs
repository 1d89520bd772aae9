//! Value formatting
//!
//! [`ValueFormatTransformer`] renders a scalar or an array as a string using
//! an optional glue and an optional format:
//!
//! | value  | glue | format | result |
//! |--------|------|--------|--------|
//! | array  | no   | no     | error |
//! | array  | yes  | no     | elements joined with the glue |
//! | array  | no   | yes    | format applied to the whole array (positional arguments) |
//! | array  | yes  | yes    | format applied per element, then joined |
//! | scalar | –    | no     | the scalar as a string |
//! | scalar | –    | yes    | format applied to the scalar |
//!
//! Templates use printf placeholders: `%s`, `%d`, `%%` and positional
//! `%1$s`.

use super::{DataTransformer, stringify};
use crate::error::{DatagridError, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Function rendering a value as a string.
pub type ValueFormatter = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;

/// Format applied by [`ValueFormatTransformer`]
#[derive(Clone)]
pub enum ValueFormat {
	/// printf-style template
	Template(String),
	/// Formatting function
	Callback(ValueFormatter),
}

impl fmt::Debug for ValueFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

impl ValueFormat {
	fn apply(&self, value: &Value) -> Result<String> {
		match self {
			Self::Template(template) => match value {
				Value::Array(items) => sprintf(template, items),
				Value::Object(_) => Err(DatagridError::transformation(
					"an object value cannot be formatted with a template",
				)),
				scalar => sprintf(template, std::slice::from_ref(scalar)),
			},
			Self::Callback(callback) => callback(value),
		}
	}
}

/// Renders values as strings with an optional glue and format.
#[derive(Debug, Clone, Default)]
pub struct ValueFormatTransformer {
	glue: Option<String>,
	format: Option<ValueFormat>,
}

impl ValueFormatTransformer {
	/// Creates a transformer
	pub fn new(glue: Option<String>, format: Option<ValueFormat>) -> Self {
		Self { glue, format }
	}

	/// Formats values with a printf-style template
	pub fn template(template: impl Into<String>) -> Self {
		Self::new(None, Some(ValueFormat::Template(template.into())))
	}

	/// Joins array values with `glue`
	pub fn glue(glue: impl Into<String>) -> Self {
		Self::new(Some(glue.into()), None)
	}

	/// Formats values with a function
	pub fn callback<F>(callback: F) -> Self
	where
		F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
	{
		Self::new(None, Some(ValueFormat::Callback(Arc::new(callback))))
	}

	/// Sets the glue
	pub fn with_glue(mut self, glue: impl Into<String>) -> Self {
		self.glue = Some(glue.into());
		self
	}
}

impl DataTransformer for ValueFormatTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		let rendered = match (&value, &self.glue, &self.format) {
			(Value::Array(_), None, None) => {
				return Err(DatagridError::transformation(
					"an array value requires a glue or a format",
				));
			}
			(Value::Array(items), Some(glue), None) => items
				.iter()
				.map(stringify)
				.collect::<Result<Vec<_>>>()?
				.join(glue),
			(Value::Array(items), Some(glue), Some(format)) => items
				.iter()
				.map(|item| format.apply(item))
				.collect::<Result<Vec<_>>>()?
				.join(glue),
			(_, _, Some(format)) => format.apply(&value)?,
			(_, _, None) => stringify(&value)?,
		};
		Ok(Value::String(rendered))
	}
}

/// Minimal printf: `%s`, `%d`, `%%` and positional `%N$s` / `%N$d`.
pub(crate) fn sprintf(template: &str, args: &[Value]) -> Result<String> {
	let mut out = String::with_capacity(template.len());
	let mut chars = template.chars().peekable();
	let mut next_arg = 0;

	while let Some(c) = chars.next() {
		if c != '%' {
			out.push(c);
			continue;
		}

		let mut position = String::new();
		while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
			position.push(d);
			chars.next();
		}
		let index = if position.is_empty() {
			None
		} else {
			if chars.next() != Some('$') {
				return Err(DatagridError::transformation(format!(
					"invalid placeholder in format \"{}\"",
					template
				)));
			}
			let n: usize = position.parse().map_err(|_| {
				DatagridError::transformation(format!("invalid position in format \"{}\"", template))
			})?;
			if n == 0 {
				return Err(DatagridError::transformation(
					"argument positions start at 1",
				));
			}
			Some(n - 1)
		};

		let conversion = chars.next();
		if conversion == Some('%') && index.is_none() {
			out.push('%');
			continue;
		}

		let index = index.unwrap_or_else(|| {
			next_arg += 1;
			next_arg - 1
		});
		let arg = args.get(index).ok_or_else(|| {
			DatagridError::transformation(format!(
				"too few arguments for format \"{}\": {} given",
				template,
				args.len()
			))
		})?;

		match conversion {
			Some('s') => out.push_str(&stringify(arg)?),
			Some('d') => out.push_str(&as_integer(arg)?.to_string()),
			other => {
				return Err(DatagridError::transformation(format!(
					"unsupported conversion {:?} in format \"{}\"",
					other, template
				)));
			}
		}
	}

	Ok(out)
}

fn as_integer(value: &Value) -> Result<i64> {
	match value {
		Value::Null => Ok(0),
		Value::Bool(b) => Ok(i64::from(*b)),
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_f64().map(|f| f.trunc() as i64))
			.ok_or_else(|| DatagridError::transformation(format!("{} is not an integer", n))),
		Value::String(s) => s.trim().parse().map_err(|_| {
			DatagridError::transformation(format!("\"{}\" is not an integer", s))
		}),
		_ => Err(DatagridError::transformation(
			"expected a scalar value for %d",
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_array_without_glue_or_format_fails() {
		let result = ValueFormatTransformer::default().transform(json!(["a", "b"]));

		assert!(matches!(result, Err(DatagridError::TransformationFailed(_))));
	}

	#[rstest]
	fn test_array_joined_with_glue() {
		let result = ValueFormatTransformer::glue(", ").transform(json!(["a", 1, true]));

		assert_eq!(result.unwrap(), json!("a, 1, true"));
	}

	#[rstest]
	fn test_array_as_positional_arguments() {
		let transformer = ValueFormatTransformer::template("%2$s, %1$s");

		let result = transformer.transform(json!(["John", "Doe"]));

		assert_eq!(result.unwrap(), json!("Doe, John"));
	}

	#[rstest]
	fn test_array_format_per_element_then_glue() {
		let transformer = ValueFormatTransformer::template("<%s>").with_glue(" ");

		let result = transformer.transform(json!(["a", "b"]));

		assert_eq!(result.unwrap(), json!("<a> <b>"));
	}

	#[rstest]
	#[case(json!(null), json!(""))]
	#[case(json!(0), json!("0"))]
	#[case(json!("plain"), json!("plain"))]
	fn test_scalar_without_format(#[case] value: Value, #[case] expected: Value) {
		assert_eq!(
			ValueFormatTransformer::default().transform(value).unwrap(),
			expected
		);
	}

	#[rstest]
	fn test_scalar_with_callback() {
		let transformer =
			ValueFormatTransformer::callback(|value| Ok(format!("#{}", stringify(value)?)));

		assert_eq!(transformer.transform(json!(7)).unwrap(), json!("#7"));
	}

	#[rstest]
	fn test_callback_receives_whole_array_without_glue() {
		let transformer = ValueFormatTransformer::callback(|value| {
			Ok(value.as_array().map(Vec::len).unwrap_or_default().to_string())
		});

		assert_eq!(transformer.transform(json!([1, 2, 3])).unwrap(), json!("3"));
	}

	#[rstest]
	#[case("%d%%", &[json!(42.9)], "42%")]
	#[case("%s-%s", &[json!("a"), json!("b")], "a-b")]
	#[case("%1$s%1$s", &[json!("x")], "xx")]
	#[case("no placeholder", &[], "no placeholder")]
	fn test_sprintf(#[case] template: &str, #[case] args: &[Value], #[case] expected: &str) {
		assert_eq!(sprintf(template, args).unwrap(), expected);
	}

	#[rstest]
	#[case("%s %s", &[json!("a")])]
	#[case("%x", &[json!(1)])]
	#[case("%d", &[json!("abc")])]
	fn test_sprintf_errors(#[case] template: &str, #[case] args: &[Value]) {
		assert!(sprintf(template, args).is_err());
	}
}
