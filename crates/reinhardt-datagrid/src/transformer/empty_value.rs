//! Empty value replacement

use super::DataTransformer;
use crate::error::{DatagridError, Result};
use serde_json::{Map, Value};

/// Replacement used by [`EmptyValueTransformer`]
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReplacement {
	/// Same replacement for every empty value
	Single(String),
	/// Replacement per field of an object value
	PerField(Map<String, Value>),
}

/// Replaces `null`, `""` and `false` with a configured value.
///
/// Numeric zero is a value, not an empty one.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::transformer::{DataTransformer, EmptyValueTransformer};
/// use serde_json::json;
///
/// let transformer = EmptyValueTransformer::new("-");
/// assert_eq!(transformer.transform(json!(0)).unwrap(), json!(0));
/// assert_eq!(transformer.transform(json!("")).unwrap(), json!("-"));
/// assert_eq!(transformer.transform(json!(null)).unwrap(), json!("-"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyValueTransformer {
	replacement: EmptyReplacement,
}

impl EmptyValueTransformer {
	/// Replaces every empty value with `replacement`
	pub fn new(replacement: impl Into<String>) -> Self {
		Self {
			replacement: EmptyReplacement::Single(replacement.into()),
		}
	}

	/// Replaces empty fields of object values per field
	pub fn per_field(replacements: Map<String, Value>) -> Self {
		Self {
			replacement: EmptyReplacement::PerField(replacements),
		}
	}

	/// Builds the transformer from an `empty_value` option: a string or an object.
	pub fn from_option(value: &Value) -> Result<Self> {
		match value {
			Value::String(s) => Ok(Self::new(s.clone())),
			Value::Object(map) => Ok(Self::per_field(map.clone())),
			other => Err(DatagridError::InvalidArgument(format!(
				"empty value must be a string or an object, got {}",
				other
			))),
		}
	}

	fn replacement_for(&self, field: &str) -> Result<Value> {
		match &self.replacement {
			EmptyReplacement::Single(s) => Ok(Value::String(s.clone())),
			EmptyReplacement::PerField(map) => map.get(field).cloned().ok_or_else(|| {
				DatagridError::transformation(format!(
					"no empty value configured for field \"{}\"",
					field
				))
			}),
		}
	}
}

/// Whether the value counts as empty.
pub fn is_empty(value: &Value) -> bool {
	match value {
		Value::Null | Value::Bool(false) => true,
		Value::String(s) => s.is_empty(),
		_ => false,
	}
}

impl DataTransformer for EmptyValueTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		match value {
			Value::Object(map) => {
				let mut out = Map::with_capacity(map.len());
				for (field, field_value) in map {
					let field_value = if is_empty(&field_value) {
						self.replacement_for(&field)?
					} else {
						field_value
					};
					out.insert(field, field_value);
				}
				Ok(Value::Object(out))
			}
			value if is_empty(&value) => match &self.replacement {
				EmptyReplacement::Single(s) => Ok(Value::String(s.clone())),
				EmptyReplacement::PerField(_) => Err(DatagridError::transformation(
					"a per-field empty value requires an object value",
				)),
			},
			value => Ok(value),
		}
	}
}
