//! Whitespace trimming

use super::DataTransformer;
use crate::error::Result;
use serde_json::Value;

/// Trims a string, or every string element of an array.
///
/// Other values pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimTransformer;

fn trim(value: Value) -> Value {
	match value {
		Value::String(s) => Value::String(s.trim().to_string()),
		other => other,
	}
}

impl DataTransformer for TrimTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		Ok(match value {
			Value::Array(items) => Value::Array(items.into_iter().map(trim).collect()),
			other => trim(other),
		})
	}
}
