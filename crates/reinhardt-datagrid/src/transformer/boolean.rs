//! Boolean labels

use super::DataTransformer;
use crate::error::{DatagridError, Result};
use serde_json::Value;

/// Renders booleans with configurable labels; `null` passes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanTransformer {
	true_value: String,
	false_value: String,
}

impl BooleanTransformer {
	/// Creates a transformer
	pub fn new(true_value: impl Into<String>, false_value: impl Into<String>) -> Self {
		Self {
			true_value: true_value.into(),
			false_value: false_value.into(),
		}
	}
}

impl DataTransformer for BooleanTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		match value {
			Value::Null => Ok(Value::Null),
			Value::Bool(true) => Ok(Value::String(self.true_value.clone())),
			Value::Bool(false) => Ok(Value::String(self.false_value.clone())),
			other => Err(DatagridError::transformation(format!(
				"expected a boolean, got {}",
				other
			))),
		}
	}
}
