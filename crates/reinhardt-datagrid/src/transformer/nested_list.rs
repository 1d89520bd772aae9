//! Per-element transformation of list values

use super::{ChainTransformer, DataTransformer};
use crate::error::Result;
use serde_json::Value;

/// Applies an inner chain to every element of an array value.
///
/// Non-array values pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct NestedListTransformer {
	chain: ChainTransformer,
}

impl NestedListTransformer {
	/// Wraps `chain`
	pub fn new(chain: ChainTransformer) -> Self {
		Self { chain }
	}

	/// The inner chain
	pub fn chain(&self) -> &ChainTransformer {
		&self.chain
	}
}

impl DataTransformer for NestedListTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		match value {
			Value::Array(items) => items
				.into_iter()
				.map(|item| self.chain.transform(item))
				.collect::<Result<Vec<_>>>()
				.map(Value::Array),
			other => Ok(other),
		}
	}
}
