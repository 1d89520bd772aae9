//! Ordered transformer chain

use super::DataTransformer;
use crate::error::Result;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Applies its transformers in order, feeding each output into the next.
#[derive(Debug, Clone, Default)]
pub struct ChainTransformer {
	transformers: Vec<Arc<dyn DataTransformer>>,
}

impl ChainTransformer {
	/// Creates an empty chain
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a transformer at the end of the chain
	pub fn append(&mut self, transformer: impl DataTransformer + 'static) -> &mut Self {
		self.transformers.push(Arc::new(transformer));
		self
	}

	/// Adds a shared transformer at the end of the chain
	pub fn append_shared(&mut self, transformer: Arc<dyn DataTransformer>) -> &mut Self {
		self.transformers.push(transformer);
		self
	}

	/// Adds a transformer at the start of the chain
	pub fn prepend(&mut self, transformer: impl DataTransformer + 'static) -> &mut Self {
		self.transformers.insert(0, Arc::new(transformer));
		self
	}

	/// Inserts a transformer at `index`, or at the end when `index` is past it
	pub fn insert(&mut self, index: usize, transformer: impl DataTransformer + 'static) -> &mut Self {
		let index = index.min(self.transformers.len());
		self.transformers.insert(index, Arc::new(transformer));
		self
	}

	/// Index of the first transformer of type `T`
	pub fn position<T: DataTransformer>(&self) -> Option<usize> {
		self.transformers.iter().position(|transformer| {
			let any: &dyn Any = &**transformer;
			any.is::<T>()
		})
	}

	/// Removes every transformer
	pub fn reset(&mut self) {
		self.transformers.clear();
	}

	/// Number of transformers
	pub fn len(&self) -> usize {
		self.transformers.len()
	}

	/// Whether the chain has no transformer
	pub fn is_empty(&self) -> bool {
		self.transformers.is_empty()
	}

	/// The transformers in application order
	pub fn transformers(&self) -> &[Arc<dyn DataTransformer>] {
		&self.transformers
	}
}

impl DataTransformer for ChainTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		self.transformers
			.iter()
			.try_fold(value, |value, transformer| transformer.transform(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DatagridError;
	use crate::transformer::{CallbackTransformer, TrimTransformer, ValueFormatTransformer};
	use rstest::rstest;
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	fn test_empty_chain_returns_input() {
		let chain = ChainTransformer::new();

		assert_eq!(chain.transform(json!(42)).unwrap(), json!(42));
	}

	#[rstest]
	fn test_trim_then_format() {
		// Arrange
		let mut chain = ChainTransformer::new();
		chain
			.append(TrimTransformer)
			.append(ValueFormatTransformer::template("[%s]"));

		// Act
		let once = chain.transform(json!("  x  ")).unwrap();
		let twice = chain.transform(once.clone()).unwrap();

		// Assert
		assert_eq!(once, json!("[x]"));
		assert_eq!(twice, json!("[[x]]"));
	}

	#[rstest]
	fn test_prepend_runs_first() {
		let mut chain = ChainTransformer::new();
		chain.append(ValueFormatTransformer::template("<%s>"));
		chain.prepend(ValueFormatTransformer::template("(%s)"));

		assert_eq!(chain.transform(json!("v")).unwrap(), json!("<(v)>"));
	}

	#[rstest]
	fn test_reset_clears_chain() {
		let mut chain = ChainTransformer::new();
		chain.append(TrimTransformer);

		chain.reset();

		assert!(chain.is_empty());
		assert_eq!(chain.transform(json!(" a ")).unwrap(), json!(" a "));
	}

	#[rstest]
	fn test_failure_aborts_chain() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let mut chain = ChainTransformer::new();
		chain
			.append(CallbackTransformer::new(|_| {
				Err(DatagridError::transformation("boom"))
			}))
			.append(CallbackTransformer::new(move |value| {
				counter.fetch_add(1, Ordering::SeqCst);
				Ok(value)
			}));

		// Act
		let result = chain.transform(json!("x"));

		// Assert
		assert!(matches!(result, Err(DatagridError::TransformationFailed(msg)) if msg == "boom"));
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[rstest]
	fn test_insert_after_located_transformer() {
		// Arrange
		let mut chain = ChainTransformer::new();
		chain
			.append(TrimTransformer)
			.append(ValueFormatTransformer::template("<%s>"));

		// Act
		let index = chain.position::<TrimTransformer>().unwrap();
		chain.insert(index + 1, ValueFormatTransformer::template("(%s)"));
		chain.insert(99, ValueFormatTransformer::template("[%s]"));

		// Assert
		assert_eq!(chain.position::<CallbackTransformer>(), None);
		assert_eq!(chain.len(), 4);
		assert_eq!(chain.transform(json!(" v ")).unwrap(), json!("[<(v)>]"));
	}
}
