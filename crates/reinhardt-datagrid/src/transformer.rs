//! View transformers
//!
//! A transformer converts the normalized value returned by a column's data
//! provider into the value handed to the renderer. Transformers are pure,
//! tolerate `null` input, and compose: a [`ChainTransformer`] folds a value
//! through its transformers from left to right and aborts at the first
//! failure with [`DatagridError::TransformationFailed`].
//!
//! # Examples
//!
//! ```
//! use reinhardt_datagrid::transformer::{
//!     ChainTransformer, DataTransformer, TrimTransformer, ValueFormatTransformer,
//! };
//! use serde_json::json;
//!
//! let mut chain = ChainTransformer::new();
//! chain.append(TrimTransformer);
//! chain.append(ValueFormatTransformer::template("[%s]"));
//!
//! assert_eq!(chain.transform(json!("  x  ")).unwrap(), json!("[x]"));
//! ```

use crate::error::{DatagridError, Result};
use serde_json::Value;
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

pub mod boolean;
pub mod chain;
pub mod compound;
pub mod datetime;
pub mod empty_value;
pub mod nested_list;
pub mod number;
pub mod trim;
pub mod value_format;

pub use boolean::BooleanTransformer;
pub use chain::ChainTransformer;
pub use compound::{CompoundField, CompoundTransformer};
pub use datetime::DateTimeTransformer;
pub use empty_value::{EmptyReplacement, EmptyValueTransformer};
pub use nested_list::NestedListTransformer;
pub use number::NumberFormatTransformer;
pub use trim::TrimTransformer;
pub use value_format::{ValueFormat, ValueFormatTransformer, ValueFormatter};

/// A single value transformation.
///
/// Transformers are `'static`, so a chain can locate one by its concrete
/// type (see [`ChainTransformer::position`]).
pub trait DataTransformer: Any + Send + Sync + Debug {
	/// Transforms `value`.
	fn transform(&self, value: Value) -> Result<Value>;
}

/// Adapts a closure into a [`DataTransformer`].
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::transformer::{CallbackTransformer, DataTransformer};
/// use serde_json::json;
///
/// let upper = CallbackTransformer::new(|value| {
///     Ok(match value.as_str() {
///         Some(s) => json!(s.to_uppercase()),
///         None => value,
///     })
/// });
/// assert_eq!(upper.transform(json!("abc")).unwrap(), json!("ABC"));
/// ```
#[derive(Clone)]
pub struct CallbackTransformer {
	callback: Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>,
}

impl CallbackTransformer {
	/// Wraps `callback`
	pub fn new<F>(callback: F) -> Self
	where
		F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
	{
		Self {
			callback: Arc::new(callback),
		}
	}
}

impl Debug for CallbackTransformer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallbackTransformer").finish_non_exhaustive()
	}
}

impl DataTransformer for CallbackTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		(self.callback)(value)
	}
}

/// Renders a scalar as a string.
///
/// `null` becomes the empty string, booleans `true`/`false`, numbers their
/// decimal form. Arrays and objects are rejected.
pub fn stringify(value: &Value) -> Result<String> {
	match value {
		Value::Null => Ok(String::new()),
		Value::Bool(b) => Ok(b.to_string()),
		Value::Number(n) => Ok(n.to_string()),
		Value::String(s) => Ok(s.clone()),
		Value::Array(_) => Err(DatagridError::transformation(
			"expected a scalar value, got an array",
		)),
		Value::Object(_) => Err(DatagridError::transformation(
			"expected a scalar value, got an object",
		)),
	}
}
