//! Option values and option bags
//!
//! Column options are mostly plain JSON values, but some options carry
//! behaviour (a data provider closure, a value formatter). [`OptionValue`]
//! holds either kind. [`ColumnOptions`] is the bag supplied by the caller,
//! [`ResolvedOptions`] the validated bag produced by an
//! [`OptionSchema`](crate::schema::OptionSchema).

use crate::data_mapper::DataProvider;
use crate::error::{DatagridError, OptionError, Result};
use crate::transformer::ValueFormatter;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A single option value.
#[derive(Clone)]
pub enum OptionValue {
	/// Plain data.
	Json(Value),
	/// Function extracting the column value from a record.
	DataProvider(DataProvider),
	/// Function rendering a value as a string.
	Formatter(ValueFormatter),
}

impl OptionValue {
	/// Wrap a closure as a data provider option.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datagrid::options::{OptionKind, OptionValue};
	///
	/// let provider = OptionValue::data_provider(|record| Ok(record["id"].clone()));
	/// assert_eq!(provider.kind(), OptionKind::DataProvider);
	/// ```
	pub fn data_provider<F>(provider: F) -> Self
	where
		F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
	{
		Self::DataProvider(Arc::new(provider))
	}

	/// Wrap a closure as a formatter option.
	pub fn formatter<F>(formatter: F) -> Self
	where
		F: Fn(&Value) -> Result<String> + Send + Sync + 'static,
	{
		Self::Formatter(Arc::new(formatter))
	}

	/// Kind of the value, used for type constraints.
	pub fn kind(&self) -> OptionKind {
		match self {
			Self::Json(Value::Null) => OptionKind::Null,
			Self::Json(Value::Bool(_)) => OptionKind::Bool,
			Self::Json(Value::Number(n)) if n.is_f64() => OptionKind::Float,
			Self::Json(Value::Number(_)) => OptionKind::Integer,
			Self::Json(Value::String(_)) => OptionKind::String,
			Self::Json(Value::Array(_)) => OptionKind::Array,
			Self::Json(Value::Object(_)) => OptionKind::Object,
			Self::DataProvider(_) => OptionKind::DataProvider,
			Self::Formatter(_) => OptionKind::Formatter,
		}
	}

	/// The JSON payload, if this is a data option.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			_ => None,
		}
	}

	/// Whether this is a JSON `null`.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Json(Value::Null))
	}
}

impl fmt::Debug for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Json(value) => write!(f, "{}", value),
			Self::DataProvider(_) => f.write_str("<data provider>"),
			Self::Formatter(_) => f.write_str("<formatter>"),
		}
	}
}

impl From<Value> for OptionValue {
	fn from(value: Value) -> Self {
		Self::Json(value)
	}
}

macro_rules! impl_from_json {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for OptionValue {
				fn from(value: $ty) -> Self {
					Self::Json(Value::from(value))
				}
			}
		)*
	};
}

impl_from_json!(&str, String, bool, i32, i64, u32, u64, f64);

/// Kind of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
	/// JSON null
	Null,
	/// Boolean
	Bool,
	/// Integral number
	Integer,
	/// Floating point number
	Float,
	/// String
	String,
	/// Array
	Array,
	/// Object
	Object,
	/// Data provider closure
	DataProvider,
	/// Formatter closure
	Formatter,
}

impl fmt::Display for OptionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Null => "null",
			Self::Bool => "bool",
			Self::Integer => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::Array => "array",
			Self::Object => "object",
			Self::DataProvider => "data_provider",
			Self::Formatter => "formatter",
		};
		f.write_str(name)
	}
}

/// Options supplied by the caller when registering a column.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::options::ColumnOptions;
///
/// let options = ColumnOptions::new()
///     .with("label", "User name")
///     .with("trim", true);
///
/// assert_eq!(options.len(), 2);
/// assert!(options.contains("trim"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnOptions {
	values: IndexMap<String, OptionValue>,
}

impl ColumnOptions {
	/// Creates an empty option bag
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds an option bag from a JSON object.
	///
	/// Fails with [`DatagridError::InvalidArgument`] for any other JSON shape.
	pub fn from_json(value: Value) -> Result<Self> {
		match value {
			Value::Object(map) => Ok(map.into_iter().collect()),
			other => Err(DatagridError::InvalidArgument(format!(
				"column options must be a JSON object, got {}",
				other
			))),
		}
	}

	/// Sets an option and returns the bag
	pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Sets an option
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
		self.values.insert(name.into(), value.into());
	}

	/// Returns an option
	pub fn get(&self, name: &str) -> Option<&OptionValue> {
		self.values.get(name)
	}

	/// Whether the option was supplied
	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// Removes an option
	pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
		self.values.shift_remove(name)
	}

	/// Number of supplied options
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether no option was supplied
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Iterates the options in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
		self.values.iter()
	}
}

impl<K, V> FromIterator<(K, V)> for ColumnOptions
where
	K: Into<String>,
	V: Into<OptionValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

/// Options validated against a column type's schema.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions {
	values: IndexMap<String, OptionValue>,
}

impl ResolvedOptions {
	pub(crate) fn insert(&mut self, name: String, value: OptionValue) {
		self.values.insert(name, value);
	}

	/// Returns an option, `None` when it has no value.
	pub fn get(&self, name: &str) -> Option<&OptionValue> {
		self.values.get(name)
	}

	/// Returns an option, failing when it has no value.
	///
	/// Lazy defaults use this to read the options they depend on.
	pub fn require(&self, name: &str) -> std::result::Result<&OptionValue, OptionError> {
		self.values.get(name).ok_or_else(|| OptionError::NotResolved {
			option: name.to_string(),
		})
	}

	/// Whether the option has a value
	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// JSON value of the option; `None` when absent, null or not JSON.
	pub fn json(&self, name: &str) -> Option<&Value> {
		match self.values.get(name) {
			Some(OptionValue::Json(Value::Null)) | None => None,
			Some(option) => option.as_json(),
		}
	}

	/// String value of the option
	pub fn str(&self, name: &str) -> Option<&str> {
		self.json(name).and_then(Value::as_str)
	}

	/// Boolean value of the option, `false` when absent
	pub fn bool(&self, name: &str) -> bool {
		self.json(name).and_then(Value::as_bool).unwrap_or(false)
	}

	/// Integer value of the option
	pub fn i64(&self, name: &str) -> Option<i64> {
		self.json(name).and_then(Value::as_i64)
	}

	/// Object value of the option
	pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
		self.json(name).and_then(Value::as_object)
	}

	/// Data provider stored in the option
	pub fn data_provider(&self, name: &str) -> Option<&DataProvider> {
		match self.values.get(name) {
			Some(OptionValue::DataProvider(provider)) => Some(provider),
			_ => None,
		}
	}

	/// Formatter stored in the option
	pub fn formatter(&self, name: &str) -> Option<&ValueFormatter> {
		match self.values.get(name) {
			Some(OptionValue::Formatter(formatter)) => Some(formatter),
			_ => None,
		}
	}

	/// Number of resolved options
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether no option is resolved
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Names of the resolved options
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}
}
