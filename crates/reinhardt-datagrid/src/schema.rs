//! Option schemas
//!
//! A column type declares the options it understands by configuring an
//! [`OptionSchema`]: defaults (literal or lazy), required names, allowed value
//! kinds and allowed values. Resolving a caller's [`ColumnOptions`] against
//! the schema yields [`ResolvedOptions`] or an [`OptionError`] naming the
//! offending option.
//!
//! Resolution runs in two phases. Supplied values and literal defaults are
//! collected first, wherever the options are declared, so a lazy default may
//! read them even when they are declared after it; a child type can thus
//! declare an option that a lazy default inherited from its parent reads.
//! Lazy defaults are then evaluated in declaration order. A lazy default may
//! read lazy options declared before it; reading a lazy option declared
//! later fails with [`OptionError::NotResolved`].
//!
//! # Examples
//!
//! ```
//! use reinhardt_datagrid::options::{ColumnOptions, OptionValue};
//! use reinhardt_datagrid::schema::OptionSchema;
//!
//! let mut schema = OptionSchema::new();
//! schema.set_default("a", 5);
//! schema.set_lazy_default("b", |options| {
//!     let a = options.i64("a").unwrap_or_default();
//!     Ok(OptionValue::from(a * 2))
//! });
//!
//! let resolved = schema.resolve(&ColumnOptions::new().with("a", 3)).unwrap();
//! assert_eq!(resolved.i64("b"), Some(6));
//! ```

use crate::error::OptionError;
use crate::options::{ColumnOptions, OptionKind, OptionValue, ResolvedOptions};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Lazily computed default, reading the options resolved so far.
pub type LazyDefault =
	Arc<dyn Fn(&ResolvedOptions) -> Result<OptionValue, OptionError> + Send + Sync>;

/// Predicate deciding whether an option value is allowed.
pub type ValuePredicate = Arc<dyn Fn(&OptionValue) -> bool + Send + Sync>;

/// Default of an option
#[derive(Clone)]
pub enum OptionDefault {
	/// Literal value
	Value(OptionValue),
	/// Value computed during resolution
	Lazy(LazyDefault),
}

/// Value constraint of an option
#[derive(Clone)]
pub enum AllowedValues {
	/// One of these JSON values.
	List(Vec<Value>),
	/// Any value accepted by the predicate.
	Predicate(ValuePredicate),
}

impl AllowedValues {
	fn accepts(&self, value: &OptionValue) -> bool {
		match self {
			Self::List(list) => value.as_json().is_some_and(|json| list.contains(json)),
			Self::Predicate(predicate) => predicate(value),
		}
	}
}

#[derive(Clone, Default)]
struct OptionDefinition {
	default: Option<OptionDefault>,
	required: bool,
	allowed_types: Option<Vec<OptionKind>>,
	allowed_values: Option<AllowedValues>,
}

/// Declared options of a column type.
#[derive(Clone, Default)]
pub struct OptionSchema {
	definitions: IndexMap<String, OptionDefinition>,
}

impl OptionSchema {
	/// Creates an empty schema
	pub fn new() -> Self {
		Self::default()
	}

	fn definition(&mut self, name: &str) -> &mut OptionDefinition {
		self.definitions.entry(name.to_string()).or_default()
	}

	/// Declares an option without a default.
	pub fn define(&mut self, name: &str) -> &mut Self {
		self.definition(name);
		self
	}

	/// Declares an option with a literal default, replacing any previous default.
	pub fn set_default(&mut self, name: &str, value: impl Into<OptionValue>) -> &mut Self {
		self.definition(name).default = Some(OptionDefault::Value(value.into()));
		self
	}

	/// Declares an option whose default is computed from other options.
	pub fn set_lazy_default<F>(&mut self, name: &str, default: F) -> &mut Self
	where
		F: Fn(&ResolvedOptions) -> Result<OptionValue, OptionError> + Send + Sync + 'static,
	{
		self.definition(name).default = Some(OptionDefault::Lazy(Arc::new(default)));
		self
	}

	/// Marks an option as required.
	pub fn set_required(&mut self, name: &str) -> &mut Self {
		self.definition(name).required = true;
		self
	}

	/// Restricts the kinds of value the option accepts.
	pub fn set_allowed_types(&mut self, name: &str, kinds: &[OptionKind]) -> &mut Self {
		self.definition(name).allowed_types = Some(kinds.to_vec());
		self
	}

	/// Restricts the option to a list of JSON values.
	pub fn set_allowed_values(&mut self, name: &str, values: Vec<Value>) -> &mut Self {
		self.definition(name).allowed_values = Some(AllowedValues::List(values));
		self
	}

	/// Restricts the option to the values accepted by `predicate`.
	pub fn set_allowed_predicate<F>(&mut self, name: &str, predicate: F) -> &mut Self
	where
		F: Fn(&OptionValue) -> bool + Send + Sync + 'static,
	{
		self.definition(name).allowed_values = Some(AllowedValues::Predicate(Arc::new(predicate)));
		self
	}

	/// Whether the option is declared
	pub fn is_defined(&self, name: &str) -> bool {
		self.definitions.contains_key(name)
	}

	/// Whether the option is required
	pub fn is_required(&self, name: &str) -> bool {
		self.definitions.get(name).is_some_and(|d| d.required)
	}

	/// Declared option names in declaration order
	pub fn defined_options(&self) -> impl Iterator<Item = &str> {
		self.definitions.keys().map(String::as_str)
	}

	/// Resolves supplied options against the schema.
	///
	/// Supplied values and literal defaults are visible to every lazy
	/// default; lazy defaults only see the lazy options declared before them.
	pub fn resolve(&self, supplied: &ColumnOptions) -> Result<ResolvedOptions, OptionError> {
		for (name, _) in supplied.iter() {
			if !self.definitions.contains_key(name) {
				let mut known: Vec<String> = self.definitions.keys().cloned().collect();
				known.sort();
				return Err(OptionError::UnknownOption {
					option: name.clone(),
					known,
				});
			}
		}

		let mut resolved = ResolvedOptions::default();
		let mut lazy = Vec::new();

		for (name, definition) in &self.definitions {
			if let Some(value) = supplied.get(name) {
				resolved.insert(name.clone(), value.clone());
				continue;
			}

			match &definition.default {
				Some(OptionDefault::Value(value)) => resolved.insert(name.clone(), value.clone()),
				Some(OptionDefault::Lazy(default)) => lazy.push((name, default)),
				None if definition.required => {
					return Err(OptionError::MissingRequiredOption {
						option: name.clone(),
					});
				}
				None => {}
			}
		}

		for (name, default) in lazy {
			let value = default(&resolved)?;
			resolved.insert(name.clone(), value);
		}

		for (name, definition) in &self.definitions {
			if let Some(value) = resolved.get(name) {
				validate(name, definition, value)?;
			}
		}

		Ok(resolved)
	}
}

fn validate(
	name: &str,
	definition: &OptionDefinition,
	value: &OptionValue,
) -> Result<(), OptionError> {
	if let Some(kinds) = &definition.allowed_types {
		let kind = value.kind();
		// Integers are acceptable wherever floats are.
		let accepted = kinds.contains(&kind)
			|| (kind == OptionKind::Integer && kinds.contains(&OptionKind::Float));
		if !accepted {
			return Err(OptionError::InvalidOptionType {
				option: name.to_string(),
				expected: kinds
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join("|"),
				actual: kind.to_string(),
			});
		}
	}

	if let Some(allowed) = &definition.allowed_values
		&& !allowed.accepts(value)
	{
		return Err(OptionError::InvalidOptionValue {
			option: name.to_string(),
			value: format!("{:?}", value),
		});
	}

	Ok(())
}

impl fmt::Debug for OptionSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OptionSchema")
			.field("options", &self.definitions.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn lazy_schema() -> OptionSchema {
		let mut schema = OptionSchema::new();
		schema.set_default("a", 5);
		schema.set_lazy_default("b", |options| {
			let a = options
				.require("a")?
				.as_json()
				.and_then(Value::as_i64)
				.unwrap_or_default();
			Ok(OptionValue::from(a * 2))
		});
		schema
	}

	#[rstest]
	fn test_lazy_default_uses_default(lazy_schema: OptionSchema) {
		let resolved = lazy_schema.resolve(&ColumnOptions::new()).unwrap();

		assert_eq!(resolved.i64("a"), Some(5));
		assert_eq!(resolved.i64("b"), Some(10));
	}

	#[rstest]
	fn test_lazy_default_uses_supplied_value(lazy_schema: OptionSchema) {
		let resolved = lazy_schema
			.resolve(&ColumnOptions::new().with("a", 3))
			.unwrap();

		assert_eq!(resolved.i64("a"), Some(3));
		assert_eq!(resolved.i64("b"), Some(6));
	}

	#[rstest]
	fn test_supplied_value_skips_lazy_default() {
		// Arrange
		let mut schema = OptionSchema::new();
		schema.set_lazy_default("b", |_| panic!("lazy default must not run"));

		// Act
		let resolved = schema
			.resolve(&ColumnOptions::new().with("b", "explicit"))
			.unwrap();

		// Assert
		assert_eq!(resolved.str("b"), Some("explicit"));
	}

	#[rstest]
	fn test_lazy_forward_reference_is_rejected() {
		// Arrange
		let mut schema = OptionSchema::new();
		schema.set_lazy_default("first", |options| Ok(options.require("second")?.clone()));
		schema.set_lazy_default("second", |_| Ok(OptionValue::from(1)));

		// Act
		let result = schema.resolve(&ColumnOptions::new());

		// Assert
		assert_eq!(
			result.unwrap_err(),
			OptionError::NotResolved {
				option: "second".to_string()
			}
		);
	}

	#[rstest]
	#[case(ColumnOptions::new(), "EUR", 2)]
	#[case(ColumnOptions::new().with("currency", "JPY"), "JPY", 0)]
	fn test_lazy_default_reads_literal_declared_after_it(
		#[case] supplied: ColumnOptions,
		#[case] currency: &str,
		#[case] precision: i64,
	) {
		// Arrange
		let mut schema = OptionSchema::new();
		schema.set_lazy_default("precision", |options| {
			let zero = options.require("currency")?.as_json() == Some(&Value::from("JPY"));
			Ok(OptionValue::from(if zero { 0 } else { 2 }))
		});
		schema.set_default("currency", "EUR");

		// Act
		let resolved = schema.resolve(&supplied).unwrap();

		// Assert
		assert_eq!(resolved.str("currency"), Some(currency));
		assert_eq!(resolved.i64("precision"), Some(precision));
	}

	#[rstest]
	fn test_unknown_option_lists_known_options() {
		let mut schema = OptionSchema::new();
		schema.set_default("trim", false).set_default("label", Value::Null);

		let result = schema.resolve(&ColumnOptions::new().with("trimm", true));

		assert_eq!(
			result.unwrap_err(),
			OptionError::UnknownOption {
				option: "trimm".to_string(),
				known: vec!["label".to_string(), "trim".to_string()],
			}
		);
	}

	#[rstest]
	fn test_missing_required_option() {
		let mut schema = OptionSchema::new();
		schema.set_required("uri_scheme");

		let result = schema.resolve(&ColumnOptions::new());

		assert_eq!(result.unwrap_err().option(), "uri_scheme");
	}

	#[rstest]
	fn test_required_option_with_default_is_satisfied() {
		let mut schema = OptionSchema::new();
		schema.set_required("currency").set_default("currency", "EUR");

		let resolved = schema.resolve(&ColumnOptions::new()).unwrap();

		assert_eq!(resolved.str("currency"), Some("EUR"));
	}

	#[rstest]
	fn test_defined_option_without_value_is_absent() {
		let mut schema = OptionSchema::new();
		schema.define("property_path");

		let resolved = schema.resolve(&ColumnOptions::new()).unwrap();

		assert!(!resolved.contains("property_path"));
	}

	#[rstest]
	fn test_invalid_type() {
		// Arrange
		let mut schema = OptionSchema::new();
		schema
			.set_default("trim", false)
			.set_allowed_types("trim", &[OptionKind::Bool]);

		// Act
		let result = schema.resolve(&ColumnOptions::new().with("trim", "yes"));

		// Assert
		assert_eq!(
			result.unwrap_err(),
			OptionError::InvalidOptionType {
				option: "trim".to_string(),
				expected: "bool".to_string(),
				actual: "string".to_string(),
			}
		);
	}

	#[rstest]
	fn test_integer_accepted_as_float() {
		let mut schema = OptionSchema::new();
		schema
			.set_default("ratio", 1.5)
			.set_allowed_types("ratio", &[OptionKind::Float]);

		assert!(schema.resolve(&ColumnOptions::new().with("ratio", 2)).is_ok());
	}

	#[rstest]
	fn test_invalid_value_from_list() {
		let mut schema = OptionSchema::new();
		schema
			.set_default("align", "left")
			.set_allowed_values("align", vec![json!("left"), json!("right")]);

		let result = schema.resolve(&ColumnOptions::new().with("align", "center"));

		assert!(matches!(
			result,
			Err(OptionError::InvalidOptionValue { option, value }) if option == "align" && value == "\"center\""
		));
	}

	#[rstest]
	fn test_defaults_are_validated_too() {
		let mut schema = OptionSchema::new();
		schema
			.set_lazy_default("precision", |_| Ok(OptionValue::from(-1)))
			.set_allowed_predicate("precision", |value| {
				value
					.as_json()
					.and_then(Value::as_i64)
					.is_some_and(|p| p >= 0)
			});

		let result = schema.resolve(&ColumnOptions::new());

		assert_eq!(result.unwrap_err().option(), "precision");
	}

	#[rstest]
	fn test_clone_does_not_affect_original() {
		// Arrange
		let mut parent = OptionSchema::new();
		parent.set_default("label", "parent");

		// Act
		let mut child = parent.clone();
		child.set_default("label", "child").set_default("extra", 1);

		// Assert
		let parent_resolved = parent.resolve(&ColumnOptions::new()).unwrap();
		let child_resolved = child.resolve(&ColumnOptions::new()).unwrap();
		assert_eq!(parent_resolved.str("label"), Some("parent"));
		assert!(!parent.is_defined("extra"));
		assert_eq!(child_resolved.str("label"), Some("child"));
	}

	#[rstest]
	fn test_overriding_default_keeps_declaration_position() {
		let mut schema = OptionSchema::new();
		schema.set_default("a", 1).set_default("b", 2).set_default("a", 3);

		let names: Vec<&str> = schema.defined_options().collect();

		assert_eq!(names, ["a", "b"]);
	}
}
