//! Transformation of compound values

use super::{ChainTransformer, DataTransformer, stringify};
use crate::column::Column;
use crate::error::{DatagridError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Sub-column description used by [`CompoundTransformer`]
#[derive(Debug, Clone, Default)]
pub struct CompoundField {
	/// Fields read from the compound value.
	pub fields: Vec<String>,
	/// Transformation of the extracted value.
	pub transformer: ChainTransformer,
}

impl CompoundField {
	/// Sub-column reading `fields` without transformation
	pub fn new<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			fields: fields.into_iter().map(Into::into).collect(),
			transformer: ChainTransformer::new(),
		}
	}

	/// Sets the transformation of the extracted value
	pub fn with_transformer(mut self, transformer: ChainTransformer) -> Self {
		self.transformer = transformer;
		self
	}
}

/// Splits an object value between named sub-columns.
///
/// Every sub-column extracts the fields it maps from the input (a single
/// field yields that field's value, several fields yield an object), then
/// transforms the extracted value with its own chain. Sub-columns without a
/// transformer render scalars as strings, so an empty string stays distinct
/// from numeric zero.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::transformer::{CompoundField, CompoundTransformer, DataTransformer};
/// use serde_json::json;
///
/// let transformer = CompoundTransformer::new()
///     .with_field("id", CompoundField::new(["id"]))
///     .with_field("name", CompoundField::new(["first", "last"]));
///
/// let value = transformer
///     .transform(json!({"id": 0, "first": "Ada", "last": "Lovelace"}))
///     .unwrap();
/// assert_eq!(value, json!({"id": "0", "name": {"first": "Ada", "last": "Lovelace"}}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompoundTransformer {
	fields: IndexMap<String, CompoundField>,
}

impl CompoundTransformer {
	/// Creates a transformer without sub-columns
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a sub-column
	pub fn with_field(mut self, name: impl Into<String>, field: CompoundField) -> Self {
		self.fields.insert(name.into(), field);
		self
	}

	/// Derives the sub-columns from built columns.
	///
	/// Each column maps its `property_path` option, or its name, and brings
	/// its own view transformer.
	pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a Column>) -> Self {
		let fields = columns
			.into_iter()
			.map(|column| {
				let field = column
					.options()
					.str("property_path")
					.unwrap_or(column.name())
					.to_string();
				(
					column.name().to_string(),
					CompoundField::new([field])
						.with_transformer(column.view_transformer().clone()),
				)
			})
			.collect();
		Self { fields }
	}
}

impl DataTransformer for CompoundTransformer {
	fn transform(&self, value: Value) -> Result<Value> {
		let object = match &value {
			Value::Object(object) => object,
			Value::Null => return Ok(Value::Null),
			_ => {
				return Err(DatagridError::transformation(
					"a compound value must be an object of fields",
				));
			}
		};

		let mut out = Map::with_capacity(self.fields.len());
		for (name, field) in &self.fields {
			let extracted = match field.fields.as_slice() {
				[single] => object.get(single).cloned().unwrap_or(Value::Null),
				many => Value::Object(
					many.iter()
						.map(|f| (f.clone(), object.get(f).cloned().unwrap_or(Value::Null)))
						.collect(),
				),
			};

			let transformed = if !field.transformer.is_empty() {
				field.transformer.transform(extracted)?
			} else {
				match extracted {
					Value::Array(_) | Value::Object(_) => extracted,
					scalar => Value::String(stringify(&scalar)?),
				}
			};
			out.insert(name.clone(), transformed);
		}

		Ok(Value::Object(out))
	}
}
