//! Columns
//!
//! A column is configured through a [`ColumnBuilder`] while its type's build
//! chain runs, then locked into an immutable [`Column`]. View transformers
//! can only be registered on the builder, so a locked column cannot change
//! the way it renders values.
//!
//! Columns of a compound type additionally hold named sub-columns, assigned
//! exactly once with [`Column::set_columns`]. Until then they refuse to build
//! views.

use crate::data_mapper::{DataMapper, DataProvider, property_provider};
use crate::error::{DatagridError, Result};
use crate::options::{OptionValue, ResolvedOptions};
use crate::resolved::ResolvedColumnType;
use crate::transformer::{ChainTransformer, DataTransformer};
use crate::view::{CellValue, CellView, DatagridView, HeaderView, RowKey};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Validates a column name: a letter, digit or `_`, followed by letters,
/// digits, `_`, `-` or `:`.
pub(crate) fn validate_name(name: &str) -> Result<()> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) if first.is_alphanumeric() || first == '_' => {
			chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'))
		}
		_ => false,
	};
	if valid {
		Ok(())
	} else {
		Err(DatagridError::InvalidArgument(format!(
			"The name \"{}\" contains illegal characters. Names should start with a letter, digit or underscore and only contain letters, digits, numbers, underscores (\"_\"), hyphens (\"-\") and colons (\":\")",
			name
		)))
	}
}

/// Mutable column under construction.
pub struct ColumnBuilder {
	name: String,
	column_type: Arc<ResolvedColumnType>,
	options: ResolvedOptions,
	transformer: ChainTransformer,
	data_provider: Option<DataProvider>,
	data_mapper: Arc<dyn DataMapper>,
	attributes: Map<String, Value>,
}

impl fmt::Debug for ColumnBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnBuilder")
			.field("name", &self.name)
			.field("column_type", &self.column_type.name())
			.field("transformer", &self.transformer)
			.field("data_provider", &self.data_provider.is_some())
			.finish()
	}
}

impl ColumnBuilder {
	/// Opens a builder; fails when the name is invalid
	pub fn new(
		name: &str,
		column_type: Arc<ResolvedColumnType>,
		options: ResolvedOptions,
		data_mapper: Arc<dyn DataMapper>,
	) -> Result<Self> {
		validate_name(name)?;
		Ok(Self {
			name: name.to_string(),
			column_type,
			options,
			transformer: ChainTransformer::new(),
			data_provider: None,
			data_mapper,
			attributes: Map::new(),
		})
	}

	/// Column name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Resolved type of the column
	pub fn column_type(&self) -> &Arc<ResolvedColumnType> {
		&self.column_type
	}

	/// Resolved options
	pub fn options(&self) -> &ResolvedOptions {
		&self.options
	}

	/// Appends a view transformer
	pub fn add_view_transformer(&mut self, transformer: impl DataTransformer + 'static) -> &mut Self {
		self.transformer.append(transformer);
		self
	}

	/// Inserts a view transformer at `index` of the chain
	pub fn insert_view_transformer(
		&mut self,
		index: usize,
		transformer: impl DataTransformer + 'static,
	) -> &mut Self {
		self.transformer.insert(index, transformer);
		self
	}

	/// Prepends a view transformer
	pub fn prepend_view_transformer(
		&mut self,
		transformer: impl DataTransformer + 'static,
	) -> &mut Self {
		self.transformer.prepend(transformer);
		self
	}

	/// Drops the view transformers registered so far
	pub fn reset_view_transformers(&mut self) -> &mut Self {
		self.transformer.reset();
		self
	}

	/// View transformers registered so far
	pub fn view_transformers(&self) -> &ChainTransformer {
		&self.transformer
	}

	/// Sets the data provider
	pub fn set_data_provider(&mut self, provider: DataProvider) -> &mut Self {
		self.data_provider = Some(provider);
		self
	}

	/// Data provider set so far
	pub fn data_provider(&self) -> Option<&DataProvider> {
		self.data_provider.as_ref()
	}

	/// Mapper for property based data providers
	pub fn data_mapper(&self) -> &Arc<dyn DataMapper> {
		&self.data_mapper
	}

	/// Sets a column attribute
	pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
		self.attributes.insert(name.into(), value);
		self
	}

	/// Returns a column attribute
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Locks the column.
	///
	/// Without an explicit data provider the column reads the field named
	/// after itself.
	pub fn finish(self) -> Result<Column> {
		let data_provider = match self.data_provider {
			Some(provider) => provider,
			None => property_provider(Arc::clone(&self.data_mapper), &self.name, &self.name),
		};
		let columns = self.column_type.is_compound().then(OnceCell::new);

		Ok(Column {
			name: self.name,
			column_type: self.column_type,
			options: self.options,
			transformer: self.transformer,
			data_provider,
			data_mapper: self.data_mapper,
			attributes: self.attributes,
			columns,
		})
	}
}

/// Immutable column bound to a resolved type and resolved options.
#[derive(Clone)]
pub struct Column {
	name: String,
	column_type: Arc<ResolvedColumnType>,
	options: ResolvedOptions,
	transformer: ChainTransformer,
	data_provider: DataProvider,
	data_mapper: Arc<dyn DataMapper>,
	attributes: Map<String, Value>,
	columns: Option<OnceCell<IndexMap<String, Column>>>,
}

impl fmt::Debug for Column {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Column")
			.field("name", &self.name)
			.field("column_type", &self.column_type.name())
			.field("options", &self.options)
			.field("transformer", &self.transformer)
			.field("columns", &self.columns().map(|c| c.keys().collect::<Vec<_>>()))
			.finish()
	}
}

impl Column {
	/// Column name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Resolved type
	pub fn column_type(&self) -> &Arc<ResolvedColumnType> {
		&self.column_type
	}

	/// Resolved options
	pub fn options(&self) -> &ResolvedOptions {
		&self.options
	}

	/// Returns a resolved option
	pub fn option(&self, name: &str) -> Option<&OptionValue> {
		self.options.get(name)
	}

	/// View transformer chain
	pub fn view_transformer(&self) -> &ChainTransformer {
		&self.transformer
	}

	/// Data provider
	pub fn data_provider(&self) -> &DataProvider {
		&self.data_provider
	}

	/// Mapper the column reads record properties with
	pub fn data_mapper(&self) -> &Arc<dyn DataMapper> {
		&self.data_mapper
	}

	/// Returns a column attribute
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Whether the column holds sub-columns
	pub fn is_compound(&self) -> bool {
		self.columns.is_some()
	}

	/// Sub-columns, `None` for plain columns and unassigned compound columns
	pub fn columns(&self) -> Option<&IndexMap<String, Column>> {
		self.columns.as_ref().and_then(OnceCell::get)
	}

	/// Assigns the sub-columns of a compound column.
	///
	/// # Errors
	///
	/// [`DatagridError::InvalidArgument`] on a plain column,
	/// [`DatagridError::BadState`] when the sub-columns are already set.
	pub fn set_columns(&self, columns: IndexMap<String, Column>) -> Result<()> {
		let cell = self.columns.as_ref().ok_or_else(|| {
			DatagridError::InvalidArgument(format!(
				"column \"{}\" of type \"{}\" is not a compound column",
				self.name,
				self.column_type.name()
			))
		})?;
		cell.set(columns).map_err(|_| {
			DatagridError::BadState(format!(
				"sub-columns of \"{}\" are already set",
				self.name
			))
		})
	}

	fn ensure_sub_columns(&self) -> Result<()> {
		if self.is_compound() && self.columns().is_none() {
			return Err(DatagridError::BadState(format!(
				"compound column \"{}\" has no sub-columns; call set_columns first",
				self.name
			)));
		}
		Ok(())
	}

	/// Extracts the view value of the column from `record`
	pub fn get_value(&self, record: &Value) -> Result<Value> {
		self.column_type.get_value(self, record)
	}

	/// Builds the header view of the column
	pub fn create_header_view(&self, datagrid: &DatagridView) -> Result<HeaderView> {
		self.ensure_sub_columns()?;
		let mut view = self.column_type.create_header_view(self, datagrid);
		self.column_type
			.build_header_view(&mut view, self, &self.options)?;
		Ok(view)
	}

	/// Builds the cell view of the column for one record.
	///
	/// A compound column holds one nested cell per sub-column, built against
	/// the same record and row key.
	pub fn create_cell_view(
		&self,
		datagrid: &DatagridView,
		record: &Arc<Value>,
		row: &RowKey,
	) -> Result<CellView> {
		self.ensure_sub_columns()?;
		let mut view =
			self.column_type
				.create_cell_view(self, datagrid, Arc::clone(record), row.clone());

		view.value = match self.columns() {
			Some(children) => {
				let mut cells = IndexMap::with_capacity(children.len());
				for (name, child) in children {
					cells.insert(name.clone(), child.create_cell_view(datagrid, record, row)?);
				}
				CellValue::Compound(cells)
			}
			None => CellValue::Value(self.get_value(record)?),
		};

		self.column_type
			.build_cell_view(&mut view, self, &self.options)?;
		Ok(view)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::options::ColumnOptions;
	use crate::registry::TypeRegistry;
	use crate::settings::DatagridSettings;
	use crate::types::core_extension;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn registry() -> TypeRegistry {
		TypeRegistry::new().with_extension(core_extension(&DatagridSettings::default()))
	}

	fn column(registry: &TypeRegistry, name: &str, type_name: &str) -> Column {
		registry
			.get_type(type_name)
			.unwrap()
			.create_column(name, &ColumnOptions::new(), Arc::new(JsonDataMapper))
			.unwrap()
	}

	#[rstest]
	#[case("name")]
	#[case("_private")]
	#[case("1st")]
	#[case("user:email-address")]
	fn test_valid_names(#[case] name: &str) {
		assert!(validate_name(name).is_ok());
	}

	#[rstest]
	#[case("")]
	#[case("-name")]
	#[case("with space")]
	#[case("dot.ted")]
	fn test_invalid_names(#[case] name: &str) {
		assert!(matches!(
			validate_name(name),
			Err(DatagridError::InvalidArgument(_))
		));
	}

	#[rstest]
	fn test_default_data_provider_reads_field_named_after_column(registry: TypeRegistry) {
		let column = column(&registry, "email", "column");

		let value = column.get_value(&json!({"email": "a@example.com"})).unwrap();

		assert_eq!(value, json!("a@example.com"));
	}

	#[rstest]
	fn test_set_columns_on_plain_column_fails(registry: TypeRegistry) {
		let column = column(&registry, "name", "text");

		let result = column.set_columns(IndexMap::new());

		assert!(matches!(result, Err(DatagridError::InvalidArgument(_))));
	}

	#[rstest]
	fn test_set_columns_twice_fails(registry: TypeRegistry) {
		// Arrange
		let compound = column(&registry, "actions", "compound_column");
		let mut children = IndexMap::new();
		children.insert("edit".to_string(), column(&registry, "edit", "text"));
		compound.set_columns(children.clone()).unwrap();

		// Act
		let result = compound.set_columns(children);

		// Assert
		assert!(matches!(result, Err(DatagridError::BadState(_))));
		assert_eq!(compound.columns().map(IndexMap::len), Some(1));
	}

	#[rstest]
	fn test_compound_views_require_sub_columns(registry: TypeRegistry) {
		// Arrange
		let compound = column(&registry, "actions", "compound_column");
		let view = DatagridView::new("users");
		let record = Arc::new(json!({}));

		// Act
		let header = compound.create_header_view(&view);
		let cell = compound.create_cell_view(&view, &record, &RowKey::Int(0));

		// Assert
		assert!(matches!(header, Err(DatagridError::BadState(_))));
		assert!(matches!(cell, Err(DatagridError::BadState(_))));
	}

	#[rstest]
	fn test_compound_value_uses_sub_column_chains(registry: TypeRegistry) {
		// Arrange
		let compound = column(&registry, "person", "compound_column");
		let text = registry.get_type("text").unwrap();
		let mut children = IndexMap::new();
		children.insert(
			"name".to_string(),
			text.create_column(
				"name",
				&ColumnOptions::new().with("trim", true),
				Arc::new(JsonDataMapper),
			)
			.unwrap(),
		);
		children.insert("age".to_string(), column(&registry, "age", "column"));
		compound.set_columns(children).unwrap();

		// Act
		let value = compound
			.get_value(&json!({"name": "  Ada ", "age": 36}))
			.unwrap();

		// Assert
		assert_eq!(value, json!({"name": "Ada", "age": "36"}));
	}

	#[rstest]
	fn test_compound_value_matches_cells_for_shared_field(registry: TypeRegistry) {
		// Arrange
		let compound = column(&registry, "pair", "compound_column");
		let base = registry.get_type("column").unwrap();
		let mut children = IndexMap::new();
		for (name, fixed) in [("a", "A"), ("b", "B")] {
			let options = ColumnOptions::new()
				.with("property_path", "x")
				.with(
					"data_provider",
					OptionValue::data_provider(move |_| Ok(json!(fixed))),
				);
			children.insert(
				name.to_string(),
				base.create_column(name, &options, Arc::new(JsonDataMapper))
					.unwrap(),
			);
		}
		compound.set_columns(children).unwrap();
		let record = Arc::new(json!({"x": "shared"}));

		// Act
		let value = compound.get_value(&record).unwrap();
		let cell = compound
			.create_cell_view(&DatagridView::new("pairs"), &record, &RowKey::Int(0))
			.unwrap();

		// Assert
		assert_eq!(value, json!({"a": "A", "b": "B"}));
		let cells = cell.value.as_compound().unwrap();
		assert_eq!(cells["a"].value.as_value(), Some(&json!("A")));
		assert_eq!(cells["b"].value.as_value(), Some(&json!("B")));
	}
}
