//! Resolved column types

use crate::column::{Column, ColumnBuilder};
use crate::column_type::{ColumnType, TypeExtension};
use crate::data_mapper::DataMapper;
use crate::error::Result;
use crate::options::{ColumnOptions, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::transformer::{CompoundField, CompoundTransformer, DataTransformer};
use crate::types::COMPOUND_TYPE;
use crate::view::{CellView, DatagridView, HeaderView, RowKey};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

/// A column type merged with its ancestors and its type extensions.
///
/// Resolved types are created and cached by the
/// [`TypeRegistry`](crate::registry::TypeRegistry); the parent link is an
/// `Arc` to the parent's cached instance.
pub struct ResolvedColumnType {
	inner: Arc<dyn ColumnType>,
	extensions: Vec<Arc<dyn TypeExtension>>,
	parent: Option<Arc<ResolvedColumnType>>,
	schema: OnceCell<OptionSchema>,
}

impl fmt::Debug for ResolvedColumnType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolvedColumnType")
			.field("name", &self.name())
			.field("extensions", &self.extensions)
			.field("parent", &self.parent.as_ref().map(|p| p.name()))
			.finish()
	}
}

impl ResolvedColumnType {
	/// Wraps a type with its extensions and resolved parent
	pub fn new(
		inner: Arc<dyn ColumnType>,
		extensions: Vec<Arc<dyn TypeExtension>>,
		parent: Option<Arc<ResolvedColumnType>>,
	) -> Self {
		Self {
			inner,
			extensions,
			parent,
			schema: OnceCell::new(),
		}
	}

	/// Name of the wrapped type
	pub fn name(&self) -> &str {
		self.inner.name()
	}

	/// The wrapped type
	pub fn inner_type(&self) -> &Arc<dyn ColumnType> {
		&self.inner
	}

	/// Resolved parent
	pub fn parent(&self) -> Option<&Arc<ResolvedColumnType>> {
		self.parent.as_ref()
	}

	/// Extensions of this level, in registration order
	pub fn type_extensions(&self) -> &[Arc<dyn TypeExtension>] {
		&self.extensions
	}

	/// Block prefixes of the chain, root ancestor first
	pub fn block_prefixes(&self) -> Vec<String> {
		let mut prefixes = self
			.parent
			.as_ref()
			.map(|parent| parent.block_prefixes())
			.unwrap_or_default();
		prefixes.push(self.inner.block_prefix().to_string());
		prefixes
	}

	/// Whether columns of this type hold sub-columns
	pub fn is_compound(&self) -> bool {
		self.name() == COMPOUND_TYPE
			|| self
				.parent
				.as_ref()
				.is_some_and(|parent| parent.is_compound())
	}

	/// Option schema of the chain.
	///
	/// Computed once: a copy of the parent's schema, configured by this type
	/// then by its extensions. The parent's cached schema is never modified.
	pub fn options_schema(&self) -> &OptionSchema {
		self.schema.get_or_init(|| {
			let mut schema = self
				.parent
				.as_ref()
				.map(|parent| parent.options_schema().clone())
				.unwrap_or_default();
			self.inner.configure_options(&mut schema);
			for extension in &self.extensions {
				extension.configure_options(&mut schema);
			}
			schema
		})
	}

	/// Resolves `options` and opens a builder for a column of this type
	pub fn create_builder(
		self: &Arc<Self>,
		name: &str,
		options: &ColumnOptions,
		data_mapper: Arc<dyn DataMapper>,
	) -> Result<ColumnBuilder> {
		let resolved = self.options_schema().resolve(options)?;
		ColumnBuilder::new(name, Arc::clone(self), resolved, data_mapper)
	}

	/// Creates a column: resolve the options, run the build chain, lock.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datagrid::data_mapper::JsonDataMapper;
	/// use reinhardt_datagrid::options::ColumnOptions;
	/// use reinhardt_datagrid::registry::TypeRegistry;
	/// use reinhardt_datagrid::settings::DatagridSettings;
	/// use reinhardt_datagrid::types::core_extension;
	/// use std::sync::Arc;
	///
	/// let registry = TypeRegistry::new()
	///     .with_extension(core_extension(&DatagridSettings::default()));
	/// let text = registry.get_type("text").unwrap();
	///
	/// let column = text
	///     .create_column("name", &ColumnOptions::new().with("trim", true), Arc::new(JsonDataMapper))
	///     .unwrap();
	/// assert_eq!(column.name(), "name");
	/// assert!(column.options().bool("trim"));
	/// ```
	pub fn create_column(
		self: &Arc<Self>,
		name: &str,
		options: &ColumnOptions,
		data_mapper: Arc<dyn DataMapper>,
	) -> Result<Column> {
		let mut builder = self.create_builder(name, options, data_mapper)?;
		let options = builder.options().clone();
		self.build_type(&mut builder, &options)?;
		tracing::trace!(column = name, column_type = self.name(), "built column");
		builder.finish()
	}

	/// Runs `build_column` for the parent chain, this type, then its extensions
	pub fn build_type(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		if let Some(parent) = &self.parent {
			parent.build_type(builder, options)?;
		}
		self.inner.build_column(builder, options)?;
		for extension in &self.extensions {
			extension.build_column(builder, options)?;
		}
		Ok(())
	}

	/// Creates an undecorated header view for `column`
	pub fn create_header_view(&self, column: &Column, datagrid: &DatagridView) -> HeaderView {
		let mut view = HeaderView::new(column.name(), &datagrid.name, self.inner.block_prefix());
		view.vars
			.insert("block_prefixes".to_string(), json!(self.block_prefixes()));
		view
	}

	/// Runs `build_header_view` for the parent chain, this type, then its extensions
	pub fn build_header_view(
		&self,
		view: &mut HeaderView,
		column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		if let Some(parent) = &self.parent {
			parent.build_header_view(view, column, options)?;
		}
		self.inner.build_header_view(view, column, options)?;
		for extension in &self.extensions {
			extension.build_header_view(view, column, options)?;
		}
		Ok(())
	}

	/// Creates an undecorated cell view for `column` in the given row
	pub fn create_cell_view(
		&self,
		column: &Column,
		datagrid: &DatagridView,
		record: Arc<Value>,
		row: RowKey,
	) -> CellView {
		let mut view = CellView::new(
			column.name(),
			&datagrid.name,
			self.inner.block_prefix(),
			record,
			row,
		);
		view.vars
			.insert("block_prefixes".to_string(), json!(self.block_prefixes()));
		view
	}

	/// Runs `build_cell_view` for the parent chain, this type, then its extensions
	pub fn build_cell_view(
		&self,
		view: &mut CellView,
		column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		if let Some(parent) = &self.parent {
			parent.build_cell_view(view, column, options)?;
		}
		self.inner.build_cell_view(view, column, options)?;
		for extension in &self.extensions {
			extension.build_cell_view(view, column, options)?;
		}
		Ok(())
	}

	/// Extracts the view value of `column` from `record`.
	///
	/// The data provider produces the normalized value, then the column's
	/// view transformer runs on it. A compound column collects the raw value
	/// of each sub-column from its own provider and transforms it with its
	/// own chain, yielding an object keyed by sub-column name.
	pub fn get_value(&self, column: &Column, record: &Value) -> Result<Value> {
		let value = match column.columns() {
			Some(children) => {
				// Raw values are keyed by sub-column name: sub-columns may share a field.
				let mut raw = Map::with_capacity(children.len());
				let mut compound = CompoundTransformer::new();
				for child in children.values() {
					raw.insert(child.name().to_string(), (child.data_provider())(record)?);
					compound = compound.with_field(
						child.name(),
						CompoundField::new([child.name()])
							.with_transformer(child.view_transformer().clone()),
					);
				}
				compound.transform(Value::Object(raw))?
			}
			None => (column.data_provider())(record)?,
		};

		let transformer = column.view_transformer();
		if transformer.is_empty() {
			Ok(value)
		} else {
			transformer.transform(value)
		}
	}
}
