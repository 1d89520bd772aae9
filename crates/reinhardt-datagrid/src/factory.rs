//! Datagrid factory and builders
//!
//! [`DatagridFactory`] is the entry point: it owns the type registry and the
//! data mapper, creates columns by type name and assembles datagrids. A
//! [`DatagridBuilder`] collects column registrations (including compound
//! columns through a [`CompoundColumnBuilder`]) and creates every column when
//! the datagrid is requested. Reusable datagrid definitions implement
//! [`DatagridConfigurator`] and are registered on the factory by name.
//!
//! # Examples
//!
//! ```
//! use reinhardt_datagrid::factory::DatagridFactory;
//! use reinhardt_datagrid::options::ColumnOptions;
//! use reinhardt_datagrid::settings::DatagridSettings;
//! use reinhardt_datagrid::view::RowKey;
//! use serde_json::json;
//!
//! let factory = DatagridFactory::from_settings(&DatagridSettings::default());
//!
//! let mut builder = factory.create_datagrid_builder("users");
//! builder
//!     .add("id", "number", ColumnOptions::new())
//!     .unwrap()
//!     .add("name", "text", ColumnOptions::new().with("trim", true))
//!     .unwrap();
//! let mut datagrid = builder.get_datagrid().unwrap();
//!
//! datagrid.set_data(json!([{"id": 1, "name": " Alice "}])).unwrap();
//! let view = datagrid.create_view().unwrap();
//! let name = &view.rows[&RowKey::Int(0)].cells["name"];
//! assert_eq!(name.value.as_value(), Some(&json!("Alice")));
//! ```

use crate::column::Column;
use crate::data_mapper::{DataMapper, JsonDataMapper};
use crate::datagrid::Datagrid;
use crate::error::{DatagridError, Result};
use crate::options::{ColumnOptions, OptionValue};
use crate::order::column_order_extension;
use crate::registry::TypeRegistry;
use crate::settings::DatagridSettings;
use crate::types::{COMPOUND_TYPE, core_extension};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Reusable datagrid definition.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::error::Result;
/// use reinhardt_datagrid::factory::{DatagridBuilder, DatagridConfigurator, DatagridFactory};
/// use reinhardt_datagrid::options::ColumnOptions;
/// use reinhardt_datagrid::settings::DatagridSettings;
/// use serde_json::{Map, Value};
///
/// #[derive(Debug)]
/// struct UsersDatagrid;
///
/// impl DatagridConfigurator for UsersDatagrid {
///     fn build_datagrid(&self, builder: &mut DatagridBuilder<'_>, _options: &Map<String, Value>) -> Result<()> {
///         builder.add("name", "text", ColumnOptions::new())?;
///         Ok(())
///     }
/// }
///
/// let factory = DatagridFactory::from_settings(&DatagridSettings::default())
///     .with_configurator("users", UsersDatagrid);
/// let datagrid = factory.create_configured_datagrid("users", "users", &Map::new()).unwrap();
/// assert!(datagrid.has_column("name"));
/// ```
pub trait DatagridConfigurator: Send + Sync + Debug {
	/// Registers the columns of the datagrid on `builder`
	fn build_datagrid(
		&self,
		builder: &mut DatagridBuilder<'_>,
		options: &Map<String, Value>,
	) -> Result<()>;
}

/// Creates columns and datagrids.
pub struct DatagridFactory {
	registry: Arc<TypeRegistry>,
	data_mapper: Arc<dyn DataMapper>,
	configurators: HashMap<String, Arc<dyn DatagridConfigurator>>,
}

impl Debug for DatagridFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut configurators: Vec<_> = self.configurators.keys().collect();
		configurators.sort();
		f.debug_struct("DatagridFactory")
			.field("registry", &self.registry)
			.field("data_mapper", &self.data_mapper)
			.field("configurators", &configurators)
			.finish()
	}
}

impl DatagridFactory {
	/// Creates a factory over `registry`, reading records with [`JsonDataMapper`]
	pub fn new(registry: TypeRegistry) -> Self {
		Self {
			registry: Arc::new(registry),
			data_mapper: Arc::new(JsonDataMapper),
			configurators: HashMap::new(),
		}
	}

	/// Creates a factory with the built-in types and the column ordering extension
	pub fn from_settings(settings: &DatagridSettings) -> Self {
		Self::new(
			TypeRegistry::new()
				.with_extension(core_extension(settings))
				.with_extension(column_order_extension()),
		)
	}

	/// Replaces the data mapper used by property based data providers
	pub fn with_data_mapper(mut self, data_mapper: impl DataMapper + 'static) -> Self {
		self.data_mapper = Arc::new(data_mapper);
		self
	}

	/// Registers a datagrid configurator under `name`
	pub fn with_configurator(
		mut self,
		name: impl Into<String>,
		configurator: impl DatagridConfigurator + 'static,
	) -> Self {
		self.configurators
			.insert(name.into(), Arc::new(configurator));
		self
	}

	/// Type registry
	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	/// Data mapper
	pub fn data_mapper(&self) -> &Arc<dyn DataMapper> {
		&self.data_mapper
	}

	/// Creates a column of the named type
	pub fn create_column(
		&self,
		name: &str,
		type_name: &str,
		options: &ColumnOptions,
	) -> Result<Column> {
		self.registry
			.get_type(type_name)?
			.create_column(name, options, Arc::clone(&self.data_mapper))
	}

	/// Creates a datagrid with every listener the registry's extensions provide
	pub fn create_datagrid(
		&self,
		name: impl Into<String>,
		columns: impl IntoIterator<Item = Column>,
	) -> Result<Datagrid> {
		let mut datagrid = Datagrid::new(name, columns)?;
		for extension in self.registry.extensions() {
			for listener in extension.view_listeners() {
				datagrid.add_listener(listener);
			}
		}
		Ok(datagrid)
	}

	/// Opens a builder for a datagrid named `name`
	pub fn create_datagrid_builder(&self, name: impl Into<String>) -> DatagridBuilder<'_> {
		DatagridBuilder {
			factory: self,
			name: name.into(),
			columns: IndexMap::new(),
		}
	}

	/// Creates a datagrid from a registered configurator.
	///
	/// # Errors
	///
	/// [`DatagridError::UnknownConfigurator`] when nothing is registered
	/// under `configurator`.
	pub fn create_configured_datagrid(
		&self,
		name: impl Into<String>,
		configurator: &str,
		options: &Map<String, Value>,
	) -> Result<Datagrid> {
		let found = self.configurators.get(configurator).ok_or_else(|| {
			DatagridError::UnknownConfigurator {
				name: configurator.to_string(),
			}
		})?;

		let mut builder = self.create_datagrid_builder(name);
		found.build_datagrid(&mut builder, options)?;
		builder.get_datagrid()
	}
}

#[derive(Debug)]
enum PendingColumn {
	Declared {
		type_name: String,
		options: ColumnOptions,
	},
	Built(Column),
}

/// Collects the columns of a datagrid.
///
/// Columns registered with [`add`](Self::add) are created when the datagrid
/// is requested, in registration order.
#[derive(Debug)]
pub struct DatagridBuilder<'a> {
	factory: &'a DatagridFactory,
	name: String,
	columns: IndexMap<String, PendingColumn>,
}

impl<'a> DatagridBuilder<'a> {
	/// Name of the datagrid being built
	pub fn name(&self) -> &str {
		&self.name
	}

	fn ensure_free(&self, name: &str) -> Result<()> {
		if self.columns.contains_key(name) {
			return Err(DatagridError::InvalidArgument(format!(
				"datagrid \"{}\" already has a column named \"{}\"",
				self.name, name
			)));
		}
		Ok(())
	}

	/// Registers a column by type name
	pub fn add(
		&mut self,
		name: impl Into<String>,
		type_name: impl Into<String>,
		options: ColumnOptions,
	) -> Result<&mut Self> {
		let name = name.into();
		self.ensure_free(&name)?;
		self.columns.insert(
			name,
			PendingColumn::Declared {
				type_name: type_name.into(),
				options,
			},
		);
		Ok(self)
	}

	/// Registers an already created column
	pub fn add_column(&mut self, column: Column) -> Result<&mut Self> {
		self.ensure_free(column.name())?;
		self.columns
			.insert(column.name().to_string(), PendingColumn::Built(column));
		Ok(self)
	}

	/// Whether a column is registered under `name`
	pub fn has(&self, name: &str) -> bool {
		self.columns.contains_key(name)
	}

	/// Removes a column, returning whether it was registered
	pub fn remove(&mut self, name: &str) -> bool {
		self.columns.shift_remove(name).is_some()
	}

	/// Opens a compound column named `name` of type `compound_column`
	pub fn create_compound(
		&mut self,
		name: impl Into<String>,
		options: ColumnOptions,
	) -> CompoundColumnBuilder<'_, 'a> {
		CompoundColumnBuilder {
			builder: self,
			name: name.into(),
			type_name: COMPOUND_TYPE.to_string(),
			options,
			children: IndexMap::new(),
		}
	}

	/// Creates every registered column and the datagrid
	pub fn get_datagrid(self) -> Result<Datagrid> {
		let factory = self.factory;
		let columns = self
			.columns
			.into_iter()
			.map(|(name, pending)| match pending {
				PendingColumn::Declared { type_name, options } => {
					factory.create_column(&name, &type_name, &options)
				}
				PendingColumn::Built(column) => Ok(column),
			})
			.collect::<Result<Vec<_>>>()?;
		factory.create_datagrid(self.name, columns)
	}
}

/// Collects the sub-columns of a compound column.
#[derive(Debug)]
pub struct CompoundColumnBuilder<'b, 'a> {
	builder: &'b mut DatagridBuilder<'a>,
	name: String,
	type_name: String,
	options: ColumnOptions,
	children: IndexMap<String, (String, ColumnOptions)>,
}

impl<'b, 'a> CompoundColumnBuilder<'b, 'a> {
	/// Uses another compound type for the column
	pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
		self.type_name = type_name.into();
		self
	}

	/// Registers a sub-column
	pub fn add(
		&mut self,
		name: impl Into<String>,
		type_name: impl Into<String>,
		options: ColumnOptions,
	) -> Result<&mut Self> {
		let name = name.into();
		if self.children.contains_key(&name) {
			return Err(DatagridError::InvalidArgument(format!(
				"compound column \"{}\" already has a sub-column named \"{}\"",
				self.name, name
			)));
		}
		self.children.insert(name, (type_name.into(), options));
		Ok(self)
	}

	/// Creates the compound column and its sub-columns and registers it.
	///
	/// Sub-columns without their own `data_provider` inherit the compound
	/// column's explicit one.
	///
	/// # Errors
	///
	/// [`DatagridError::InvalidArgument`] when the name is taken, or when a
	/// sub-column cannot be created.
	pub fn end(self) -> Result<&'b mut DatagridBuilder<'a>> {
		self.builder.ensure_free(&self.name)?;
		let factory = self.builder.factory;

		let compound = factory.create_column(&self.name, &self.type_name, &self.options)?;
		let provider = match self.options.get("data_provider") {
			Some(provider @ OptionValue::DataProvider(_)) => Some(provider.clone()),
			_ => None,
		};

		let mut children = IndexMap::with_capacity(self.children.len());
		for (child_name, (type_name, mut options)) in self.children {
			if let Some(provider) = &provider
				&& !options.contains("data_provider")
			{
				options.insert("data_provider", provider.clone());
			}
			let child = factory
				.create_column(&child_name, &type_name, &options)
				.map_err(|e| {
					DatagridError::InvalidArgument(format!(
						"failed to create sub-column \"{}\" of compound column \"{}\": {}",
						child_name, self.name, e
					))
				})?;
			children.insert(child_name, child);
		}
		compound.set_columns(children)?;

		self.builder
			.columns
			.insert(self.name, PendingColumn::Built(compound));
		Ok(self.builder)
	}
}
