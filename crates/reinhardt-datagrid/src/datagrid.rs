//! Datagrids
//!
//! A [`Datagrid`] binds named columns to one data collection and builds
//! [`DatagridView`]s from them. The data can be set exactly once; views can
//! only be built once it is set.

use crate::column::Column;
use crate::error::{DatagridError, Result};
use crate::view::{DatagridView, RowKey, RowView};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Ordered, keyed records.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::datagrid::DataCollection;
/// use reinhardt_datagrid::view::RowKey;
/// use serde_json::json;
///
/// let data = DataCollection::try_from(json!({"7": {"name": "a"}, "x": {"name": "b"}})).unwrap();
/// let keys: Vec<_> = data.iter().map(|(key, _)| key.clone()).collect();
/// assert_eq!(keys, vec![RowKey::Int(7), RowKey::Str("x".to_string())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataCollection {
	records: IndexMap<RowKey, Arc<Value>>,
}

impl DataCollection {
	/// Records keyed by their position
	pub fn from_records(records: impl IntoIterator<Item = Value>) -> Self {
		Self {
			records: records
				.into_iter()
				.enumerate()
				.map(|(i, record)| (RowKey::from(i), Arc::new(record)))
				.collect(),
		}
	}

	/// Records with their own keys
	pub fn from_keyed<K>(records: impl IntoIterator<Item = (K, Value)>) -> Self
	where
		K: Into<RowKey>,
	{
		Self {
			records: records
				.into_iter()
				.map(|(key, record)| (key.into(), Arc::new(record)))
				.collect(),
		}
	}

	/// Number of records
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Whether there is no record
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Iterates the records in key order
	pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &Arc<Value>)> {
		self.records.iter()
	}

	/// Record with the given key
	pub fn get(&self, key: &RowKey) -> Option<&Arc<Value>> {
		self.records.get(key)
	}
}

impl TryFrom<Value> for DataCollection {
	type Error = DatagridError;

	fn try_from(value: Value) -> Result<Self> {
		match value {
			Value::Array(records) => Ok(Self::from_records(records)),
			Value::Object(records) => Ok(Self::from_keyed(
				records
					.into_iter()
					.map(|(key, record)| (RowKey::parse(&key), record)),
			)),
			other => Err(DatagridError::InvalidArgument(format!(
				"data must be an array or an object of records, got {}",
				other
			))),
		}
	}
}

/// Hook decorating views while they are built.
///
/// Errors abort the view being built.
pub trait ViewListener: Send + Sync + Debug {
	/// Runs after the view metadata is seeded, before any header is built
	fn pre_build_view(&self, _datagrid: &Datagrid, _view: &mut DatagridView) -> Result<()> {
		Ok(())
	}

	/// Runs after every header and row is built
	fn post_build_view(&self, _datagrid: &Datagrid, _view: &mut DatagridView) -> Result<()> {
		Ok(())
	}
}

/// Named columns bound to one data collection.
#[derive(Debug)]
pub struct Datagrid {
	name: String,
	columns: IndexMap<String, Column>,
	listeners: Vec<Arc<dyn ViewListener>>,
	data: Option<DataCollection>,
}

impl Datagrid {
	/// Creates an unbound datagrid.
	///
	/// # Errors
	///
	/// [`DatagridError::InvalidArgument`] when the name is empty or two
	/// columns share a name.
	pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Result<Self> {
		let name = name.into();
		if name.is_empty() {
			return Err(DatagridError::InvalidArgument(
				"datagrid name cannot be empty".to_string(),
			));
		}

		let mut map = IndexMap::new();
		for column in columns {
			let column_name = column.name().to_string();
			if map.insert(column_name.clone(), column).is_some() {
				return Err(DatagridError::InvalidArgument(format!(
					"datagrid \"{}\" already has a column named \"{}\"",
					name, column_name
				)));
			}
		}

		Ok(Self {
			name,
			columns: map,
			listeners: Vec::new(),
			data: None,
		})
	}

	/// Datagrid name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Columns in registration order
	pub fn columns(&self) -> &IndexMap<String, Column> {
		&self.columns
	}

	/// Column by name
	pub fn column(&self, name: &str) -> Result<&Column> {
		self.columns
			.get(name)
			.ok_or_else(|| DatagridError::UnknownColumn {
				datagrid: self.name.clone(),
				name: name.to_string(),
			})
	}

	/// Whether the datagrid has the column
	pub fn has_column(&self, name: &str) -> bool {
		self.columns.contains_key(name)
	}

	/// Attaches a view listener
	pub fn add_listener(&mut self, listener: Arc<dyn ViewListener>) -> &mut Self {
		self.listeners.push(listener);
		self
	}

	/// Binds the data collection.
	///
	/// # Errors
	///
	/// [`DatagridError::BadState`] when data is already bound.
	pub fn set_data<T>(&mut self, data: T) -> Result<()>
	where
		T: TryInto<DataCollection>,
		DatagridError: From<T::Error>,
	{
		if self.data.is_some() {
			return Err(DatagridError::BadState(format!(
				"data of datagrid \"{}\" is already set",
				self.name
			)));
		}
		self.data = Some(data.try_into()?);
		Ok(())
	}

	/// Bound data collection
	pub fn data(&self) -> Option<&DataCollection> {
		self.data.as_ref()
	}

	/// Builds a view of the bound data.
	///
	/// Headers and cells are built in column registration order, rows in the
	/// collection's key order. Listeners may reorder the headers afterwards;
	/// the cells of each row keep the registration order.
	///
	/// # Errors
	///
	/// [`DatagridError::BadState`] when no data is bound; any error raised by
	/// a listener, a column type, a data provider or a transformer.
	pub fn create_view(&self) -> Result<DatagridView> {
		let data = self.data.as_ref().ok_or_else(|| {
			DatagridError::BadState(format!(
				"data of datagrid \"{}\" must be set before creating a view",
				self.name
			))
		})?;

		let mut view = DatagridView::new(&self.name);
		for listener in &self.listeners {
			listener.pre_build_view(self, &mut view)?;
		}

		for (name, column) in &self.columns {
			let header = column.create_header_view(&view)?;
			view.columns.insert(name.clone(), header);
		}

		let row_vars = view.row_vars();
		for (key, record) in data.iter() {
			let mut row = RowView::new(key.clone(), Arc::clone(record), row_vars.clone());
			for (name, column) in &self.columns {
				let cell = column.create_cell_view(&view, record, key)?;
				row.cells.insert(name.clone(), cell);
			}
			view.rows.insert(key.clone(), row);
		}

		for listener in &self.listeners {
			listener.post_build_view(self, &mut view)?;
		}

		tracing::debug!(
			datagrid = %self.name,
			columns = self.columns.len(),
			rows = view.rows.len(),
			"built datagrid view"
		);
		Ok(view)
	}
}
