//! View tree
//!
//! [`Datagrid::create_view`](crate::datagrid::Datagrid::create_view) produces
//! a [`DatagridView`]: one [`HeaderView`] per column and one [`RowView`] per
//! record, each row holding one [`CellView`] per column. The tree is plain
//! data meant for an external renderer; it serializes with serde.
//!
//! Views refer to their owners by name (the datagrid name, the column name)
//! rather than by pointer; look the owner up in the [`DatagridView`].
//!
//! ```mermaid
//! graph TD
//!     A[DatagridView] --> B[HeaderView per column]
//!     A --> C[RowView per record]
//!     C --> D[CellView per column]
//!     D --> E[CellValue::Compound]
//!     E --> F[CellView per sub-column]
//! ```

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

/// Attribute key holding the row key of a cell.
pub const ROW_ATTRIBUTE: &str = "row";

/// Key of a record in the data collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
	/// Integer key (list position or integer map key)
	Int(i64),
	/// String key
	Str(String),
}

impl RowKey {
	/// The key as a JSON value
	pub fn to_json(&self) -> Value {
		match self {
			Self::Int(i) => Value::from(*i),
			Self::Str(s) => Value::from(s.as_str()),
		}
	}

	/// Parses a map key, preferring integers (`"1"` becomes `Int(1)`).
	pub fn parse(key: &str) -> Self {
		match key.parse::<i64>() {
			Ok(i) if i.to_string() == key => Self::Int(i),
			_ => Self::Str(key.to_string()),
		}
	}
}

impl fmt::Display for RowKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(i) => write!(f, "{}", i),
			Self::Str(s) => f.write_str(s),
		}
	}
}

impl Serialize for RowKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Int(i) => serializer.serialize_i64(*i),
			Self::Str(s) => serializer.serialize_str(s),
		}
	}
}

impl From<i64> for RowKey {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for RowKey {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<usize> for RowKey {
	fn from(value: usize) -> Self {
		i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
	}
}

impl From<&str> for RowKey {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for RowKey {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

/// Header of one column.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderView {
	/// Column name
	pub name: String,
	/// Display label
	pub label: String,
	/// Block prefix of the column type, used to pick a template
	pub prefix: String,
	/// Name of the owning datagrid view
	pub datagrid: String,
	/// HTML attributes
	pub attributes: Map<String, Value>,
	/// Extra variables for the renderer
	pub vars: Map<String, Value>,
}

impl HeaderView {
	/// Creates a header labelled with the column name
	pub fn new(
		name: impl Into<String>,
		datagrid: impl Into<String>,
		prefix: impl Into<String>,
	) -> Self {
		let name = name.into();
		Self {
			label: name.clone(),
			name,
			prefix: prefix.into(),
			datagrid: datagrid.into(),
			attributes: Map::new(),
			vars: Map::new(),
		}
	}
}

/// Value of a cell.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
	/// Transformed value
	Value(Value),
	/// One nested cell per sub-column of a compound column
	Compound(IndexMap<String, CellView>),
}

impl CellValue {
	/// The plain value, `None` for compound cells
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			Self::Compound(_) => None,
		}
	}

	/// The nested cells, `None` for plain cells
	pub fn as_compound(&self) -> Option<&IndexMap<String, CellView>> {
		match self {
			Self::Value(_) => None,
			Self::Compound(cells) => Some(cells),
		}
	}
}

/// Cell of one column in one row.
#[derive(Debug, Clone, Serialize)]
pub struct CellView {
	/// Column name; the header is `DatagridView::columns[name]`
	pub name: String,
	/// Transformed value
	pub value: CellValue,
	/// Source record
	pub source: Arc<Value>,
	/// Key of the row
	pub row: RowKey,
	/// Name of the owning datagrid view
	pub datagrid: String,
	/// Block prefix of the column type
	pub prefix: String,
	/// HTML attributes, always holding [`ROW_ATTRIBUTE`]
	pub attributes: Map<String, Value>,
	/// Extra variables for the renderer
	pub vars: Map<String, Value>,
}

impl CellView {
	/// Creates an empty cell for the given row
	pub fn new(
		name: impl Into<String>,
		datagrid: impl Into<String>,
		prefix: impl Into<String>,
		source: Arc<Value>,
		row: RowKey,
	) -> Self {
		let mut attributes = Map::new();
		attributes.insert(ROW_ATTRIBUTE.to_string(), row.to_json());
		Self {
			name: name.into(),
			value: CellValue::Value(Value::Null),
			source,
			row,
			datagrid: datagrid.into(),
			prefix: prefix.into(),
			attributes,
			vars: Map::new(),
		}
	}
}

/// One record with its cells.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
	/// Key of the record in the data collection
	pub index: RowKey,
	/// Source record
	pub source: Arc<Value>,
	/// Cells keyed by column name, in column registration order
	pub cells: IndexMap<String, CellView>,
	/// Extra variables for the renderer
	pub vars: Map<String, Value>,
}

impl RowView {
	/// Creates a row without cells
	pub fn new(index: RowKey, source: Arc<Value>, vars: Map<String, Value>) -> Self {
		Self {
			index,
			source,
			cells: IndexMap::new(),
			vars,
		}
	}

	/// Cell of the column
	pub fn cell(&self, column: &str) -> Option<&CellView> {
		self.cells.get(column)
	}
}

/// Result of one `create_view` call.
#[derive(Debug, Clone, Serialize)]
pub struct DatagridView {
	/// Datagrid name
	pub name: String,
	/// Headers keyed by column name
	pub columns: IndexMap<String, HeaderView>,
	/// Rows keyed by record key
	pub rows: IndexMap<RowKey, RowView>,
	/// Render metadata and extra variables
	pub vars: Map<String, Value>,
}

impl DatagridView {
	/// Creates a view seeded with the standard render metadata
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datagrid::view::DatagridView;
	/// use serde_json::json;
	///
	/// let view = DatagridView::new("users");
	/// assert_eq!(view.vars["cache_key"], json!("_users_datagrid"));
	/// assert_eq!(view.vars["block_prefixes"], json!(["datagrid", "_users"]));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let unique = format!("_{}", name);
		let mut vars = Map::new();
		vars.insert("cache_key".to_string(), json!(format!("{}_datagrid", unique)));
		vars.insert("unique_block_prefix".to_string(), json!(unique));
		vars.insert("block_prefixes".to_string(), json!(["datagrid", unique]));
		vars.insert("row_vars".to_string(), json!({}));
		Self {
			name,
			columns: IndexMap::new(),
			rows: IndexMap::new(),
			vars,
		}
	}

	/// Header of the column
	pub fn column(&self, name: &str) -> Option<&HeaderView> {
		self.columns.get(name)
	}

	/// Whether the view has a header for the column
	pub fn has_column(&self, name: &str) -> bool {
		self.columns.contains_key(name)
	}

	/// Row with the given key
	pub fn row(&self, key: &RowKey) -> Option<&RowView> {
		self.rows.get(key)
	}

	/// Per-row default variables
	pub fn row_vars(&self) -> Map<String, Value> {
		self.vars
			.get("row_vars")
			.and_then(Value::as_object)
			.cloned()
			.unwrap_or_default()
	}
}
