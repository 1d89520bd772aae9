//! Record access
//!
//! Columns read their value from a record through a [`DataProvider`]. When a
//! column does not configure one explicitly, the base column type builds a
//! provider that reads the property named after the column through the
//! factory's [`DataMapper`].

use crate::error::{DatagridError, Result};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Function extracting a column's normalized value from a record.
pub type DataProvider = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Failure to read or write a property path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MapperError {
	/// The property path has no segments.
	#[error("property path is empty")]
	EmptyPath,

	/// The record has no such field.
	#[error("field \"{0}\" does not exist")]
	MissingField(String),

	/// A path segment was applied to a scalar value.
	#[error("cannot read \"{segment}\" from a {kind} value")]
	NotTraversable {
		/// Segment that could not be applied.
		segment: String,
		/// JSON kind of the value it was applied to.
		kind: &'static str,
	},

	/// Array index past the end.
	#[error("index {index} is out of bounds for an array of length {len}")]
	IndexOutOfBounds {
		/// Requested index.
		index: usize,
		/// Array length.
		len: usize,
	},
}

/// Property-path based read and write access to records.
pub trait DataMapper: Send + Sync + Debug {
	/// Reads the value at `path`.
	fn get_data(&self, path: &str, record: &Value) -> std::result::Result<Value, MapperError>;

	/// Writes `value` at `path`.
	fn set_data(
		&self,
		path: &str,
		record: &mut Value,
		value: Value,
	) -> std::result::Result<(), MapperError>;
}

/// [`DataMapper`] for JSON records.
///
/// Paths are dotted: `author.name`, `tags.0`. Bracketed indexes such as
/// `tags[0]` are accepted as well.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::data_mapper::{DataMapper, JsonDataMapper};
/// use serde_json::json;
///
/// let record = json!({"author": {"tags": ["rust", "web"]}});
/// let value = JsonDataMapper.get_data("author.tags[1]", &record).unwrap();
/// assert_eq!(value, json!("web"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataMapper;

fn segments(path: &str) -> std::result::Result<Vec<String>, MapperError> {
	let segments: Vec<String> = path
		.replace('[', ".")
		.replace(']', "")
		.split('.')
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect();
	if segments.is_empty() {
		return Err(MapperError::EmptyPath);
	}
	Ok(segments)
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn child<'a>(value: &'a Value, segment: &str) -> std::result::Result<&'a Value, MapperError> {
	match value {
		Value::Object(map) => map
			.get(segment)
			.ok_or_else(|| MapperError::MissingField(segment.to_string())),
		Value::Array(items) => {
			let index: usize = segment.parse().map_err(|_| MapperError::NotTraversable {
				segment: segment.to_string(),
				kind: "array",
			})?;
			items.get(index).ok_or(MapperError::IndexOutOfBounds {
				index,
				len: items.len(),
			})
		}
		other => Err(MapperError::NotTraversable {
			segment: segment.to_string(),
			kind: kind_of(other),
		}),
	}
}

impl DataMapper for JsonDataMapper {
	fn get_data(&self, path: &str, record: &Value) -> std::result::Result<Value, MapperError> {
		let mut current = record;
		for segment in segments(path)? {
			current = child(current, &segment)?;
		}
		Ok(current.clone())
	}

	fn set_data(
		&self,
		path: &str,
		record: &mut Value,
		value: Value,
	) -> std::result::Result<(), MapperError> {
		let segments = segments(path)?;
		let (last, parents) = segments.split_last().ok_or(MapperError::EmptyPath)?;

		let mut current = record;
		for segment in parents {
			if current.is_null() {
				*current = Value::Object(Default::default());
			}
			let kind = kind_of(current);
			current = match current {
				Value::Object(map) => map
					.entry(segment.clone())
					.or_insert_with(|| Value::Object(Default::default())),
				Value::Array(items) => {
					let index: usize =
						segment.parse().map_err(|_| MapperError::NotTraversable {
							segment: segment.clone(),
							kind,
						})?;
					let len = items.len();
					items
						.get_mut(index)
						.ok_or(MapperError::IndexOutOfBounds { index, len })?
				}
				_ => {
					return Err(MapperError::NotTraversable {
						segment: segment.clone(),
						kind,
					});
				}
			};
		}

		if current.is_null() {
			*current = Value::Object(Default::default());
		}
		let kind = kind_of(current);
		match current {
			Value::Object(map) => {
				map.insert(last.clone(), value);
				Ok(())
			}
			Value::Array(items) => {
				let index: usize = last.parse().map_err(|_| MapperError::NotTraversable {
					segment: last.clone(),
					kind,
				})?;
				let len = items.len();
				match index.cmp(&len) {
					std::cmp::Ordering::Less => items[index] = value,
					std::cmp::Ordering::Equal => items.push(value),
					std::cmp::Ordering::Greater => {
						return Err(MapperError::IndexOutOfBounds { index, len });
					}
				}
				Ok(())
			}
			_ => Err(MapperError::NotTraversable {
				segment: last.clone(),
				kind,
			}),
		}
	}
}

/// Builds the default data provider of a column: read `path` from the record.
///
/// Failures are reported as [`DatagridError::DataProvider`] naming the column
/// and the path.
pub fn property_provider(
	mapper: Arc<dyn DataMapper>,
	column: impl Into<String>,
	path: impl Into<String>,
) -> DataProvider {
	let column = column.into();
	let path = path.into();
	Arc::new(move |record: &Value| {
		mapper
			.get_data(&path, record)
			.map_err(|e| DatagridError::DataProvider {
				column: column.clone(),
				field: path.clone(),
				reason: e.to_string(),
			})
	})
}
