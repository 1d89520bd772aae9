//! Column display order
//!
//! The `position` option places a column's header relative to the others:
//! `"first"`, `"last"`, `{"before": "name"}` or `{"after": "name"}`. The
//! option is copied to the header vars, and [`ColumnOrderListener`] reorders
//! the headers once the view is built. Rows are not reordered; their cells
//! keep the column registration order.

use crate::column::Column;
use crate::column_type::TypeExtension;
use crate::datagrid::{Datagrid, ViewListener};
use crate::error::Result;
use crate::extension::PreloadedExtension;
use crate::options::{OptionValue, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::types::BASE_TYPE;
use crate::view::{DatagridView, HeaderView};
use serde_json::Value;

const POSITION: &str = "position";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
	First,
	Last,
	Before(String),
	After(String),
}

impl Position {
	fn parse(value: &Value) -> Option<Self> {
		match value {
			Value::String(s) if s == "first" => Some(Self::First),
			Value::String(s) if s == "last" => Some(Self::Last),
			Value::Object(map) if map.len() == 1 => {
				let (key, target) = map.iter().next()?;
				let target = target.as_str()?.to_string();
				match key.as_str() {
					"before" => Some(Self::Before(target)),
					"after" => Some(Self::After(target)),
					_ => None,
				}
			}
			_ => None,
		}
	}
}

/// Adds the `position` option to every column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnOrderTypeExtension;

impl TypeExtension for ColumnOrderTypeExtension {
	fn extended_type(&self) -> &str {
		BASE_TYPE
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.define(POSITION)
			.set_allowed_predicate(POSITION, |value| match value {
				OptionValue::Json(Value::Null) => true,
				OptionValue::Json(json) => Position::parse(json).is_some(),
				_ => false,
			});
	}

	fn build_header_view(
		&self,
		view: &mut HeaderView,
		_column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		if let Some(position) = options.json(POSITION) {
			view.vars.insert(POSITION.to_string(), position.clone());
		}
		Ok(())
	}
}

/// Reorders the headers of a built view by their `position` var.
///
/// Headers marked `first` come first and headers marked `last` come last,
/// each group keeping registration order. Relative positions are applied
/// afterwards in registration order; a reference to an unknown column is
/// ignored with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnOrderListener;

impl ViewListener for ColumnOrderListener {
	fn post_build_view(&self, _datagrid: &Datagrid, view: &mut DatagridView) -> Result<()> {
		let positions: Vec<(String, Option<Position>)> = view
			.columns
			.iter()
			.map(|(name, header)| {
				(
					name.clone(),
					header.vars.get(POSITION).and_then(Position::parse),
				)
			})
			.collect();
		if positions.iter().all(|(_, position)| position.is_none()) {
			return Ok(());
		}

		let rank = |position: &Option<Position>| match position {
			Some(Position::First) => 0,
			Some(Position::Last) => 2,
			_ => 1,
		};
		let mut order: Vec<&str> = Vec::with_capacity(positions.len());
		for wanted in 0..3 {
			order.extend(
				positions
					.iter()
					.filter(|(_, position)| rank(position) == wanted)
					.map(|(name, _)| name.as_str()),
			);
		}

		for (name, position) in &positions {
			let (target, offset) = match position {
				Some(Position::Before(target)) => (target, 0),
				Some(Position::After(target)) => (target, 1),
				_ => continue,
			};
			if target == name || !view.columns.contains_key(target.as_str()) {
				tracing::warn!(
					datagrid = %view.name,
					column = %name,
					target = %target,
					"ignoring invalid relative column position"
				);
				continue;
			}
			order.retain(|n| *n != name.as_str());
			if let Some(index) = order.iter().position(|n| *n == target.as_str()) {
				order.insert(index + offset, name.as_str());
			}
		}

		let mut columns = std::mem::take(&mut view.columns);
		for name in order {
			if let Some(header) = columns.shift_remove(name) {
				view.columns.insert(name.to_string(), header);
			}
		}
		Ok(())
	}
}

/// Extension providing the `position` option and its listener.
pub fn column_order_extension() -> PreloadedExtension {
	PreloadedExtension::new()
		.with_type_extension(ColumnOrderTypeExtension)
		.with_listener(ColumnOrderListener)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::options::ColumnOptions;
	use crate::registry::TypeRegistry;
	use crate::settings::DatagridSettings;
	use crate::types::core_extension;
	use rstest::rstest;
	use serde_json::json;
	use std::sync::Arc;

	fn datagrid(columns: &[(&str, Value)]) -> Datagrid {
		let registry = TypeRegistry::new()
			.with_extension(core_extension(&DatagridSettings::default()))
			.with_extension(column_order_extension());
		let text = registry.get_type("text").unwrap();
		let columns = columns.iter().map(|(name, position)| {
			text.create_column(
				name,
				&ColumnOptions::new().with(POSITION, position.clone()),
				Arc::new(JsonDataMapper),
			)
			.unwrap()
		});
		let mut datagrid = Datagrid::new("grid", columns).unwrap();
		datagrid.add_listener(Arc::new(ColumnOrderListener));
		datagrid
	}

	fn header_order(datagrid: &mut Datagrid) -> Vec<String> {
		datagrid
			.set_data(json!([{"a": 1, "b": 2, "c": 3, "d": 4}]))
			.unwrap();
		datagrid.create_view().unwrap().columns.keys().cloned().collect()
	}

	#[rstest]
	#[case(&[("a", json!(null)), ("b", json!("first")), ("c", json!(null))], &["b", "a", "c"])]
	#[case(&[("a", json!("last")), ("b", json!(null)), ("c", json!("first"))], &["c", "b", "a"])]
	#[case(&[("a", json!({"after": "c"})), ("b", json!(null)), ("c", json!(null))], &["b", "c", "a"])]
	#[case(&[("a", json!(null)), ("b", json!(null)), ("c", json!({"before": "a"}))], &["c", "a", "b"])]
	#[case(&[("a", json!({"after": "zz"})), ("b", json!(null))], &["a", "b"])]
	fn test_header_order(#[case] columns: &[(&str, Value)], #[case] expected: &[&str]) {
		let mut datagrid = datagrid(columns);

		assert_eq!(header_order(&mut datagrid), expected);
	}

	#[rstest]
	fn test_cells_keep_registration_order() {
		// Arrange
		let mut datagrid = datagrid(&[("a", json!(null)), ("b", json!("first"))]);
		datagrid.set_data(json!([{"a": "x", "b": "y"}])).unwrap();

		// Act
		let view = datagrid.create_view().unwrap();

		// Assert
		let headers: Vec<_> = view.columns.keys().collect();
		let cells: Vec<_> = view.rows[0].cells.keys().collect();
		assert_eq!(headers, vec!["b", "a"]);
		assert_eq!(cells, vec!["a", "b"]);
		assert_eq!(view.rows[0].cells["b"].value.as_value(), Some(&json!("y")));
	}

	#[rstest]
	#[case(json!("middle"))]
	#[case(json!({"beside": "a"}))]
	#[case(json!(3))]
	fn test_invalid_position(#[case] position: Value) {
		let registry = TypeRegistry::new()
			.with_extension(core_extension(&DatagridSettings::default()))
			.with_extension(column_order_extension());

		let result = registry.get_type("text").unwrap().create_column(
			"a",
			&ColumnOptions::new().with(POSITION, position),
			Arc::new(JsonDataMapper),
		);

		assert!(result.is_err());
	}
}
