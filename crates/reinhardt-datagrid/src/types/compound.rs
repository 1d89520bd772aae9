//! Compound column type

use super::{BASE_TYPE, COMPOUND_TYPE};
use crate::column::Column;
use crate::column_type::ColumnType;
use crate::error::Result;
use crate::options::ResolvedOptions;
use crate::view::HeaderView;
use serde_json::json;

/// Marker of columns made of named sub-columns.
///
/// Columns of this type, or of any type deriving from it, hold sub-columns;
/// each cell holds one nested cell per sub-column. The header lists the
/// sub-column names under the `sub_columns` var.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundColumnType;

impl ColumnType for CompoundColumnType {
	fn name(&self) -> &str {
		COMPOUND_TYPE
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn build_header_view(
		&self,
		view: &mut HeaderView,
		column: &Column,
		_options: &ResolvedOptions,
	) -> Result<()> {
		let names: Vec<&str> = column
			.columns()
			.map(|columns| columns.keys().map(String::as_str).collect())
			.unwrap_or_default();
		view.vars.insert("sub_columns".to_string(), json!(names));
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::options::{ColumnOptions, OptionValue};
	use crate::registry::TypeRegistry;
	use crate::settings::DatagridSettings;
	use crate::types::core_extension;
	use crate::view::{CellValue, DatagridView, RowKey};
	use indexmap::IndexMap;
	use rstest::rstest;
	use std::sync::Arc;

	#[rstest]
	fn test_nested_cells_and_header_vars() {
		// Arrange
		let registry = TypeRegistry::new().with_extension(core_extension(&DatagridSettings::default()));
		let mapper = Arc::new(JsonDataMapper);
		let compound = registry
			.get_type(COMPOUND_TYPE)
			.unwrap()
			.create_column("contact", &ColumnOptions::new(), mapper.clone())
			.unwrap();
		let text = registry.get_type("text").unwrap();
		let mut children = IndexMap::new();
		for name in ["email", "phone"] {
			let options = ColumnOptions::new().with("empty_value", "-");
			children.insert(
				name.to_string(),
				text.create_column(name, &options, mapper.clone()).unwrap(),
			);
		}
		compound.set_columns(children).unwrap();
		let view = DatagridView::new("people");
		let record = Arc::new(json!({"email": "a@b.c", "phone": null}));

		// Act
		let header = compound.create_header_view(&view).unwrap();
		let cell = compound
			.create_cell_view(&view, &record, &RowKey::from("p1"))
			.unwrap();

		// Assert
		assert_eq!(header.vars["sub_columns"], json!(["email", "phone"]));
		let CellValue::Compound(cells) = &cell.value else {
			panic!("expected nested cells");
		};
		assert_eq!(cells["email"].value.as_value(), Some(&json!("a@b.c")));
		assert_eq!(cells["phone"].value.as_value(), Some(&json!("-")));
		assert_eq!(cells["phone"].row, RowKey::from("p1"));
		assert!(compound.column_type().is_compound());
	}

	#[rstest]
	fn test_derived_types_are_compound() {
		#[derive(Debug)]
		struct Actions;

		impl ColumnType for Actions {
			fn name(&self) -> &str {
				"actions"
			}

			fn parent(&self) -> Option<&str> {
				Some(COMPOUND_TYPE)
			}
		}

		let registry = TypeRegistry::new()
			.with_extension(core_extension(&DatagridSettings::default()))
			.with_extension(crate::extension::PreloadedExtension::new().with_type(Actions));

		let column = registry
			.get_type("actions")
			.unwrap()
			.create_column(
				"row_actions",
				&ColumnOptions::new().with("data_provider", OptionValue::data_provider(|_| Ok(json!(null)))),
				Arc::new(JsonDataMapper),
			)
			.unwrap();

		assert!(column.is_compound());
		assert!(column.columns().is_none());
	}
}
