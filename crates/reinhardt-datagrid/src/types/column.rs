//! Root column type

use super::{BASE_TYPE, humanize};
use crate::column::{Column, ColumnBuilder};
use crate::column_type::ColumnType;
use crate::data_mapper::property_provider;
use crate::error::Result;
use crate::options::{OptionKind, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::view::{CellView, HeaderView, ROW_ATTRIBUTE};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Root of every built-in type.
///
/// Sets the data provider (the `data_provider` option, or a reader of
/// `property_path` falling back to the column name), the header label (the
/// `label` option, or the humanized column name) and the attribute bags.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseType;

fn merge(target: &mut Map<String, Value>, source: Option<&Map<String, Value>>) {
	if let Some(source) = source {
		target.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
	}
}

impl ColumnType for BaseType {
	fn name(&self) -> &str {
		BASE_TYPE
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.define("label")
			.set_allowed_types("label", &[OptionKind::String, OptionKind::Null])
			.set_default("label_attr", Value::Object(Map::new()))
			.set_allowed_types("label_attr", &[OptionKind::Object])
			.set_default("header_attr", Value::Object(Map::new()))
			.set_allowed_types("header_attr", &[OptionKind::Object])
			.set_default("cell_attr", Value::Object(Map::new()))
			.set_allowed_types("cell_attr", &[OptionKind::Object])
			.define("data_provider")
			.set_allowed_types("data_provider", &[OptionKind::DataProvider, OptionKind::Null])
			.define("property_path")
			.set_allowed_types("property_path", &[OptionKind::String, OptionKind::Null]);
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		let provider = match options.data_provider("data_provider") {
			Some(provider) => Arc::clone(provider),
			None => {
				let path = options.str("property_path").unwrap_or(builder.name());
				property_provider(Arc::clone(builder.data_mapper()), builder.name(), path)
			}
		};
		builder.set_data_provider(provider);
		Ok(())
	}

	fn build_header_view(
		&self,
		view: &mut HeaderView,
		column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		view.label = options
			.str("label")
			.map(str::to_string)
			.unwrap_or_else(|| humanize(column.name()));
		merge(&mut view.attributes, options.object("header_attr"));
		view.vars.insert(
			"label_attr".to_string(),
			options
				.json("label_attr")
				.cloned()
				.unwrap_or_else(|| Value::Object(Map::new())),
		);
		Ok(())
	}

	fn build_cell_view(
		&self,
		view: &mut CellView,
		_column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		merge(&mut view.attributes, options.object("cell_attr"));
		view.attributes
			.insert(ROW_ATTRIBUTE.to_string(), view.row.to_json());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::extension::PreloadedExtension;
	use crate::options::{ColumnOptions, OptionValue};
	use crate::registry::TypeRegistry;
	use crate::view::{DatagridView, RowKey};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn registry() -> TypeRegistry {
		TypeRegistry::new().with_extension(PreloadedExtension::new().with_type(BaseType))
	}

	fn create(registry: &TypeRegistry, name: &str, options: ColumnOptions) -> Column {
		registry
			.get_type(BASE_TYPE)
			.unwrap()
			.create_column(name, &options, Arc::new(JsonDataMapper))
			.unwrap()
	}

	#[rstest]
	fn test_label_defaults_to_humanized_name(registry: TypeRegistry) {
		let column = create(&registry, "created_at", ColumnOptions::new());

		let header = column.create_header_view(&DatagridView::new("posts")).unwrap();

		assert_eq!(header.label, "Created at");
		assert_eq!(header.prefix, "column");
		assert_eq!(header.datagrid, "posts");
	}

	#[rstest]
	fn test_explicit_label_and_attributes(registry: TypeRegistry) {
		// Arrange
		let column = create(
			&registry,
			"id",
			ColumnOptions::new()
				.with("label", "#")
				.with("header_attr", json!({"class": "narrow"}))
				.with("cell_attr", json!({"class": "mono", "row": "ignored"})),
		);
		let view = DatagridView::new("posts");

		// Act
		let header = column.create_header_view(&view).unwrap();
		let cell = column
			.create_cell_view(&view, &Arc::new(json!({"id": 9})), &RowKey::Int(4))
			.unwrap();

		// Assert
		assert_eq!(header.label, "#");
		assert_eq!(header.attributes["class"], json!("narrow"));
		assert_eq!(cell.attributes["class"], json!("mono"));
		assert_eq!(cell.value.as_value(), Some(&json!(9)));
		assert_eq!(cell.row, RowKey::Int(4));
		assert_eq!(cell.attributes[ROW_ATTRIBUTE], json!(4));
	}

	#[rstest]
	fn test_property_path(registry: TypeRegistry) {
		let column = create(
			&registry,
			"author",
			ColumnOptions::new().with("property_path", "author.name"),
		);

		let value = column.get_value(&json!({"author": {"name": "Ada"}})).unwrap();

		assert_eq!(value, json!("Ada"));
	}

	#[rstest]
	fn test_explicit_data_provider(registry: TypeRegistry) {
		let column = create(
			&registry,
			"full_name",
			ColumnOptions::new().with(
				"data_provider",
				OptionValue::data_provider(|record| {
					let first = record["first"].as_str().unwrap_or_default();
					let last = record["last"].as_str().unwrap_or_default();
					Ok(json!(format!("{} {}", first, last)))
				}),
			),
		);

		let value = column.get_value(&json!({"first": "Ada", "last": "Lovelace"})).unwrap();

		assert_eq!(value, json!("Ada Lovelace"));
	}

	#[rstest]
	fn test_unreadable_property_names_column(registry: TypeRegistry) {
		let column = create(
			&registry,
			"city",
			ColumnOptions::new().with("property_path", "address.city"),
		);

		let result = column.get_value(&json!({"address": "not an object"}));

		assert!(matches!(
			result,
			Err(crate::error::DatagridError::DataProvider { column, field, .. })
				if column == "city" && field == "address.city"
		));
	}
}
