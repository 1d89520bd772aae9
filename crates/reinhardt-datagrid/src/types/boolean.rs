//! Boolean column type

use super::BASE_TYPE;
use crate::column::ColumnBuilder;
use crate::column_type::ColumnType;
use crate::error::Result;
use crate::options::{OptionKind, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::transformer::BooleanTransformer;

/// Renders booleans with the labels `true_value` and `false_value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl ColumnType for BooleanType {
	fn name(&self) -> &str {
		"boolean"
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.set_default("true_value", "Yes")
			.set_allowed_types("true_value", &[OptionKind::String])
			.set_default("false_value", "No")
			.set_allowed_types("false_value", &[OptionKind::String]);
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		builder.add_view_transformer(BooleanTransformer::new(
			options.str("true_value").unwrap_or_default(),
			options.str("false_value").unwrap_or_default(),
		));
		Ok(())
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
	use rstest::rstest;
	use serde_json::{Value, json};
	use std::sync::Arc;

	#[rstest]
	#[case(ColumnOptions::new(), json!(true), json!("Yes"))]
	#[case(ColumnOptions::new(), json!(false), json!("No"))]
	#[case(ColumnOptions::new().with("true_value", "✓").with("false_value", ""), json!(true), json!("✓"))]
	#[case(ColumnOptions::new(), json!(null), json!(null))]
	fn test_labels(#[case] options: ColumnOptions, #[case] active: Value, #[case] expected: Value) {
		// Arrange
		let registry = TypeRegistry::new().with_extension(core_extension(&DatagridSettings::default()));
		let column = registry
			.get_type("boolean")
			.unwrap()
			.create_column("active", &options, Arc::new(JsonDataMapper))
			.unwrap();

		// Act
		let value = column.get_value(&json!({ "active": active })).unwrap();

		// Assert
		assert_eq!(value, expected);
	}
}
