//! Number column type

use super::BASE_TYPE;
use super::text::{add_empty_value, configure_empty_value};
use crate::column::ColumnBuilder;
use crate::column_type::ColumnType;
use crate::error::{DatagridError, Result};
use crate::options::{OptionKind, OptionValue, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::settings::{DatagridSettings, NumberSettings};
use crate::transformer::NumberFormatTransformer;

/// Renders numbers with a precision and optional digit grouping.
#[derive(Debug, Clone, Default)]
pub struct NumberType {
	number: NumberSettings,
	empty_value: Option<String>,
}

impl NumberType {
	/// Creates the type with the separators and empty value of `settings`
	pub fn new(settings: &DatagridSettings) -> Self {
		Self {
			number: settings.number.clone(),
			empty_value: settings.empty_value.clone(),
		}
	}
}

/// Number formatter configured from the resolved options.
pub(crate) fn number_transformer(options: &ResolvedOptions) -> Result<NumberFormatTransformer> {
	let precision = options
		.i64("precision")
		.map(usize::try_from)
		.transpose()
		.map_err(|_| {
			DatagridError::InvalidArgument("precision cannot be negative".to_string())
		})?;

	let mut transformer = NumberFormatTransformer::new(precision).with_grouping(options.bool("grouping"));
	if let Some(decimal_point) = options.str("decimal_point") {
		transformer = transformer.with_decimal_point(decimal_point);
	}
	if let Some(separator) = options.str("thousands_separator") {
		transformer = transformer.with_thousands_separator(separator);
	}
	Ok(transformer)
}

impl ColumnType for NumberType {
	fn name(&self) -> &str {
		"number"
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.define("precision")
			.set_allowed_types("precision", &[OptionKind::Integer, OptionKind::Null])
			.set_allowed_predicate("precision", |value| match value {
				OptionValue::Json(json) => json.as_i64().is_none_or(|p| (0..=20).contains(&p)),
				_ => false,
			})
			.set_default("grouping", false)
			.set_allowed_types("grouping", &[OptionKind::Bool])
			.set_default("decimal_point", self.number.decimal_point.as_str())
			.set_allowed_types("decimal_point", &[OptionKind::String])
			.set_default("thousands_separator", self.number.thousands_separator.as_str())
			.set_allowed_types("thousands_separator", &[OptionKind::String]);
		configure_empty_value(schema, self.empty_value.as_deref());
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		builder.add_view_transformer(number_transformer(options)?);
		add_empty_value(builder, options)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::options::ColumnOptions;
	use crate::registry::TypeRegistry;
	use crate::types::core_extension;
	use rstest::rstest;
	use serde_json::{Value, json};
	use std::sync::Arc;

	fn render(settings: &DatagridSettings, options: ColumnOptions, amount: Value) -> Result<Value> {
		TypeRegistry::new()
			.with_extension(core_extension(settings))
			.get_type("number")?
			.create_column("amount", &options, Arc::new(JsonDataMapper))?
			.get_value(&json!({ "amount": amount }))
	}

	#[rstest]
	#[case(ColumnOptions::new(), json!(1234.5), json!("1234.5"))]
	#[case(ColumnOptions::new().with("precision", 2), json!(3), json!("3.00"))]
	#[case(ColumnOptions::new().with("precision", 1).with("grouping", true), json!(12345.67), json!("12,345.7"))]
	#[case(ColumnOptions::new().with("empty_value", "-"), json!(null), json!("-"))]
	#[case(ColumnOptions::new().with("empty_value", "-"), json!(0), json!("0"))]
	fn test_number_options(#[case] options: ColumnOptions, #[case] amount: Value, #[case] expected: Value) {
		assert_eq!(
			render(&DatagridSettings::default(), options, amount).unwrap(),
			expected
		);
	}

	#[rstest]
	fn test_separators_from_settings() {
		// Arrange
		let settings = DatagridSettings::from_toml_str(
			"[number]\ndecimal_point = \",\"\nthousands_separator = \".\"",
		)
		.unwrap();
		let options = ColumnOptions::new().with("precision", 2).with("grouping", true);

		// Act
		let result = render(&settings, options, json!(1234.5));

		// Assert
		assert_eq!(result.unwrap(), json!("1.234,50"));
	}

	#[rstest]
	#[case(json!(-1))]
	#[case(json!(99))]
	fn test_precision_out_of_range(#[case] precision: Value) {
		let result = render(
			&DatagridSettings::default(),
			ColumnOptions::new().with("precision", precision),
			json!(1),
		);

		assert!(matches!(result, Err(DatagridError::OptionResolution(_))));
	}
}
