//! Text column type

use super::BASE_TYPE;
use crate::column::ColumnBuilder;
use crate::column_type::ColumnType;
use crate::error::Result;
use crate::options::{OptionKind, OptionValue, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::settings::DatagridSettings;
use crate::transformer::{
	EmptyValueTransformer, TrimTransformer, ValueFormat, ValueFormatTransformer,
};

/// Renders values as text.
///
/// Transformers, in order: trim (`trim`), empty value replacement
/// (`empty_value`), formatting (`value_format` and `value_glue`).
#[derive(Debug, Clone, Default)]
pub struct TextType {
	empty_value: Option<String>,
}

impl TextType {
	/// Creates the type with the empty value of `settings`
	pub fn new(settings: &DatagridSettings) -> Self {
		Self {
			empty_value: settings.empty_value.clone(),
		}
	}
}

/// Declares `empty_value` with the configured default.
pub(crate) fn configure_empty_value(schema: &mut OptionSchema, default: Option<&str>) {
	match default {
		Some(value) => schema.set_default("empty_value", value),
		None => schema.define("empty_value"),
	};
	schema.set_allowed_types(
		"empty_value",
		&[OptionKind::String, OptionKind::Object, OptionKind::Null],
	);
}

/// Appends the empty value replacement when `empty_value` is set.
pub(crate) fn add_empty_value(builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
	if let Some(value) = options.json("empty_value") {
		builder.add_view_transformer(EmptyValueTransformer::from_option(value)?);
	}
	Ok(())
}

impl ColumnType for TextType {
	fn name(&self) -> &str {
		"text"
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.set_default("trim", false)
			.set_allowed_types("trim", &[OptionKind::Bool])
			.define("value_format")
			.set_allowed_types(
				"value_format",
				&[OptionKind::String, OptionKind::Formatter, OptionKind::Null],
			)
			.define("value_glue")
			.set_allowed_types("value_glue", &[OptionKind::String, OptionKind::Null]);
		configure_empty_value(schema, self.empty_value.as_deref());
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		if options.bool("trim") {
			builder.add_view_transformer(TrimTransformer);
		}
		add_empty_value(builder, options)?;

		let format = match options.get("value_format") {
			Some(OptionValue::Formatter(formatter)) => Some(ValueFormat::Callback(formatter.clone())),
			_ => options
				.str("value_format")
				.map(|template| ValueFormat::Template(template.to_string())),
		};
		let glue = options.str("value_glue").map(str::to_string);
		if format.is_some() || glue.is_some() {
			builder.add_view_transformer(ValueFormatTransformer::new(glue, format));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data_mapper::JsonDataMapper;
	use crate::error::DatagridError;
	use crate::options::ColumnOptions;
	use crate::registry::TypeRegistry;
	use crate::types::core_extension;
	use rstest::rstest;
	use serde_json::{Value, json};
	use std::sync::Arc;

	fn value(settings: &DatagridSettings, options: ColumnOptions, record: Value) -> Result<Value> {
		let registry = TypeRegistry::new().with_extension(core_extension(settings));
		registry
			.get_type("text")?
			.create_column("title", &options, Arc::new(JsonDataMapper))?
			.get_value(&record)
	}

	#[rstest]
	#[case(ColumnOptions::new(), json!("  Hi  "), json!("  Hi  "))]
	#[case(ColumnOptions::new().with("trim", true), json!("  Hi  "), json!("Hi"))]
	#[case(ColumnOptions::new().with("trim", true).with("empty_value", "-"), json!("   "), json!("-"))]
	#[case(ColumnOptions::new().with("value_format", "<%s>"), json!("Hi"), json!("<Hi>"))]
	#[case(ColumnOptions::new().with("value_glue", ", "), json!(["a", "b"]), json!("a, b"))]
	#[case(
		ColumnOptions::new().with("value_format", "%2$s %1$s"),
		json!(["Ada", "Lovelace"]),
		json!("Lovelace Ada")
	)]
	fn test_text_options(#[case] options: ColumnOptions, #[case] title: Value, #[case] expected: Value) {
		let result = value(&DatagridSettings::default(), options, json!({"title": title}));

		assert_eq!(result.unwrap(), expected);
	}

	#[rstest]
	fn test_formatter_option() {
		let options = ColumnOptions::new().with(
			"value_format",
			OptionValue::formatter(|value| Ok(value.as_str().unwrap_or_default().to_uppercase())),
		);

		let result = value(&DatagridSettings::default(), options, json!({"title": "quiet"}));

		assert_eq!(result.unwrap(), json!("QUIET"));
	}

	#[rstest]
	fn test_empty_value_from_settings() {
		let settings = DatagridSettings::from_toml_str("empty_value = \"n/a\"").unwrap();

		let result = value(&settings, ColumnOptions::new(), json!({"title": null}));

		assert_eq!(result.unwrap(), json!("n/a"));
	}

	#[rstest]
	fn test_trim_must_be_boolean() {
		let result = value(
			&DatagridSettings::default(),
			ColumnOptions::new().with("trim", "yes"),
			json!({"title": "x"}),
		);

		assert!(matches!(result, Err(DatagridError::OptionResolution(_))));
	}
}
