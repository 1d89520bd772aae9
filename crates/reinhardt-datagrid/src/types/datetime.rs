//! Date-time column type

use super::BASE_TYPE;
use super::text::{add_empty_value, configure_empty_value};
use crate::column::ColumnBuilder;
use crate::column_type::ColumnType;
use crate::error::Result;
use crate::options::{OptionKind, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::settings::DatagridSettings;
use crate::transformer::DateTimeTransformer;

/// Renders dates and date-times with a strftime `format`.
#[derive(Debug, Clone, Default)]
pub struct DateTimeType {
	format: String,
	empty_value: Option<String>,
}

impl DateTimeType {
	/// Creates the type with the format and empty value of `settings`
	pub fn new(settings: &DatagridSettings) -> Self {
		Self {
			format: settings.datetime_format.clone(),
			empty_value: settings.empty_value.clone(),
		}
	}
}

impl ColumnType for DateTimeType {
	fn name(&self) -> &str {
		"datetime"
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.set_default("format", self.format.as_str())
			.set_allowed_types("format", &[OptionKind::String]);
		configure_empty_value(schema, self.empty_value.as_deref());
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		let format = options.str("format").unwrap_or(&self.format).to_string();
		builder.add_view_transformer(DateTimeTransformer::new(format));
		add_empty_value(builder, options)
	}
}
