//! Built-in column types
//!
//! | type | parent | options |
//! |------|--------|---------|
//! | `column` | – | `label`, `label_attr`, `header_attr`, `cell_attr`, `data_provider`, `property_path` |
//! | `text` | `column` | `trim`, `value_format`, `value_glue`, `empty_value` |
//! | `number` | `column` | `precision`, `grouping`, `decimal_point`, `thousands_separator`, `empty_value` |
//! | `money` | `number` | `currency` |
//! | `boolean` | `column` | `true_value`, `false_value` |
//! | `datetime` | `column` | `format`, `empty_value` |
//! | `action` | `column` | `uri_scheme`, `content` |
//! | `compound_column` | `column` | – |
//!
//! [`core_extension`] registers all of them, taking their defaults from
//! [`DatagridSettings`].

use crate::extension::PreloadedExtension;
use crate::settings::DatagridSettings;

pub mod action;
pub mod boolean;
pub mod column;
pub mod compound;
pub mod datetime;
pub mod money;
pub mod number;
pub mod text;

pub use action::ActionType;
pub use boolean::BooleanType;
pub use column::BaseType;
pub use compound::CompoundColumnType;
pub use datetime::DateTimeType;
pub use money::MoneyType;
pub use number::NumberType;
pub use text::TextType;

/// Name of the root type every built-in type derives from.
pub const BASE_TYPE: &str = "column";

/// Name of the type whose columns hold sub-columns.
pub const COMPOUND_TYPE: &str = "compound_column";

/// Extension providing the built-in column types.
pub fn core_extension(settings: &DatagridSettings) -> PreloadedExtension {
	PreloadedExtension::new()
		.with_type(BaseType)
		.with_type(TextType::new(settings))
		.with_type(NumberType::new(settings))
		.with_type(MoneyType::new(settings))
		.with_type(BooleanType)
		.with_type(DateTimeType::new(settings))
		.with_type(ActionType)
		.with_type(CompoundColumnType)
}

/// Turns a column name into a label: `first_name` and `firstName` both
/// become `First name`.
pub(crate) fn humanize(name: &str) -> String {
	let mut words = String::with_capacity(name.len() + 4);
	for (i, c) in name.chars().enumerate() {
		if c == '_' || c == '-' || c == ':' {
			words.push(' ');
		} else if c.is_uppercase() && i > 0 {
			words.push(' ');
			words.extend(c.to_lowercase());
		} else {
			words.extend(c.to_lowercase());
		}
	}

	let trimmed = words.split_whitespace().collect::<Vec<_>>().join(" ");
	let mut chars = trimmed.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
