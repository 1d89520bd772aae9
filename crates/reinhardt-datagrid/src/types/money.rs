//! Money column type

use super::number::number_transformer;
use super::text::add_empty_value;
use crate::column::ColumnBuilder;
use crate::column_type::ColumnType;
use crate::error::Result;
use crate::options::{OptionKind, OptionValue, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::settings::DatagridSettings;
use crate::transformer::{NumberFormatTransformer, ValueFormatTransformer, stringify};
use serde_json::Value;

/// ISO 4217 currencies without minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
	"BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
	"VUV", "XAF", "XOF", "XPF",
];

/// Symbol of a currency, falling back to its code.
fn symbol(currency: &str) -> &str {
	match currency {
		"EUR" => "€",
		"USD" => "$",
		"GBP" => "£",
		"JPY" => "¥",
		other => other,
	}
}

/// Renders amounts prefixed with their currency.
///
/// `precision` defaults to the minor unit of `currency`: 0 for currencies
/// such as JPY, 2 otherwise.
#[derive(Debug, Clone, Default)]
pub struct MoneyType {
	currency: String,
}

impl MoneyType {
	/// Creates the type with the default currency of `settings`
	pub fn new(settings: &DatagridSettings) -> Self {
		Self {
			currency: settings.default_currency.clone(),
		}
	}
}

impl ColumnType for MoneyType {
	fn name(&self) -> &str {
		"money"
	}

	fn parent(&self) -> Option<&str> {
		Some("number")
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.set_default("currency", self.currency.as_str())
			.set_allowed_types("currency", &[OptionKind::String])
			.set_allowed_predicate("currency", |value| {
				value.as_json().and_then(Value::as_str).is_some_and(|code| {
					code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
				})
			})
			.set_lazy_default("precision", |options| {
				let currency = options.require("currency")?;
				let zero_decimal = currency
					.as_json()
					.and_then(Value::as_str)
					.is_some_and(|code| ZERO_DECIMAL_CURRENCIES.contains(&code));
				Ok(OptionValue::from(if zero_decimal { 0 } else { 2 }))
			});
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		let prefix = symbol(options.str("currency").unwrap_or(&self.currency)).to_string();
		let currency = ValueFormatTransformer::callback(move |value| {
			if value.is_null() {
				return Ok(String::new());
			}
			Ok(format!("{} {}", prefix, stringify(value)?))
		});

		// `number` already formats with this column's precision; the prefix
		// goes right after it so empty values are replaced afterwards.
		match builder
			.view_transformers()
			.position::<NumberFormatTransformer>()
		{
			Some(index) => {
				builder.insert_view_transformer(index + 1, currency);
			}
			None => {
				builder.add_view_transformer(number_transformer(options)?);
				builder.add_view_transformer(currency);
				add_empty_value(builder, options)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column_type::TypeExtension;
	use crate::data_mapper::JsonDataMapper;
	use crate::error::DatagridError;
	use crate::extension::PreloadedExtension;
	use crate::options::ColumnOptions;
	use crate::registry::TypeRegistry;
	use crate::types::core_extension;
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Arc;

	#[fixture]
	fn registry() -> TypeRegistry {
		TypeRegistry::new().with_extension(core_extension(&DatagridSettings::default()))
	}

	fn render(registry: &TypeRegistry, options: ColumnOptions, price: Value) -> Result<Value> {
		registry
			.get_type("money")?
			.create_column("price", &options, Arc::new(JsonDataMapper))?
			.get_value(&json!({ "price": price }))
	}

	#[rstest]
	#[case(ColumnOptions::new(), json!(12.5), json!("€ 12.50"))]
	#[case(ColumnOptions::new().with("currency", "JPY"), json!(1200), json!("¥ 1200"))]
	#[case(ColumnOptions::new().with("currency", "CHF").with("precision", 1), json!(3.14), json!("CHF 3.1"))]
	#[case(ColumnOptions::new().with("currency", "USD").with("grouping", true), json!(1234567), json!("$ 1,234,567.00"))]
	#[case(ColumnOptions::new().with("empty_value", "-"), json!(null), json!("-"))]
	fn test_money(
		registry: TypeRegistry,
		#[case] options: ColumnOptions,
		#[case] price: Value,
		#[case] expected: Value,
	) {
		assert_eq!(render(&registry, options, price).unwrap(), expected);
	}

	#[rstest]
	fn test_precision_follows_currency(registry: TypeRegistry) {
		// Arrange
		let money = registry.get_type("money").unwrap();

		// Act
		let euro = money.options_schema().resolve(&ColumnOptions::new()).unwrap();
		let yen = money
			.options_schema()
			.resolve(&ColumnOptions::new().with("currency", "JPY"))
			.unwrap();

		// Assert
		assert_eq!(euro.i64("precision"), Some(2));
		assert_eq!(yen.i64("precision"), Some(0));
	}

	#[rstest]
	fn test_parent_schema_keeps_its_default(registry: TypeRegistry) {
		registry.get_type("money").unwrap().options_schema();

		let number = registry.get_type("number").unwrap();
		let resolved = number.options_schema().resolve(&ColumnOptions::new()).unwrap();

		assert!(!number.options_schema().is_defined("currency"));
		assert_eq!(resolved.i64("precision"), None);
	}

	#[rstest]
	fn test_invalid_currency(registry: TypeRegistry) {
		let result = render(&registry, ColumnOptions::new().with("currency", "euro"), json!(1));

		assert!(matches!(result, Err(DatagridError::OptionResolution(_))));
	}

	#[derive(Debug)]
	struct Bracketed;

	impl TypeExtension for Bracketed {
		fn extended_type(&self) -> &str {
			"number"
		}

		fn build_column(&self, builder: &mut ColumnBuilder, _options: &ResolvedOptions) -> Result<()> {
			builder.add_view_transformer(ValueFormatTransformer::template("[%s]"));
			Ok(())
		}
	}

	#[rstest]
	#[case("number", json!(5), json!("[5]"))]
	#[case("money", json!(5), json!("[€ 5.00]"))]
	#[case("money", json!(null), json!("[-]"))]
	fn test_number_extension_applies_to_money(
		#[case] type_name: &str,
		#[case] amount: Value,
		#[case] expected: Value,
	) {
		// Arrange
		let registry = TypeRegistry::new()
			.with_extension(core_extension(&DatagridSettings::default()))
			.with_extension(
				PreloadedExtension::new().with_type_extension(Bracketed),
			);
		let options = ColumnOptions::new().with("empty_value", "-");

		// Act
		let value = registry
			.get_type(type_name)
			.unwrap()
			.create_column("amount", &options, Arc::new(JsonDataMapper))
			.unwrap()
			.get_value(&json!({ "amount": amount }));

		// Assert
		assert_eq!(value.unwrap(), expected);
	}
}
