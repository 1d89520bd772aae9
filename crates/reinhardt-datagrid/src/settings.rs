//! Datagrid settings
//!
//! Settings provide the defaults used by the built-in column types. They can
//! be built in code, or loaded from a TOML or JSON file:
//!
//! ```toml
//! empty_value = "-"
//! datetime_format = "%d/%m/%Y"
//! default_currency = "USD"
//!
//! [number]
//! decimal_point = ","
//! thousands_separator = "."
//! ```

use crate::error::{DatagridError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults for the built-in column types.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatagridSettings {
	/// Replacement for empty values in text, number and datetime columns.
	pub empty_value: Option<String>,

	/// strftime pattern used by datetime columns.
	pub datetime_format: String,

	/// Number formatting.
	pub number: NumberSettings,

	/// Currency used by money columns when none is given.
	pub default_currency: String,
}

impl Default for DatagridSettings {
	fn default() -> Self {
		Self {
			empty_value: None,
			datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
			number: NumberSettings::default(),
			default_currency: "EUR".to_string(),
		}
	}
}

/// Number formatting settings
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSettings {
	/// Decimal separator
	pub decimal_point: String,
	/// Thousands separator, used when grouping is enabled
	pub thousands_separator: String,
}

impl Default for NumberSettings {
	fn default() -> Self {
		Self {
			decimal_point: ".".to_string(),
			thousands_separator: ",".to_string(),
		}
	}
}

impl DatagridSettings {
	/// Parse settings from a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_datagrid::settings::DatagridSettings;
	///
	/// let settings = DatagridSettings::from_toml_str("empty_value = \"-\"").unwrap();
	/// assert_eq!(settings.empty_value.as_deref(), Some("-"));
	/// assert_eq!(settings.default_currency, "EUR");
	/// ```
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		toml::from_str(contents)
			.map_err(|e| DatagridError::Settings(format!("TOML parse error: {}", e)))
	}

	/// Parse settings from a JSON document.
	pub fn from_json_str(contents: &str) -> Result<Self> {
		serde_json::from_str(contents)
			.map_err(|e| DatagridError::Settings(format!("JSON parse error: {}", e)))
	}

	/// Load settings from a `.toml` or `.json` file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path).map_err(|e| {
			DatagridError::Settings(format!("Failed to read {}: {}", path.display(), e))
		})?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => Self::from_json_str(&contents),
			_ => Err(DatagridError::Settings(
				"Supported formats: .toml, .json".to_string(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_defaults() {
		let settings = DatagridSettings::default();

		assert_eq!(settings.empty_value, None);
		assert_eq!(settings.datetime_format, "%Y-%m-%d %H:%M:%S");
		assert_eq!(settings.number.decimal_point, ".");
		assert_eq!(settings.number.thousands_separator, ",");
		assert_eq!(settings.default_currency, "EUR");
	}

	#[rstest]
	fn test_partial_toml_keeps_other_defaults() {
		// Arrange
		let contents = r#"
			default_currency = "JPY"

			[number]
			decimal_point = ","
		"#;

		// Act
		let settings = DatagridSettings::from_toml_str(contents).unwrap();

		// Assert
		assert_eq!(settings.default_currency, "JPY");
		assert_eq!(settings.number.decimal_point, ",");
		assert_eq!(settings.number.thousands_separator, ",");
		assert_eq!(settings.datetime_format, "%Y-%m-%d %H:%M:%S");
	}

	#[rstest]
	fn test_from_json_file() {
		// Arrange
		let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		write!(file, r#"{{"empty_value": "n/a"}}"#).unwrap();

		// Act
		let settings = DatagridSettings::from_file(file.path()).unwrap();

		// Assert
		assert_eq!(settings.empty_value.as_deref(), Some("n/a"));
	}

	#[rstest]
	fn test_unsupported_extension_is_rejected() {
		let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();

		let result = DatagridSettings::from_file(file.path());

		assert!(matches!(result, Err(DatagridError::Settings(_))));
	}

	#[rstest]
	fn test_invalid_toml_is_reported() {
		let result = DatagridSettings::from_toml_str("empty_value = [");

		assert!(matches!(result, Err(DatagridError::Settings(msg)) if msg.starts_with("TOML parse error")));
	}
}
