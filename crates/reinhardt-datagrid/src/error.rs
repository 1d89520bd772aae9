//! Datagrid error types.
//!
//! Every failure raised while resolving types, building columns or composing
//! views is reported through [`DatagridError`]. Option schema failures carry
//! their own [`OptionError`] so callers can inspect the offending option.

use thiserror::Error;

/// Result type for datagrid operations.
pub type Result<T> = std::result::Result<T, DatagridError>;

/// Datagrid errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatagridError {
	/// Malformed call (empty column name, wrong collection shape, ...).
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// No extension or constructor provides the requested type.
	#[error("could not load column type \"{name}\"")]
	UnknownType {
		/// Requested type name.
		name: String,
	},

	/// Column lookup miss on a datagrid.
	#[error("column \"{name}\" does not exist in datagrid \"{datagrid}\"")]
	UnknownColumn {
		/// Datagrid that was searched.
		datagrid: String,
		/// Requested column name.
		name: String,
	},

	/// Datagrid configurator lookup miss.
	#[error("datagrid configurator \"{name}\" is not registered")]
	UnknownConfigurator {
		/// Requested configurator name.
		name: String,
	},

	/// A type names itself or one of its descendants as parent.
	#[error("circular column type hierarchy: {}", chain.join(" -> "))]
	CircularTypeHierarchy {
		/// Type names from the first requested type to the repeated one.
		chain: Vec<String>,
	},

	/// The call violates the lifecycle of the component.
	#[error("bad state: {0}")]
	BadState(String),

	/// Option schema validation failure.
	#[error(transparent)]
	OptionResolution(#[from] OptionError),

	/// A transformer could not process its input.
	#[error("transformation failed: {0}")]
	TransformationFailed(String),

	/// A data provider could not extract a value from a record.
	#[error("unable to get value for column \"{column}\" from \"{field}\": {reason}")]
	DataProvider {
		/// Column whose provider failed.
		column: String,
		/// Field or property path that was read.
		field: String,
		/// Underlying cause.
		reason: String,
	},

	/// Settings could not be loaded.
	#[error("settings error: {0}")]
	Settings(String),
}

impl DatagridError {
	/// Shorthand for [`DatagridError::TransformationFailed`].
	pub fn transformation(message: impl Into<String>) -> Self {
		Self::TransformationFailed(message.into())
	}
}

impl From<std::convert::Infallible> for DatagridError {
	fn from(never: std::convert::Infallible) -> Self {
		match never {}
	}
}

/// Option schema errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OptionError {
	/// Supplied option that no type or extension in the chain declared.
	#[error("option \"{option}\" does not exist, defined options are: \"{}\"", known.join("\", \""))]
	UnknownOption {
		/// Supplied option name.
		option: String,
		/// Declared option names, sorted.
		known: Vec<String>,
	},

	/// Required option that was neither supplied nor defaulted.
	#[error("required option \"{option}\" is missing")]
	MissingRequiredOption {
		/// Option name.
		option: String,
	},

	/// Value of a kind the schema does not allow.
	#[error("option \"{option}\" is expected to be of type \"{expected}\", but is of type \"{actual}\"")]
	InvalidOptionType {
		/// Option name.
		option: String,
		/// Allowed kinds, joined with `|`.
		expected: String,
		/// Kind of the rejected value.
		actual: String,
	},

	/// Value rejected by the allowed-values list or predicate.
	#[error("option \"{option}\" has the value {value}, which is not allowed")]
	InvalidOptionValue {
		/// Option name.
		option: String,
		/// Rendered rejected value.
		value: String,
	},

	/// Lazy default read an option that has no value yet.
	#[error("option \"{option}\" is not resolved yet, lazy defaults may only read options declared before them")]
	NotResolved {
		/// Option that was read.
		option: String,
	},
}

impl OptionError {
	/// Name of the offending option.
	pub fn option(&self) -> &str {
		match self {
			Self::UnknownOption { option, .. }
			| Self::MissingRequiredOption { option }
			| Self::InvalidOptionType { option, .. }
			| Self::InvalidOptionValue { option, .. }
			| Self::NotResolved { option } => option,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_option_error_exposes_option_name() {
		// Arrange
		let error = OptionError::InvalidOptionType {
			option: "trim".to_string(),
			expected: "bool".to_string(),
			actual: "string".to_string(),
		};

		// Act
		let wrapped = DatagridError::from(error.clone());

		// Assert
		assert_eq!(error.option(), "trim");
		assert_eq!(
			wrapped.to_string(),
			"option \"trim\" is expected to be of type \"bool\", but is of type \"string\""
		);
	}

	#[rstest]
	fn test_circular_hierarchy_message_lists_chain() {
		let error = DatagridError::CircularTypeHierarchy {
			chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
		};

		assert_eq!(error.to_string(), "circular column type hierarchy: a -> b -> a");
	}
}
