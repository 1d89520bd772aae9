//! Column type contracts

use crate::column::{Column, ColumnBuilder};
use crate::error::Result;
use crate::options::ResolvedOptions;
use crate::schema::OptionSchema;
use crate::view::{CellView, HeaderView};
use std::fmt::Debug;

/// Named, inheritable behaviour of a column.
///
/// A type names its parent instead of embedding it; the registry resolves the
/// chain once into a [`ResolvedColumnType`](crate::resolved::ResolvedColumnType).
/// Every hook runs for the root ancestor first, then down the chain, then for
/// the type extensions of each level.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::column::ColumnBuilder;
/// use reinhardt_datagrid::column_type::ColumnType;
/// use reinhardt_datagrid::error::Result;
/// use reinhardt_datagrid::options::ResolvedOptions;
/// use reinhardt_datagrid::schema::OptionSchema;
/// use reinhardt_datagrid::transformer::ValueFormatTransformer;
///
/// #[derive(Debug)]
/// struct EmailType;
///
/// impl ColumnType for EmailType {
///     fn name(&self) -> &str {
///         "email"
///     }
///
///     fn parent(&self) -> Option<&str> {
///         Some("text")
///     }
///
///     fn configure_options(&self, schema: &mut OptionSchema) {
///         schema.set_default("mailto", true);
///     }
///
///     fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
///         if options.bool("mailto") {
///             builder.add_view_transformer(ValueFormatTransformer::template("mailto:%s"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ColumnType: Send + Sync + Debug {
	/// Unique name of the type
	fn name(&self) -> &str;

	/// Name of the parent type
	///
	/// Default: `None` (root type)
	fn parent(&self) -> Option<&str> {
		None
	}

	/// Prefix handed to the renderer to pick a template
	///
	/// Default: the type name
	fn block_prefix(&self) -> &str {
		self.name()
	}

	/// Declares or overrides options on the schema inherited from the parent
	fn configure_options(&self, _schema: &mut OptionSchema) {}

	/// Configures a column under construction
	fn build_column(&self, _builder: &mut ColumnBuilder, _options: &ResolvedOptions) -> Result<()> {
		Ok(())
	}

	/// Decorates the header view of a column
	fn build_header_view(
		&self,
		_view: &mut HeaderView,
		_column: &Column,
		_options: &ResolvedOptions,
	) -> Result<()> {
		Ok(())
	}

	/// Decorates a cell view of a column
	fn build_cell_view(
		&self,
		_view: &mut CellView,
		_column: &Column,
		_options: &ResolvedOptions,
	) -> Result<()> {
		Ok(())
	}
}

/// Cross-cutting behaviour attached to exactly one named type.
///
/// Extensions contribute options and build steps without subclassing; they
/// run after the type they extend, in registration order. Since every type
/// inherits the build steps of its ancestors, an extension of `column`
/// applies to every column.
pub trait TypeExtension: Send + Sync + Debug {
	/// Name of the extended type
	fn extended_type(&self) -> &str;

	/// Declares or overrides options of the extended type
	fn configure_options(&self, _schema: &mut OptionSchema) {}

	/// Configures a column under construction
	fn build_column(&self, _builder: &mut ColumnBuilder, _options: &ResolvedOptions) -> Result<()> {
		Ok(())
	}

	/// Decorates the header view of a column
	fn build_header_view(
		&self,
		_view: &mut HeaderView,
		_column: &Column,
		_options: &ResolvedOptions,
	) -> Result<()> {
		Ok(())
	}

	/// Decorates a cell view of a column
	fn build_cell_view(
		&self,
		_view: &mut CellView,
		_column: &Column,
		_options: &ResolvedOptions,
	) -> Result<()> {
		Ok(())
	}
}
