//! Extension providers
//!
//! A [`DatagridExtension`] contributes column types, type extensions and view
//! listeners to a [`TypeRegistry`](crate::registry::TypeRegistry). The
//! registry queries its extensions in registration order; the first one
//! claiming a type name wins.

use crate::column_type::{ColumnType, TypeExtension};
use crate::datagrid::ViewListener;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Provider of column types, type extensions and view listeners.
pub trait DatagridExtension: Send + Sync + Debug {
	/// Whether the extension provides the type
	fn has_type(&self, name: &str) -> bool;

	/// Returns the type, `None` when not provided
	fn get_type(&self, name: &str) -> Option<Arc<dyn ColumnType>>;

	/// Whether the extension extends the type
	fn has_type_extensions(&self, name: &str) -> bool;

	/// Extensions of the type, in registration order
	fn get_type_extensions(&self, name: &str) -> Vec<Arc<dyn TypeExtension>>;

	/// Listeners attached to every datagrid
	///
	/// Default: none
	fn view_listeners(&self) -> Vec<Arc<dyn ViewListener>> {
		Vec::new()
	}
}

/// [`DatagridExtension`] backed by in-memory maps.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::column_type::ColumnType;
/// use reinhardt_datagrid::extension::{DatagridExtension, PreloadedExtension};
///
/// #[derive(Debug)]
/// struct Plain;
///
/// impl ColumnType for Plain {
///     fn name(&self) -> &str {
///         "plain"
///     }
/// }
///
/// let extension = PreloadedExtension::new().with_type(Plain);
/// assert!(extension.has_type("plain"));
/// assert!(!extension.has_type_extensions("plain"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreloadedExtension {
	types: IndexMap<String, Arc<dyn ColumnType>>,
	type_extensions: IndexMap<String, Vec<Arc<dyn TypeExtension>>>,
	listeners: Vec<Arc<dyn ViewListener>>,
}

impl PreloadedExtension {
	/// Creates an empty extension
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a type, replacing a previous type of the same name
	pub fn with_type(mut self, column_type: impl ColumnType + 'static) -> Self {
		self.add_type(Arc::new(column_type));
		self
	}

	/// Adds a shared type
	pub fn add_type(&mut self, column_type: Arc<dyn ColumnType>) {
		self.types
			.insert(column_type.name().to_string(), column_type);
	}

	/// Adds a type extension
	pub fn with_type_extension(mut self, extension: impl TypeExtension + 'static) -> Self {
		self.add_type_extension(Arc::new(extension));
		self
	}

	/// Adds a shared type extension
	pub fn add_type_extension(&mut self, extension: Arc<dyn TypeExtension>) {
		self.type_extensions
			.entry(extension.extended_type().to_string())
			.or_default()
			.push(extension);
	}

	/// Adds a view listener
	pub fn with_listener(mut self, listener: impl ViewListener + 'static) -> Self {
		self.listeners.push(Arc::new(listener));
		self
	}
}

impl DatagridExtension for PreloadedExtension {
	fn has_type(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	fn get_type(&self, name: &str) -> Option<Arc<dyn ColumnType>> {
		self.types.get(name).cloned()
	}

	fn has_type_extensions(&self, name: &str) -> bool {
		self.type_extensions
			.get(name)
			.is_some_and(|extensions| !extensions.is_empty())
	}

	fn get_type_extensions(&self, name: &str) -> Vec<Arc<dyn TypeExtension>> {
		self.type_extensions.get(name).cloned().unwrap_or_default()
	}

	fn view_listeners(&self) -> Vec<Arc<dyn ViewListener>> {
		self.listeners.clone()
	}
}
