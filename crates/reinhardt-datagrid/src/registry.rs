//! Column type registry
//!
//! [`TypeRegistry`] turns type names into [`ResolvedColumnType`]s. A name is
//! looked up in the registered extensions first, then in the constructor
//! table; the parent chain is resolved the same way. Resolved types are
//! cached, so resolving a name twice returns the same `Arc`.

use crate::column_type::{ColumnType, TypeExtension};
use crate::error::{DatagridError, Result};
use crate::extension::DatagridExtension;
use crate::resolved::ResolvedColumnType;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constructor of a type that no extension provides.
pub type TypeConstructor = Arc<dyn Fn() -> Arc<dyn ColumnType> + Send + Sync>;

/// Resolves and caches column types.
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::registry::TypeRegistry;
/// use reinhardt_datagrid::settings::DatagridSettings;
/// use reinhardt_datagrid::types::core_extension;
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new()
///     .with_extension(core_extension(&DatagridSettings::default()));
///
/// let money = registry.get_type("money").unwrap();
/// assert_eq!(money.block_prefixes(), vec!["column", "number", "money"]);
/// assert!(Arc::ptr_eq(&money, &registry.get_type("money").unwrap()));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
	extensions: Vec<Arc<dyn DatagridExtension>>,
	constructors: HashMap<String, TypeConstructor>,
	types: RwLock<HashMap<String, Arc<ResolvedColumnType>>>,
}

impl fmt::Debug for TypeRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut constructors: Vec<_> = self.constructors.keys().collect();
		constructors.sort();
		f.debug_struct("TypeRegistry")
			.field("extensions", &self.extensions)
			.field("constructors", &constructors)
			.field("resolved", &self.types.read().len())
			.finish()
	}
}

impl TypeRegistry {
	/// Creates a registry without extensions
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an extension after the existing ones
	pub fn with_extension(mut self, extension: impl DatagridExtension + 'static) -> Self {
		self.extensions.push(Arc::new(extension));
		self
	}

	/// Registers a shared extension after the existing ones
	pub fn with_shared_extension(mut self, extension: Arc<dyn DatagridExtension>) -> Self {
		self.extensions.push(extension);
		self
	}

	/// Registers a constructor used when no extension provides `name`
	pub fn with_type_constructor<F>(mut self, name: impl Into<String>, constructor: F) -> Self
	where
		F: Fn() -> Arc<dyn ColumnType> + Send + Sync + 'static,
	{
		self.constructors.insert(name.into(), Arc::new(constructor));
		self
	}

	/// Registered extensions, in registration order
	pub fn extensions(&self) -> &[Arc<dyn DatagridExtension>] {
		&self.extensions
	}

	/// Whether `name` can be resolved without building it
	pub fn has_type(&self, name: &str) -> bool {
		self.types.read().contains_key(name)
			|| self.extensions.iter().any(|e| e.has_type(name))
			|| self.constructors.contains_key(name)
	}

	/// Resolves a type by name.
	///
	/// # Errors
	///
	/// [`DatagridError::UnknownType`] when neither an extension nor the
	/// constructor table knows the name or one of its ancestors,
	/// [`DatagridError::CircularTypeHierarchy`] when the parent chain loops.
	pub fn get_type(&self, name: &str) -> Result<Arc<ResolvedColumnType>> {
		let mut stack = Vec::new();
		self.resolve(name, &mut stack)
	}

	fn resolve(&self, name: &str, stack: &mut Vec<String>) -> Result<Arc<ResolvedColumnType>> {
		{
			let types = self.types.read();
			if let Some(resolved) = types.get(name) {
				return Ok(Arc::clone(resolved));
			}
		}

		if stack.iter().any(|seen| seen == name) {
			let mut chain = stack.clone();
			chain.push(name.to_string());
			return Err(DatagridError::CircularTypeHierarchy { chain });
		}

		let column_type = self.lookup(name)?;
		if column_type.name() != name {
			return Err(DatagridError::InvalidArgument(format!(
				"type registered as \"{}\" reports the name \"{}\"",
				name,
				column_type.name()
			)));
		}

		stack.push(name.to_string());
		let parent = match column_type.parent() {
			Some(parent) => Some(self.resolve(parent, stack)?),
			None => None,
		};
		stack.pop();

		let extensions: Vec<Arc<dyn TypeExtension>> = self
			.extensions
			.iter()
			.filter(|e| e.has_type_extensions(name))
			.flat_map(|e| e.get_type_extensions(name))
			.collect();

		let resolved = Arc::new(ResolvedColumnType::new(column_type, extensions, parent));

		// A concurrent resolution may have published first; keep its instance
		let mut types = self.types.write();
		let resolved = Arc::clone(types.entry(name.to_string()).or_insert(resolved));
		tracing::debug!(
			column_type = name,
			parent = resolved.parent().map(|p| p.name()),
			extensions = resolved.type_extensions().len(),
			"resolved column type"
		);
		Ok(resolved)
	}

	fn lookup(&self, name: &str) -> Result<Arc<dyn ColumnType>> {
		for extension in &self.extensions {
			if extension.has_type(name)
				&& let Some(column_type) = extension.get_type(name)
			{
				return Ok(column_type);
			}
		}

		self.constructors
			.get(name)
			.map(|constructor| constructor())
			.ok_or_else(|| DatagridError::UnknownType {
				name: name.to_string(),
			})
	}
}
