//! Action column type

use super::{BASE_TYPE, humanize};
use crate::column::{Column, ColumnBuilder};
use crate::column_type::ColumnType;
use crate::error::{DatagridError, Result};
use crate::options::{OptionKind, OptionValue, ResolvedOptions};
use crate::schema::OptionSchema;
use crate::transformer::stringify;
use crate::view::CellView;
use serde_json::{Value, json};
use std::sync::Arc;

/// Link acting on a record, such as an edit or delete button.
///
/// The cell value is the whole record. The cell vars hold the `url`, built
/// from `uri_scheme` by replacing each `{path}` placeholder with the value
/// read from the record, and the link `content` (default: the label).
///
/// # Examples
///
/// ```
/// use reinhardt_datagrid::data_mapper::JsonDataMapper;
/// use reinhardt_datagrid::options::ColumnOptions;
/// use reinhardt_datagrid::registry::TypeRegistry;
/// use reinhardt_datagrid::settings::DatagridSettings;
/// use reinhardt_datagrid::types::core_extension;
/// use reinhardt_datagrid::view::{DatagridView, RowKey};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = TypeRegistry::new().with_extension(core_extension(&DatagridSettings::default()));
/// let edit = registry
///     .get_type("action")
///     .unwrap()
///     .create_column(
///         "edit",
///         &ColumnOptions::new().with("uri_scheme", "/users/{id}/edit").with("label", "Edit"),
///         Arc::new(JsonDataMapper),
///     )
///     .unwrap();
///
/// let cell = edit
///     .create_cell_view(&DatagridView::new("users"), &Arc::new(json!({"id": 7})), &RowKey::Int(0))
///     .unwrap();
/// assert_eq!(cell.vars["url"], json!("/users/7/edit"));
/// assert_eq!(cell.vars["content"], json!("Edit"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionType;

/// Replaces `{path}` placeholders of `scheme` with values read from `record`.
fn expand_uri(scheme: &str, column: &Column, record: &Value) -> Result<String> {
	let mut url = String::with_capacity(scheme.len());
	let mut rest = scheme;
	while let Some(start) = rest.find('{') {
		let Some(end) = rest[start..].find('}') else {
			break;
		};
		url.push_str(&rest[..start]);
		let path = &rest[start + 1..start + end];
		let value = column.data_mapper().get_data(path, record).map_err(|e| {
			DatagridError::DataProvider {
				column: column.name().to_string(),
				field: path.to_string(),
				reason: e.to_string(),
			}
		})?;
		url.push_str(&stringify(&value)?);
		rest = &rest[start + end + 1..];
	}
	url.push_str(rest);
	Ok(url)
}

impl ColumnType for ActionType {
	fn name(&self) -> &str {
		"action"
	}

	fn parent(&self) -> Option<&str> {
		Some(BASE_TYPE)
	}

	fn configure_options(&self, schema: &mut OptionSchema) {
		schema
			.set_required("uri_scheme")
			.set_allowed_types("uri_scheme", &[OptionKind::String])
			.set_lazy_default("content", |options| {
				Ok(options
					.get("label")
					.cloned()
					.unwrap_or(OptionValue::Json(Value::Null)))
			})
			.set_allowed_types("content", &[OptionKind::String, OptionKind::Null]);
	}

	fn build_column(&self, builder: &mut ColumnBuilder, options: &ResolvedOptions) -> Result<()> {
		if options.data_provider("data_provider").is_none() {
			builder.set_data_provider(Arc::new(|record: &Value| Ok(record.clone())));
		}
		Ok(())
	}

	fn build_cell_view(
		&self,
		view: &mut CellView,
		column: &Column,
		options: &ResolvedOptions,
	) -> Result<()> {
		let scheme = options.str("uri_scheme").unwrap_or_default();
		let url = expand_uri(scheme, column, &view.source)?;
		let content = options
			.str("content")
			.map(str::to_string)
			.unwrap_or_else(|| humanize(column.name()));

		view.vars.insert("url".to_string(), json!(url));
		view.vars.insert("content".to_string(), json!(content));
		Ok(())
	}
}
