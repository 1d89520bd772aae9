//! Datagrid column types and view composition for Reinhardt
//!
//! This crate resolves named column types into hierarchies, builds immutable
//! columns from validated options and composes render-ready views (headers,
//! rows and cells) from a bound data collection.
//!
//! # Features
//!
//! - **Column Types**: Types declare a parent, an option schema and build
//!   hooks; extensions can hook into any type by name
//! - **Option Resolution**: Defaults, lazy defaults, required options, type
//!   and value constraints, inherited from every ancestor
//! - **View Transformers**: Trim, empty value, number, money, date-time,
//!   boolean and format transformers, chained per column
//! - **Compound Columns**: Columns grouping sub-columns into nested cells
//! - **Column Ordering**: `position` option applied to the built headers
//! - **Configurators**: Reusable datagrid definitions registered by name
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[DatagridFactory] --> B[TypeRegistry]
//!     B --> C[DatagridExtension]
//!     C --> D[ColumnType]
//!     C --> E[TypeExtension]
//!     C --> F[ViewListener]
//!     B --> G[ResolvedColumnType]
//!     G --> H[OptionSchema]
//!     G --> I[Column]
//!     A --> J[DatagridBuilder]
//!     J --> K[Datagrid]
//!     K --> I
//!     K --> L[DataCollection]
//!     K --> M[DatagridView]
//!     M --> N[HeaderView]
//!     M --> O[RowView]
//!     O --> P[CellView]
//! ```
//!
//! # Example
//!
//! ```rust
//! use reinhardt_datagrid::{ColumnOptions, DatagridFactory, DatagridSettings, RowKey};
//! use serde_json::json;
//!
//! let factory = DatagridFactory::from_settings(&DatagridSettings::default());
//!
//! let mut builder = factory.create_datagrid_builder("users");
//! builder
//!     .add("name", "text", ColumnOptions::new().with("trim", true))
//!     .unwrap()
//!     .add("balance", "money", ColumnOptions::new().with("currency", "USD"))
//!     .unwrap();
//! let mut datagrid = builder.get_datagrid().unwrap();
//!
//! datagrid
//!     .set_data(json!({"7": {"name": " Ada ", "balance": 12.5}}))
//!     .unwrap();
//! let view = datagrid.create_view().unwrap();
//!
//! let row = &view.rows[&RowKey::Int(7)];
//! assert_eq!(view.columns["name"].label, "Name");
//! assert_eq!(row.cells["name"].value.as_value(), Some(&json!("Ada")));
//! assert_eq!(row.cells["balance"].value.as_value(), Some(&json!("$ 12.50")));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod column_type;
pub mod data_mapper;
pub mod datagrid;
pub mod error;
pub mod extension;
pub mod factory;
pub mod options;
pub mod order;
pub mod registry;
pub mod resolved;
pub mod schema;
pub mod settings;
pub mod transformer;
pub mod types;
pub mod view;

// Re-exports for convenience
pub use column::{Column, ColumnBuilder};
pub use column_type::{ColumnType, TypeExtension};
pub use data_mapper::{DataMapper, DataProvider, JsonDataMapper};
pub use datagrid::{DataCollection, Datagrid, ViewListener};
pub use error::{DatagridError, OptionError, Result};
pub use extension::{DatagridExtension, PreloadedExtension};
pub use factory::{CompoundColumnBuilder, DatagridBuilder, DatagridConfigurator, DatagridFactory};
pub use options::{ColumnOptions, OptionKind, OptionValue, ResolvedOptions};
pub use registry::TypeRegistry;
pub use resolved::ResolvedColumnType;
pub use schema::OptionSchema;
pub use settings::DatagridSettings;
pub use transformer::DataTransformer;
pub use view::{CellValue, CellView, DatagridView, HeaderView, RowKey, RowView};
