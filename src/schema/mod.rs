//! Spatial-aware schema definition and introspection.
//!
//! - [`manager::SchemaManager`] is the entry point for schema operations.
//! - [`writer`] emits the PostGIS registration DDL for geometry columns.
//! - [`reader`] reconstructs spatial metadata from check constraints.
//! - [`index`] covers GIST/B-tree index creation and listing.
//! - [`table`] is the table-definition mini-language.

pub mod column;
pub mod index;
pub mod manager;
pub mod reader;
pub mod table;
pub mod writer;

pub use column::{ColumnDescriptor, ColumnOptions, GeometryColumnSpec, SpatialColumnInfo};
pub use index::{IndexDescriptor, IndexOptions};
pub use manager::SchemaManager;
pub use table::{CreateTableOptions, TableDefinition};
pub use writer::geometry_column_ddl;
