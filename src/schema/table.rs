//! Table-definition mini-language.
//!
//! Inside a [`crate::SchemaManager::create_table`] block, declaring a column
//! whose type is in the spatial type set routes it to the PostGIS
//! registration path; every other type goes through `sea_query`'s generic
//! column definitions. This dispatch is the integration seam between the
//! spatial layer and ordinary schema definition.

use sea_query::ColumnDef;

use crate::geometry::is_spatial_type;
use crate::schema::column::{ColumnOptions, GeometryColumnSpec};

/// Options for [`crate::SchemaManager::create_table`].
#[derive(Debug, Clone)]
pub struct CreateTableOptions {
    /// Best-effort drop any pre-existing table first. The drop failure is
    /// swallowed (the table usually just did not exist).
    pub force: bool,
    /// Add an auto-increment integer primary key (default true).
    pub id: bool,
    /// Name of the primary key column; defaults to `id`.
    pub primary_key: Option<String>,
}

impl Default for CreateTableOptions {
    fn default() -> Self {
        Self {
            force: false,
            id: true,
            primary_key: None,
        }
    }
}

/// Collects column declarations during a `create_table` block.
pub struct TableDefinition {
    columns: Vec<ColumnDef>,
    geometry_columns: Vec<GeometryColumnSpec>,
}

impl TableDefinition {
    pub(crate) fn new() -> Self {
        Self {
            columns: Vec::new(),
            geometry_columns: Vec::new(),
        }
    }

    pub(crate) fn primary_key(&mut self, name: &str) {
        let mut def = ColumnDef::new(name.to_string());
        def.integer().not_null().auto_increment().primary_key();
        self.columns.push(def);
    }

    /// Declare a column.
    ///
    /// Spatial type names (`point`, `multi_polygon`, ...) are collected for
    /// registration through `AddGeometryColumn` after the base table exists;
    /// everything else becomes part of the CREATE TABLE statement itself.
    pub fn column(&mut self, name: &str, type_name: &str, options: &ColumnOptions) -> &mut Self {
        if is_spatial_type(type_name) {
            self.geometry_columns
                .push(GeometryColumnSpec::from_options(name, type_name, options));
        } else {
            self.columns
                .push(build_column_def(name, type_name, options));
        }
        self
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [ColumnDef] {
        &mut self.columns
    }

    pub(crate) fn geometry_columns(&self) -> &[GeometryColumnSpec] {
        &self.geometry_columns
    }

    #[cfg(test)]
    pub(crate) fn generic_column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Build a `sea_query` column definition for a non-spatial declared type.
///
/// Unknown type names are passed through as custom types so dialect-specific
/// types keep working.
pub(crate) fn build_column_def(name: &str, type_name: &str, options: &ColumnOptions) -> ColumnDef {
    let mut def = ColumnDef::new(name.to_string());
    match type_name {
        "string" | "varchar" => def.string(),
        "text" => def.text(),
        "integer" => def.integer(),
        "bigint" => def.big_integer(),
        "smallint" => def.small_integer(),
        "float" => def.float(),
        "double" => def.double(),
        "decimal" => def.decimal(),
        "boolean" => def.boolean(),
        "date" => def.date(),
        "time" => def.time(),
        "timestamp" | "datetime" => def.timestamp(),
        "binary" => def.binary(),
        other => def.custom(sea_query::Alias::new(other)),
    };
    if options.null == Some(false) {
        def.not_null();
    }
    def
}
