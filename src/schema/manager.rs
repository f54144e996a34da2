//! SchemaManager - spatial-aware schema operations.
//!
//! The manager wraps a [`SiltExecutor`] and dispatches each operation by
//! declared type: spatial types go through the PostGIS catalog functions,
//! everything else through `sea_query`-built generic DDL. Composition over a
//! trait object keeps the generic and spatial paths in one API without
//! touching the underlying client.

use sea_query::{PostgresQueryBuilder, Table};

use crate::executor::{SiltError, SiltExecutor};
use crate::geometry::is_spatial_type;
use crate::schema::column::{ColumnDescriptor, ColumnOptions, GeometryColumnSpec};
use crate::schema::index::{self, IndexDescriptor, IndexOptions};
use crate::schema::reader;
use crate::schema::table::{build_column_def, CreateTableOptions, TableDefinition};
use crate::schema::writer::{drop_column_sql, geometry_column_ddl};

/// Spatial-capable schema operations over any executor.
///
/// Multi-statement operations are not transactional here; wrap the executor
/// in a [`crate::transaction::Transaction`] for atomicity.
pub struct SchemaManager {
    executor: Box<dyn SiltExecutor>,
}

impl SchemaManager {
    /// Create a new SchemaManager with the given executor
    pub fn new(executor: Box<dyn SiltExecutor>) -> Self {
        Self { executor }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &dyn SiltExecutor {
        self.executor.as_ref()
    }

    /// Execute raw SQL
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if execution fails.
    pub fn execute(
        &self,
        sql: &str,
        params: &[&dyn may_postgres::types::ToSql],
    ) -> Result<(), SiltError> {
        self.executor.execute(sql, params).map(|_| ())
    }

    /// Create a table using the table-definition mini-language.
    ///
    /// The base CREATE TABLE runs first, then one registration sequence per
    /// geometry column - `AddGeometryColumn` requires the owning table to
    /// exist. With `force: true`, a pre-existing table is dropped first and
    /// a failed drop (table did not exist) is swallowed; this is the only
    /// place an error is intentionally suppressed.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if any emitted statement fails. On a partial
    /// failure the earlier statements have already taken effect.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use silt::SchemaManager;
    /// # use silt::schema::{ColumnOptions, CreateTableOptions};
    /// # let manager: SchemaManager = todo!();
    /// manager.create_table("parks", &CreateTableOptions::default(), |t| {
    ///     t.column("name", "string", &ColumnOptions::default());
    ///     t.column(
    ///         "geom",
    ///         "point",
    ///         &ColumnOptions { srid: Some(4326), null: Some(false), ..Default::default() },
    ///     );
    /// })?;
    /// # Ok::<(), silt::SiltError>(())
    /// ```
    pub fn create_table<F>(
        &self,
        name: &str,
        options: &CreateTableOptions,
        build: F,
    ) -> Result<(), SiltError>
    where
        F: FnOnce(&mut TableDefinition),
    {
        let mut definition = TableDefinition::new();
        if options.id {
            definition.primary_key(options.primary_key.as_deref().unwrap_or("id"));
        }
        build(&mut definition);

        if options.force {
            if let Err(err) = self.drop_table(name) {
                log::debug!("force drop of table {name} skipped: {err}");
            }
        }

        let mut statement = Table::create();
        statement.table(name.to_string());
        for column in definition.columns_mut() {
            statement.col(column);
        }
        let sql = statement.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[])?;

        for spec in definition.geometry_columns() {
            for sql in geometry_column_ddl(name, spec) {
                self.executor.execute(&sql, &[])?;
            }
        }

        Ok(())
    }

    /// Drop a table
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if the drop fails (including when the table does
    /// not exist).
    pub fn drop_table(&self, name: &str) -> Result<(), SiltError> {
        let statement = Table::drop().table(name.to_string()).to_owned();
        let sql = statement.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Add a column to an existing table.
    ///
    /// Spatial types are registered through `AddGeometryColumn`, with the
    /// same statement sequence `create_table` emits; other types become a
    /// generic ALTER TABLE.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if any emitted statement fails.
    pub fn add_column(
        &self,
        table: &str,
        name: &str,
        type_name: &str,
        options: &ColumnOptions,
    ) -> Result<(), SiltError> {
        if is_spatial_type(type_name) {
            let spec = GeometryColumnSpec::from_options(name, type_name, options);
            for sql in geometry_column_ddl(table, &spec) {
                self.executor.execute(&sql, &[])?;
            }
            return Ok(());
        }

        let column = build_column_def(name, type_name, options);
        let alter = Table::alter()
            .table(table.to_string())
            .add_column(column)
            .to_owned();
        let sql = alter.build(PostgresQueryBuilder);
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Remove a column, routing spatial columns through
    /// `DropGeometryColumn`.
    ///
    /// The column's declared type is looked up first to choose the removal
    /// path. Removing a nonexistent column is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if introspection or the drop statement fails.
    pub fn remove_column(&self, table: &str, column: &str) -> Result<(), SiltError> {
        for descriptor in self.columns(table)? {
            if descriptor.name == column {
                let sql = drop_column_sql(table, &descriptor);
                self.executor.execute(&sql, &[])?;
            }
        }
        Ok(())
    }

    /// Create an index over the given columns.
    ///
    /// See [`IndexOptions`] for the spatial/unique/name options and the
    /// composite-spatial decomposition policy.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if any emitted statement fails.
    pub fn create_index(
        &self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), SiltError> {
        for sql in index::index_statements(table, columns, options) {
            self.executor.execute(&sql, &[])?;
        }
        Ok(())
    }

    /// List every non-primary-key index on a table.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if the catalog query fails.
    pub fn indexes(&self, table: &str) -> Result<Vec<IndexDescriptor>, SiltError> {
        index::list_indexes(self.executor.as_ref(), table)
    }

    /// Read the column listing, with geometry columns carrying reconstructed
    /// spatial metadata.
    ///
    /// # Errors
    ///
    /// Returns `SiltError` if a catalog query fails.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, SiltError> {
        reader::read_columns(self.executor.as_ref(), table)
    }
}
