//! Index creation and introspection.
//!
//! Spatial indexes always use GIST with the geometry operator class. A
//! composite spatial index request is decomposed into one single-column GIST
//! index per column - PostGIS's operator class does not span columns, so
//! this is a policy decision, not an error.

use sea_query::{Expr, Index, PostgresQueryBuilder};

use crate::executor::{SiltError, SiltExecutor};

/// Options for [`crate::SchemaManager::create_index`].
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Index name; defaults to `<table>_<first_column>_index`.
    pub name: Option<String>,
    pub spatial: bool,
    pub unique: bool,
}

/// An index reconstructed from the catalog.
///
/// `spatial` is inferred from the access method name being `gist`. This is
/// an approximation: a non-spatial GIST index (say, over a range type) is
/// misclassified as spatial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub unique: bool,
    pub spatial: bool,
    /// Column names in index order.
    pub columns: Vec<String>,
}

/// Emit the CREATE INDEX statement(s) for the given columns.
///
/// The multi-column spatial branch ignores a caller-supplied name and
/// auto-names each per-column index; the discard is logged but kept for
/// compatibility with the registration-function era behavior.
pub fn index_statements(table: &str, columns: &[&str], options: &IndexOptions) -> Vec<String> {
    let default_name = |column: &str| format!("{}_{}_index", table, column);
    let index_name = options
        .name
        .clone()
        .unwrap_or_else(|| default_name(columns.first().copied().unwrap_or_default()));

    if options.spatial {
        if columns.len() > 1 {
            if options.name.is_some() {
                log::warn!(
                    "ignoring index name {index_name:?}: a composite spatial index over {} columns \
                     is created as independent single-column GIST indexes",
                    columns.len()
                );
            }
            return columns
                .iter()
                .map(|column| spatial_index_sql(table, column, &default_name(column)))
                .collect();
        }
        let column = columns.first().copied().unwrap_or_default();
        return vec![spatial_index_sql(table, column, &index_name)];
    }

    let mut statement = Index::create();
    statement.name(index_name).table(table.to_string());
    for column in columns {
        statement.col(Expr::col(column.to_string()));
    }
    if options.unique {
        statement.unique();
    }
    vec![statement.to_owned().build(PostgresQueryBuilder)]
}

fn spatial_index_sql(table: &str, column: &str, name: &str) -> String {
    format!("CREATE INDEX {name} ON {table} USING GIST ({column} GIST_GEOMETRY_OPS)")
}

/// One raw catalog row: (index name, uniqueness, column, access method).
#[derive(Debug)]
pub(crate) struct IndexRow {
    pub name: String,
    pub unique: bool,
    pub column: String,
    pub access_method: String,
}

/// Group raw per-column rows (pre-sorted by index name) into descriptors,
/// appending columns to the last-seen descriptor while the name repeats.
pub(crate) fn group_index_rows(rows: Vec<IndexRow>) -> Vec<IndexDescriptor> {
    let mut descriptors: Vec<IndexDescriptor> = Vec::new();

    for row in rows {
        match descriptors.last_mut() {
            Some(last) if last.name == row.name => last.columns.push(row.column),
            _ => descriptors.push(IndexDescriptor {
                name: row.name,
                unique: row.unique,
                spatial: row.access_method == "gist",
                columns: vec![row.column],
            }),
        }
    }

    descriptors
}

fn index_query(table: &str) -> String {
    format!(
        "SELECT i.relname, d.indisunique, a.attname, am.amname \
         FROM pg_class t \
         JOIN pg_index d ON d.indrelid = t.oid \
         JOIN pg_class i ON i.oid = d.indexrelid \
         JOIN pg_am am ON am.oid = i.relam \
         JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY (d.indkey) \
         WHERE i.relkind = 'i' AND d.indisprimary = false AND t.relname = '{table}' \
         ORDER BY i.relname"
    )
}

/// List every non-primary-key index on a table.
///
/// # Errors
///
/// Returns `SiltError` if the catalog query fails.
pub fn list_indexes(
    executor: &dyn SiltExecutor,
    table: &str,
) -> Result<Vec<IndexDescriptor>, SiltError> {
    let mut rows = Vec::new();
    for row in executor.query_all(&index_query(table), &[])? {
        rows.push(IndexRow {
            name: row.try_get(0)?,
            unique: row.try_get(1)?,
            column: row.try_get(2)?,
            access_method: row.try_get(3)?,
        });
    }
    Ok(group_index_rows(rows))
}
