//! DDL emission for geometry columns.
//!
//! PostGIS geometry columns are not created inline in CREATE TABLE; they are
//! registered afterwards through the `AddGeometryColumn` catalog function,
//! which also attaches the check constraints the reader later parses.
//! Removal must go through `DropGeometryColumn` for the same reason: a plain
//! DROP COLUMN would leave the spatial catalog stale.

use sea_query::{PostgresQueryBuilder, Table};

use crate::geometry::resolve_type_token;
use crate::schema::column::{ColumnDescriptor, GeometryColumnSpec};

/// Emit the ordered DDL statements registering a geometry column.
///
/// The first statement registers the column with the spatial catalog. When
/// the column is declared non-nullable a second ALTER TABLE follows, because
/// `AddGeometryColumn` cannot declare nullability inline.
///
/// The emitted sequence is identical whether the table was just created or
/// has existed for years, so the same function backs both `create_table`
/// and `add_column`.
pub fn geometry_column_ddl(table: &str, spec: &GeometryColumnSpec) -> Vec<String> {
    let mut token = resolve_type_token(&spec.type_name);
    // PostGIS convention: pure-M types get an M suffix; types with both Z
    // and M use the base name with dimension 4.
    if spec.with_m && !spec.with_z {
        token.push('M');
    }

    let mut statements = vec![format!(
        "SELECT AddGeometryColumn('{}','{}',{},'{}',{})",
        table,
        spec.name,
        spec.srid,
        token,
        spec.dimension()
    )];

    if !spec.nullable {
        statements.push(format!(
            "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
            table, spec.name
        ));
    }

    statements
}

/// The statement removing a geometry column through the spatial catalog.
pub fn drop_geometry_column_sql(table: &str, column: &str) -> String {
    format!("SELECT DropGeometryColumn('{}','{}')", table, column)
}

/// Choose the removal statement for a column based on its declared type.
///
/// Spatial columns go through `DropGeometryColumn` so PostGIS bookkeeping
/// stays consistent; everything else is a generic DROP COLUMN.
pub(crate) fn drop_column_sql(table: &str, descriptor: &ColumnDescriptor) -> String {
    if crate::geometry::is_geometry_declared_type(&descriptor.sql_type) {
        drop_geometry_column_sql(table, &descriptor.name)
    } else {
        Table::alter()
            .table(table.to_string())
            .drop_column(descriptor.name.to_string())
            .to_owned()
            .build(PostgresQueryBuilder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::ColumnOptions;

    fn spec(type_name: &str, options: &ColumnOptions) -> GeometryColumnSpec {
        GeometryColumnSpec::from_options("geom", type_name, options)
    }

    #[test]
    fn test_nullable_column_emits_one_statement() {
        let statements = geometry_column_ddl("parks", &spec("point", &ColumnOptions::default()));
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            "SELECT AddGeometryColumn('parks','geom',-1,'POINT',2)"
        );
    }

    #[test]
    fn test_not_null_column_emits_follow_up_alter() {
        let options = ColumnOptions {
            null: Some(false),
            srid: Some(4326),
            ..Default::default()
        };
        let statements = geometry_column_ddl("parks", &spec("polygon", &options));
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[0],
            "SELECT AddGeometryColumn('parks','geom',4326,'POLYGON',2)"
        );
        assert_eq!(
            statements[1],
            "ALTER TABLE parks ALTER COLUMN geom SET NOT NULL"
        );
    }

    #[test]
    fn test_m_suffix_only_without_z() {
        let m_only = ColumnOptions {
            with_m: true,
            ..Default::default()
        };
        let statements = geometry_column_ddl("t", &spec("point", &m_only));
        assert!(statements[0].contains("'POINTM',3"));

        let z_and_m = ColumnOptions {
            with_z: true,
            with_m: true,
            ..Default::default()
        };
        let statements = geometry_column_ddl("t", &spec("point", &z_and_m));
        assert!(statements[0].contains("'POINT',4"));

        let z_only = ColumnOptions {
            with_z: true,
            ..Default::default()
        };
        let statements = geometry_column_ddl("t", &spec("point", &z_only));
        assert!(statements[0].contains("'POINT',3"));
    }

    #[test]
    fn test_unmapped_type_falls_back_verbatim() {
        let statements = geometry_column_ddl("t", &spec("circular_string", &ColumnOptions::default()));
        assert!(statements[0].contains("'circular_string'"));
    }

    #[test]
    fn test_drop_column_dispatch() {
        let spatial = ColumnDescriptor {
            name: "geom".to_string(),
            sql_type: "geometry".to_string(),
            default: None,
            nullable: true,
            spatial: None,
        };
        assert_eq!(
            drop_column_sql("parks", &spatial),
            "SELECT DropGeometryColumn('parks','geom')"
        );

        let plain = ColumnDescriptor {
            name: "name".to_string(),
            sql_type: "character varying".to_string(),
            default: None,
            nullable: true,
            spatial: None,
        };
        let sql = drop_column_sql("parks", &plain);
        assert!(sql.contains("ALTER TABLE"));
        assert!(sql.contains("DROP COLUMN"));
        assert!(!sql.contains("DropGeometryColumn"));
    }
}
