//! Spatial metadata reconstruction from catalog constraints.
//!
//! `AddGeometryColumn` attaches up to three check constraints per column:
//!
//! ```text
//! geometrytype(geom) = 'POINT'::text
//! ndims(geom) = 2
//! srid(geom) = 4326
//! ```
//!
//! The reader scans every check constraint on the table, matches these three
//! forms independently, and unions the captures by column name. There is no
//! guaranteed arrival order and no guarantee all three exist; whatever is
//! missing stays unset and the descriptor tolerates it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::executor::{SiltError, SiltExecutor};
use crate::geometry::is_geometry_declared_type;
use crate::schema::column::{dimension_flags, ColumnDescriptor, SpatialColumnInfo};

static GEOMETRY_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)geometrytype\(([^)]+)\)\s*=\s*'([^']+)'").expect("valid regex")
});
static NDIMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ndims\(([^)]+)\)\s*=\s*(\d+)").expect("valid regex"));
static SRID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)srid\(([^)]+)\)\s*=\s*(-?\d+)").expect("valid regex"));

/// Per-column accumulator built incrementally while scanning constraints.
#[derive(Debug, Default)]
pub(crate) struct RawGeometryInfo {
    pub geometry_type: Option<String>,
    pub srid: Option<i32>,
    pub dimension: Option<i32>,
    pub with_m: bool,
}

/// Constraint expressions may wrap the column in quotes or casts; reduce the
/// capture to the bare column name.
fn normalize_column_name(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Scan check-constraint definitions, accumulating spatial metadata per
/// column name. Any subset of the three constraint forms may be present for
/// a column, in any order, across any number of rows.
pub(crate) fn scan_constraints<'a, I>(definitions: I) -> HashMap<String, RawGeometryInfo>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut raw_infos: HashMap<String, RawGeometryInfo> = HashMap::new();

    for definition in definitions {
        if let Some(captures) = GEOMETRY_TYPE_RE.captures(definition) {
            let column = normalize_column_name(&captures[1]);
            let mut geometry_type = captures[2].to_string();
            // A trailing M marks the measure-only variant: POINTM is a
            // 2D-plus-measure POINT, not a distinct subtype.
            let with_m = geometry_type.ends_with('M');
            if with_m {
                geometry_type.pop();
            }
            let info = raw_infos.entry(column).or_default();
            info.geometry_type = Some(geometry_type);
            info.with_m = with_m;
        } else if let Some(captures) = NDIMS_RE.captures(definition) {
            let column = normalize_column_name(&captures[1]);
            if let Ok(dimension) = captures[2].parse::<i32>() {
                raw_infos.entry(column).or_default().dimension = Some(dimension);
            }
        } else if let Some(captures) = SRID_RE.captures(definition) {
            let column = normalize_column_name(&captures[1]);
            if let Ok(srid) = captures[2].parse::<i32>() {
                raw_infos.entry(column).or_default().srid = Some(srid);
            }
        }
    }

    raw_infos
}

/// Finalize accumulators into spatial metadata, resolving the dimension
/// count back into independent Z/M flags.
pub(crate) fn resolve_spatial_info(
    raw_infos: HashMap<String, RawGeometryInfo>,
) -> HashMap<String, SpatialColumnInfo> {
    raw_infos
        .into_iter()
        .map(|(column, info)| {
            let (with_z, with_m) = dimension_flags(info.dimension, info.with_m);
            (
                column,
                SpatialColumnInfo {
                    geometry_type: info.geometry_type,
                    srid: info.srid.unwrap_or(-1),
                    with_z,
                    with_m,
                },
            )
        })
        .collect()
}

/// Upgrade geometry-typed columns that have reconstructed metadata.
///
/// A column is upgraded only when its declared type is geometry-like AND an
/// accumulator entry exists; geometry columns created without constraints
/// stay plain.
pub(crate) fn merge_spatial_info(
    mut columns: Vec<ColumnDescriptor>,
    mut spatial: HashMap<String, SpatialColumnInfo>,
) -> Vec<ColumnDescriptor> {
    for column in &mut columns {
        if is_geometry_declared_type(&column.sql_type) {
            if let Some(info) = spatial.remove(&column.name) {
                column.spatial = Some(info);
            }
        }
    }
    columns
}

fn column_query(table: &str) -> String {
    format!(
        "SELECT a.attname, pg_catalog.format_type(a.atttypid, a.atttypmod), \
         pg_catalog.pg_get_expr(d.adbin, d.adrelid), a.attnotnull \
         FROM pg_catalog.pg_attribute a \
         LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum \
         WHERE a.attrelid = '{table}'::regclass AND a.attnum > 0 AND NOT a.attisdropped \
         ORDER BY a.attnum"
    )
}

fn constraint_query(table: &str) -> String {
    format!(
        "SELECT pg_get_constraintdef(oid) FROM pg_constraint \
         WHERE conrelid = '{table}'::regclass AND contype = 'c'"
    )
}

/// Read the full column listing for a table, with geometry columns carrying
/// reconstructed spatial metadata.
///
/// # Errors
///
/// Returns `SiltError` if either catalog query fails. Individual malformed
/// constraint expressions are simply skipped.
pub fn read_columns(
    executor: &dyn SiltExecutor,
    table: &str,
) -> Result<Vec<ColumnDescriptor>, SiltError> {
    let mut columns = Vec::new();
    for row in executor.query_all(&column_query(table), &[])? {
        let name: String = row.try_get(0)?;
        let sql_type: String = row.try_get(1)?;
        let default: Option<String> = row.try_get(2)?;
        let not_null: bool = row.try_get(3)?;
        columns.push(ColumnDescriptor {
            name,
            sql_type,
            default,
            nullable: !not_null,
            spatial: None,
        });
    }

    let mut definitions = Vec::new();
    for row in executor.query_all(&constraint_query(table), &[])? {
        let definition: String = row.try_get(0)?;
        definitions.push(definition);
    }

    let spatial = resolve_spatial_info(scan_constraints(definitions.iter().map(String::as_str)));
    Ok(merge_spatial_info(columns, spatial))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(name: &str, sql_type: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            sql_type: sql_type.to_string(),
            default: None,
            nullable: true,
            spatial: None,
        }
    }

    #[test]
    fn test_scan_all_three_constraints() {
        let definitions = [
            "CHECK ((srid(geom) = 4326))",
            "CHECK ((geometrytype(geom) = 'POINT'::text OR geom IS NULL))",
            "CHECK ((ndims(geom) = 3))",
        ];
        let raw = scan_constraints(definitions);
        let info = &raw["geom"];
        assert_eq!(info.geometry_type.as_deref(), Some("POINT"));
        assert_eq!(info.srid, Some(4326));
        assert_eq!(info.dimension, Some(3));
        assert!(!info.with_m);
    }

    #[test]
    fn test_trailing_m_is_stripped_and_recorded() {
        let raw = scan_constraints(["CHECK ((geometrytype(geom) = 'POINTM'::text))"]);
        let info = &raw["geom"];
        assert_eq!(info.geometry_type.as_deref(), Some("POINT"));
        assert!(info.with_m);
    }

    #[test]
    fn test_constraints_union_by_column_any_order() {
        let definitions = [
            "CHECK ((ndims(b) = 4))",
            "CHECK ((geometrytype(a) = 'LINESTRING'::text))",
            "CHECK ((srid(a) = -1))",
            "CHECK ((geometrytype(b) = 'POLYGON'::text))",
        ];
        let resolved = resolve_spatial_info(scan_constraints(definitions));
        assert_eq!(resolved["a"].geometry_type.as_deref(), Some("LINESTRING"));
        assert_eq!(resolved["a"].srid, -1);
        assert_eq!(resolved["b"].geometry_type.as_deref(), Some("POLYGON"));
        assert!(resolved["b"].with_z);
        assert!(resolved["b"].with_m);
    }

    #[test]
    fn test_missing_dimension_defaults_to_2d() {
        let definitions = [
            "CHECK ((geometrytype(geom) = 'POINT'::text))",
            "CHECK ((srid(geom) = 4326))",
        ];
        let resolved = resolve_spatial_info(scan_constraints(definitions));
        let info = &resolved["geom"];
        assert_eq!(info.srid, 4326);
        assert!(!info.with_z);
        assert!(!info.with_m);
    }

    #[test]
    fn test_dimension_three_with_m_flag() {
        let definitions = [
            "CHECK ((geometrytype(geom) = 'LINESTRINGM'::text))",
            "CHECK ((ndims(geom) = 3))",
        ];
        let resolved = resolve_spatial_info(scan_constraints(definitions));
        let info = &resolved["geom"];
        assert!(!info.with_z);
        assert!(info.with_m);
    }

    #[test]
    fn test_quoted_column_names_normalized() {
        let raw = scan_constraints([r#"CHECK ((srid("Geom") = 32633))"#]);
        assert_eq!(raw["Geom"].srid, Some(32633));
    }

    #[test]
    fn test_unrelated_constraints_ignored() {
        let raw = scan_constraints(["CHECK ((price > 0))"]);
        assert!(raw.is_empty());
    }

    #[test]
    fn test_merge_upgrades_only_constrained_geometry_columns() {
        let columns = vec![
            plain("name", "character varying"),
            plain("geom", "geometry"),
            plain("orphan", "geometry"),
        ];
        let mut spatial = HashMap::new();
        spatial.insert(
            "geom".to_string(),
            SpatialColumnInfo {
                geometry_type: Some("POINT".to_string()),
                srid: 4326,
                with_z: false,
                with_m: false,
            },
        );
        // An accumulator entry for a non-geometry column must not upgrade it.
        spatial.insert(
            "name".to_string(),
            SpatialColumnInfo {
                geometry_type: Some("POINT".to_string()),
                srid: -1,
                with_z: false,
                with_m: false,
            },
        );

        let merged = merge_spatial_info(columns, spatial);
        assert!(merged[0].spatial.is_none());
        assert!(merged[1].spatial.is_some());
        // Geometry column without constraints stays plain.
        assert!(merged[2].spatial.is_none());
    }
}
