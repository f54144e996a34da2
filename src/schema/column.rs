//! Column specifications and descriptors.
//!
//! The Z and M ordinate flags are independent, but PostGIS encodes them as a
//! single dimension count in DDL and constraints. Dimension 3 is ambiguous
//! (it means "one extra ordinate, either Z or M"), so reconstruction relies
//! on the side-channel M flag recovered from the `geometrytype()` constraint
//! literal (`POINTM` vs `POINT`), never on the dimension alone.

/// Options accepted when declaring a column.
///
/// `srid`, `with_z` and `with_m` only apply to geometry columns; `null`
/// applies everywhere. A missing `null` means nullable.
#[derive(Debug, Clone, Default)]
pub struct ColumnOptions {
    pub null: Option<bool>,
    pub srid: Option<i32>,
    pub with_z: bool,
    pub with_m: bool,
}

/// A declared geometry column, immutable once emitted to DDL.
#[derive(Debug, Clone)]
pub struct GeometryColumnSpec {
    pub name: String,
    /// The declared type name; resolved to a SQL token at emit time, with
    /// unmapped aliases passing through verbatim.
    pub type_name: String,
    /// SRID, `-1` when unspecified.
    pub srid: i32,
    pub with_z: bool,
    pub with_m: bool,
    pub nullable: bool,
}

impl GeometryColumnSpec {
    pub fn from_options(name: &str, type_name: &str, options: &ColumnOptions) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            srid: options.srid.unwrap_or(-1),
            with_z: options.with_z,
            with_m: options.with_m,
            nullable: options.null.unwrap_or(true),
        }
    }

    /// The coordinate dimension this column registers with PostGIS.
    pub fn dimension(&self) -> i32 {
        dimension(self.with_z, self.with_m)
    }
}

/// Combine the Z and M flags into a PostGIS dimension count.
pub fn dimension(with_z: bool, with_m: bool) -> i32 {
    match (with_z, with_m) {
        (true, true) => 4,
        (true, false) | (false, true) => 3,
        (false, false) => 2,
    }
}

/// Recover the (with_z, with_m) pair from a dimension count plus the M flag
/// recorded from the type constraint.
///
/// An absent dimension constraint defaults to 2D.
pub fn dimension_flags(dimension: Option<i32>, with_m: bool) -> (bool, bool) {
    match dimension {
        Some(4) => (true, true),
        Some(3) => {
            if with_m {
                (false, true)
            } else {
                (true, false)
            }
        }
        _ => (false, false),
    }
}

/// Spatial metadata reconstructed from check constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialColumnInfo {
    /// Geometry subtype token (`POINT`, ...) with any trailing `M` stripped.
    /// Absent when the table carries no `geometrytype()` constraint for the
    /// column.
    pub geometry_type: Option<String>,
    /// SRID, `-1` when no `srid()` constraint was found.
    pub srid: i32,
    pub with_z: bool,
    pub with_m: bool,
}

/// A column as reported by [`crate::SchemaManager::columns`].
///
/// Geometry columns carry `spatial` metadata; plain columns have `None`.
/// A column with a geometry declared type but no recognizable constraints is
/// reported as plain - callers must tolerate such oddities.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Formatted SQL type as reported by the catalog.
    pub sql_type: String,
    /// Default expression, if any.
    pub default: Option<String>,
    pub nullable: bool,
    pub spatial: Option<SpatialColumnInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_law() {
        assert_eq!(dimension(false, false), 2);
        assert_eq!(dimension(true, false), 3);
        assert_eq!(dimension(false, true), 3);
        assert_eq!(dimension(true, true), 4);
    }

    #[test]
    fn test_dimension_round_trip() {
        // Dimension 3 is ambiguous on its own; the M flag disambiguates.
        for (with_z, with_m) in [(false, false), (true, false), (false, true), (true, true)] {
            let dim = dimension(with_z, with_m);
            assert_eq!(dimension_flags(Some(dim), with_m), (with_z, with_m));
        }
    }

    #[test]
    fn test_dimension_flags_absent_defaults_to_2d() {
        assert_eq!(dimension_flags(None, false), (false, false));
        // A stray M flag without a dimension constraint still reads as 2D.
        assert_eq!(dimension_flags(None, true), (false, false));
    }

    #[test]
    fn test_spec_from_options_defaults() {
        let spec = GeometryColumnSpec::from_options("geom", "point", &ColumnOptions::default());
        assert_eq!(spec.srid, -1);
        assert!(spec.nullable);
        assert!(!spec.with_z);
        assert!(!spec.with_m);
        assert_eq!(spec.dimension(), 2);
    }

    #[test]
    fn test_spec_dimension_from_flags() {
        let options = ColumnOptions {
            with_z: true,
            with_m: true,
            ..Default::default()
        };
        let spec = GeometryColumnSpec::from_options("geom", "point", &options);
        assert_eq!(spec.dimension(), 4);
    }
}
