//! Geometry type catalog shared by the schema writer and reader.
//!
//! PostGIS identifies a geometry column by an uppercase type token
//! (`POINT`, `MULTILINESTRING`, ...). The table-definition mini-language
//! accepts the same tokens in snake_case (`point`, `multi_line_string`),
//! and [`GeometryKind`] is the bridge between the two spellings.

pub mod ewkb;

/// The PostGIS geometry subtypes supported by the schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    /// The untyped `GEOMETRY` column, accepting any subtype.
    Geometry,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 8] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
        GeometryKind::Geometry,
    ];

    /// The uppercase SQL token PostGIS uses for this subtype, as passed to
    /// `AddGeometryColumn` and found in `geometrytype()` check constraints.
    pub fn sql_token(self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::MultiPoint => "MULTIPOINT",
            GeometryKind::MultiLineString => "MULTILINESTRING",
            GeometryKind::MultiPolygon => "MULTIPOLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
            GeometryKind::Geometry => "GEOMETRY",
        }
    }

    /// The snake_case name used in table definitions.
    pub fn type_name(self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::LineString => "line_string",
            GeometryKind::Polygon => "polygon",
            GeometryKind::MultiPoint => "multi_point",
            GeometryKind::MultiLineString => "multi_line_string",
            GeometryKind::MultiPolygon => "multi_polygon",
            GeometryKind::GeometryCollection => "geometry_collection",
            GeometryKind::Geometry => "geometry",
        }
    }

    /// Resolve a declared type name to a geometry kind.
    ///
    /// Accepts both the snake_case mini-language spelling and the raw SQL
    /// token, case-insensitively. Returns `None` for anything outside the
    /// spatial type set, which routes the column to the generic path.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "point" => Some(GeometryKind::Point),
            "linestring" => Some(GeometryKind::LineString),
            "polygon" => Some(GeometryKind::Polygon),
            "multipoint" => Some(GeometryKind::MultiPoint),
            "multilinestring" => Some(GeometryKind::MultiLineString),
            "multipolygon" => Some(GeometryKind::MultiPolygon),
            "geometrycollection" => Some(GeometryKind::GeometryCollection),
            "geometry" => Some(GeometryKind::Geometry),
            _ => None,
        }
    }
}

/// Whether a declared type name belongs to the spatial type set.
///
/// This is the dispatch test used by the table-definition mini-language:
/// spatial type names route to `AddGeometryColumn`, everything else to the
/// generic column path.
pub fn is_spatial_type(name: &str) -> bool {
    GeometryKind::from_type_name(name).is_some()
}

/// Resolve the SQL type token for a declared geometry type name.
///
/// Unmapped aliases fall back to the raw name verbatim rather than failing
/// the whole DDL operation.
pub fn resolve_type_token(type_name: &str) -> String {
    match GeometryKind::from_type_name(type_name) {
        Some(kind) => kind.sql_token().to_string(),
        None => type_name.to_string(),
    }
}

/// Whether a catalog-reported column type is geometry-like.
///
/// PostGIS declares constraint-registered columns with the bare `geometry`
/// type; newer typmod columns report `geometry(Point,4326)`. Both match.
pub fn is_geometry_declared_type(sql_type: &str) -> bool {
    sql_type.to_ascii_lowercase().starts_with("geometry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_name_snake_case() {
        assert_eq!(
            GeometryKind::from_type_name("multi_line_string"),
            Some(GeometryKind::MultiLineString)
        );
        assert_eq!(GeometryKind::from_type_name("point"), Some(GeometryKind::Point));
    }

    #[test]
    fn test_from_type_name_sql_token() {
        assert_eq!(
            GeometryKind::from_type_name("MULTIPOLYGON"),
            Some(GeometryKind::MultiPolygon)
        );
        assert_eq!(
            GeometryKind::from_type_name("GeometryCollection"),
            Some(GeometryKind::GeometryCollection)
        );
    }

    #[test]
    fn test_from_type_name_rejects_generic_types() {
        assert_eq!(GeometryKind::from_type_name("string"), None);
        assert_eq!(GeometryKind::from_type_name("integer"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for kind in GeometryKind::ALL {
            assert_eq!(GeometryKind::from_type_name(kind.type_name()), Some(kind));
            assert_eq!(GeometryKind::from_type_name(kind.sql_token()), Some(kind));
        }
    }

    #[test]
    fn test_resolve_type_token_fallback() {
        assert_eq!(resolve_type_token("polygon"), "POLYGON");
        // Unmapped aliases pass through verbatim.
        assert_eq!(resolve_type_token("CIRCULARSTRING"), "CIRCULARSTRING");
    }

    #[test]
    fn test_is_geometry_declared_type() {
        assert!(is_geometry_declared_type("geometry"));
        assert!(is_geometry_declared_type("GEOMETRY"));
        assert!(is_geometry_declared_type("geometry(Point,4326)"));
        assert!(!is_geometry_declared_type("character varying"));
    }
}
