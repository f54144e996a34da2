//! Value quoting with geometry dispatch.
//!
//! Geometry values quote as single-quoted hex EWKB strings; everything else
//! delegates unchanged to the generic rendering of `sea_query::Value`.

use crate::executor::SiltError;
use crate::geometry::ewkb;
use geo::Geometry;
use sea_query::Value;

/// A SQL value that may be a geometry.
#[derive(Debug, Clone)]
pub enum SqlValue {
    /// A geometry value with an optional SRID carried in the EWKB header.
    Geometry {
        geometry: Geometry<f64>,
        srid: Option<i32>,
    },
    /// Any non-geometry value.
    Plain(Value),
}

impl SqlValue {
    pub fn geometry(geometry: Geometry<f64>, srid: Option<i32>) -> Self {
        SqlValue::Geometry { geometry, srid }
    }

    pub fn plain<V: Into<Value>>(value: V) -> Self {
        SqlValue::Plain(value.into())
    }
}

/// Quote a value for direct inclusion in a SQL statement.
///
/// # Errors
///
/// Returns `SiltError` if a geometry cannot be serialized or the value type
/// has no literal rendering.
///
/// # Examples
///
/// ```
/// use silt::value::{quote_value, SqlValue};
///
/// let quoted = quote_value(&SqlValue::plain("O'Hare")).unwrap();
/// assert_eq!(quoted, "'O''Hare'");
/// ```
pub fn quote_value(value: &SqlValue) -> Result<String, SiltError> {
    match value {
        SqlValue::Geometry { geometry, srid } => {
            Ok(format!("'{}'", ewkb::geometry_to_hex(geometry, *srid)?))
        }
        SqlValue::Plain(value) => quote_plain(value),
    }
}

/// Render a `sea_query::Value` as a PostgreSQL literal.
fn quote_plain(value: &Value) -> Result<String, SiltError> {
    #[allow(unreachable_patterns)]
    let rendered = match value {
        Value::Bool(Some(b)) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Value::TinyInt(Some(v)) => v.to_string(),
        Value::SmallInt(Some(v)) => v.to_string(),
        Value::Int(Some(v)) => v.to_string(),
        Value::BigInt(Some(v)) => v.to_string(),
        Value::TinyUnsigned(Some(v)) => v.to_string(),
        Value::SmallUnsigned(Some(v)) => v.to_string(),
        Value::Unsigned(Some(v)) => v.to_string(),
        Value::BigUnsigned(Some(v)) => v.to_string(),
        Value::Float(Some(v)) => v.to_string(),
        Value::Double(Some(v)) => v.to_string(),
        Value::Char(Some(c)) => format!("'{}'", escape_string(&c.to_string())),
        Value::String(Some(s)) => format!("'{}'", escape_string(s)),
        Value::Bytes(Some(b)) => format!("'\\x{}'", hex::encode(b)),
        Value::Bool(None)
        | Value::TinyInt(None)
        | Value::SmallInt(None)
        | Value::Int(None)
        | Value::BigInt(None)
        | Value::TinyUnsigned(None)
        | Value::SmallUnsigned(None)
        | Value::Unsigned(None)
        | Value::BigUnsigned(None)
        | Value::Float(None)
        | Value::Double(None)
        | Value::Char(None)
        | Value::String(None)
        | Value::Bytes(None) => "NULL".to_string(),
        other => {
            return Err(SiltError::Other(format!(
                "unsupported value type for quoting: {other:?}"
            )))
        }
    };
    Ok(rendered)
}

fn escape_string(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_quote_geometry_is_single_quoted_hex() {
        let value = SqlValue::geometry(Geometry::Point(Point::new(1.0, 2.0)), Some(4326));
        let quoted = quote_value(&value).unwrap();
        assert!(quoted.starts_with('\''));
        assert!(quoted.ends_with('\''));
        let inner = &quoted[1..quoted.len() - 1];
        assert!(!inner.is_empty());
        assert!(inner.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_quote_string_escapes_quotes() {
        let quoted = quote_value(&SqlValue::plain("it's")).unwrap();
        assert_eq!(quoted, "'it''s'");
    }

    #[test]
    fn test_quote_numbers_and_bools() {
        assert_eq!(quote_value(&SqlValue::plain(42i32)).unwrap(), "42");
        assert_eq!(quote_value(&SqlValue::plain(-7i64)).unwrap(), "-7");
        assert_eq!(quote_value(&SqlValue::plain(true)).unwrap(), "TRUE");
        assert_eq!(quote_value(&SqlValue::plain(false)).unwrap(), "FALSE");
    }

    #[test]
    fn test_quote_null() {
        let quoted = quote_value(&SqlValue::Plain(Value::Int(None))).unwrap();
        assert_eq!(quoted, "NULL");
    }

    #[test]
    fn test_quote_bytes_as_bytea_literal() {
        let quoted = quote_value(&SqlValue::Plain(Value::Bytes(Some(vec![0xDE, 0xAD])))).unwrap();
        assert_eq!(quoted, "'\\xdead'");
    }
}
