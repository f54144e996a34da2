//! Hex EWKB codec for geometry values on the wire.
//!
//! PostGIS sends and accepts geometry values as hex-encoded EWKB strings
//! (Extended Well-Known Binary: ISO WKB with an SRID flag and prefix in the
//! header). The binary layout is delegated to `geozero`; this module adds
//! the SRID prefix, the hex framing, and the recoverable-decode policy.

use geo::Geometry;
use geozero::wkb::Ewkb;
use geozero::{CoordDimensions, ToGeo, ToWkb};

use crate::executor::SiltError;

// Bit 29 of the EWKB type word: SRID present.
const EWKB_SRID_FLAG: u32 = 0x2000_0000;

/// Encode a geometry as an uppercase hex EWKB string.
///
/// Without an SRID this is plain ISO WKB; with one, the SRID flag is set in
/// the type word and the SRID follows the header.
///
/// # Errors
///
/// Returns `SiltError::ParseError` if the geometry cannot be serialized.
pub fn geometry_to_hex(geometry: &Geometry<f64>, srid: Option<i32>) -> Result<String, SiltError> {
    let iso_wkb = geometry
        .to_wkb(CoordDimensions::xy())
        .map_err(|e| SiltError::ParseError(format!("Failed to encode geometry as WKB: {e}")))?;

    let bytes = match srid {
        Some(srid) => patch_wkb_with_srid(&iso_wkb, srid)?,
        None => iso_wkb,
    };
    Ok(hex::encode_upper(bytes))
}

// ISO WKB: [byte_order(1)][type_u32(4)][payload...]
// EWKB:    [byte_order(1)][type_u32_with_flag(4)][srid_i32(4)][payload...]
fn patch_wkb_with_srid(iso_wkb: &[u8], srid: i32) -> Result<Vec<u8>, SiltError> {
    if iso_wkb.len() < 5 {
        return Err(SiltError::ParseError("WKB output too short".to_string()));
    }
    let little_endian = match iso_wkb[0] {
        0x01 => true,
        0x00 => false,
        _ => {
            return Err(SiltError::ParseError(
                "invalid WKB byte order marker".to_string(),
            ))
        }
    };
    let raw_type = if little_endian {
        u32::from_le_bytes([iso_wkb[1], iso_wkb[2], iso_wkb[3], iso_wkb[4]])
    } else {
        u32::from_be_bytes([iso_wkb[1], iso_wkb[2], iso_wkb[3], iso_wkb[4]])
    };
    let ewkb_type = raw_type | EWKB_SRID_FLAG;

    let mut out = Vec::with_capacity(iso_wkb.len() + 4);
    out.push(iso_wkb[0]);
    if little_endian {
        out.extend_from_slice(&ewkb_type.to_le_bytes());
        out.extend_from_slice(&srid.to_le_bytes());
    } else {
        out.extend_from_slice(&ewkb_type.to_be_bytes());
        out.extend_from_slice(&srid.to_be_bytes());
    }
    out.extend_from_slice(&iso_wkb[5..]);
    Ok(out)
}

/// Decode a hex EWKB string into a geometry.
///
/// Malformed values are recoverable: the caller receives `None` rather than
/// an error, so one bad value never aborts a whole column scan.
pub fn geometry_from_hex(hex_str: &str) -> Option<Geometry<f64>> {
    let bytes = match hex::decode(hex_str) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("discarding geometry value with malformed hex: {e}");
            return None;
        }
    };
    match Ewkb(bytes).to_geo() {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            log::warn!("discarding undecodable EWKB geometry value: {e}");
            None
        }
    }
}
