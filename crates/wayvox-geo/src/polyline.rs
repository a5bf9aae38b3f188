//! Decoder for Google's encoded polyline algorithm format, used by the
//! Directions API for the route overview path.

use crate::coord::Coordinate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PolylineError {
    #[error("Truncated polyline: chunk starting at byte {0} has no terminator")]
    Truncated(usize),

    #[error("Invalid polyline byte {byte:#x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
}

/// Decode an encoded polyline into coordinates at the standard precision
/// of 5 decimal places. Every encoded point is emitted; none are dropped
/// or deduplicated.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut idx = 0usize;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while idx < bytes.len() {
        lat += decode_chunk(bytes, &mut idx)?;
        lng += decode_chunk(bytes, &mut idx)?;
        points.push(Coordinate::new(lat as f64 / 1e5, lng as f64 / 1e5));
    }

    Ok(points)
}

/// Decode one varint-style chunk (one delta value) starting at `*idx`,
/// advancing `*idx` past it.
fn decode_chunk(bytes: &[u8], idx: &mut usize) -> Result<i64, PolylineError> {
    let start = *idx;
    let mut result: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*idx) else {
            return Err(PolylineError::Truncated(start));
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte {
                byte,
                offset: *idx,
            });
        }
        *idx += 1;

        let chunk = u64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    // Zigzag back to signed.
    let value = if result & 1 == 1 {
        !(result >> 1) as i64
    } else {
        (result >> 1) as i64
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Canonical example from the Google polyline algorithm docs.
    const GOOGLE_EXAMPLE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_polyline() {
        let pts = decode_polyline(GOOGLE_EXAMPLE).unwrap();
        assert_eq!(pts.len(), 3);
        assert!((pts[0].latitude - 38.5).abs() < 1e-9);
        assert!((pts[0].longitude - -120.2).abs() < 1e-9);
        assert!((pts[1].latitude - 40.7).abs() < 1e-9);
        assert!((pts[1].longitude - -120.95).abs() < 1e-9);
        assert!((pts[2].latitude - 43.252).abs() < 1e-9);
        assert!((pts[2].longitude - -126.453).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert_eq!(decode_polyline("").unwrap(), Vec::new());
    }

    #[test]
    fn truncated_input_is_rejected() {
        // Drop the final byte so the last chunk never terminates.
        let cut = &GOOGLE_EXAMPLE[..GOOGLE_EXAMPLE.len() - 1];
        assert!(matches!(
            decode_polyline(cut),
            Err(PolylineError::Truncated(_))
        ));
    }

    #[test]
    fn out_of_range_byte_is_rejected() {
        assert!(matches!(
            decode_polyline("_p~iF\x1f"),
            Err(PolylineError::InvalidByte { .. })
        ));
    }

    #[test]
    fn repeated_points_are_preserved() {
        // Two identical points encode as a zero delta; both must survive.
        let pts = decode_polyline("_p~iF~ps|U??").unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0], pts[1]);
    }
}
