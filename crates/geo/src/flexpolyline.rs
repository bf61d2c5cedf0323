//! Flexible Polyline Decoding
//!
//! Compact route encoding used by the primary routing service: a header
//! (format version, then precision/third-dimension flags) followed by
//! zig-zag, variable-length delta values in a URL-safe base64 alphabet.
//! Third-dimension values, when present, are read and discarded.

use sales_assistant_core::Coordinate;

use crate::error::{GeoError, GeoResult};

const FORMAT_VERSION: u64 = 1;

fn decode_char(c: u8) -> Option<u64> {
    let v = match c {
        b'A'..=b'Z' => c - b'A',
        b'a'..=b'z' => c - b'a' + 26,
        b'0'..=b'9' => c - b'0' + 52,
        b'-' => 62,
        b'_' => 63,
        _ => return None,
    };
    Some(v as u64)
}

fn to_signed(value: u64) -> i64 {
    let magnitude = (value >> 1) as i64;
    if value & 1 == 1 {
        !magnitude
    } else {
        magnitude
    }
}

struct Reader<'a> {
    bytes: std::slice::Iter<'a, u8>,
}

impl<'a> Reader<'a> {
    fn new(encoded: &'a str) -> Self {
        Self {
            bytes: encoded.as_bytes().iter(),
        }
    }

    /// Next unsigned varint, or `None` at a clean end of input.
    fn next_unsigned(&mut self) -> GeoResult<Option<u64>> {
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let Some(&c) = self.bytes.next() else {
                if shift == 0 {
                    return Ok(None);
                }
                return Err(GeoError::decode("truncated polyline value"));
            };
            let value = decode_char(c)
                .ok_or_else(|| GeoError::decode(format!("invalid polyline character {:?}", c as char)))?;
            if shift >= 64 {
                return Err(GeoError::decode("polyline value overflows 64 bits"));
            }
            result |= (value & 0x1f) << shift;
            if value & 0x20 == 0 {
                return Ok(Some(result));
            }
            shift += 5;
        }
    }

    fn require_unsigned(&mut self, what: &str) -> GeoResult<u64> {
        self.next_unsigned()?
            .ok_or_else(|| GeoError::decode(format!("polyline ends before {}", what)))
    }

    fn require_signed(&mut self, what: &str) -> GeoResult<i64> {
        self.require_unsigned(what).map(to_signed)
    }
}

/// Decode a flexible-polyline string into coordinates, in encoded order.
pub fn decode_flexible(encoded: &str) -> GeoResult<Vec<Coordinate>> {
    let mut reader = Reader::new(encoded.trim());

    let version = reader.require_unsigned("format version")?;
    if version != FORMAT_VERSION {
        return Err(GeoError::decode(format!(
            "unsupported polyline format version {}",
            version
        )));
    }

    let header = reader.require_unsigned("header")?;
    let precision = (header & 0x0f) as i32;
    let third_dim = (header >> 4) & 0x07;
    if third_dim == 4 || third_dim == 5 {
        return Err(GeoError::decode(format!(
            "reserved third dimension type {}",
            third_dim
        )));
    }
    let factor = 10f64.powi(precision);

    let mut coords = Vec::new();
    let (mut lat, mut lon) = (0i64, 0i64);
    while let Some(raw_lat) = reader.next_unsigned()? {
        lat += to_signed(raw_lat);
        lon += reader.require_signed("longitude")?;
        if third_dim != 0 {
            reader.require_signed("third dimension")?;
        }
        coords.push(Coordinate::new(lat as f64 / factor, lon as f64 / factor)?);
    }

    Ok(coords)
}
