use anyhow::Result;

use crate::route_vector::{Route, TrackPoint};

// Standard polyline precision: coordinates are kept to 5 decimal
// places, so a round trip is accurate to 0.5e-5 degrees.
const PRECISION: f64 = 1e5;

const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;

/// Encodes a route as a compact printable token. Each coordinate is
/// scaled to 5 decimal digits and delta-encoded against the previous
/// point, starting from an implicit (0, 0) origin.
pub fn encode(route: &Route) -> String {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;
    for p in &route.points {
        let lat = scale(p.latitude);
        let lng = scale(p.longitude);
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }
    out
}

/// Decodes a token produced by [`encode`]. Fails on bytes outside the
/// packed character range, on a token that ends in the middle of a
/// value, and on a trailing latitude with no matching longitude; a
/// malformed token never decodes to a silently truncated route.
pub fn decode(token: &str) -> Result<Route> {
    let bytes = token.as_bytes();
    let mut pos = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();
    while pos < bytes.len() {
        let (lat_delta, after_lat) = decode_value(bytes, pos)?;
        if after_lat >= bytes.len() {
            bail!(
                "unconsumed remainder after final coordinate pair: \
                 latitude delta at byte {pos} has no longitude"
            );
        }
        let (lng_delta, after_lng) = decode_value(bytes, after_lat)?;
        lat += lat_delta;
        lng += lng_delta;
        points.push(TrackPoint {
            latitude: lat as f64 / PRECISION,
            longitude: lng as f64 / PRECISION,
        });
        pos = after_lng;
    }
    Ok(Route::new(points))
}

fn scale(coordinate: f64) -> i64 {
    (coordinate * PRECISION).round() as i64
}

fn encode_value(value: i64, out: &mut String) {
    // Zigzag so the sign lives in the low bit, then emit 5-bit chunks
    // low to high with a continuation bit.
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        let mut chunk = v & 0x1f;
        v >>= 5;
        if v != 0 {
            chunk |= CONTINUATION_BIT;
        }
        out.push((chunk as u8 + CHUNK_OFFSET) as char);
        if v == 0 {
            break;
        }
    }
}

fn decode_value(bytes: &[u8], mut pos: usize) -> Result<(i64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        let byte = match bytes.get(pos) {
            Some(byte) => *byte,
            None => bail!("polyline token ends in the middle of a value at byte {pos}"),
        };
        if !(CHUNK_OFFSET..CHUNK_OFFSET + 64).contains(&byte) {
            bail!("invalid polyline byte {byte:#04x} at position {pos}");
        }
        if shift > 63 {
            bail!("polyline value overflows at byte {pos}");
        }
        let chunk = (byte - CHUNK_OFFSET) as u64;
        result |= (chunk & 0x1f) << shift;
        pos += 1;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
        shift += 5;
    }
    let value = ((result >> 1) as i64) ^ -((result & 1) as i64);
    Ok((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_vector() {
        // Reference example from the polyline format documentation.
        let route = Route::new(vec![
            TrackPoint {
                latitude: 38.5,
                longitude: -120.2,
            },
            TrackPoint {
                latitude: 40.7,
                longitude: -120.95,
            },
            TrackPoint {
                latitude: 43.252,
                longitude: -126.453,
            },
        ]);
        assert_eq!(encode(&route), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn decodes_reference_vector() {
        let route = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(route.len(), 3);
        assert_eq!(route.points[0].latitude, 38.5);
        assert_eq!(route.points[0].longitude, -120.2);
        assert_eq!(route.points[2].latitude, 43.252);
        assert_eq!(route.points[2].longitude, -126.453);
    }

    #[test]
    fn empty_token_is_an_empty_route() {
        assert!(decode("").unwrap().is_empty());
    }
}
