//! Geographic primitives: great-circle distance, point-to-polyline
//! projection and the Google polyline codec.
//!
//! Projection uses a local planar approximation (longitude scaled by
//! cos of a reference latitude). Valid for commuter-route scale only;
//! do not use it for polylines spanning hundreds of km.

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude in the planar approximation.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Great-circle distance between two points in meters.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Total length of a coordinate path in kilometers.
///
/// Returns 0 for fewer than 2 points.
pub fn total_distance_km(coords: &[(f64, f64)]) -> f64 {
    coords
        .windows(2)
        .map(|pair| haversine(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
        .sum::<f64>()
        / 1000.0
}

/// Projects `point` onto the closest segment of `polyline`.
///
/// Returns the projected point and its distance in meters. A polyline
/// with fewer than 2 points yields the input point at infinite distance.
pub fn project_point_on_polyline(
    point: (f64, f64),
    polyline: &[(f64, f64)],
    reference_lat: f64,
) -> ((f64, f64), f64) {
    let cos_ref = reference_lat.to_radians().cos();
    let px = point.1 * METERS_PER_DEGREE * cos_ref;
    let py = point.0 * METERS_PER_DEGREE;

    let mut best_dist = f64::INFINITY;
    let mut best_x = px;
    let mut best_y = py;

    for pair in polyline.windows(2) {
        let ax = pair[0].1 * METERS_PER_DEGREE * cos_ref;
        let ay = pair[0].0 * METERS_PER_DEGREE;
        let bx = pair[1].1 * METERS_PER_DEGREE * cos_ref;
        let by = pair[1].0 * METERS_PER_DEGREE;

        let (proj_x, proj_y, dist) = project_on_segment(px, py, ax, ay, bx, by);
        if dist < best_dist {
            best_dist = dist;
            best_x = proj_x;
            best_y = proj_y;
        }
    }

    let proj_lat = best_y / METERS_PER_DEGREE;
    let proj_lng = best_x / (METERS_PER_DEGREE * cos_ref);

    ((proj_lat, proj_lng), best_dist)
}

/// Clamped projection of P onto segment AB in planar coordinates.
/// Zero-length segments collapse to point distance.
fn project_on_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let seg_len_sq = dx * dx + dy * dy;
    if seg_len_sq < 1e-10 {
        let dist = ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
        return (ax, ay, dist);
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / seg_len_sq).clamp(0.0, 1.0);
    let proj_x = ax + t * dx;
    let proj_y = ay + t * dy;
    let dist = ((px - proj_x).powi(2) + (py - proj_y).powi(2)).sqrt();
    (proj_x, proj_y, dist)
}

/// Decodes a Google-encoded polyline into (lat, lng) pairs.
///
/// Delta-encoded, 5 bits per chunk with a 63 offset, 1e5 precision.
/// Truncated input yields the points decoded so far.
pub fn decode_polyline(encoded: &str) -> Vec<(f64, f64)> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let mut deltas = [0i64; 2];
        for delta in deltas.iter_mut() {
            let mut shift = 0;
            let mut result: i64 = 0;
            loop {
                if index >= bytes.len() {
                    return points;
                }
                let b = i64::from(bytes[index]) - 63;
                index += 1;
                result |= (b & 0x1f) << shift;
                shift += 5;
                if b < 0x20 {
                    break;
                }
            }
            *delta = if result & 1 != 0 {
                !(result >> 1)
            } else {
                result >> 1
            };
        }
        lat += deltas[0];
        lng += deltas[1];
        points.push((lat as f64 / 1e5, lng as f64 / 1e5));
    }

    points
}

/// Encodes (lat, lng) pairs into the Google polyline format.
pub fn encode_polyline(points: &[(f64, f64)]) -> String {
    let mut encoded = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for &(lat, lng) in points {
        let lat_e5 = (lat * 1e5).round() as i64;
        let lng_e5 = (lng * 1e5).round() as i64;
        encode_delta(lat_e5 - prev_lat, &mut encoded);
        encode_delta(lng_e5 - prev_lng, &mut encoded);
        prev_lat = lat_e5;
        prev_lng = lng_e5;
    }

    encoded
}

fn encode_delta(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push((((0x20 | (v & 0x1f)) + 63) as u8) as char);
        v >>= 5;
    }
    out.push(((v + 63) as u8) as char);
}
