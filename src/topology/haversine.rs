//! Haversine approximation of the geoidal calculator ("geoidal-approximate").
//! Same formula and constant Earth radius as the familiar haversine
//! distance helper, adapted to the `(lat, lon)` degree contract used
//! throughout this crate's topology layer.

/// Mean Earth radius, metres. Constant-radius sphere substituted for the
/// WGS84 ellipsoid; loses sub-metre accuracy away from the equator but keeps
/// the same calculator contract as the exact geoidal variant.
pub const APPROX_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, metres. `lat`/`lon` in degrees.
pub fn distance_m(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (lon2_deg - lon1_deg).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().clamp(-1.0, 1.0).asin();
    APPROX_EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_distance_for_coincident_points() {
        assert_relative_eq!(distance_m(52.0, 5.0, 52.0, 5.0), 0.0, epsilon = 1e-9);
    }
}
