//! Spherical-trigonometry helpers shared by the geoidal and geoidal-approximate
//! calculators for on-track projection and intersection. These two
//! operations are computed in closed form "on the sphere" regardless of
//! which ellipsoidal/haversine distance metric the calculator otherwise uses.

use super::error::TopologyError;

const ALONG_TRACK_CONVERGENCE_M: f64 = 0.1;
const MAX_ITERATIONS: usize = 50;

/// Initial bearing from `(lat1, lon1)` to `(lat2, lon2)` on a sphere, degrees
/// in `[0, 360)`. Distinct from (but numerically close to) the ellipsoidal
/// Vincenty bearing used for distance/destination elsewhere.
pub fn spherical_bearing_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let (phi1, phi2) = (lat1_deg.to_radians(), lat2_deg.to_radians());
    let d_lambda = (lon2_deg - lon1_deg).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    super::wgs84::normalize_bearing(y.atan2(x).to_degrees())
}

/// Angular distance in radians between two points on a sphere (haversine).
fn angular_distance_rad(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let (phi1, phi2) = (lat1_deg.to_radians(), lat2_deg.to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2_deg - lon1_deg).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().clamp(-1.0, 1.0).asin()
}

/// Destination point on a sphere of radius `radius_m`, travelling `distance_m`
/// along `bearing_deg` from `(lat, lon)`.
fn spherical_destination(
    lat_deg: f64,
    lon_deg: f64,
    bearing_deg: f64,
    distance_m: f64,
    radius_m: f64,
) -> (f64, f64) {
    let delta = distance_m / radius_m;
    let theta = bearing_deg.to_radians();
    let phi1 = lat_deg.to_radians();
    let lambda1 = lon_deg.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());
    (phi2.to_degrees(), lambda2.to_degrees())
}

/// Closest point on great-circle segment `a -> b` to point `p`.
///
/// Iterative scheme: start at `a`; each iteration compute the bearing to `p`
/// and to `b`, the cross-track distance, the along-track distance, and walk
/// the working point forward by that along-track distance toward `b`; stop
/// when the along-track distance drops below 0.1 m. Tie-breaks clamp the
/// result to the closed segment `[a, b]`.
#[allow(clippy::too_many_arguments)]
pub fn on_track_closest_point(
    a_lat: f64,
    a_lon: f64,
    b_lat: f64,
    b_lon: f64,
    p_lat: f64,
    p_lon: f64,
    radius_m: f64,
) -> (f64, f64) {
    let brng_ab = spherical_bearing_deg(a_lat, a_lon, b_lat, b_lon);
    let brng_ap0 = spherical_bearing_deg(a_lat, a_lon, p_lat, p_lon);
    if angle_diff_deg(brng_ap0, brng_ab) > 90.0 {
        return (a_lat, a_lon);
    }
    let brng_ba = spherical_bearing_deg(b_lat, b_lon, a_lat, a_lon);
    let brng_bp0 = spherical_bearing_deg(b_lat, b_lon, p_lat, p_lon);
    if angle_diff_deg(brng_bp0, brng_ba) > 90.0 {
        return (b_lat, b_lon);
    }

    let (mut cur_lat, mut cur_lon) = (a_lat, a_lon);
    for _ in 0..MAX_ITERATIONS {
        let d_ap = angular_distance_rad(cur_lat, cur_lon, p_lat, p_lon);
        let brng_cp = spherical_bearing_deg(cur_lat, cur_lon, p_lat, p_lon);
        let d_xt = (d_ap.sin() * (brng_cp - brng_ab).to_radians().sin())
            .clamp(-1.0, 1.0)
            .asin();
        let cos_dxt = d_xt.cos();
        let d_at_rad = if cos_dxt.abs() < 1e-12 {
            d_ap
        } else {
            (d_ap.cos() / cos_dxt).clamp(-1.0, 1.0).acos()
        };
        let d_at_m = d_at_rad * radius_m;
        if d_at_m.abs() < ALONG_TRACK_CONVERGENCE_M {
            break;
        }
        let (next_lat, next_lon) =
            spherical_destination(cur_lat, cur_lon, brng_ab, d_at_m, radius_m);
        cur_lat = next_lat;
        cur_lon = next_lon;
    }
    (cur_lat, cur_lon)
}

/// Signed cross-track and unsigned along-track distance of `p` relative to
/// the great circle through `a` and `b`, in metres (non-iterative, single
/// shot; used for the calculator's `alongTrackDistance` contract rather than
/// the iterative projection above).
pub fn along_track_distance_m(
    a_lat: f64,
    a_lon: f64,
    b_lat: f64,
    b_lon: f64,
    p_lat: f64,
    p_lon: f64,
    radius_m: f64,
) -> f64 {
    let brng_ab = spherical_bearing_deg(a_lat, a_lon, b_lat, b_lon);
    let brng_ap = spherical_bearing_deg(a_lat, a_lon, p_lat, p_lon);
    let d_ap = angular_distance_rad(a_lat, a_lon, p_lat, p_lon);
    let d_xt = (d_ap.sin() * (brng_ap - brng_ab).to_radians().sin())
        .clamp(-1.0, 1.0)
        .asin();
    let cos_dxt = d_xt.cos();
    let d_at_rad = if cos_dxt.abs() < 1e-12 {
        d_ap
    } else {
        (d_ap.cos() / cos_dxt).clamp(-1.0, 1.0).acos()
    };
    d_at_rad * radius_m
}

fn angle_diff_deg(a_deg: f64, b_deg: f64) -> f64 {
    let mut diff = (a_deg - b_deg).abs() % 360.0;
    if diff > 180.0 {
        diff = 360.0 - diff;
    }
    diff
}

/// Geodesic intersection of segment `startA -> endA` with `startB -> endB`,
/// closed-form on the sphere via bearings and the spherical-triangle law.
/// Returns `None` for "no unique intersection" and for "ambiguous"
/// (antipodal) cases alike — callers are expected to treat both the same
/// way.
#[allow(clippy::too_many_arguments)]
pub fn intersection(
    start_a_lat: f64,
    start_a_lon: f64,
    end_a_lat: f64,
    end_a_lon: f64,
    start_b_lat: f64,
    start_b_lon: f64,
    end_b_lat: f64,
    end_b_lon: f64,
) -> Result<Option<(f64, f64)>, TopologyError> {
    let (phi1, lambda1) = (start_a_lat.to_radians(), start_a_lon.to_radians());
    let (phi2, lambda2) = (start_b_lat.to_radians(), start_b_lon.to_radians());
    let theta_a = spherical_bearing_deg(start_a_lat, start_a_lon, end_a_lat, end_a_lon).to_radians();
    let theta_b = spherical_bearing_deg(start_b_lat, start_b_lon, end_b_lat, end_b_lon).to_radians();

    let d_phi = phi2 - phi1;
    let d_lambda = lambda2 - lambda1;

    let delta12 = 2.0
        * ((d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2))
            .sqrt()
            .clamp(-1.0, 1.0)
            .asin();
    if delta12.abs() < 1e-15 {
        return Err(TopologyError::CoincidentPoints);
    }

    let theta_a1 = ((phi2.sin() - phi1.sin() * delta12.cos()) / (delta12.sin() * phi1.cos()))
        .clamp(-1.0, 1.0)
        .acos();
    let theta_a1 = if theta_a1.is_nan() { 0.0 } else { theta_a1 };
    let theta_b1 = ((phi1.sin() - phi2.sin() * delta12.cos()) / (delta12.sin() * phi2.cos()))
        .clamp(-1.0, 1.0)
        .acos();
    let theta_b1 = if theta_b1.is_nan() { 0.0 } else { theta_b1 };

    let (alpha1, alpha2) = if d_lambda.sin() > 0.0 {
        (theta_a - theta_a1, theta_b1 - theta_b)
    } else {
        (theta_a1 - theta_a, theta_b - theta_b1)
    };

    if alpha1.sin() == 0.0 && alpha2.sin() == 0.0 {
        // infinite intersections: coincident great circles.
        return Ok(None);
    }
    if alpha1.sin() * alpha2.sin() <= 0.0 {
        // antipodal ambiguity: no unique intersection.
        return Ok(None);
    }

    let alpha3 =
        (-alpha1.cos() * alpha2.cos() + alpha1.sin() * alpha2.sin() * delta12.cos()).acos();
    let delta13 = (delta12.sin() * alpha1.sin() * alpha2.sin())
        .atan2(alpha2.cos() + alpha1.cos() * alpha3.cos());
    let phi3 = (phi1.sin() * delta13.cos() + phi1.cos() * delta13.sin() * theta_a.cos()).asin();
    let d_lambda13 = (theta_a.sin() * delta13.sin() * phi1.cos())
        .atan2(delta13.cos() - phi1.sin() * phi3.sin());
    let lambda3 = lambda1 + d_lambda13;

    Ok(Some((phi3.to_degrees(), wrap_lon_deg(lambda3.to_degrees()))))
}

/// Wraps a longitude in degrees into `[-180, 180)`.
fn wrap_lon_deg(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn s1_utrecht_venlo_closest_point() {
        let radius_m = crate::topology::haversine::APPROX_EARTH_RADIUS_M;
        let (lat, lon) = on_track_closest_point(52.0, 5.0, 51.4, 6.0, 52.0, 5.5, radius_m);
        assert_relative_eq!(lat, 51.846_089, epsilon = 1e-3);
        assert_relative_eq!(lon, 5.260_428, epsilon = 1e-3);
    }

    #[test]
    fn s2_antipodal_span_returns_start() {
        let radius_m = crate::topology::haversine::APPROX_EARTH_RADIUS_M;
        let (lat, lon) = on_track_closest_point(42.0, 29.0, -35.0, -70.0, 66.2, 43.9, radius_m);
        assert_relative_eq!(lat, 42.0, epsilon = 1e-9);
        assert_relative_eq!(lon, 29.0, epsilon = 1e-9);
    }
}
