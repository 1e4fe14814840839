//! WGS84 ellipsoid constants and Vincenty's formulae.

use super::error::TopologyError;

/// Semi-major axis, metres.
pub const A: f64 = 6_378_137.0;
/// Flattening.
pub const F: f64 = 1.0 / 298.257_223_563;
/// Semi-minor axis, metres.
pub const B: f64 = (1.0 - F) * A;

const MAX_ITERATIONS: usize = 10;
const CONVERGENCE_THRESHOLD: f64 = 1e-8;

/// Result of Vincenty's inverse formula.
pub struct InverseResult {
    pub distance_m: f64,
    pub initial_bearing_deg: f64,
    pub final_bearing_deg: f64,
}

/// Vincenty's inverse formula: geodesic distance and bearings between two
/// points on the WGS84 ellipsoid. `lat`/`lon` in degrees.
///
/// Iterates on the reduced-latitude auxiliary angle `lambda` until successive
/// iterates differ by less than `1e-8` or 10 iterations elapse.
pub fn inverse(
    lat1_deg: f64,
    lon1_deg: f64,
    lat2_deg: f64,
    lon2_deg: f64,
) -> Result<InverseResult, TopologyError> {
    let l = (lon2_deg - lon1_deg).to_radians();
    let u1 = ((1.0 - F) * lat1_deg.to_radians().tan()).atan();
    let u2 = ((1.0 - F) * lat2_deg.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut iterations = 0;
    let (
        mut sin_sigma,
        mut cos_sigma,
        mut sigma,
        mut cos_sq_alpha,
        mut cos_2sigma_m,
        mut sin_lambda,
        mut cos_lambda,
    ) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    loop {
        sin_lambda = lambda.sin();
        cos_lambda = lambda.cos();
        let term1 = cos_u2 * sin_lambda;
        let term2 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = (term1 * term1 + term2 * term2).sqrt();

        if sin_sigma.abs() < 1e-16 {
            // coincident points: distance 0, bearings undefined but reported as 0.
            return Ok(InverseResult {
                distance_m: 0.0,
                initial_bearing_deg: 0.0,
                final_bearing_deg: 0.0,
            });
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-12 {
            // equatorial line: cos_2sigma_m is undefined, conventionally 0.
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = F / 16.0 * cos_sq_alpha * (4.0 + F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        iterations += 1;
        if (lambda - lambda_prev).abs() < CONVERGENCE_THRESHOLD {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            log::debug!(
                "vincenty inverse failed to converge after {iterations} iterations for ({lat1_deg}, {lon1_deg}) -> ({lat2_deg}, {lon2_deg})"
            );
            return Err(TopologyError::ConvergenceFailure { iterations });
        }
    }

    let u_sq = cos_sq_alpha * (A * A - B * B) / (B * B);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    let distance_m = B * big_a * (sigma - delta_sigma);

    let initial_bearing = (cos_u2 * sin_lambda)
        .atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
        .to_degrees();
    let final_bearing = (cos_u1 * sin_lambda)
        .atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda)
        .to_degrees();

    Ok(InverseResult {
        distance_m,
        initial_bearing_deg: normalize_bearing(initial_bearing),
        final_bearing_deg: normalize_bearing(final_bearing),
    })
}

/// Result of Vincenty's direct formula.
pub struct DirectResult {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub final_bearing_deg: f64,
}

/// Vincenty's direct formula: the point reached by travelling `distance_m`
/// metres along initial bearing `bearing_deg` from `(lat1_deg, lon1_deg)`.
pub fn direct(
    lat1_deg: f64,
    lon1_deg: f64,
    bearing_deg: f64,
    distance_m: f64,
) -> Result<DirectResult, TopologyError> {
    let alpha1 = bearing_deg.to_radians();
    let u1 = ((1.0 - F) * lat1_deg.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_alpha1, cos_alpha1) = alpha1.sin_cos();

    let sigma1 = sin_u1.atan2(cos_u1 * cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (A * A - B * B) / (B * B);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance_m / (B * big_a);
    let mut iterations = 0;
    let mut cos_2sigma_m;
    loop {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let sin_sigma = sigma.sin();
        let cos_sigma = sigma.cos();
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        let sigma_prev = sigma;
        sigma = distance_m / (B * big_a) + delta_sigma;
        iterations += 1;
        if (sigma - sigma_prev).abs() < CONVERGENCE_THRESHOLD {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            log::debug!(
                "vincenty direct failed to converge after {iterations} iterations from ({lat1_deg}, {lon1_deg}) bearing {bearing_deg}"
            );
            return Err(TopologyError::ConvergenceFailure { iterations });
        }
    }

    let sin_sigma = sigma.sin();
    let cos_sigma = sigma.cos();
    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - F) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = F / 16.0 * cos_sq_alpha * (4.0 + F * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * F
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m
                        + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
    let lon2 = lon1_deg.to_radians() + l;
    let final_bearing = sin_alpha.atan2(-tmp).to_degrees();

    Ok(DirectResult {
        lat_deg: lat2.to_degrees(),
        lon_deg: lon2.to_degrees(),
        final_bearing_deg: normalize_bearing(final_bearing),
    })
}

/// Normalizes a bearing in degrees into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip_direct_inverse() {
        let (lat1, lon1) = (52.0, 5.0);
        let (lat2, lon2) = (51.4, 6.0);
        let inv = inverse(lat1, lon1, lat2, lon2).unwrap();
        let dir = direct(lat1, lon1, inv.initial_bearing_deg, inv.distance_m).unwrap();
        assert_relative_eq!(dir.lat_deg, lat2, epsilon = 1e-6);
        assert_relative_eq!(dir.lon_deg, lon2, epsilon = 1e-6);
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        let inv = inverse(52.0, 5.0, 52.0, 5.0).unwrap();
        assert_eq!(inv.distance_m, 0.0);
    }
}
