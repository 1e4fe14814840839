//! Pre-processing noise reduction: smooths a whole trajectory of raw
//! [`Observation`]s with one of the two presets before the HMM matcher ever
//! sees it (control-flow step F in the system overview).

use crate::geometry::{GeometryFactory, Point};
use crate::observation::Observation;

use super::error::KalmanError;
use super::presets::{KalmanConfig, PositionKalman, PositionVelocityKalman};

/// Which preset to run the trajectory through.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum KalmanPreset {
    PositionOnly,
    PositionVelocity,
}

/// Smooths `observations` in timestamp order, replacing each point with its
/// filtered estimate while keeping the original timestamp. The first
/// observation seeds the filter's initial state and passes through
/// unchanged (no prior estimate exists to blend it with).
pub fn smooth(
    observations: &[Observation],
    factory: GeometryFactory,
    preset: KalmanPreset,
    config: KalmanConfig,
) -> Result<Vec<Observation>, KalmanError> {
    let Some(first) = observations.first() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(observations.len());
    out.push(*first);

    match preset {
        KalmanPreset::PositionOnly => {
            let mut kf = PositionKalman::new(config, (first.point.x(), first.point.y()));
            for obs in &observations[1..] {
                let (x, y) = kf.step((obs.point.x(), obs.point.y()))?;
                out.push(Observation::new(smoothed_point(factory, obs.point, x, y), obs.at));
            }
        }
        KalmanPreset::PositionVelocity => {
            let mut kf = PositionVelocityKalman::new(config, (first.point.x(), first.point.y()));
            for pair in observations.windows(2) {
                let (prev, cur) = (pair[0], pair[1]);
                let dt = cur.seconds_since(&prev).max(f64::EPSILON);
                let (x, y, _, _) = kf.step((cur.point.x(), cur.point.y()), dt)?;
                out.push(Observation::new(smoothed_point(factory, cur.point, x, y), cur.at));
            }
        }
    }

    Ok(out)
}

/// Builds the smoothed point, falling back to the raw observation's point
/// if the factory rejects the filtered coordinates (e.g. a geoidal factory
/// and a filtered latitude that drifted just out of range).
fn smoothed_point(factory: GeometryFactory, raw: Point, x: f64, y: f64) -> Point {
    factory.create_point(x, y).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn smooths_a_short_trajectory_without_error() {
        let factory = GeometryFactory::planar();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let obs: Vec<Observation> = (0..4)
            .map(|i| {
                Observation::new(
                    factory.create_point(i as f64, 0.0).unwrap(),
                    t0 + chrono::Duration::seconds(i),
                )
            })
            .collect();
        let config = KalmanConfig { sigma_obs: 1.0, sigma_proc: 0.01 };
        let smoothed = smooth(&obs, factory, KalmanPreset::PositionVelocity, config).unwrap();
        assert_eq!(smoothed.len(), obs.len());
        assert_eq!(smoothed[0].point, obs[0].point);
    }
}
