//! The two configured presets from §4.7: position-only (`n=2, m=2`) and
//! position+velocity (`n=4, m=2`, with `F`'s off-diagonal terms set to the
//! caller-supplied `dt` on every update).

use nalgebra::{DMatrix, DVector};

use super::error::KalmanError;
use super::filter::KalmanFilter;

/// Shared noise configuration for either preset.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KalmanConfig {
    /// Observation noise standard deviation, metres.
    pub sigma_obs: f64,
    /// Process noise standard deviation, metres (position-only) or
    /// metres/sqrt(s) (position+velocity, applied diagonally to every
    /// state component — a simplification over a physically derived
    /// discretized white-noise-acceleration `Q`; see `DESIGN.md`).
    pub sigma_proc: f64,
}

/// Position-only filter: identity transition, one `(x, y)` observation per
/// `step`.
pub struct PositionKalman {
    inner: KalmanFilter,
}

impl PositionKalman {
    pub fn new(config: KalmanConfig, initial: (f64, f64)) -> Self {
        let f = DMatrix::<f64>::identity(2, 2);
        let h = DMatrix::<f64>::identity(2, 2);
        let q = DMatrix::<f64>::identity(2, 2) * config.sigma_proc.powi(2);
        let r = DMatrix::<f64>::identity(2, 2) * config.sigma_obs.powi(2);
        let x0 = DVector::from_vec(vec![initial.0, initial.1]);
        let p0 = DMatrix::<f64>::identity(2, 2) * config.sigma_obs.powi(2);
        let inner = KalmanFilter::new(f, h, q, r, x0, p0).expect("preset matrices are shape-consistent by construction");
        Self { inner }
    }

    /// Predicts, then updates with observation `z`, returning the smoothed
    /// `(x, y)` estimate.
    pub fn step(&mut self, z: (f64, f64)) -> Result<(f64, f64), KalmanError> {
        self.inner.predict();
        self.inner.update(&DVector::from_vec(vec![z.0, z.1]))?;
        let x = self.inner.state();
        Ok((x[0], x[1]))
    }

    pub fn position(&self) -> (f64, f64) {
        let x = self.inner.state();
        (x[0], x[1])
    }
}

/// Position+velocity filter: state `[x, y, vx, vy]`, `F(0,2) = F(1,3) = dt`
/// set anew on every `step` from the caller-supplied elapsed time.
pub struct PositionVelocityKalman {
    inner: KalmanFilter,
}

impl PositionVelocityKalman {
    pub fn new(config: KalmanConfig, initial: (f64, f64)) -> Self {
        let f = DMatrix::<f64>::identity(4, 4);
        let mut h = DMatrix::<f64>::zeros(2, 4);
        h[(0, 0)] = 1.0;
        h[(1, 1)] = 1.0;
        let q = DMatrix::<f64>::identity(4, 4) * config.sigma_proc.powi(2);
        let r = DMatrix::<f64>::identity(2, 2) * config.sigma_obs.powi(2);
        let x0 = DVector::from_vec(vec![initial.0, initial.1, 0.0, 0.0]);
        let mut p0 = DMatrix::<f64>::identity(4, 4);
        p0[(0, 0)] = config.sigma_obs.powi(2);
        p0[(1, 1)] = config.sigma_obs.powi(2);
        p0[(2, 2)] = 1_000.0;
        p0[(3, 3)] = 1_000.0;
        let inner = KalmanFilter::new(f, h, q, r, x0, p0).expect("preset matrices are shape-consistent by construction");
        Self { inner }
    }

    /// Sets `F`'s velocity-coupling terms to `dt`, predicts, then updates
    /// with observation `z`. Returns the smoothed `(x, y, vx, vy)` state.
    pub fn step(&mut self, z: (f64, f64), dt: f64) -> Result<(f64, f64, f64, f64), KalmanError> {
        let mut f = DMatrix::<f64>::identity(4, 4);
        f[(0, 2)] = dt;
        f[(1, 3)] = dt;
        self.inner.set_transition(f)?;
        self.inner.predict();
        self.inner.update(&DVector::from_vec(vec![z.0, z.1]))?;
        let x = self.inner.state();
        Ok((x[0], x[1], x[2], x[3]))
    }

    pub fn state(&self) -> (f64, f64, f64, f64) {
        let x = self.inner.state();
        (x[0], x[1], x[2], x[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn s7_position_velocity_recovers_constant_velocity() {
        let config = KalmanConfig { sigma_obs: 1.0, sigma_proc: 0.01 };
        let mut kf = PositionVelocityKalman::new(config, (0.0, 0.0));
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)] {
            kf.step((x, y), 1.0).unwrap();
        }
        let (_, _, vx, vy) = kf.state();
        assert_relative_eq!(vx, 1.0, epsilon = 0.1);
        assert_relative_eq!(vy, 0.0, epsilon = 0.1);
    }

    #[test]
    fn position_only_smooths_toward_observations() {
        let config = KalmanConfig { sigma_obs: 1.0, sigma_proc: 0.01 };
        let mut kf = PositionKalman::new(config, (0.0, 0.0));
        let (x, y) = kf.step((1.0, 0.0)).unwrap();
        assert!(x > 0.0 && x < 1.0);
        assert_eq!(y, 0.0);
    }
}
