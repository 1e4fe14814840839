//! General linear Kalman filter (§4.7), parameterised by state dimension
//! `n` and observation dimension `m`. Matrices are `nalgebra` dynamic
//! matrices so the same implementation serves both presets in
//! [`super::presets`] without duplicating the predict/update arithmetic.

use nalgebra::{DMatrix, DVector};

use super::error::KalmanError;

fn check_shape(what: &'static str, m: &DMatrix<f64>, rows: usize, cols: usize) -> Result<(), KalmanError> {
    if m.nrows() != rows || m.ncols() != cols {
        return Err(KalmanError::DimensionMismatch {
            what,
            expected_rows: rows,
            expected_cols: cols,
            got_rows: m.nrows(),
            got_cols: m.ncols(),
        });
    }
    Ok(())
}

/// A linear Kalman filter: state transition `f`, observation model `h`,
/// process noise `q`, observation noise `r`, current state `x` and
/// covariance `p`.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    n: usize,
    m: usize,
    f: DMatrix<f64>,
    h: DMatrix<f64>,
    q: DMatrix<f64>,
    r: DMatrix<f64>,
    x: DVector<f64>,
    p: DMatrix<f64>,
}

impl KalmanFilter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        f: DMatrix<f64>,
        h: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
        x0: DVector<f64>,
        p0: DMatrix<f64>,
    ) -> Result<Self, KalmanError> {
        let n = x0.len();
        let m = r.nrows();
        check_shape("F", &f, n, n)?;
        check_shape("H", &h, m, n)?;
        check_shape("Q", &q, n, n)?;
        check_shape("R", &r, m, m)?;
        check_shape("P", &p0, n, n)?;
        Ok(Self { n, m, f, h, q, r, x: x0, p: p0 })
    }

    pub fn state(&self) -> &DVector<f64> {
        &self.x
    }

    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.p
    }

    /// Replaces the state transition matrix `F`; used by the
    /// position+velocity preset, whose `F` depends on the elapsed time
    /// since the previous observation.
    pub fn set_transition(&mut self, f: DMatrix<f64>) -> Result<(), KalmanError> {
        check_shape("F", &f, self.n, self.n)?;
        self.f = f;
        Ok(())
    }

    /// Predict step: `x <- F x`, `P <- F P F^T + Q`.
    pub fn predict(&mut self) {
        self.x = &self.f * &self.x;
        self.p = &self.f * &self.p * self.f.transpose() + &self.q;
    }

    /// Estimate (update) step given a new observation `z`.
    pub fn update(&mut self, z: &DVector<f64>) -> Result<(), KalmanError> {
        if z.len() != self.m {
            return Err(KalmanError::DimensionMismatch {
                what: "z",
                expected_rows: self.m,
                expected_cols: 1,
                got_rows: z.len(),
                got_cols: 1,
            });
        }
        let y = z - &self.h * &self.x;
        let s = &self.h * &self.p * self.h.transpose() + &self.r;
        let s_inv = s
            .clone()
            .try_inverse()
            .ok_or(KalmanError::SingularInnovationCovariance)?;
        let k = &self.p * self.h.transpose() * s_inv;
        self.x = &self.x + &k * y;
        let identity = DMatrix::<f64>::identity(self.n, self.n);
        self.p = (identity - &k * &self.h) * &self.p;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_filter(n: usize, m: usize) -> KalmanFilter {
        KalmanFilter::new(
            DMatrix::identity(n, n),
            DMatrix::identity(m, n),
            DMatrix::identity(n, n) * 0.01,
            DMatrix::identity(m, m) * 1.0,
            DVector::zeros(n),
            DMatrix::identity(n, n) * 1.0,
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_matrix_dimensions() {
        let bad_f = DMatrix::<f64>::identity(3, 3);
        let err = KalmanFilter::new(
            bad_f,
            DMatrix::identity(2, 2),
            DMatrix::identity(2, 2),
            DMatrix::identity(2, 2),
            DVector::zeros(2),
            DMatrix::identity(2, 2),
        )
        .unwrap_err();
        assert!(matches!(err, KalmanError::DimensionMismatch { .. }));
    }

    #[test]
    fn predict_without_observations_grows_covariance_trace() {
        let mut kf = identity_filter(2, 2);
        let trace_before = kf.covariance().trace();
        kf.predict();
        let trace_after = kf.covariance().trace();
        assert!(trace_after > trace_before, "{trace_after} should exceed {trace_before}");
    }

    #[test]
    fn update_with_observation_shrinks_covariance_trace() {
        let mut kf = identity_filter(2, 2);
        kf.predict();
        let trace_before = kf.covariance().trace();
        kf.update(&DVector::from_vec(vec![1.0, 1.0])).unwrap();
        let trace_after = kf.covariance().trace();
        assert!(trace_after < trace_before, "{trace_after} should be less than {trace_before}");
    }
}
